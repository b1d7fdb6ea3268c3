use crate::sbom_generation::domain::SbomMetadata;
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Default prefix of every generated SPDX namespace
pub const DEFAULT_SPDX_ID_PREFIX: &str = "urn:spdx.dev:";

/// SbomGenerator service for generating SBOM metadata
///
/// This service contains pure business logic for SBOM metadata generation.
/// Timestamp and namespace uuid can be pinned for reproducible documents.
pub struct SbomGenerator;

impl SbomGenerator {
    /// Generates SBOM metadata
    ///
    /// # Arguments
    /// * `tool_name` - Name of the tool generating the SBOM
    /// * `tool_version` - Version of the tool
    /// * `created` - Fixed creation time; now if None
    /// * `id_prefix` - Namespace prefix; `urn:spdx.dev:` if None
    /// * `id_uuid` - Fixed namespace uuid; random v4 if None
    pub fn generate_metadata(
        tool_name: &str,
        tool_version: &str,
        created: Option<DateTime<Utc>>,
        id_prefix: Option<&str>,
        id_uuid: Option<Uuid>,
    ) -> SbomMetadata {
        let created = created
            .unwrap_or_else(Utc::now)
            .to_rfc3339_opts(SecondsFormat::Secs, true);

        SbomMetadata::new(
            created,
            tool_name.to_string(),
            tool_version.to_string(),
            id_prefix.unwrap_or(DEFAULT_SPDX_ID_PREFIX).to_string(),
            id_uuid.unwrap_or_else(Uuid::new_v4),
        )
    }

    /// Generates SBOM metadata with default tool information (kernel-sbom)
    ///
    /// This uses the compile-time version from Cargo.toml
    pub fn generate_default_metadata() -> SbomMetadata {
        Self::generate_metadata(
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            None,
            None,
            None,
        )
    }
}
