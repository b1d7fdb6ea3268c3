use uuid::Uuid;

/// SbomMetadata value object: everything about a run that is not derived
/// from the build graph
#[derive(Debug, Clone)]
pub struct SbomMetadata {
    created: String,
    tool_name: String,
    tool_version: String,
    id_prefix: String,
    id_uuid: Uuid,
}

impl SbomMetadata {
    pub fn new(
        created: String,
        tool_name: String,
        tool_version: String,
        id_prefix: String,
        id_uuid: Uuid,
    ) -> Self {
        Self {
            created,
            tool_name,
            tool_version,
            id_prefix,
            id_uuid,
        }
    }

    /// Creation timestamp, `%Y-%m-%dT%H:%M:%SZ`
    pub fn created(&self) -> &str {
        &self.created
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn tool_version(&self) -> &str {
        &self.tool_version
    }

    /// Prefix of every generated namespace, e.g. `urn:spdx.dev:`
    pub fn id_prefix(&self) -> &str {
        &self.id_prefix
    }

    pub fn id_uuid(&self) -> &Uuid {
        &self.id_uuid
    }
}
