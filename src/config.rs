//! Configuration file support for kernel-sbom.
//!
//! Provides YAML-based configuration through `kernel-sbom.config.yml` files,
//! including data structures, file loading, and validation.

use anyhow::{bail, Context};
use chrono::DateTime;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use kernel_sbom::shared::Result;

pub const CONFIG_FILENAME: &str = "kernel-sbom.config.yml";

/// Top-level configuration file schema.
///
/// Every key mirrors a command-line option; values given on the command
/// line take precedence.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub src_tree: Option<PathBuf>,
    pub obj_tree: Option<PathBuf>,
    pub roots: Option<Vec<PathBuf>>,
    pub roots_file: Option<PathBuf>,
    pub modules_order: Option<PathBuf>,
    pub generate_spdx: Option<bool>,
    pub generate_used_files: Option<bool>,
    pub output_directory: Option<PathBuf>,
    pub spdx_id_prefix: Option<String>,
    pub spdx_id_uuid: Option<String>,
    pub created: Option<String>,
    pub build_type: Option<String>,
    pub build_id: Option<String>,
    pub package_license: Option<String>,
    pub package_version: Option<String>,
    pub package_copyright_text: Option<String>,
    pub arch: Option<String>,
    pub prettify_json: Option<bool>,
    pub used_files_exclude: Option<Vec<String>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref patterns) = config.used_files_exclude {
        for (i, pattern) in patterns.iter().enumerate() {
            if pattern.trim().is_empty() {
                bail!(
                    "Invalid config: used_files_exclude[{}] must not be empty.\n\n\
                     💡 Hint: Each entry must be a file name pattern (e.g., \"scripts/*\").",
                    i
                );
            }
        }
    }

    if let Some(ref uuid) = config.spdx_id_uuid {
        if Uuid::parse_str(uuid).is_err() {
            bail!(
                "Invalid config: spdx_id_uuid '{}' is not a valid UUID.\n\n\
                 💡 Hint: Use the hyphenated form, e.g. \"123e4567-e89b-12d3-a456-426614174000\".",
                uuid
            );
        }
    }

    if let Some(ref created) = config.created {
        if DateTime::parse_from_rfc3339(created).is_err() {
            bail!(
                "Invalid config: created '{}' is not an RFC 3339 timestamp.\n\n\
                 💡 Hint: Use a UTC timestamp such as \"2024-01-01T00:00:00Z\".",
                created
            );
        }
    }

    if let Some(ref roots) = config.roots {
        if roots.iter().any(|root| root.as_os_str().is_empty()) {
            bail!(
                "Invalid config: roots must not contain empty paths.\n\n\
                 💡 Hint: List root artifacts relative to the output tree (e.g., \"vmlinux\")."
            );
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
