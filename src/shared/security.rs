use crate::shared::error::SbomError;
use crate::shared::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum size of a single `.cmd` or response file (16 MB).
/// Real kbuild metadata files stay well below this; anything larger is
/// not a metadata file and would only waste memory.
pub const MAX_METADATA_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Maximum number of bytes inspected when looking for a license marker
/// in the header of a source file.
pub const MAX_LICENSE_HEADER_BYTES: usize = 4096;

/// Validates that a path is not a symbolic link
///
/// Used before writing generated documents so an existing symlink in the
/// output directory cannot redirect the write elsewhere.
///
/// # Errors
/// Returns an error if the path is a symbolic link or if metadata cannot be read
pub fn validate_not_symlink(path: &Path, operation: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read metadata for {} operation on {}: {}",
            operation,
            path.display(),
            e
        )
    })?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, {} operations on symbolic links are not allowed.",
            path.display(),
            operation
        );
    }

    Ok(())
}

/// Validates a source or output tree root and returns its canonical form
///
/// Unlike output files, tree roots may be symbolic links (kbuild itself
/// places a `source` link in out-of-tree builds); the canonical path is
/// what every node path is compared against.
///
/// # Errors
/// Returns `SbomError::TreeUnreadable` if the path does not exist, is not a
/// directory or cannot be listed.
pub fn validate_tree_directory(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        return Err(SbomError::TreeUnreadable {
            path: path.to_path_buf(),
            reason: "Directory does not exist".to_string(),
        }
        .into());
    }

    let canonical = path.canonicalize().map_err(|e| SbomError::TreeUnreadable {
        path: path.to_path_buf(),
        reason: format!("Failed to canonicalize path: {}", e),
    })?;

    if !canonical.is_dir() {
        return Err(SbomError::TreeUnreadable {
            path: path.to_path_buf(),
            reason: "Not a directory".to_string(),
        }
        .into());
    }

    fs::read_dir(&canonical).map_err(|e| SbomError::TreeUnreadable {
        path: path.to_path_buf(),
        reason: format!("Failed to list directory: {}", e),
    })?;

    Ok(canonical)
}

/// Validates file size is within acceptable limits
///
/// # Errors
/// Returns an error if the file size exceeds the maximum
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            file_size,
            max_size
        );
    }
    Ok(())
}
