use crate::ports::outbound::DocumentWriter;
use crate::shared::error::SbomError;
use crate::shared::security::validate_not_symlink;
use crate::shared::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// FileSystemWriter adapter for writing documents into a directory
///
/// This adapter implements the DocumentWriter port. Every document is
/// written to a temporary file next to its destination and renamed into
/// place, so readers never observe a partially written document.
pub struct FileSystemWriter {
    output_directory: PathBuf,
}

impl FileSystemWriter {
    pub fn new(output_directory: PathBuf) -> Self {
        Self { output_directory }
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    fn write_error(path: &Path, details: impl ToString) -> anyhow::Error {
        SbomError::FileWriteError {
            path: path.to_path_buf(),
            details: details.to_string(),
        }
        .into()
    }

    /// Creates the output directory if needed
    fn ensure_output_directory(&self) -> Result<()> {
        if self.output_directory.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.output_directory).map_err(|e| {
            Self::write_error(
                &self.output_directory,
                format!("Failed to create output directory: {}", e),
            )
        })
    }

    /// Security validation before writing:
    /// - Reject if the destination exists and is a symlink
    fn validate_output_security(&self, path: &Path) -> Result<()> {
        if fs::symlink_metadata(path).is_ok() {
            validate_not_symlink(path, "write")
                .map_err(|e| Self::write_error(path, e))?;
        }
        Ok(())
    }
}

impl DocumentWriter for FileSystemWriter {
    fn write(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        self.ensure_output_directory()?;
        let path = self.output_directory.join(file_name);
        self.validate_output_security(&path)?;

        let mut temp_file = NamedTempFile::new_in(&self.output_directory)
            .map_err(|e| Self::write_error(&path, format!("Failed to create temporary file: {}", e)))?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| Self::write_error(&path, e))?;
        temp_file
            .persist(&path)
            .map_err(|e| Self::write_error(&path, e.error))?;

        tracing::debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(path)
    }
}
