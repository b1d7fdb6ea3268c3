use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;

/// LicenseRepository port for reading license declarations
///
/// License markers live at the top of source files; the repository only
/// hands out the leading part of a file so large sources are never read
/// completely.
///
/// # Async Support
/// Source files are scanned concurrently. Implementations must be
/// `Send + Sync` to support concurrent access.
#[async_trait]
pub trait LicenseRepository: Send + Sync {
    /// Reads the header of a source file
    ///
    /// # Arguments
    /// * `path` - Absolute path of the source file
    ///
    /// # Returns
    /// The first bytes of the file (lossily decoded), or None if the file
    /// does not exist
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read
    async fn read_header(&self, path: &Path) -> Result<Option<String>>;

    /// Reads a complete license file such as `COPYING`
    ///
    /// # Returns
    /// The file content, or None if the file does not exist
    async fn read_license_file(&self, path: &Path) -> Result<Option<String>>;
}
