use crate::sbom_generation::domain::FileDigests;
use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;

/// DigestRepository port for content hashes of files
#[async_trait]
pub trait DigestRepository: Send + Sync {
    /// Computes the sha256 digest and git blob id of a file
    ///
    /// # Returns
    /// Both digests, or None if the path is not a regular file
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read
    async fn digests(&self, path: &Path) -> Result<Option<FileDigests>>;
}
