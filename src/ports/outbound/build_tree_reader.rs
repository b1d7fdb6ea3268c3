use crate::shared::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// BuildTreeReader port for reading the source and output trees
///
/// This port abstracts the filesystem access needed to reconstruct the
/// cmd graph: `.cmd` files, response files and assembly sources. Every
/// method is read-only.
///
/// # Async Support
/// Metadata of many artifacts is read concurrently, so implementations
/// must be `Send + Sync`.
#[async_trait]
pub trait BuildTreeReader: Send + Sync {
    /// Reads a text file
    ///
    /// # Arguments
    /// * `path` - Absolute path of the file
    ///
    /// # Returns
    /// The file content, or None if the file does not exist
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read
    async fn read_text(&self, path: &Path) -> Result<Option<String>>;

    /// Checks whether a path exists (following symlinks)
    async fn exists(&self, path: &Path) -> bool;

    /// Resolves the symlinks of a path
    ///
    /// # Returns
    /// The canonical path if any component is a symlink, None if the path
    /// contains no symlink or does not exist
    async fn resolve_symlink(&self, path: &Path) -> Result<Option<PathBuf>>;
}
