use crate::shared::Result;
use std::path::PathBuf;

/// DocumentWriter port for persisting generated documents
///
/// This port abstracts the output destination where rendered documents
/// are stored.
pub trait DocumentWriter {
    /// Writes one document
    ///
    /// # Arguments
    /// * `file_name` - File name of the document inside the output location
    /// * `content` - Rendered document content
    ///
    /// # Returns
    /// The path the document was written to
    ///
    /// # Errors
    /// Returns an error if:
    /// - The output directory cannot be created
    /// - Writing or renaming the file fails
    fn write(&self, file_name: &str, content: &str) -> Result<PathBuf>;
}
