use crate::sbom_generation::domain::spdx::SpdxDocumentModel;
use crate::shared::Result;

/// SpdxFormatter port for serializing SPDX documents
///
/// This port abstracts the serialization of one materialized document
/// (JSON-LD today).
pub trait SpdxFormatter {
    /// Serializes a document
    ///
    /// # Arguments
    /// * `document` - The fully materialized document
    ///
    /// # Returns
    /// Serialized document content
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, document: &SpdxDocumentModel) -> Result<String>;
}

/// UsedFilesFormatter port for the flat used-files report
pub trait UsedFilesFormatter {
    /// Renders a list of file names
    fn format(&self, used_files: &[String]) -> String;
}
