/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (file system, console).
pub mod build_tree_reader;
pub mod digest_repository;
pub mod document_writer;
pub mod formatter;
pub mod license_repository;
pub mod progress_reporter;

pub use build_tree_reader::BuildTreeReader;
pub use digest_repository::DigestRepository;
pub use document_writer::DocumentWriter;
pub use formatter::{SpdxFormatter, UsedFilesFormatter};
pub use license_repository::LicenseRepository;
pub use progress_reporter::ProgressReporter;
