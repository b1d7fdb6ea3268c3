/// Formatter adapters for the generated documents
mod spdx_jsonld_formatter;
mod used_files_formatter;

pub use spdx_jsonld_formatter::{SpdxJsonLdFormatter, SPDX_CONTEXT_URL};
pub use used_files_formatter::PlainUsedFilesFormatter;
