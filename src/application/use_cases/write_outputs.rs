use crate::application::dto::SbomResponse;
use crate::ports::outbound::{DocumentWriter, ProgressReporter, SpdxFormatter, UsedFilesFormatter};
use crate::shared::Result;
use anyhow::Context;
use std::path::PathBuf;

/// File name of the used-files report
pub const USED_FILES_FILE_NAME: &str = "sbom.used-files.txt";

/// WriteOutputsUseCase - Renders and persists the results of a run
///
/// Every output is rendered first; a serialization failure therefore
/// leaves the output location untouched.
pub struct WriteOutputsUseCase<SF, UF, W, PR> {
    spdx_formatter: SF,
    used_files_formatter: UF,
    writer: W,
    progress_reporter: PR,
}

impl<SF, UF, W, PR> WriteOutputsUseCase<SF, UF, W, PR>
where
    SF: SpdxFormatter,
    UF: UsedFilesFormatter,
    W: DocumentWriter,
    PR: ProgressReporter,
{
    pub fn new(spdx_formatter: SF, used_files_formatter: UF, writer: W, progress_reporter: PR) -> Self {
        Self {
            spdx_formatter,
            used_files_formatter,
            writer,
            progress_reporter,
        }
    }

    /// Writes the documents and the used-files report of a response
    ///
    /// # Returns
    /// Paths of the written files, in writing order
    pub fn execute(&self, response: &SbomResponse) -> Result<Vec<PathBuf>> {
        // Step 1: Render every output
        let mut rendered: Vec<(&str, String)> = Vec::new();
        if let Some(documents) = &response.documents {
            self.progress_reporter
                .report("📝 Generating SPDX 3.0 JSON-LD output...");
            for document in documents.iter() {
                let content = self
                    .spdx_formatter
                    .format(document)
                    .with_context(|| format!("Failed to serialize the {} document", document.kind()))?;
                rendered.push((document.kind().file_name(), content));
            }
        }
        if let Some(used_files) = &response.used_files {
            rendered.push((
                USED_FILES_FILE_NAME,
                self.used_files_formatter.format(used_files),
            ));
        }

        // Step 2: Persist
        let mut written = Vec::with_capacity(rendered.len());
        for (file_name, content) in rendered {
            let path = self.writer.write(file_name, &content)?;
            self.progress_reporter
                .report(&format!("💾 Wrote {}", path.display()));
            written.push(path);
        }

        Ok(written)
    }
}
