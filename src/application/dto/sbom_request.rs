use crate::sbom_generation::services::{BuildSettings, DEFAULT_READ_CONCURRENCY};
use crate::shared::error::SbomError;
use crate::shared::Result;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use uuid::Uuid;

/// SbomRequest - Internal request DTO for SBOM generation use case
///
/// This DTO represents the internal request structure used within
/// the application layer. It may differ from the external API request.
#[derive(Debug, Clone)]
pub struct SbomRequest {
    /// Root of the kernel source tree
    pub src_tree: PathBuf,
    /// Root of the output tree (equal to `src_tree` for in-tree builds)
    pub obj_tree: PathBuf,
    /// Root artifacts, relative to the output tree or absolute
    pub roots: Vec<PathBuf>,
    /// Whether the SPDX documents are generated
    pub generate_spdx: bool,
    /// Whether the used-files report is generated
    pub generate_used_files: bool,
    pub spdx_id_prefix: Option<String>,
    pub spdx_id_uuid: Option<Uuid>,
    /// Fixed creation time for reproducible documents
    pub created: Option<DateTime<Utc>>,
    /// Values copied onto Build and Package elements
    pub settings: BuildSettings,
    /// Patterns for excluding files from the used-files report
    pub exclude_patterns: Vec<String>,
    /// Maximum number of metadata files read at once
    pub concurrency: usize,
}

impl SbomRequest {
    pub fn builder() -> SbomRequestBuilder {
        SbomRequestBuilder::default()
    }
}

/// Builder for SbomRequest
///
/// `build` rejects requests that cannot produce anything: no roots, or
/// neither output selected.
#[derive(Debug, Default)]
pub struct SbomRequestBuilder {
    src_tree: Option<PathBuf>,
    obj_tree: Option<PathBuf>,
    roots: Vec<PathBuf>,
    generate_spdx: bool,
    generate_used_files: bool,
    spdx_id_prefix: Option<String>,
    spdx_id_uuid: Option<Uuid>,
    created: Option<DateTime<Utc>>,
    settings: BuildSettings,
    exclude_patterns: Vec<String>,
    concurrency: Option<usize>,
}

impl SbomRequestBuilder {
    pub fn src_tree(mut self, path: impl Into<PathBuf>) -> Self {
        self.src_tree = Some(path.into());
        self
    }

    pub fn obj_tree(mut self, path: impl Into<PathBuf>) -> Self {
        self.obj_tree = Some(path.into());
        self
    }

    pub fn roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.roots.extend(roots.into_iter().map(Into::into));
        self
    }

    pub fn generate_spdx(mut self, enabled: bool) -> Self {
        self.generate_spdx = enabled;
        self
    }

    pub fn generate_used_files(mut self, enabled: bool) -> Self {
        self.generate_used_files = enabled;
        self
    }

    pub fn spdx_id_prefix(mut self, prefix: Option<String>) -> Self {
        self.spdx_id_prefix = prefix;
        self
    }

    pub fn spdx_id_uuid(mut self, uuid: Option<Uuid>) -> Self {
        self.spdx_id_uuid = uuid;
        self
    }

    pub fn created(mut self, created: Option<DateTime<Utc>>) -> Self {
        self.created = created;
        self
    }

    pub fn settings(mut self, settings: BuildSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    pub fn build(self) -> Result<SbomRequest> {
        let src_tree = self.src_tree.ok_or_else(|| validation("src_tree is required"))?;
        // in-tree builds use the source tree as output tree
        let obj_tree = self.obj_tree.unwrap_or_else(|| src_tree.clone());

        if self.roots.is_empty() {
            return Err(validation("at least one root artifact is required"));
        }
        if !self.generate_spdx && !self.generate_used_files {
            return Err(validation(
                "nothing to generate: enable the SPDX documents or the used-files report",
            ));
        }
        let concurrency = self.concurrency.unwrap_or(DEFAULT_READ_CONCURRENCY);
        if concurrency == 0 {
            return Err(validation("concurrency must be at least 1"));
        }

        Ok(SbomRequest {
            src_tree,
            obj_tree,
            roots: self.roots,
            generate_spdx: self.generate_spdx,
            generate_used_files: self.generate_used_files,
            spdx_id_prefix: self.spdx_id_prefix,
            spdx_id_uuid: self.spdx_id_uuid,
            created: self.created,
            settings: self.settings,
            exclude_patterns: self.exclude_patterns,
            concurrency,
        })
    }
}

fn validation(message: &str) -> anyhow::Error {
    SbomError::Validation {
        message: message.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let request = SbomRequest::builder()
            .src_tree("/linux")
            .roots(["vmlinux"])
            .generate_spdx(true)
            .build()
            .unwrap();

        assert_eq!(request.obj_tree, PathBuf::from("/linux"));
        assert_eq!(request.roots, vec![PathBuf::from("vmlinux")]);
        assert!(!request.generate_used_files);
        assert_eq!(request.concurrency, DEFAULT_READ_CONCURRENCY);
        assert_eq!(request.settings.build_type, "urn:spdx.dev:Kbuild");
    }

    #[test]
    fn test_builder_requires_roots() {
        let error = SbomRequest::builder()
            .src_tree("/linux")
            .generate_spdx(true)
            .build()
            .unwrap_err();
        assert!(error.to_string().contains("at least one root"));
    }

    #[test]
    fn test_builder_requires_an_output() {
        let error = SbomRequest::builder()
            .src_tree("/linux")
            .roots(["vmlinux"])
            .build()
            .unwrap_err();
        assert!(error.to_string().contains("nothing to generate"));
    }

    #[test]
    fn test_builder_requires_source_tree() {
        let error = SbomRequest::builder()
            .roots(["vmlinux"])
            .generate_used_files(true)
            .build()
            .unwrap_err();
        assert!(error.to_string().contains("src_tree is required"));
    }

    #[test]
    fn test_builder_rejects_zero_concurrency() {
        let result = SbomRequest::builder()
            .src_tree("/linux")
            .obj_tree("/linux/build")
            .roots(["vmlinux"])
            .generate_used_files(true)
            .concurrency(0)
            .build();
        assert!(result.is_err());
    }
}
