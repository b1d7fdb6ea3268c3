use super::{CmdFileParser, SavedCommandParser, TreeClassifier};
use crate::ports::outbound::BuildTreeReader;
use crate::sbom_generation::domain::{normalize_path, CmdRecord};
use crate::sbom_generation::policies::KbuildDependencies;
use crate::shared::Result;
use anyhow::Context;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// File pulled into an assembly source by `.incbin`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncbinDependency {
    /// Canonical path of the included file
    pub path: PathBuf,
    /// The `.incbin` directive as written
    pub statement: String,
}

/// Everything known about one artifact after reading its metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactMetadata {
    pub exists: bool,
    /// Parsed `.cmd` file; None for leaves
    pub cmd: Option<CmdRecord>,
    /// Canonical paths of known Kbuild dependencies missing from the `.cmd` file
    pub hardcoded_dependencies: Vec<PathBuf>,
    pub incbin_dependencies: Vec<IncbinDependency>,
}

/// ArtifactInspector service: reads and resolves the metadata of one artifact
///
/// All paths it returns are absolute, lexically normalized and symlink
/// resolved, so they can be used directly as graph keys.
pub struct ArtifactInspector<'a, R> {
    reader: &'a R,
    classifier: &'a TreeClassifier,
    arch: Option<&'a str>,
}

impl<'a, R: BuildTreeReader> ArtifactInspector<'a, R> {
    pub fn new(reader: &'a R, classifier: &'a TreeClassifier, arch: Option<&'a str>) -> Self {
        Self {
            reader,
            classifier,
            arch,
        }
    }

    /// Location of the `.cmd` file of an artifact: `dir/name` -> `dir/.name.cmd`
    pub fn cmd_file_path(artifact: &Path) -> Option<PathBuf> {
        let name = artifact.file_name()?.to_string_lossy();
        Some(artifact.with_file_name(format!(".{}.cmd", name)))
    }

    /// Canonical form of a path: relative paths are taken relative to the
    /// output tree, then normalized and resolved if they are symlinks
    pub async fn canonical_path(&self, path: &Path) -> Result<PathBuf> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.classifier.output_root().join(path)
        };
        let normalized = normalize_path(&absolute);
        Ok(self
            .reader
            .resolve_symlink(&normalized)
            .await?
            .unwrap_or(normalized))
    }

    pub async fn exists(&self, path: &Path) -> bool {
        self.reader.exists(path).await
    }

    /// Reads the metadata of an artifact
    ///
    /// # Arguments
    /// * `artifact` - Canonical path of the artifact
    ///
    /// # Returns
    /// ArtifactMetadata; a missing file yields `exists == false` and no
    /// dependencies at all
    ///
    /// # Errors
    /// Returns an error if an existing `.cmd`, response or assembly file
    /// cannot be read
    pub async fn inspect(&self, artifact: &Path) -> Result<ArtifactMetadata> {
        if !self.reader.exists(artifact).await {
            return Ok(ArtifactMetadata::default());
        }

        let cmd = self.read_cmd_record(artifact).await?;
        let hardcoded_dependencies = self.hardcoded_dependencies(artifact).await?;
        let incbin_dependencies = self.incbin_dependencies(artifact).await?;

        Ok(ArtifactMetadata {
            exists: true,
            cmd,
            hardcoded_dependencies,
            incbin_dependencies,
        })
    }

    async fn read_cmd_record(&self, artifact: &Path) -> Result<Option<CmdRecord>> {
        let Some(cmd_path) = Self::cmd_file_path(artifact) else {
            return Ok(None);
        };
        let Some(text) = self.reader.read_text(&cmd_path).await? else {
            return Ok(None);
        };
        let Some(contents) = CmdFileParser::parse(&text) else {
            tracing::warn!(
                "Skipped '{}': no 'savedcmd_' line found",
                cmd_path.display()
            );
            return Ok(None);
        };

        let parsed = SavedCommandParser::parse(&contents.savedcmd);
        let mut raw_inputs = parsed.inputs;
        raw_inputs.extend(CmdFileParser::parse_dependencies(&contents.deps));
        let raw_inputs = self.expand_response_files(raw_inputs).await?;

        let mut inputs = Vec::with_capacity(raw_inputs.len());
        for input in raw_inputs {
            inputs.push(self.canonical_path(Path::new(&input)).await?);
        }

        Ok(Some(
            CmdRecord::new(artifact.to_path_buf(), contents.savedcmd, inputs, parsed.label)
                .with_unrecognized(parsed.unrecognized),
        ))
    }

    /// Replaces `@file` entries by the non-empty lines of `file`, recursively
    async fn expand_response_files(&self, inputs: Vec<String>) -> Result<Vec<String>> {
        let mut expanded = Vec::with_capacity(inputs.len());
        let mut seen = HashSet::new();
        let mut stack = vec![inputs.into_iter()];

        loop {
            let next = match stack.last_mut() {
                Some(entries) => entries.next(),
                None => break,
            };
            let Some(entry) = next else {
                stack.pop();
                continue;
            };
            let Some(response_file) = entry.strip_prefix('@') else {
                expanded.push(entry);
                continue;
            };

            let path = normalize_path(&self.classifier.output_root().join(response_file));
            if !seen.insert(path.clone()) {
                continue;
            }
            match self.reader.read_text(&path).await? {
                Some(content) => {
                    let lines: Vec<String> = content
                        .lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .map(str::to_string)
                        .collect();
                    stack.push(lines.into_iter());
                }
                None => tracing::warn!("Response file '{}' does not exist", path.display()),
            }
        }
        Ok(expanded)
    }

    /// Entries of the hardcoded Kbuild table that exist in either tree
    async fn hardcoded_dependencies(&self, artifact: &Path) -> Result<Vec<PathBuf>> {
        let relative = artifact
            .strip_prefix(self.classifier.output_root())
            .or_else(|_| artifact.strip_prefix(self.classifier.source_root()));
        let Ok(relative) = relative else {
            return Ok(Vec::new());
        };

        let mut dependencies = Vec::new();
        for dependency in KbuildDependencies::for_artifact(relative, self.arch) {
            match self.locate_in_trees(&dependency).await? {
                Some(path) => dependencies.push(path),
                None => tracing::debug!(
                    "Skipped hardcoded dependency '{}' of '{}': in neither tree",
                    dependency.display(),
                    artifact.display()
                ),
            }
        }
        Ok(dependencies)
    }

    /// `.incbin` targets of assembly sources
    async fn incbin_dependencies(&self, artifact: &Path) -> Result<Vec<IncbinDependency>> {
        if !artifact.extension().is_some_and(|ext| ext == "S") {
            return Ok(Vec::new());
        }

        let content = self
            .reader
            .read_text(artifact)
            .await
            .with_context(|| format!("Failed to scan {} for .incbin", artifact.display()))?
            .unwrap_or_default();

        let mut dependencies = Vec::new();
        for included in CmdFileParser::parse_incbin(&content) {
            dependencies.push(IncbinDependency {
                path: self.canonical_path(Path::new(&included.path)).await?,
                statement: included.statement,
            });
        }
        Ok(dependencies)
    }

    async fn locate_in_trees(&self, relative: &Path) -> Result<Option<PathBuf>> {
        for root in [self.classifier.output_root(), self.classifier.source_root()] {
            let candidate = root.join(relative);
            if self.reader.exists(&candidate).await {
                return self.canonical_path(&candidate).await.map(Some);
            }
        }
        Ok(None)
    }
}
