use indexmap::IndexSet;
use std::path::{Path, PathBuf};

/// CmdRecord value object: the parsed contents of one `.cmd` file
///
/// Input paths are absolute and normalized, kept in declaration order
/// without duplicates. The artifact never appears among its own inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdRecord {
    artifact: PathBuf,
    command: String,
    inputs: IndexSet<PathBuf>,
    label: Option<String>,
    unrecognized: Vec<String>,
}

impl CmdRecord {
    pub fn new(
        artifact: PathBuf,
        command: String,
        inputs: impl IntoIterator<Item = PathBuf>,
        label: Option<String>,
    ) -> Self {
        let inputs = inputs
            .into_iter()
            .filter(|input| *input != artifact)
            .collect();
        Self {
            artifact,
            command,
            inputs,
            label,
            unrecognized: Vec::new(),
        }
    }

    /// Attaches the single commands no parser understood
    pub fn with_unrecognized(mut self, unrecognized: Vec<String>) -> Self {
        self.unrecognized = unrecognized;
        self
    }

    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    /// The literal command text, stored opaquely
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Path> {
        self.inputs.iter().map(PathBuf::as_path)
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Short human-readable label (the recognised tool name), if any
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Single commands that contributed no inputs because no parser matched
    pub fn unrecognized(&self) -> &[String] {
        &self.unrecognized
    }
}
