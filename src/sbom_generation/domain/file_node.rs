use super::CmdRecord;
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Index of a FileNode inside the BuildGraph arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Which tree a file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeLocation {
    /// Inside the source tree (and not inside the output tree)
    Source,
    /// Inside the output tree
    Output,
    /// Source and output tree are the same directory; the file is inside it
    Merged,
    /// Outside both trees (toolchain headers, host libraries, ...)
    External,
}

impl TreeLocation {
    pub fn is_external(self) -> bool {
        matches!(self, TreeLocation::External)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TreeLocation::Source => "source",
            TreeLocation::Output => "output",
            TreeLocation::Merged => "merged",
            TreeLocation::External => "external",
        }
    }
}

impl fmt::Display for TreeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// FileNode entity: one distinct canonical path in the build graph
#[derive(Debug, Clone)]
pub struct FileNode {
    path: PathBuf,
    location: TreeLocation,
    exists: bool,
    cmd: Option<CmdRecord>,
    inputs: IndexSet<NodeId>,
    implicit_dependencies: IndexSet<NodeId>,
    incbin_statements: IndexMap<NodeId, String>,
}

impl FileNode {
    pub(crate) fn new(path: PathBuf, location: TreeLocation) -> Self {
        Self {
            path,
            location,
            exists: false,
            cmd: None,
            inputs: IndexSet::new(),
            implicit_dependencies: IndexSet::new(),
            incbin_statements: IndexMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn location(&self) -> TreeLocation {
        self.location
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    /// The parsed `.cmd` file, or None for leaves
    pub fn cmd(&self) -> Option<&CmdRecord> {
        self.cmd.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.cmd.is_none()
    }

    /// Declared inputs of the command that produced this file
    pub fn inputs(&self) -> &IndexSet<NodeId> {
        &self.inputs
    }

    /// Dependencies that are not recorded in `.cmd` files (`.incbin`, Kbuild internals)
    pub fn implicit_dependencies(&self) -> &IndexSet<NodeId> {
        &self.implicit_dependencies
    }

    /// Implicit dependencies pulled in by `.incbin`, with the directive text
    pub fn incbin_dependencies(&self) -> &IndexMap<NodeId, String> {
        &self.incbin_statements
    }

    /// Implicit dependencies from the hardcoded Kbuild table
    pub fn hardcoded_dependencies(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.implicit_dependencies
            .iter()
            .copied()
            .filter(|dependency| !self.incbin_statements.contains_key(dependency))
    }

    pub(crate) fn set_metadata(&mut self, exists: bool, cmd: Option<CmdRecord>) {
        self.exists = exists;
        self.cmd = cmd;
    }

    pub(crate) fn inputs_mut(&mut self) -> &mut IndexSet<NodeId> {
        &mut self.inputs
    }

    pub(crate) fn implicit_dependencies_mut(&mut self) -> &mut IndexSet<NodeId> {
        &mut self.implicit_dependencies
    }

    pub(crate) fn incbin_statements_mut(&mut self) -> &mut IndexMap<NodeId, String> {
        &mut self.incbin_statements
    }
}

/// Lexically normalizes a path: drops `.` components and folds `..` into
/// the preceding component. Never touches the filesystem, so it also works
/// for inputs that no longer exist.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}
