use crate::sbom_generation::domain::{FileNode, TreeLocation};
use std::path::{Path, PathBuf};

/// TreeClassifier service: decides which tree a canonical path belongs to
///
/// The output tree is checked first, so an output tree nested inside the
/// source tree (`linux/kernel_build`) classifies its files as output.
#[derive(Debug, Clone)]
pub struct TreeClassifier {
    source_root: PathBuf,
    output_root: PathBuf,
}

impl TreeClassifier {
    /// Both roots must already be canonical
    pub fn new(source_root: PathBuf, output_root: PathBuf) -> Self {
        Self {
            source_root,
            output_root,
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// True when source and output tree are the same directory
    pub fn is_merged(&self) -> bool {
        self.source_root == self.output_root
    }

    pub fn classify(&self, path: &Path) -> TreeLocation {
        if path.starts_with(&self.output_root) {
            if self.is_merged() {
                TreeLocation::Merged
            } else {
                TreeLocation::Output
            }
        } else if path.starts_with(&self.source_root) {
            TreeLocation::Source
        } else {
            TreeLocation::External
        }
    }

    /// True for files that count as sources: everything in the source
    /// tree, or, in a merged tree, the files no command produced
    pub fn is_source_file(&self, node: &FileNode) -> bool {
        match node.location() {
            TreeLocation::Source => true,
            TreeLocation::Merged => node.is_leaf(),
            TreeLocation::Output | TreeLocation::External => false,
        }
    }

    /// Element name of a file: tree-relative inside a tree, absolute outside
    pub fn relative_name(&self, path: &Path, location: TreeLocation) -> String {
        let root = match location {
            TreeLocation::Source => &self.source_root,
            TreeLocation::Output | TreeLocation::Merged => &self.output_root,
            TreeLocation::External => return path.display().to_string(),
        };
        path.strip_prefix(root)
            .map(|relative| relative.display().to_string())
            .unwrap_or_else(|_| path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn separate() -> TreeClassifier {
        TreeClassifier::new(
            PathBuf::from("/work/linux"),
            PathBuf::from("/work/linux/kernel_build"),
        )
    }

    #[test]
    fn test_output_tree_wins_over_enclosing_source_tree() {
        let classifier = separate();
        assert!(!classifier.is_merged());
        assert_eq!(
            classifier.classify(Path::new("/work/linux/kernel_build/init/main.o")),
            TreeLocation::Output
        );
        assert_eq!(
            classifier.classify(Path::new("/work/linux/init/main.c")),
            TreeLocation::Source
        );
        assert_eq!(
            classifier.classify(Path::new("/usr/lib/gcc/x86_64-linux-gnu/13/include/stddef.h")),
            TreeLocation::External
        );
    }

    #[test]
    fn test_prefix_match_is_component_wise() {
        let classifier = separate();
        assert_eq!(
            classifier.classify(Path::new("/work/linux-next/init/main.c")),
            TreeLocation::External
        );
    }

    #[test]
    fn test_merged_tree() {
        let classifier = TreeClassifier::new(PathBuf::from("/linux"), PathBuf::from("/linux"));
        assert!(classifier.is_merged());
        assert_eq!(
            classifier.classify(Path::new("/linux/init/main.c")),
            TreeLocation::Merged
        );
        assert_eq!(
            classifier.relative_name(Path::new("/linux/init/main.c"), TreeLocation::Merged),
            "init/main.c"
        );
    }

    #[test]
    fn test_source_files_in_merged_tree_are_leaves() {
        use crate::sbom_generation::domain::{BuildGraph, CmdRecord};

        let classifier = TreeClassifier::new(PathBuf::from("/linux"), PathBuf::from("/linux"));
        let mut graph = BuildGraph::new();
        let (object, _) = graph.intern(PathBuf::from("/linux/init/main.o"), TreeLocation::Merged);
        let (source, _) = graph.intern(PathBuf::from("/linux/init/main.c"), TreeLocation::Merged);
        let (external, _) = graph.intern(PathBuf::from("/usr/include/x.h"), TreeLocation::External);
        let cmd = CmdRecord::new(
            PathBuf::from("/linux/init/main.o"),
            "gcc -c -o init/main.o init/main.c".to_string(),
            vec![PathBuf::from("/linux/init/main.c")],
            Some("cc".to_string()),
        );
        graph.record_metadata(object, true, Some(cmd));
        graph.record_metadata(source, true, None);

        assert!(!classifier.is_source_file(graph.node(object)));
        assert!(classifier.is_source_file(graph.node(source)));
        assert!(!classifier.is_source_file(graph.node(external)));
    }

    #[test]
    fn test_relative_name() {
        let classifier = separate();
        assert_eq!(
            classifier.relative_name(
                Path::new("/work/linux/kernel_build/vmlinux"),
                TreeLocation::Output
            ),
            "vmlinux"
        );
        assert_eq!(
            classifier.relative_name(Path::new("/opt/rust/lib/core.rs"), TreeLocation::External),
            "/opt/rust/lib/core.rs"
        );
    }
}
