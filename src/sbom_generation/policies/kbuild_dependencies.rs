use std::path::{Path, PathBuf};

/// Dependencies Kbuild resolves internally and never records in `.cmd` files.
/// Keys and values are relative to the output tree; `{arch}` is substituted.
const HARDCODED_DEPENDENCIES: &[(&str, &[&str])] = &[
    ("include/generated/bounds.h", &["kernel/bounds.s"]),
    (
        "include/generated/asm-offsets.h",
        &["arch/{arch}/kernel/asm-offsets.s"],
    ),
    (
        "include/generated/rq-offsets.h",
        &["kernel/sched/rq-offsets.s"],
    ),
    (
        "kernel/sched/rq-offsets.s",
        &["include/generated/asm-offsets.h"],
    ),
];

/// KbuildDependencies policy: implicit edges of the kernel build system
///
/// A few generated headers are produced by rules that Kbuild hardcodes in
/// its Makefiles; their `.cmd` files do not list the assembly file they are
/// derived from. This table restores those edges.
pub struct KbuildDependencies;

impl KbuildDependencies {
    /// Returns the hardcoded dependencies of an output-tree file
    ///
    /// # Arguments
    /// * `relative_path` - Path of the artifact relative to the output tree
    /// * `arch` - Source architecture (`SRCARCH`), if known
    ///
    /// # Returns
    /// Dependencies relative to the output tree. Entries that need an
    /// architecture are skipped when `arch` is None.
    pub fn for_artifact(relative_path: &Path, arch: Option<&str>) -> Vec<PathBuf> {
        HARDCODED_DEPENDENCIES
            .iter()
            .filter(|(artifact, _)| Path::new(artifact) == relative_path)
            .flat_map(|(_, dependencies)| dependencies.iter())
            .filter_map(|dependency| Self::substitute_arch(dependency, arch))
            .collect()
    }

    fn substitute_arch(template: &str, arch: Option<&str>) -> Option<PathBuf> {
        if !template.contains("{arch}") {
            return Some(PathBuf::from(template));
        }
        arch.map(|arch| PathBuf::from(template.replace("{arch}", arch)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_header_depends_on_bounds_assembly() {
        assert_eq!(
            KbuildDependencies::for_artifact(Path::new("include/generated/bounds.h"), None),
            vec![PathBuf::from("kernel/bounds.s")]
        );
    }

    #[test]
    fn test_asm_offsets_substitutes_arch() {
        assert_eq!(
            KbuildDependencies::for_artifact(
                Path::new("include/generated/asm-offsets.h"),
                Some("x86")
            ),
            vec![PathBuf::from("arch/x86/kernel/asm-offsets.s")]
        );
    }

    #[test]
    fn test_arch_dependent_entry_skipped_without_arch() {
        assert!(KbuildDependencies::for_artifact(
            Path::new("include/generated/asm-offsets.h"),
            None
        )
        .is_empty());
    }

    #[test]
    fn test_unknown_artifact_has_no_dependencies() {
        assert!(KbuildDependencies::for_artifact(Path::new("init/main.o"), Some("x86")).is_empty());
    }
}
