use crate::sbom_generation::domain::normalize_path;
use std::path::{Path, PathBuf};

/// ModuleRoots policy: turns a `modules.order` listing into root artifacts
///
/// `modules.order` names the object file of every module (`fs/fat/fat.o`);
/// the artifact installed is the linked module next to it (`fs/fat/fat.ko`).
/// Entries already naming a `.ko` are kept.
pub struct ModuleRoots;

impl ModuleRoots {
    pub fn from_listing(listing: &str) -> Vec<PathBuf> {
        listing
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(Self::module_path)
            .collect()
    }

    fn module_path(entry: &str) -> PathBuf {
        let module = match entry.strip_suffix(".o") {
            Some(stem) => format!("{}.ko", stem),
            None => entry.to_string(),
        };
        normalize_path(Path::new(&module))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_files_become_modules() {
        let roots = ModuleRoots::from_listing("fs/fat/fat.o\ndrivers/net/dummy.o\n");
        assert_eq!(
            roots,
            vec![
                PathBuf::from("fs/fat/fat.ko"),
                PathBuf::from("drivers/net/dummy.ko")
            ]
        );
    }

    #[test]
    fn test_entries_are_normalized() {
        let roots = ModuleRoots::from_listing("  ./fs/../fs/vfat.ko \n\n");
        assert_eq!(roots, vec![PathBuf::from("fs/vfat.ko")]);
    }

    #[test]
    fn test_only_trailing_suffix_is_replaced() {
        let roots = ModuleRoots::from_listing("drivers/foo.o.d/bar.o");
        assert_eq!(roots, vec![PathBuf::from("drivers/foo.o.d/bar.ko")]);
    }
}
