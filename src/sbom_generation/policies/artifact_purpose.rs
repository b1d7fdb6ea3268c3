use crate::sbom_generation::domain::spdx::SoftwarePurpose;
use crate::sbom_generation::domain::TreeLocation;

const SOURCE_SUFFIXES: &[&str] = &[".c", ".h", ".S", ".s", ".rs", ".pl", ".dts", ".dtsi"];
const LIBRARY_SUFFIXES: &[&str] = &[".a", ".so", ".rlib"];
const ARCHIVE_SUFFIXES: &[&str] = &[".xz", ".cpio", ".gz", ".tar", ".zip"];
const EXECUTABLE_SUFFIXES: &[&str] = &[
    ".bin",
    ".elf",
    "vmlinux",
    "bzImage",
    "Image",
    "vmlinux.unstripped",
    ".ro",
];
const DATA_SUFFIXES: &[&str] = &[
    ".tbl",
    ".relocs",
    ".rmeta",
    ".in",
    ".dbg",
    ".x509",
    ".pbm",
    ".ppm",
    ".dtb",
    ".dtbo",
    ".uc",
    ".inc",
    ".xml",
    "initramfs_inc_data",
    "default_cpio_list",
    "x509_certificate_list",
    "utf8data.c_shipped",
    "blacklist_hash_list",
    "x509_revocation_list",
];
const CONFIGURATION_SUFFIXES: &[&str] = &[".pem", ".key", ".conf", ".config", ".cfg", ".bconf"];
const DOCUMENTATION_SUFFIXES: &[&str] = &[".md", ".rst", ".txt"];
const OTHER_SUFFIXES: &[&str] = &[".o", ".tmp", ".cmd"];

/// Root artifacts that are presented under a descriptive package name
const KERNEL_IMAGES: &[&str] = &["bzImage", "Image", "zImage", "vmlinuz"];

/// ArtifactPurpose policy: how files and root artifacts are described
///
/// Kernel artifacts have no reliable metadata beyond their names, so
/// both the SPDX primary purpose and the package name are derived from
/// file name conventions.
pub struct ArtifactPurpose;

impl ArtifactPurpose {
    /// Derives the primary purpose of a file from its name
    ///
    /// Source-like files only count as `source` when they come from the
    /// source tree; generated C files in the output tree are `other`.
    /// Returns None when no rule applies.
    pub fn primary_purpose(name: &str, location: TreeLocation) -> Option<SoftwarePurpose> {
        let ends_with = |suffixes: &[&str]| suffixes.iter().any(|s| name.ends_with(s));

        if ends_with(SOURCE_SUFFIXES) {
            return Some(match location {
                TreeLocation::Source | TreeLocation::Merged => SoftwarePurpose::Source,
                TreeLocation::Output | TreeLocation::External => SoftwarePurpose::Other,
            });
        }
        if ends_with(LIBRARY_SUFFIXES) {
            return Some(SoftwarePurpose::Library);
        }
        if ends_with(ARCHIVE_SUFFIXES) {
            return Some(SoftwarePurpose::Archive);
        }
        if ends_with(EXECUTABLE_SUFFIXES) {
            return Some(SoftwarePurpose::Executable);
        }
        if name.ends_with(".ko") {
            return Some(SoftwarePurpose::Module);
        }
        if ends_with(DATA_SUFFIXES) || name.contains("drivers/gpu/drm/radeon/reg_srcs/") {
            return Some(SoftwarePurpose::Data);
        }
        if ends_with(CONFIGURATION_SUFFIXES) {
            return Some(SoftwarePurpose::Configuration);
        }
        if ends_with(DOCUMENTATION_SUFFIXES) {
            return Some(SoftwarePurpose::Documentation);
        }
        if ends_with(OTHER_SUFFIXES) {
            return Some(SoftwarePurpose::Other);
        }
        None
    }

    /// Primary purpose of the package wrapping a root artifact
    pub fn package_purpose(file_name: &str) -> SoftwarePurpose {
        if KERNEL_IMAGES.contains(&file_name) {
            SoftwarePurpose::Application
        } else if file_name.ends_with(".ko") {
            SoftwarePurpose::Module
        } else {
            SoftwarePurpose::Other
        }
    }

    /// Package name for a root artifact
    ///
    /// # Examples
    /// `arch/x86/boot/bzImage` -> `Linux Kernel (bzImage)`,
    /// `drivers/net/dummy.ko` -> `dummy.ko`
    pub fn package_name(file_name: &str) -> String {
        if KERNEL_IMAGES.contains(&file_name) {
            format!("Linux Kernel ({})", file_name)
        } else {
            file_name.to_string()
        }
    }
}
