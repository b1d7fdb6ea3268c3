mod artifact_purpose;
mod kbuild_dependencies;
mod license_priority;
mod module_roots;

pub use artifact_purpose::ArtifactPurpose;
pub use kbuild_dependencies::KbuildDependencies;
pub use license_priority::LicensePriority;
pub use module_roots::ModuleRoots;
