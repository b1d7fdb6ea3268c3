mod artifact_inspector;
mod cmd_file_parser;
mod element_factory;
mod graph_builder;
mod license_resolver;
mod savedcmd_parser;
mod sbom_generator;
mod tree_classifier;
mod used_files_filter;

pub use artifact_inspector::{ArtifactInspector, ArtifactMetadata, IncbinDependency};
pub use cmd_file_parser::{CmdFileContents, CmdFileParser, IncbinStatement};
pub use element_factory::{
    BuildSettings, ElementFactory, FileFacts, DEFAULT_BUILD_TYPE, KERNEL_CONFIG_FILE,
};
pub use graph_builder::{GraphBuilder, DEFAULT_READ_CONCURRENCY};
pub use license_resolver::{LicenseResolver, LICENSE_HEADER_LINES};
pub use savedcmd_parser::{ParsedCommand, SavedCommandParser};
pub use sbom_generator::{SbomGenerator, DEFAULT_SPDX_ID_PREFIX};
pub use tree_classifier::TreeClassifier;
pub use used_files_filter::UsedFilesFilter;
