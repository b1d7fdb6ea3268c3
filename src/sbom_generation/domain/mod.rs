pub mod build_graph;
pub mod cmd_record;
pub mod file_digests;
pub mod file_node;
pub mod license;
pub mod sbom_metadata;
pub mod spdx;

pub use build_graph::{BuildGraph, DependencyEdge, EdgeKind};
pub use cmd_record::CmdRecord;
pub use file_digests::FileDigests;
pub use file_node::{normalize_path, FileNode, NodeId, TreeLocation};
pub use license::LicenseResolution;
pub use sbom_metadata::SbomMetadata;
