use crate::sbom_generation::domain::spdx::SbomDocuments;
use crate::sbom_generation::domain::SbomMetadata;

/// Size of the reconstructed cmd graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub leaves: usize,
    /// Nodes with a `.cmd` file
    pub artifacts: usize,
    /// Single commands no parser understood; they contribute no inputs
    pub opaque_commands: usize,
}

/// SbomResponse - Internal response DTO from SBOM generation use case
///
/// This DTO contains the rich data structures produced by the use case,
/// which adapters can then format into the appropriate output format.
#[derive(Debug, Clone)]
pub struct SbomResponse {
    /// Linked SPDX documents (only present when requested)
    pub documents: Option<SbomDocuments>,
    /// Used-files report after exclusion (only present when requested)
    pub used_files: Option<Vec<String>>,
    /// SBOM metadata (timestamp, tool info, namespace uuid)
    pub metadata: SbomMetadata,
    pub stats: GraphStats,
}

impl SbomResponse {
    pub fn new(
        documents: Option<SbomDocuments>,
        used_files: Option<Vec<String>>,
        metadata: SbomMetadata,
        stats: GraphStats,
    ) -> Self {
        Self {
            documents,
            used_files,
            metadata,
            stats,
        }
    }
}
