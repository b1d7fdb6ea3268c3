use super::{ArtifactInspector, ArtifactMetadata, TreeClassifier};
use crate::ports::outbound::BuildTreeReader;
use crate::sbom_generation::domain::{BuildGraph, NodeId, TreeLocation};
use crate::shared::error::SbomError;
use crate::shared::Result;
use anyhow::Context;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};

/// Default number of artifacts whose metadata is read concurrently
pub const DEFAULT_READ_CONCURRENCY: usize = 64;

/// GraphBuilder service: reconstructs the cmd graph from the roots
///
/// Discovery is a breadth-first worklist owned by this coordinator. The
/// metadata of one frontier is read concurrently through the
/// BuildTreeReader port, but results are consumed in frontier order and
/// only the coordinator touches the arena, so every path is read once and
/// node ids are deterministic. Acyclicity is verified afterwards.
pub struct GraphBuilder<'a, R> {
    inspector: ArtifactInspector<'a, R>,
    classifier: &'a TreeClassifier,
    concurrency: usize,
}

impl<'a, R: BuildTreeReader> GraphBuilder<'a, R> {
    pub fn new(reader: &'a R, classifier: &'a TreeClassifier, arch: Option<&'a str>) -> Self {
        Self {
            inspector: ArtifactInspector::new(reader, classifier, arch),
            classifier,
            concurrency: DEFAULT_READ_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Builds the graph reachable from `roots`
    ///
    /// # Arguments
    /// * `roots` - Root artifacts, relative to the output tree or absolute
    /// * `on_progress` - Called after each frontier with
    ///   (artifacts inspected, paths discovered)
    ///
    /// # Returns
    /// The complete, acyclic BuildGraph
    ///
    /// # Errors
    /// - `SbomError::RootNotFound` if a root does not exist in the output tree
    /// - `SbomError::DependencyCycle` if the metadata describes a cycle
    /// - Read errors of existing metadata files
    pub async fn build<F>(&self, roots: &[PathBuf], on_progress: F) -> Result<BuildGraph>
    where
        F: Fn(usize, usize),
    {
        let mut graph = BuildGraph::new();
        let mut frontier = self.intern_roots(&mut graph, roots).await?;
        let mut inspected = 0;

        while !frontier.is_empty() {
            let batch: Vec<(NodeId, PathBuf)> = frontier
                .drain(..)
                .map(|id| (id, graph.node(id).path().to_path_buf()))
                .collect();

            let results: Vec<Result<ArtifactMetadata>> = stream::iter(
                batch.iter().map(|(_, path)| self.inspector.inspect(path)),
            )
            .buffered(self.concurrency)
            .collect()
            .await;

            for ((id, path), result) in batch.into_iter().zip(results) {
                let metadata = result
                    .with_context(|| format!("Failed to read build metadata of {}", path.display()))?;
                self.link(&mut graph, id, &path, metadata, &mut frontier);
            }

            inspected = graph.len() - frontier.len();
            on_progress(inspected, graph.len());
        }

        tracing::debug!(
            "Inspected {} artifacts, {} edges",
            inspected,
            graph.edge_count()
        );

        if let Some(chain) = graph.find_cycle() {
            return Err(SbomError::DependencyCycle {
                chain: graph.format_chain(&chain),
            }
            .into());
        }

        Ok(graph)
    }

    async fn intern_roots(&self, graph: &mut BuildGraph, roots: &[PathBuf]) -> Result<Vec<NodeId>> {
        let mut frontier = Vec::new();
        for root in roots {
            let path = self.inspector.canonical_path(root).await?;
            let location = self.classifier.classify(&path);
            let in_output_tree = matches!(location, TreeLocation::Output | TreeLocation::Merged);
            if !in_output_tree || !self.inspector.exists(&path).await {
                return Err(SbomError::RootNotFound {
                    path: root.clone(),
                    output_tree: self.classifier.output_root().to_path_buf(),
                }
                .into());
            }

            let (id, created) = graph.intern(path, location);
            graph.add_root(id);
            if created {
                frontier.push(id);
            }
        }
        Ok(frontier)
    }

    fn link(
        &self,
        graph: &mut BuildGraph,
        id: NodeId,
        path: &Path,
        metadata: ArtifactMetadata,
        frontier: &mut Vec<NodeId>,
    ) {
        if !metadata.exists {
            let location = graph.node(id).location();
            if location.is_external() {
                tracing::debug!("Skipped '{}': file does not exist", path.display());
            } else {
                tracing::warn!("Skipped '{}': file does not exist", path.display());
            }
        }

        if let Some(cmd) = &metadata.cmd {
            for input in cmd.inputs() {
                let (input_id, created) =
                    graph.intern(input.to_path_buf(), self.classifier.classify(input));
                graph.add_input(id, input_id);
                if created {
                    frontier.push(input_id);
                }
            }
        }

        for dependency in metadata.hardcoded_dependencies {
            let location = self.classifier.classify(&dependency);
            let (dependency_id, created) = graph.intern(dependency, location);
            graph.add_implicit_dependency(id, dependency_id);
            if created {
                frontier.push(dependency_id);
            }
        }

        for incbin in metadata.incbin_dependencies {
            let location = self.classifier.classify(&incbin.path);
            let (dependency_id, created) = graph.intern(incbin.path, location);
            graph.add_incbin_dependency(id, dependency_id, incbin.statement);
            if created {
                frontier.push(dependency_id);
            }
        }

        graph.record_metadata(id, metadata.exists, metadata.cmd);
    }
}
