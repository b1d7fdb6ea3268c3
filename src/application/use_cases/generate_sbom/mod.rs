use crate::application::dto::{GraphStats, SbomRequest, SbomResponse};
use crate::ports::outbound::{
    BuildTreeReader, DigestRepository, LicenseRepository, ProgressReporter,
};
use crate::sbom_generation::domain::{BuildGraph, FileDigests, LicenseResolution, NodeId};
use crate::sbom_generation::policies::LicensePriority;
use crate::sbom_generation::services::{
    BuildSettings, ElementFactory, FileFacts, GraphBuilder, LicenseResolver, SbomGenerator,
    TreeClassifier, UsedFilesFilter, KERNEL_CONFIG_FILE,
};
use crate::shared::error::SbomError;
use crate::shared::security::validate_tree_directory;
use crate::shared::Result;
use anyhow::Context;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::path::Path;

/// License file at the top of the source tree
const COPYING_FILE: &str = "COPYING";

/// GenerateSbomUseCase - Core use case for kernel SBOM generation
///
/// This use case orchestrates the SBOM generation process:
/// 1. Validate the source and output trees
/// 2. Reconstruct the cmd graph from the roots
/// 3. Collect licenses and digests of the graph's files
/// 4. Resolve the license and copyright of the root packages
/// 5. Create the linked SPDX documents
/// 6. Collect the used-files report
///
/// Nothing is written here; every document is complete in the response
/// before the caller persists the first one.
pub struct GenerateSbomUseCase<BTR, LREPO, DREPO, PR> {
    build_tree_reader: BTR,
    license_repository: LREPO,
    digest_repository: DREPO,
    progress_reporter: PR,
}

impl<BTR, LREPO, DREPO, PR> GenerateSbomUseCase<BTR, LREPO, DREPO, PR>
where
    BTR: BuildTreeReader,
    LREPO: LicenseRepository,
    DREPO: DigestRepository,
    PR: ProgressReporter,
{
    /// Creates a new GenerateSbomUseCase with injected dependencies
    pub fn new(
        build_tree_reader: BTR,
        license_repository: LREPO,
        digest_repository: DREPO,
        progress_reporter: PR,
    ) -> Self {
        Self {
            build_tree_reader,
            license_repository,
            digest_repository,
            progress_reporter,
        }
    }

    /// Executes the SBOM generation use case
    ///
    /// # Arguments
    /// * `request` - The SBOM generation request
    ///
    /// # Returns
    /// SbomResponse containing the requested documents and reports
    ///
    /// # Errors
    /// Fails before producing any output if a tree is unreadable, a root is
    /// missing, the metadata describes a cycle or a pattern is invalid.
    pub async fn execute(&self, request: SbomRequest) -> Result<SbomResponse> {
        // Step 1: Validate trees and exclusion patterns
        let classifier = self.create_classifier(&request)?;
        let exclude_filter = UsedFilesFilter::new(request.exclude_patterns.clone())
            .map_err(|e| SbomError::Validation {
                message: e.to_string(),
            })?;

        // Step 2: Reconstruct the cmd graph
        let graph = self.build_graph(&request, &classifier).await?;
        let stats = Self::graph_stats(&graph);
        self.progress_reporter.report_completion(&format!(
            "✅ Detected {} files: {} built from .cmd files, {} leaves, {} edges",
            stats.nodes, stats.artifacts, stats.leaves, stats.edges
        ));
        if stats.opaque_commands > 0 {
            self.progress_reporter.report(&format!(
                "ℹ️  {} commands were not recognised and contributed no inputs (see --verbose)",
                stats.opaque_commands
            ));
        }

        let metadata = SbomGenerator::generate_metadata(
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            request.created,
            request.spdx_id_prefix.as_deref(),
            request.spdx_id_uuid,
        );

        // Step 3: Resolve package license and copyright
        let settings = if request.generate_spdx {
            self.resolve_package_settings(&request.settings, &classifier)
                .await?
        } else {
            request.settings.clone()
        };
        let factory = ElementFactory::new(&graph, &classifier, &metadata, &settings);

        // Step 4: Create SPDX documents if requested
        let documents = if request.generate_spdx {
            let facts = self
                .collect_file_facts(&graph, &classifier, request.concurrency)
                .await?;
            self.progress_reporter.report("📝 Creating SPDX documents...");
            Some(factory.create_documents(&facts))
        } else {
            None
        };

        // Step 5: Collect the used-files report if requested
        let used_files = request
            .generate_used_files
            .then(|| self.collect_used_files(&factory, &exclude_filter));

        Ok(SbomResponse::new(documents, used_files, metadata, stats))
    }

    fn create_classifier(&self, request: &SbomRequest) -> Result<TreeClassifier> {
        let source_root = validate_tree_directory(&request.src_tree)?;
        let output_root = validate_tree_directory(&request.obj_tree)?;
        let classifier = TreeClassifier::new(source_root, output_root);

        if classifier.is_merged() {
            self.progress_reporter.report(
                "🔀 Source and output trees are the same directory: source files go into the build document",
            );
        }
        Ok(classifier)
    }

    async fn build_graph(
        &self,
        request: &SbomRequest,
        classifier: &TreeClassifier,
    ) -> Result<BuildGraph> {
        self.progress_reporter.report(&format!(
            "📖 Reading .cmd files of {} root(s) from {}...",
            request.roots.len(),
            classifier.output_root().display()
        ));

        let builder = GraphBuilder::new(
            &self.build_tree_reader,
            classifier,
            request.settings.arch.as_deref(),
        )
        .with_concurrency(request.concurrency);

        builder
            .build(&request.roots, |inspected, discovered| {
                self.progress_reporter.report_progress(
                    inspected,
                    discovered,
                    Some("Reconstructing cmd graph..."),
                );
            })
            .await
    }

    fn graph_stats(graph: &BuildGraph) -> GraphStats {
        GraphStats {
            nodes: graph.len(),
            edges: graph.edge_count(),
            leaves: graph.leaf_count(),
            artifacts: graph.iter().filter(|(_, node)| node.cmd().is_some()).count(),
            opaque_commands: graph
                .iter()
                .filter_map(|(_, node)| node.cmd())
                .map(|cmd| cmd.unrecognized().len())
                .sum(),
        }
    }

    /// Fills the configured package settings from the source tree's `COPYING`
    async fn resolve_package_settings(
        &self,
        configured: &BuildSettings,
        classifier: &TreeClassifier,
    ) -> Result<BuildSettings> {
        let copying_path = classifier.source_root().join(COPYING_FILE);
        let copying = self
            .license_repository
            .read_license_file(&copying_path)
            .await
            .with_context(|| format!("Failed to read {}", copying_path.display()))?;
        let copying_license = copying
            .as_deref()
            .and_then(LicenseResolver::extract_expression);

        let mut settings = configured.clone();
        settings.package_license = LicensePriority::select_package_license(
            configured.package_license.as_deref(),
            copying_license.as_deref(),
        );
        settings.package_copyright_text = LicensePriority::select_copyright_text(
            configured.package_copyright_text.as_deref(),
            copying.as_deref(),
        );

        if settings.package_license.is_none() {
            self.progress_reporter.report_error(
                "⚠️  Warning: No package license configured and none declared in COPYING; packages carry no declared license.",
            );
        }
        Ok(settings)
    }

    async fn collect_file_facts(
        &self,
        graph: &BuildGraph,
        classifier: &TreeClassifier,
        concurrency: usize,
    ) -> Result<FileFacts> {
        let licenses = self.resolve_licenses(graph, classifier, concurrency).await;
        let digests = self.compute_digests(graph, concurrency).await;

        let config_path = classifier.output_root().join(KERNEL_CONFIG_FILE);
        let config_digest = self
            .digest_repository
            .digests(&config_path)
            .await
            .with_context(|| format!("Failed to hash {}", config_path.display()))?;
        if config_digest.is_none() {
            tracing::debug!("No {} in the output tree", KERNEL_CONFIG_FILE);
        }

        Ok(FileFacts {
            licenses,
            digests,
            config_digest,
        })
    }

    /// Resolves the declared license of every source file
    ///
    /// A file whose header cannot be read resolves to NotFound.
    async fn resolve_licenses(
        &self,
        graph: &BuildGraph,
        classifier: &TreeClassifier,
        concurrency: usize,
    ) -> HashMap<NodeId, LicenseResolution> {
        let sources: Vec<(NodeId, &Path)> = graph
            .iter()
            .filter(|(_, node)| node.exists() && classifier.is_source_file(node))
            .map(|(id, node)| (id, node.path()))
            .collect();
        let total = sources.len();

        self.progress_reporter.report(&format!(
            "🔍 Scanning {} source files for license identifiers...",
            total
        ));

        let resolver = LicenseResolver::new();
        let resolver = &resolver;
        let mut results = std::pin::pin!(stream::iter(sources.into_iter().map(
            |(id, path)| async move {
                let resolution = match self.license_repository.read_header(path).await {
                    Ok(header) => resolver.resolve(header.as_deref()),
                    Err(e) => {
                        tracing::warn!("Failed to read license header of {}: {:#}", path.display(), e);
                        LicenseResolution::NotFound
                    }
                };
                (id, resolution)
            }
        ))
        .buffered(concurrency));

        let mut licenses = HashMap::with_capacity(total);
        while let Some((id, resolution)) = results.next().await {
            licenses.insert(id, resolution);
            self.progress_reporter.report_progress(
                licenses.len(),
                total,
                Some("Scanning license identifiers..."),
            );
        }

        let declared = licenses
            .values()
            .filter(|l| l.expression().is_some())
            .count();
        self.progress_reporter.report_completion(&format!(
            "✅ License scan complete: {} of {} source files declare a license ({} distinct expressions)",
            declared,
            total,
            resolver.expressions().len()
        ));

        licenses
    }

    /// Hashes every existing file of the graph
    async fn compute_digests(
        &self,
        graph: &BuildGraph,
        concurrency: usize,
    ) -> HashMap<NodeId, FileDigests> {
        let files: Vec<(NodeId, &Path)> = graph
            .iter()
            .filter(|(_, node)| node.exists())
            .map(|(id, node)| (id, node.path()))
            .collect();
        let total = files.len();

        self.progress_reporter
            .report(&format!("🔐 Computing sha256 and gitoid of {} files...", total));

        let mut results = std::pin::pin!(stream::iter(files.into_iter().map(
            |(id, path)| async move { (id, path, self.digest_repository.digests(path).await) }
        ))
        .buffered(concurrency));

        let mut digests = HashMap::with_capacity(total);
        let mut done = 0;
        let mut failed = 0;
        while let Some((id, path, result)) = results.next().await {
            match result {
                Ok(Some(digest)) => {
                    digests.insert(id, digest);
                }
                Ok(None) => {}
                Err(e) => {
                    failed += 1;
                    tracing::warn!("Failed to hash {}: {:#}", path.display(), e);
                }
            }
            done += 1;
            self.progress_reporter
                .report_progress(done, total, Some("Hashing files..."));
        }

        if failed > 0 {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: {} files could not be hashed and carry no digest.",
                failed
            ));
        }
        self.progress_reporter.report_completion(&format!(
            "✅ Hashing complete: {} files",
            digests.len()
        ));

        digests
    }

    fn collect_used_files(
        &self,
        factory: &ElementFactory<'_>,
        exclude_filter: &UsedFilesFilter,
    ) -> Vec<String> {
        let used_files = factory.used_files();
        if exclude_filter.is_empty() {
            return used_files;
        }

        let total = used_files.len();
        let kept = exclude_filter.filter_files(used_files);

        for pattern in exclude_filter.get_unmatched_patterns() {
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: Exclude pattern '{}' did not match any used files.",
                pattern
            ));
        }
        self.progress_reporter.report(&format!(
            "🚫 Excluded {} of {} used files",
            total - kept.len(),
            total
        ));

        kept
    }
}
