use super::TreeClassifier;
use crate::sbom_generation::domain::spdx::{
    ContentIdentifier, CreationInfo, DocumentKind, ExternalMap, File, Hash, ProfileIdentifier,
    Relationship, RelationshipCompleteness, RelationshipType, SbomDocuments, SbomType, SoftwarePurpose,
    SpdxDocumentModel, SpdxElement, SpdxId, SpdxIdGenerator, SpdxNamespace, CREATION_INFO_ID,
    SHARED_PREFIX, SPDX_SPEC_VERSION,
};
use crate::sbom_generation::domain::{
    BuildGraph, FileDigests, FileNode, LicenseResolution, NodeId, SbomMetadata, TreeLocation,
};
use crate::sbom_generation::policies::ArtifactPurpose;
use indexmap::IndexSet;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Default `build_buildType` of every Build element
pub const DEFAULT_BUILD_TYPE: &str = "urn:spdx.dev:Kbuild";

/// Kernel configuration file, relative to the output tree
pub const KERNEL_CONFIG_FILE: &str = ".config";

/// Name of the directory File standing for the source tree
pub const SOURCE_TREE_ELEMENT: &str = "$(src_tree)";

/// Name of the directory File standing for the output tree
pub const OUTPUT_TREE_ELEMENT: &str = "$(obj_tree)";

/// User-supplied values that end up on Build and Package elements
#[derive(Debug, Clone)]
pub struct BuildSettings {
    pub build_type: String,
    /// Defaults to the expanded id of the high-level Build
    pub build_id: Option<String>,
    pub package_license: Option<String>,
    pub package_version: Option<String>,
    pub package_copyright_text: Option<String>,
    pub arch: Option<String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            build_type: DEFAULT_BUILD_TYPE.to_string(),
            build_id: None,
            package_license: None,
            package_version: None,
            package_copyright_text: None,
            arch: None,
        }
    }
}

/// Per-file facts gathered after graph construction
#[derive(Debug, Clone, Default)]
pub struct FileFacts {
    /// Declared license of every source file
    pub licenses: HashMap<NodeId, LicenseResolution>,
    /// Content hashes of every file that exists
    pub digests: HashMap<NodeId, FileDigests>,
    /// Content hashes of the output tree's `.config`, None when there is none
    pub config_digest: Option<FileDigests>,
}

struct Namespaces {
    shared: SpdxNamespace,
    source: SpdxNamespace,
    build: SpdxNamespace,
    output: SpdxNamespace,
}

impl Namespaces {
    fn new(metadata: &SbomMetadata) -> Self {
        let namespace =
            |prefix: &str| SpdxNamespace::new(prefix, metadata.id_prefix(), metadata.id_uuid());
        Self {
            shared: namespace(SHARED_PREFIX),
            source: namespace(DocumentKind::Source.prefix()),
            build: namespace(DocumentKind::Build.prefix()),
            output: namespace(DocumentKind::Output.prefix()),
        }
    }

    fn get(&self, kind: DocumentKind) -> &SpdxNamespace {
        match kind {
            DocumentKind::Source => &self.source,
            DocumentKind::Build => &self.build,
            DocumentKind::Output => &self.output,
        }
    }

    fn expand(&self, kind: DocumentKind, id: &SpdxId) -> String {
        self.get(kind)
            .expand(id)
            .unwrap_or_else(|| id.to_string())
    }
}

/// Elements present with the same identity in every document
struct SharedElements {
    agent: SpdxElement,
    creation_info: SpdxElement,
}

/// Collects the elements of one document and every id they reference
struct DocumentBuilder {
    kind: DocumentKind,
    ids: SpdxIdGenerator,
    document_id: SpdxId,
    sbom_id: SpdxId,
    elements: Vec<SpdxElement>,
    references: IndexSet<SpdxId>,
}

impl DocumentBuilder {
    fn new(kind: DocumentKind, namespace: SpdxNamespace) -> Self {
        let mut ids = SpdxIdGenerator::new(namespace);
        let document_id = ids.next_id();
        let sbom_id = ids.next_id();
        Self {
            kind,
            ids,
            document_id,
            sbom_id,
            elements: Vec::new(),
            references: IndexSet::new(),
        }
    }

    fn next_id(&mut self) -> SpdxId {
        self.ids.next_id()
    }

    fn push(&mut self, element: SpdxElement) {
        self.elements.push(element);
    }

    fn push_directory(&mut self, name: &str) -> SpdxId {
        let spdx_id = self.next_id();
        self.push(SpdxElement::File(SpdxElement::directory(spdx_id.clone(), name)));
        spdx_id
    }

    fn relate(&mut self, relationship_type: RelationshipType, from: SpdxId, to: Vec<SpdxId>) {
        self.relate_with(relationship_type, from, to, None, None);
    }

    /// Relationships without targets are not emitted
    fn relate_with(
        &mut self,
        relationship_type: RelationshipType,
        from: SpdxId,
        to: Vec<SpdxId>,
        completeness: Option<RelationshipCompleteness>,
        comment: Option<String>,
    ) {
        if to.is_empty() {
            return;
        }
        self.references.insert(from.clone());
        self.references.extend(to.iter().cloned());
        let spdx_id = self.next_id();
        self.elements.push(SpdxElement::Relationship(Relationship {
            spdx_id,
            creation_info: CREATION_INFO_ID.to_string(),
            relationship_type,
            from,
            to,
            completeness,
            comment,
        }));
    }

    fn finish(
        mut self,
        shared: &SharedElements,
        namespaces: &Namespaces,
        profiles: Vec<ProfileIdentifier>,
        sbom_type: SbomType,
        root_elements: Vec<SpdxId>,
    ) -> SpdxDocumentModel {
        self.references.extend(root_elements.iter().cloned());

        let mut foreign_kinds = BTreeSet::new();
        let mut imports = Vec::new();
        for id in &self.references {
            let Some(kind) = DocumentKind::from_prefix(id.prefix()) else {
                continue;
            };
            if kind == self.kind {
                continue;
            }
            foreign_kinds.insert(kind);
            imports.push(ExternalMap {
                external_spdx_id: namespaces.expand(kind, id),
                location_hint: Some(kind.file_name().to_string()),
            });
        }

        let mut sbom = SpdxElement::sbom(self.sbom_id.clone(), sbom_type);
        sbom.root_element = root_elements;
        sbom.element = self
            .elements
            .iter()
            .filter_map(|element| element.spdx_id().cloned())
            .collect();

        let mut document = SpdxElement::spdx_document(self.document_id, profiles);
        document.root_element = vec![self.sbom_id];
        document.imports = imports;

        let mut used_namespaces = vec![namespaces.shared.clone(), namespaces.get(self.kind).clone()];
        used_namespaces.extend(
            foreign_kinds
                .into_iter()
                .map(|kind| namespaces.get(kind).clone()),
        );

        let mut graph = Vec::with_capacity(self.elements.len() + 4);
        graph.push(SpdxElement::SpdxDocument(document));
        graph.push(shared.agent.clone());
        graph.push(shared.creation_info.clone());
        graph.push(SpdxElement::Sbom(sbom));
        graph.extend(self.elements);

        SpdxDocumentModel::new(self.kind, used_namespaces, graph)
    }
}

/// ElementFactory service: projects a BuildGraph onto SPDX documents
///
/// Source files go to the source document (the build document in a
/// merged tree) under a `$(src_tree)` directory File; every other file
/// sits under `$(obj_tree)` in the build document together with the
/// per-artifact Builds and the
/// `ancestorOf` link from the high-level Build live in the build
/// document; the high-level Build, `.config` and the root Packages live
/// in the output document. A reference to an element owned by another
/// document becomes an ExternalMap in the referencing document's imports.
pub struct ElementFactory<'a> {
    graph: &'a BuildGraph,
    classifier: &'a TreeClassifier,
    metadata: &'a SbomMetadata,
    settings: &'a BuildSettings,
}

impl<'a> ElementFactory<'a> {
    pub fn new(
        graph: &'a BuildGraph,
        classifier: &'a TreeClassifier,
        metadata: &'a SbomMetadata,
        settings: &'a BuildSettings,
    ) -> Self {
        Self {
            graph,
            classifier,
            metadata,
            settings,
        }
    }

    /// Creates the linked documents of the run
    ///
    /// # Arguments
    /// * `facts` - Licenses and digests of the graph's files
    ///
    /// # Returns
    /// Build and output documents, plus the source document unless the
    /// source and output trees are the same directory
    pub fn create_documents(&self, facts: &FileFacts) -> SbomDocuments {
        let namespaces = Namespaces::new(self.metadata);
        let mut shared_ids = SpdxIdGenerator::new(namespaces.shared.clone());
        let agent_id = shared_ids.next_id();
        let shared = SharedElements {
            agent: SpdxElement::software_agent(agent_id.clone(), self.metadata.tool_name()),
            creation_info: SpdxElement::CreationInfo(CreationInfo {
                id: CREATION_INFO_ID.to_string(),
                spec_version: SPDX_SPEC_VERSION.to_string(),
                created_by: vec![agent_id.clone()],
                created: self.metadata.created().to_string(),
            }),
        };

        let merged = self.classifier.is_merged();
        let mut source = (!merged)
            .then(|| DocumentBuilder::new(DocumentKind::Source, namespaces.source.clone()));
        let mut build = DocumentBuilder::new(DocumentKind::Build, namespaces.build.clone());
        let mut output = DocumentBuilder::new(DocumentKind::Output, namespaces.output.clone());

        let high_level_build_id = output.next_id();
        let build_id = self
            .settings
            .build_id
            .clone()
            .unwrap_or_else(|| namespaces.expand(DocumentKind::Output, &high_level_build_id));

        // Step 1: tree directories, then File elements in discovery order
        let source_tree = source
            .as_mut()
            .map(|source| source.push_directory(SOURCE_TREE_ELEMENT));
        let output_tree = (!merged).then(|| build.push_directory(OUTPUT_TREE_ELEMENT));

        let mut file_ids = Vec::with_capacity(self.graph.len());
        let mut source_files = Vec::new();
        let mut build_files = Vec::new();
        for (id, node) in self.graph.iter() {
            let owner = match (node.location(), source.as_mut()) {
                (TreeLocation::Source, Some(source)) => source,
                _ => &mut build,
            };
            let spdx_id = owner.next_id();
            owner.push(SpdxElement::File(self.file_element(spdx_id.clone(), id, node, facts)));
            match owner.kind {
                DocumentKind::Source => source_files.push(spdx_id.clone()),
                _ => build_files.push(spdx_id.clone()),
            }
            file_ids.push(spdx_id);
        }
        if let (Some(source), Some(tree)) = (source.as_mut(), &source_tree) {
            source.relate(RelationshipType::Contains, tree.clone(), source_files);
        }
        if let Some(tree) = &output_tree {
            build.relate(RelationshipType::Contains, tree.clone(), build_files);
        }

        // Step 2: license expressions of source files
        let license_owner = match source.as_mut() {
            Some(source) => source,
            None => &mut build,
        };
        self.add_file_licenses(license_owner, &file_ids, facts);

        // Step 3: low-level Builds and implicit dependencies
        let low_level_builds = self.add_low_level_builds(&mut build, &file_ids, &build_id);
        self.add_implicit_dependencies(&mut build, &file_ids);
        build.relate_with(
            RelationshipType::AncestorOf,
            high_level_build_id.clone(),
            low_level_builds,
            Some(RelationshipCompleteness::Complete),
            None,
        );

        // Step 4: high-level Build, configuration and root packages
        let root_files: Vec<SpdxId> = self
            .graph
            .roots()
            .iter()
            .map(|root| file_ids[root.index()].clone())
            .collect();
        self.add_high_level_build(&mut output, &namespaces, high_level_build_id, build_id, &root_files, facts);
        let packages = self.add_packages(&mut output, &agent_id, &root_files);

        // Step 5: wrap every element set into its document
        let source = source.map(|source| {
            let root_elements = source_tree.into_iter().collect();
            source.finish(
                &shared,
                &namespaces,
                vec![
                    ProfileIdentifier::Core,
                    ProfileIdentifier::Software,
                    ProfileIdentifier::SimpleLicensing,
                ],
                SbomType::Source,
                root_elements,
            )
        });

        let mut build_profiles = vec![
            ProfileIdentifier::Core,
            ProfileIdentifier::Software,
            ProfileIdentifier::Build,
        ];
        if merged {
            build_profiles.push(ProfileIdentifier::SimpleLicensing);
        }
        let build_roots = match output_tree {
            Some(tree) => vec![tree],
            None => root_files,
        };
        let build = build.finish(&shared, &namespaces, build_profiles, SbomType::Build, build_roots);

        let output = output.finish(
            &shared,
            &namespaces,
            vec![
                ProfileIdentifier::Core,
                ProfileIdentifier::Software,
                ProfileIdentifier::Build,
                ProfileIdentifier::SimpleLicensing,
            ],
            SbomType::Build,
            packages,
        );

        SbomDocuments {
            source,
            build,
            output,
        }
    }

    /// Names of the source files (merged tree: files no command produced),
    /// sorted and unique
    ///
    /// The list equals the regular File element names of the source
    /// document, or the matching File elements of the build document in a
    /// merged tree.
    pub fn used_files(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .graph
            .iter()
            .filter(|(_, node)| self.classifier.is_source_file(node))
            .map(|(_, node)| self.classifier.relative_name(node.path(), node.location()))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    fn file_element(&self, spdx_id: SpdxId, id: NodeId, node: &FileNode, facts: &FileFacts) -> File {
        let name = self.classifier.relative_name(node.path(), node.location());
        let mut file = SpdxElement::file(spdx_id, name);
        file.primary_purpose = ArtifactPurpose::primary_purpose(&file.name, node.location());
        if let Some(digests) = facts.digests.get(&id) {
            Self::attach_digests(&mut file, digests);
        }
        file
    }

    fn attach_digests(file: &mut File, digests: &FileDigests) {
        file.verified_using.push(Hash::sha256(digests.sha256.clone()));
        file.content_identifier
            .push(ContentIdentifier::gitoid(digests.gitoid.clone()));
    }

    /// `dependsOn` edges the `.cmd` files do not record: one relationship
    /// for `.incbin` targets, commented with the directives, and one for
    /// the hardcoded Kbuild table
    fn add_implicit_dependencies(&self, build: &mut DocumentBuilder, file_ids: &[SpdxId]) {
        for (id, node) in self.graph.iter() {
            let incbin = node.incbin_dependencies();
            if !incbin.is_empty() {
                let statements = incbin.values().cloned().collect::<Vec<_>>().join("\n");
                build.relate_with(
                    RelationshipType::DependsOn,
                    file_ids[id.index()].clone(),
                    incbin
                        .keys()
                        .map(|dependency| file_ids[dependency.index()].clone())
                        .collect(),
                    None,
                    Some(statements),
                );
            }

            let hardcoded = node
                .hardcoded_dependencies()
                .map(|dependency| file_ids[dependency.index()].clone())
                .collect();
            build.relate(
                RelationshipType::DependsOn,
                file_ids[id.index()].clone(),
                hardcoded,
            );
        }
    }

    fn add_file_licenses(&self, owner: &mut DocumentBuilder, file_ids: &[SpdxId], facts: &FileFacts) {
        let mut declared: BTreeMap<&str, Vec<SpdxId>> = BTreeMap::new();
        for (id, _) in self.graph.iter() {
            if let Some(expression) = facts.licenses.get(&id).and_then(|l| l.expression()) {
                declared
                    .entry(expression)
                    .or_default()
                    .push(file_ids[id.index()].clone());
            }
        }

        for (expression, files) in declared {
            let license_id = owner.next_id();
            owner.push(SpdxElement::license_expression(license_id.clone(), expression));
            for file in files {
                owner.relate(
                    RelationshipType::HasDeclaredLicense,
                    file,
                    vec![license_id.clone()],
                );
            }
        }
    }

    fn add_low_level_builds(
        &self,
        build: &mut DocumentBuilder,
        file_ids: &[SpdxId],
        build_id: &str,
    ) -> Vec<SpdxId> {
        let mut low_level_builds = Vec::new();
        for (id, node) in self.graph.iter() {
            let Some(cmd) = node.cmd() else {
                continue;
            };

            let build_element_id = build.next_id();
            let mut element = SpdxElement::build(build_element_id.clone(), &self.settings.build_type);
            element.name = cmd.label().map(str::to_string);
            element.comment = Some(cmd.command().to_string());
            element.build_id = Some(build_id.to_string());
            build.push(SpdxElement::Build(element));

            let inputs = node
                .inputs()
                .iter()
                .map(|input| file_ids[input.index()].clone())
                .collect();
            build.relate(RelationshipType::HasInput, build_element_id.clone(), inputs);
            build.relate(
                RelationshipType::HasOutput,
                build_element_id.clone(),
                vec![file_ids[id.index()].clone()],
            );
            low_level_builds.push(build_element_id);
        }
        low_level_builds
    }

    fn add_high_level_build(
        &self,
        output: &mut DocumentBuilder,
        namespaces: &Namespaces,
        spdx_id: SpdxId,
        build_id: String,
        root_files: &[SpdxId],
        facts: &FileFacts,
    ) {
        let mut high_level = SpdxElement::build(spdx_id.clone(), &self.settings.build_type);
        high_level.build_id = Some(build_id);

        let mut config_file = None;
        if let Some(digests) = &facts.config_digest {
            let config_id = output.next_id();
            high_level
                .config_source_uri
                .push(namespaces.expand(DocumentKind::Output, &config_id));
            high_level
                .config_source_digest
                .push(Hash::sha256(digests.sha256.clone()));

            let mut file = SpdxElement::file(config_id, KERNEL_CONFIG_FILE.to_string());
            Self::attach_digests(&mut file, digests);
            file.primary_purpose = Some(SoftwarePurpose::Configuration);
            config_file = Some(file);
        }

        output.push(SpdxElement::Build(high_level));
        if let Some(file) = config_file {
            output.push(SpdxElement::File(file));
        }
        output.relate(RelationshipType::HasOutput, spdx_id, root_files.to_vec());
    }

    fn add_packages(
        &self,
        output: &mut DocumentBuilder,
        agent_id: &SpdxId,
        root_files: &[SpdxId],
    ) -> Vec<SpdxId> {
        let mut packages = Vec::with_capacity(root_files.len());
        for (&root, root_file) in self.graph.roots().iter().zip(root_files) {
            let path = self.graph.node(root).path();
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            let package_id = output.next_id();
            let mut package = SpdxElement::package(package_id.clone(), ArtifactPurpose::package_name(&file_name));
            package.package_version = self.settings.package_version.clone();
            package.copyright_text = self.settings.package_copyright_text.clone();
            package.primary_purpose = Some(ArtifactPurpose::package_purpose(&file_name));
            package.originated_by = vec![agent_id.clone()];
            package.comment = self
                .settings
                .arch
                .as_ref()
                .map(|arch| format!("Architecture={}", arch));
            output.push(SpdxElement::Package(package));
            output.relate(
                RelationshipType::HasDistributionArtifact,
                package_id.clone(),
                vec![root_file.clone()],
            );
            packages.push(package_id);
        }

        if let Some(license) = &self.settings.package_license {
            let license_id = output.next_id();
            output.push(SpdxElement::license_expression(license_id.clone(), license));
            for package in &packages {
                output.relate(
                    RelationshipType::HasDeclaredLicense,
                    package.clone(),
                    vec![license_id.clone()],
                );
            }
        }
        packages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::CmdRecord;
    use std::path::PathBuf;
    use std::sync::Arc;
    use uuid::Uuid;

    const NIL: &str = "00000000-0000-0000-0000-000000000000";

    fn metadata() -> SbomMetadata {
        SbomMetadata::new(
            "2025-01-01T00:00:00Z".to_string(),
            "kernel-sbom".to_string(),
            "0.1.0".to_string(),
            "urn:spdx.dev:".to_string(),
            Uuid::nil(),
        )
    }

    fn cmd(artifact: &str, command: &str, inputs: &[&str], label: &str) -> CmdRecord {
        CmdRecord::new(
            PathBuf::from(artifact),
            command.to_string(),
            inputs.iter().map(PathBuf::from),
            Some(label.to_string()),
        )
    }

    /// a.out <- b.o, c.o; b.o <- b.c; c.o <- c.c, common.h
    fn scenario_graph(classifier: &TreeClassifier, root: &str) -> BuildGraph {
        let out = classifier.output_root().to_path_buf();
        let src = classifier.source_root().to_path_buf();
        let mut graph = BuildGraph::new();
        let node = |graph: &mut BuildGraph, path: PathBuf| {
            let location = classifier.classify(&path);
            graph.intern(path, location).0
        };

        let a = node(&mut graph, out.join(root));
        let b_o = node(&mut graph, out.join("b.o"));
        let c_o = node(&mut graph, out.join("c.o"));
        let b_c = node(&mut graph, src.join("b.c"));
        let c_c = node(&mut graph, src.join("c.c"));
        let common = node(&mut graph, src.join("common.h"));

        graph.add_root(a);
        for (artifact, input) in [(a, b_o), (a, c_o), (b_o, b_c), (c_o, c_c), (c_o, common)] {
            graph.add_input(artifact, input);
        }
        let path = |id: NodeId| graph.node(id).path().display().to_string();
        let (a_path, b_o_path, c_o_path) = (path(a), path(b_o), path(c_o));
        let (b_c_path, c_c_path, common_path) = (path(b_c), path(c_c), path(common));
        graph.record_metadata(
            a,
            true,
            Some(cmd(&a_path, "ld -o a.out b.o c.o", &[&b_o_path, &c_o_path], "ld")),
        );
        graph.record_metadata(
            b_o,
            true,
            Some(cmd(&b_o_path, "gcc -c -o b.o b.c", &[&b_c_path], "cc")),
        );
        graph.record_metadata(
            c_o,
            true,
            Some(cmd(&c_o_path, "gcc -c -o c.o c.c", &[&c_c_path, &common_path], "cc")),
        );
        for leaf in [b_c, c_c, common] {
            graph.record_metadata(leaf, true, None);
        }
        graph
    }

    fn mit_facts(graph: &BuildGraph, classifier: &TreeClassifier) -> FileFacts {
        let mit: Arc<str> = Arc::from("MIT");
        let mut facts = FileFacts::default();
        for (id, node) in graph.iter() {
            facts.digests.insert(
                id,
                FileDigests {
                    sha256: format!("{:064x}", id.index()),
                    gitoid: format!("{:040x}", id.index()),
                },
            );
            if classifier.is_source_file(node) {
                let resolution = if node.path().ends_with("common.h") {
                    LicenseResolution::NotFound
                } else {
                    LicenseResolution::Declared(mit.clone())
                };
                facts.licenses.insert(id, resolution);
            }
        }
        facts
    }

    fn names(model: &SpdxDocumentModel) -> Vec<String> {
        let mut names: Vec<String> = model.files().map(|f| f.name.clone()).collect();
        names.sort();
        names
    }

    fn separate() -> TreeClassifier {
        TreeClassifier::new(PathBuf::from("/src"), PathBuf::from("/out"))
    }

    #[test]
    fn test_scenario_documents() {
        let classifier = separate();
        let graph = scenario_graph(&classifier, "a.out");
        let metadata = metadata();
        let settings = BuildSettings::default();
        let factory = ElementFactory::new(&graph, &classifier, &metadata, &settings);
        let documents = factory.create_documents(&mit_facts(&graph, &classifier));

        let source = documents.source.as_ref().unwrap();
        assert_eq!(names(source), vec!["b.c", "c.c", "common.h"]);
        assert_eq!(names(&documents.build), vec!["a.out", "b.o", "c.o"]);

        let licenses: Vec<_> = source.license_expressions().collect();
        assert_eq!(licenses.len(), 1);
        assert_eq!(licenses[0].license_expression, "MIT");
        let declared: Vec<_> = source
            .relationships(RelationshipType::HasDeclaredLicense)
            .collect();
        assert_eq!(declared.len(), 2);
        assert!(declared.iter().all(|r| r.to == vec![licenses[0].spdx_id.clone()]));

        assert_eq!(documents.build.builds().count(), 3);
        assert_eq!(factory.used_files(), vec!["b.c", "c.c", "common.h"]);
    }

    #[test]
    fn test_low_level_builds_carry_label_and_command() {
        let classifier = separate();
        let graph = scenario_graph(&classifier, "a.out");
        let metadata = metadata();
        let settings = BuildSettings::default();
        let documents = ElementFactory::new(&graph, &classifier, &metadata, &settings)
            .create_documents(&FileFacts::default());

        let high_level_id = format!("urn:spdx.dev:{}/output#2", NIL);
        let builds: Vec<_> = documents.build.builds().collect();
        assert_eq!(builds[0].name.as_deref(), Some("ld"));
        assert_eq!(builds[0].comment.as_deref(), Some("ld -o a.out b.o c.o"));
        assert_eq!(builds[1].name.as_deref(), Some("cc"));
        assert!(builds
            .iter()
            .all(|b| b.build_type == DEFAULT_BUILD_TYPE && b.build_id.as_deref() == Some(high_level_id.as_str())));

        let ancestor: Vec<_> = documents
            .build
            .relationships(RelationshipType::AncestorOf)
            .collect();
        assert_eq!(ancestor.len(), 1);
        assert_eq!(ancestor[0].from.as_str(), "output:2");
        assert_eq!(ancestor[0].to.len(), 3);
        assert_eq!(ancestor[0].completeness, Some(RelationshipCompleteness::Complete));
    }

    #[test]
    fn test_cross_document_references_are_imported() {
        let classifier = separate();
        let graph = scenario_graph(&classifier, "a.out");
        let metadata = metadata();
        let settings = BuildSettings::default();
        let documents = ElementFactory::new(&graph, &classifier, &metadata, &settings)
            .create_documents(&FileFacts::default());

        let build_imports: Vec<&str> = documents
            .build
            .imports()
            .iter()
            .map(|i| i.external_spdx_id.as_str())
            .collect();
        assert!(build_imports.contains(&format!("urn:spdx.dev:{}/output#2", NIL).as_str()));
        assert!(build_imports.contains(&format!("urn:spdx.dev:{}/source#3", NIL).as_str()));
        assert_eq!(
            build_imports.len(),
            4,
            "high-level build and three source files"
        );
        let hint = documents
            .build
            .imports()
            .iter()
            .find(|i| i.external_spdx_id.ends_with("/output#2"))
            .and_then(|i| i.location_hint.clone());
        assert_eq!(hint.as_deref(), Some("sbom-output.spdx.json"));

        assert!(documents.source.as_ref().unwrap().imports().is_empty());

        let prefixes: Vec<&str> = documents
            .build
            .namespaces()
            .iter()
            .map(|n| n.prefix())
            .collect();
        assert_eq!(prefixes, vec!["shared", "build", "source", "output"]);
    }

    #[test]
    fn test_output_document_packages() {
        let classifier = separate();
        let graph = scenario_graph(&classifier, "bzImage");
        let metadata = metadata();
        let settings = BuildSettings {
            package_license: Some("GPL-2.0 WITH Linux-syscall-note".to_string()),
            package_version: Some("6.12.0".to_string()),
            arch: Some("x86".to_string()),
            ..BuildSettings::default()
        };
        let documents = ElementFactory::new(&graph, &classifier, &metadata, &settings)
            .create_documents(&FileFacts::default());
        let output = &documents.output;

        let packages: Vec<_> = output.packages().collect();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "Linux Kernel (bzImage)");
        assert_eq!(packages[0].package_version.as_deref(), Some("6.12.0"));
        assert_eq!(packages[0].comment.as_deref(), Some("Architecture=x86"));
        assert_eq!(packages[0].originated_by, vec![SpdxId::new("shared:0")]);

        let distribution: Vec<_> = output
            .relationships(RelationshipType::HasDistributionArtifact)
            .collect();
        assert_eq!(distribution[0].to, vec![SpdxId::new("build:3")]);
        assert!(output
            .imports()
            .iter()
            .any(|i| i.external_spdx_id == format!("urn:spdx.dev:{}/build#3", NIL)));

        assert_eq!(output.license_expressions().count(), 1);
        assert_eq!(
            output.relationships(RelationshipType::HasDeclaredLicense).count(),
            1
        );
        assert_eq!(output.document().unwrap().root_element, vec![SpdxId::new("output:1")]);
    }

    #[test]
    fn test_missing_package_license_is_omitted() {
        let classifier = separate();
        let graph = scenario_graph(&classifier, "a.out");
        let metadata = metadata();
        let settings = BuildSettings::default();
        let documents = ElementFactory::new(&graph, &classifier, &metadata, &settings)
            .create_documents(&FileFacts::default());

        assert_eq!(documents.output.license_expressions().count(), 0);
        assert_eq!(documents.output.packages().count(), 1);
    }

    #[test]
    fn test_config_file_is_linked_from_high_level_build() {
        let classifier = separate();
        let graph = scenario_graph(&classifier, "a.out");
        let metadata = metadata();
        let settings = BuildSettings::default();
        let facts = FileFacts {
            config_digest: Some(FileDigests {
                sha256: "ab".repeat(32),
                gitoid: "cd".repeat(20),
            }),
            ..FileFacts::default()
        };
        let documents = ElementFactory::new(&graph, &classifier, &metadata, &settings)
            .create_documents(&facts);

        let high_level = documents.output.builds().next().unwrap();
        assert_eq!(
            high_level.config_source_uri,
            vec![format!("urn:spdx.dev:{}/output#3", NIL)]
        );
        assert_eq!(high_level.config_source_digest[0].hash_value, "ab".repeat(32));
        let config = documents.output.files().next().unwrap();
        assert_eq!(config.name, ".config");
        assert_eq!(config.primary_purpose, Some(SoftwarePurpose::Configuration));
        assert_eq!(config.content_identifier[0].value, "cd".repeat(20));
    }

    #[test]
    fn test_merged_tree_has_no_source_document() {
        let classifier = TreeClassifier::new(PathBuf::from("/linux"), PathBuf::from("/linux"));
        let graph = scenario_graph(&classifier, "a.out");
        let metadata = metadata();
        let settings = BuildSettings::default();
        let factory = ElementFactory::new(&graph, &classifier, &metadata, &settings);
        let documents = factory.create_documents(&mit_facts(&graph, &classifier));

        assert!(documents.source.is_none());
        assert_eq!(documents.iter().count(), 2);
        assert_eq!(documents.build.files().count(), 6);
        assert_eq!(documents.build.directories().count(), 0);
        assert_eq!(
            documents.build.relationships(RelationshipType::Contains).count(),
            0
        );
        let roots = &documents.build.sbom().unwrap().root_element;
        assert_eq!(roots.len(), 1);
        assert_eq!(
            documents.build.files().find(|f| f.spdx_id == roots[0]).unwrap().name,
            "a.out"
        );
        assert_eq!(documents.build.license_expressions().count(), 1);
        assert!(documents
            .build
            .document()
            .unwrap()
            .profile_conformance
            .contains(&ProfileIdentifier::SimpleLicensing));
        assert_eq!(factory.used_files(), vec!["b.c", "c.c", "common.h"]);
    }

    #[test]
    fn test_tree_directories_contain_their_files() {
        let classifier = separate();
        let graph = scenario_graph(&classifier, "a.out");
        let metadata = metadata();
        let settings = BuildSettings::default();
        let documents = ElementFactory::new(&graph, &classifier, &metadata, &settings)
            .create_documents(&FileFacts::default());

        for (model, tree_name, file_count) in [
            (documents.source.as_ref().unwrap(), SOURCE_TREE_ELEMENT, 3),
            (&documents.build, OUTPUT_TREE_ELEMENT, 3),
        ] {
            let directories: Vec<_> = model.directories().collect();
            assert_eq!(directories.len(), 1);
            assert_eq!(directories[0].name, tree_name);
            assert!(directories[0].verified_using.is_empty());

            let contains: Vec<_> = model.relationships(RelationshipType::Contains).collect();
            assert_eq!(contains.len(), 1);
            assert_eq!(contains[0].from, directories[0].spdx_id);
            assert_eq!(contains[0].to.len(), file_count);
            assert!(model.files().all(|file| contains[0].to.contains(&file.spdx_id)));

            assert_eq!(
                model.sbom().unwrap().root_element,
                vec![directories[0].spdx_id.clone()]
            );
        }
        assert!(documents.output.directories().next().is_none());
    }

    #[test]
    fn test_files_carry_sha256_and_gitoid() {
        let classifier = separate();
        let graph = scenario_graph(&classifier, "a.out");
        let metadata = metadata();
        let settings = BuildSettings::default();
        let documents = ElementFactory::new(&graph, &classifier, &metadata, &settings)
            .create_documents(&mit_facts(&graph, &classifier));

        let a_out = documents.build.files().find(|f| f.name == "a.out").unwrap();
        assert_eq!(a_out.verified_using, vec![Hash::sha256(format!("{:064x}", 0))]);
        assert_eq!(
            a_out.content_identifier,
            vec![ContentIdentifier::gitoid(format!("{:040x}", 0))]
        );
    }

    #[test]
    fn test_incbin_and_hardcoded_dependencies_are_separate_relationships() {
        let classifier = separate();
        let mut graph = BuildGraph::new();
        let configs = graph
            .intern(PathBuf::from("/src/kernel/configs.S"), TreeLocation::Source)
            .0;
        let data = graph
            .intern(PathBuf::from("/out/kernel/config_data.gz"), TreeLocation::Output)
            .0;
        let bounds = graph
            .intern(PathBuf::from("/out/kernel/bounds.s"), TreeLocation::Output)
            .0;
        graph.add_root(configs);
        graph.add_incbin_dependency(configs, data, ".incbin \"kernel/config_data.gz\"".to_string());
        graph.add_implicit_dependency(configs, bounds);
        for id in [configs, data, bounds] {
            graph.record_metadata(id, true, None);
        }

        let metadata = metadata();
        let settings = BuildSettings::default();
        let documents = ElementFactory::new(&graph, &classifier, &metadata, &settings)
            .create_documents(&FileFacts::default());

        let depends_on: Vec<_> = documents
            .build
            .relationships(RelationshipType::DependsOn)
            .collect();
        assert_eq!(depends_on.len(), 2);
        assert_eq!(
            depends_on[0].comment.as_deref(),
            Some(".incbin \"kernel/config_data.gz\"")
        );
        assert_eq!(depends_on[0].to.len(), 1);
        assert!(depends_on[1].comment.is_none());
        assert_eq!(depends_on[1].to.len(), 1);
        assert_ne!(depends_on[0].to, depends_on[1].to);
    }

    #[test]
    fn test_shared_elements_in_every_document() {
        let classifier = separate();
        let graph = scenario_graph(&classifier, "a.out");
        let metadata = metadata();
        let settings = BuildSettings::default();
        let documents = ElementFactory::new(&graph, &classifier, &metadata, &settings)
            .create_documents(&FileFacts::default());

        for model in documents.iter() {
            let graph = model.graph();
            assert!(matches!(graph[0], SpdxElement::SpdxDocument(_)));
            assert!(matches!(&graph[1], SpdxElement::SoftwareAgent(a) if a.spdx_id.as_str() == "shared:0"));
            assert!(matches!(&graph[2], SpdxElement::CreationInfo(c) if c.created == "2025-01-01T00:00:00Z"));
            assert!(matches!(graph[3], SpdxElement::Sbom(_)));
        }
    }

    #[test]
    fn test_documents_are_deterministic() {
        let classifier = separate();
        let graph = scenario_graph(&classifier, "a.out");
        let metadata = metadata();
        let settings = BuildSettings::default();
        let facts = mit_facts(&graph, &classifier);
        let factory = ElementFactory::new(&graph, &classifier, &metadata, &settings);

        let first = factory.create_documents(&facts);
        let second = factory.create_documents(&facts);
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(
                serde_json::to_value(a.graph()).unwrap(),
                serde_json::to_value(b.graph()).unwrap()
            );
        }
    }
}
