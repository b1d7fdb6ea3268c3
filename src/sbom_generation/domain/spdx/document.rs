use super::{
    Build, ExternalMap, File, LicenseExpression, Package, Relationship, RelationshipType, Sbom,
    SpdxDocument, SpdxElement, SpdxNamespace,
};
use std::fmt;

/// The three documents a run can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentKind {
    Source,
    Build,
    Output,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::Source,
        DocumentKind::Build,
        DocumentKind::Output,
    ];

    /// Compact JSON-LD prefix of the document's namespace
    pub fn prefix(self) -> &'static str {
        match self {
            DocumentKind::Source => "source",
            DocumentKind::Build => "build",
            DocumentKind::Output => "output",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.prefix() == prefix)
    }

    pub fn file_name(self) -> &'static str {
        match self {
            DocumentKind::Source => "sbom-source.spdx.json",
            DocumentKind::Build => "sbom-build.spdx.json",
            DocumentKind::Output => "sbom-output.spdx.json",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// One fully materialized SPDX document
///
/// The graph always starts with the SpdxDocument element; `namespaces`
/// lists every compact prefix used inside the graph.
#[derive(Debug, Clone)]
pub struct SpdxDocumentModel {
    kind: DocumentKind,
    namespaces: Vec<SpdxNamespace>,
    graph: Vec<SpdxElement>,
}

impl SpdxDocumentModel {
    pub fn new(kind: DocumentKind, namespaces: Vec<SpdxNamespace>, graph: Vec<SpdxElement>) -> Self {
        Self {
            kind,
            namespaces,
            graph,
        }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn namespaces(&self) -> &[SpdxNamespace] {
        &self.namespaces
    }

    pub fn graph(&self) -> &[SpdxElement] {
        &self.graph
    }

    pub fn document(&self) -> Option<&SpdxDocument> {
        self.graph.iter().find_map(|element| match element {
            SpdxElement::SpdxDocument(document) => Some(document),
            _ => None,
        })
    }

    pub fn sbom(&self) -> Option<&Sbom> {
        self.graph.iter().find_map(|element| match element {
            SpdxElement::Sbom(sbom) => Some(sbom),
            _ => None,
        })
    }

    pub fn imports(&self) -> &[ExternalMap] {
        self.document()
            .map(|document| document.imports.as_slice())
            .unwrap_or_default()
    }

    /// Regular File elements; tree directory elements are skipped
    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.file_elements().filter(|file| !file.is_directory())
    }

    /// Directory File elements standing for a whole tree
    pub fn directories(&self) -> impl Iterator<Item = &File> {
        self.file_elements().filter(|file| file.is_directory())
    }

    fn file_elements(&self) -> impl Iterator<Item = &File> {
        self.graph.iter().filter_map(|element| match element {
            SpdxElement::File(file) => Some(file),
            _ => None,
        })
    }

    pub fn builds(&self) -> impl Iterator<Item = &Build> {
        self.graph.iter().filter_map(|element| match element {
            SpdxElement::Build(build) => Some(build),
            _ => None,
        })
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.graph.iter().filter_map(|element| match element {
            SpdxElement::Package(package) => Some(package),
            _ => None,
        })
    }

    pub fn license_expressions(&self) -> impl Iterator<Item = &LicenseExpression> {
        self.graph.iter().filter_map(|element| match element {
            SpdxElement::LicenseExpression(license) => Some(license),
            _ => None,
        })
    }

    pub fn relationships(
        &self,
        relationship_type: RelationshipType,
    ) -> impl Iterator<Item = &Relationship> {
        self.graph.iter().filter_map(move |element| match element {
            SpdxElement::Relationship(r) if r.relationship_type == relationship_type => Some(r),
            _ => None,
        })
    }
}

/// The documents of one run; no source document in merged-tree mode
#[derive(Debug, Clone)]
pub struct SbomDocuments {
    pub source: Option<SpdxDocumentModel>,
    pub build: SpdxDocumentModel,
    pub output: SpdxDocumentModel,
}

impl SbomDocuments {
    pub fn iter(&self) -> impl Iterator<Item = &SpdxDocumentModel> {
        self.source
            .iter()
            .chain(std::iter::once(&self.build))
            .chain(std::iter::once(&self.output))
    }

    pub fn get(&self, kind: DocumentKind) -> Option<&SpdxDocumentModel> {
        match kind {
            DocumentKind::Source => self.source.as_ref(),
            DocumentKind::Build => Some(&self.build),
            DocumentKind::Output => Some(&self.output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_kind_names() {
        assert_eq!(DocumentKind::Source.file_name(), "sbom-source.spdx.json");
        assert_eq!(DocumentKind::Build.file_name(), "sbom-build.spdx.json");
        assert_eq!(DocumentKind::Output.file_name(), "sbom-output.spdx.json");
        assert_eq!(DocumentKind::Build.to_string(), "build");
        assert_eq!(DocumentKind::from_prefix("output"), Some(DocumentKind::Output));
        assert_eq!(DocumentKind::from_prefix("shared"), None);
    }
}
