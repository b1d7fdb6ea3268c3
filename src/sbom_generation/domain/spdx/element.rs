use super::SpdxId;
use serde::Serialize;

pub const SPDX_SPEC_VERSION: &str = "3.0.1";

/// Blank node id of the CreationInfo shared by all elements of a document
pub const CREATION_INFO_ID: &str = "_:creationinfo";

fn creation_info_ref() -> String {
    CREATION_INFO_ID.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileIdentifier {
    Core,
    Software,
    Build,
    SimpleLicensing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SbomType {
    Source,
    Build,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SoftwarePurpose {
    Source,
    Library,
    Archive,
    Application,
    Executable,
    Module,
    Data,
    Configuration,
    Documentation,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipType {
    Contains,
    HasInput,
    HasOutput,
    AncestorOf,
    DependsOn,
    HasDeclaredLicense,
    HasDistributionArtifact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FileKind {
    File,
    Directory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentIdentifierType {
    Gitoid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipCompleteness {
    Complete,
    Incomplete,
    NoAssertion,
}

/// sha256 integrity method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "Hash")]
pub struct Hash {
    pub algorithm: String,
    #[serde(rename = "hashValue")]
    pub hash_value: String,
}

impl Hash {
    pub fn sha256(hash_value: impl Into<String>) -> Self {
        Self {
            algorithm: "sha256".to_string(),
            hash_value: hash_value.into(),
        }
    }
}

/// Content-derived identity of a file, independent of its name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "software_ContentIdentifier")]
pub struct ContentIdentifier {
    #[serde(rename = "software_contentIdentifierType")]
    pub identifier_type: ContentIdentifierType,
    #[serde(rename = "software_contentIdentifierValue")]
    pub value: String,
}

impl ContentIdentifier {
    /// Git blob object id, hex
    pub fn gitoid(value: impl Into<String>) -> Self {
        Self {
            identifier_type: ContentIdentifierType::Gitoid,
            value: value.into(),
        }
    }
}

/// Pointer to an element owned by another document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename = "ExternalMap", rename_all = "camelCase")]
pub struct ExternalMap {
    pub external_spdx_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpdxDocument {
    pub spdx_id: SpdxId,
    pub creation_info: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub profile_conformance: Vec<ProfileIdentifier>,
    pub root_element: Vec<SpdxId>,
    #[serde(rename = "import", skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<ExternalMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareAgent {
    pub spdx_id: SpdxId,
    pub creation_info: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreationInfo {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "specVersion")]
    pub spec_version: String,
    #[serde(rename = "createdBy")]
    pub created_by: Vec<SpdxId>,
    pub created: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sbom {
    pub spdx_id: SpdxId,
    pub creation_info: String,
    #[serde(rename = "software_sbomType")]
    pub sbom_type: Vec<SbomType>,
    pub root_element: Vec<SpdxId>,
    pub element: Vec<SpdxId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub spdx_id: SpdxId,
    pub creation_info: String,
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub verified_using: Vec<Hash>,
    #[serde(
        rename = "software_primaryPurpose",
        skip_serializing_if = "Option::is_none"
    )]
    pub primary_purpose: Option<SoftwarePurpose>,
    #[serde(
        rename = "software_contentIdentifier",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub content_identifier: Vec<ContentIdentifier>,
    #[serde(rename = "software_fileKind", skip_serializing_if = "Option::is_none")]
    pub file_kind: Option<FileKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl File {
    pub fn is_directory(&self) -> bool {
        self.file_kind == Some(FileKind::Directory)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub spdx_id: SpdxId,
    pub creation_info: String,
    pub name: String,
    #[serde(
        rename = "software_packageVersion",
        skip_serializing_if = "Option::is_none"
    )]
    pub package_version: Option<String>,
    #[serde(
        rename = "software_copyrightText",
        skip_serializing_if = "Option::is_none"
    )]
    pub copyright_text: Option<String>,
    #[serde(
        rename = "software_primaryPurpose",
        skip_serializing_if = "Option::is_none"
    )]
    pub primary_purpose: Option<SoftwarePurpose>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub originated_by: Vec<SpdxId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub spdx_id: SpdxId,
    pub creation_info: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "build_buildType")]
    pub build_type: String,
    #[serde(rename = "build_buildId", skip_serializing_if = "Option::is_none")]
    pub build_id: Option<String>,
    #[serde(
        rename = "build_configSourceUri",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub config_source_uri: Vec<String>,
    #[serde(
        rename = "build_configSourceDigest",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub config_source_digest: Vec<Hash>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseExpression {
    pub spdx_id: SpdxId,
    pub creation_info: String,
    #[serde(rename = "simplelicensing_licenseExpression")]
    pub license_expression: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub spdx_id: SpdxId,
    pub creation_info: String,
    pub relationship_type: RelationshipType,
    pub from: SpdxId,
    pub to: Vec<SpdxId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completeness: Option<RelationshipCompleteness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// One node of a JSON-LD `@graph`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum SpdxElement {
    SpdxDocument(SpdxDocument),
    SoftwareAgent(SoftwareAgent),
    CreationInfo(CreationInfo),
    #[serde(rename = "software_Sbom")]
    Sbom(Sbom),
    #[serde(rename = "software_File")]
    File(File),
    #[serde(rename = "software_Package")]
    Package(Package),
    #[serde(rename = "build_Build")]
    Build(Build),
    #[serde(rename = "simplelicensing_LicenseExpression")]
    LicenseExpression(LicenseExpression),
    Relationship(Relationship),
}

impl SpdxElement {
    /// CreationInfo is a blank node and has no spdxId
    pub fn spdx_id(&self) -> Option<&SpdxId> {
        match self {
            SpdxElement::SpdxDocument(e) => Some(&e.spdx_id),
            SpdxElement::SoftwareAgent(e) => Some(&e.spdx_id),
            SpdxElement::CreationInfo(_) => None,
            SpdxElement::Sbom(e) => Some(&e.spdx_id),
            SpdxElement::File(e) => Some(&e.spdx_id),
            SpdxElement::Package(e) => Some(&e.spdx_id),
            SpdxElement::Build(e) => Some(&e.spdx_id),
            SpdxElement::LicenseExpression(e) => Some(&e.spdx_id),
            SpdxElement::Relationship(e) => Some(&e.spdx_id),
        }
    }

    pub fn file(spdx_id: SpdxId, name: String) -> File {
        File {
            spdx_id,
            creation_info: creation_info_ref(),
            name,
            verified_using: Vec::new(),
            primary_purpose: None,
            content_identifier: Vec::new(),
            file_kind: None,
            comment: None,
        }
    }

    /// A directory File standing for a whole tree, e.g. `$(src_tree)`
    pub fn directory(spdx_id: SpdxId, name: &str) -> File {
        let mut directory = Self::file(spdx_id, name.to_string());
        directory.file_kind = Some(FileKind::Directory);
        directory
    }

    pub fn relationship(
        spdx_id: SpdxId,
        relationship_type: RelationshipType,
        from: SpdxId,
        to: Vec<SpdxId>,
    ) -> Self {
        SpdxElement::Relationship(Relationship {
            spdx_id,
            creation_info: creation_info_ref(),
            relationship_type,
            from,
            to,
            completeness: None,
            comment: None,
        })
    }

    pub fn license_expression(spdx_id: SpdxId, expression: &str) -> Self {
        SpdxElement::LicenseExpression(LicenseExpression {
            spdx_id,
            creation_info: creation_info_ref(),
            license_expression: expression.to_string(),
        })
    }

    pub fn software_agent(spdx_id: SpdxId, name: &str) -> Self {
        SpdxElement::SoftwareAgent(SoftwareAgent {
            spdx_id,
            creation_info: creation_info_ref(),
            name: name.to_string(),
        })
    }

    pub fn build(spdx_id: SpdxId, build_type: &str) -> Build {
        Build {
            spdx_id,
            creation_info: creation_info_ref(),
            name: None,
            comment: None,
            build_type: build_type.to_string(),
            build_id: None,
            config_source_uri: Vec::new(),
            config_source_digest: Vec::new(),
        }
    }

    pub fn package(spdx_id: SpdxId, name: String) -> Package {
        Package {
            spdx_id,
            creation_info: creation_info_ref(),
            name,
            package_version: None,
            copyright_text: None,
            primary_purpose: None,
            originated_by: Vec::new(),
            comment: None,
        }
    }

    pub fn sbom(spdx_id: SpdxId, sbom_type: SbomType) -> Sbom {
        Sbom {
            spdx_id,
            creation_info: creation_info_ref(),
            sbom_type: vec![sbom_type],
            root_element: Vec::new(),
            element: Vec::new(),
        }
    }

    pub fn spdx_document(spdx_id: SpdxId, profiles: Vec<ProfileIdentifier>) -> SpdxDocument {
        SpdxDocument {
            spdx_id,
            creation_info: creation_info_ref(),
            name: None,
            profile_conformance: profiles,
            root_element: Vec::new(),
            imports: Vec::new(),
        }
    }
}
