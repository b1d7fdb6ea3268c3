//! Typed SPDX 3.0 element model.
//!
//! Every element type is a variant of [`SpdxElement`]; serde's internal
//! tagging writes the JSON-LD `type` field, so there is exactly one encoder
//! for every document shape.

mod document;
mod element;
mod id;

pub use document::{DocumentKind, SbomDocuments, SpdxDocumentModel};
pub use element::{
    Build, ContentIdentifier, ContentIdentifierType, CreationInfo, ExternalMap, File, FileKind,
    Hash, LicenseExpression, Package, ProfileIdentifier, Relationship, RelationshipCompleteness,
    RelationshipType, Sbom, SbomType, SoftwareAgent, SoftwarePurpose, SpdxDocument, SpdxElement,
    CREATION_INFO_ID, SPDX_SPEC_VERSION,
};
pub use id::{SpdxId, SpdxIdGenerator, SpdxNamespace, SHARED_PREFIX};
