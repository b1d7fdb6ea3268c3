//! kernel-sbom - SBOM generation tool for Linux kernel builds
//!
//! This library reconstructs the cmd graph of a kernel build from the
//! `.cmd` files kbuild leaves next to every artifact and emits linked
//! SPDX 3.0 documents (source, build, output) plus a flat list of the
//! source files the build used. It follows hexagonal architecture and
//! Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`sbom_generation`): Pure business logic and domain models
//! - **Application Layer** (`application`): Use cases and application services
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use kernel_sbom::prelude::*;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<()> {
//! // Create use case with injected adapters
//! let use_case = GenerateSbomUseCase::new(
//!     FileSystemReader::new(),
//!     FileSystemReader::new(),
//!     FileSystemReader::new(),
//!     StderrProgressReporter::new(),
//! );
//!
//! // Execute
//! let request = SbomRequest::builder()
//!     .src_tree("../linux")
//!     .obj_tree("../linux/kernel_build")
//!     .roots(["arch/x86/boot/bzImage"])
//!     .generate_spdx(true)
//!     .build()?;
//! let response = use_case.execute(request).await?;
//!
//! // Write the documents
//! let writer = WriteOutputsUseCase::new(
//!     SpdxJsonLdFormatter::default(),
//!     PlainUsedFilesFormatter::new(),
//!     FileSystemWriter::new(PathBuf::from("sbom")),
//!     StderrProgressReporter::new(),
//! );
//! writer.execute(&response)?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod ports;
pub mod sbom_generation;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{FileSystemReader, FileSystemWriter};
    pub use crate::adapters::outbound::formatters::{PlainUsedFilesFormatter, SpdxJsonLdFormatter};
    pub use crate::application::dto::{GraphStats, SbomRequest, SbomResponse};
    pub use crate::application::use_cases::{
        GenerateSbomUseCase, WriteOutputsUseCase, USED_FILES_FILE_NAME,
    };
    pub use crate::ports::outbound::{
        BuildTreeReader, DigestRepository, DocumentWriter, LicenseRepository, ProgressReporter,
        SpdxFormatter, UsedFilesFormatter,
    };
    pub use crate::sbom_generation::domain::spdx::{
        DocumentKind, RelationshipType, SbomDocuments, SpdxDocumentModel, SpdxElement,
    };
    pub use crate::sbom_generation::domain::{
        BuildGraph, FileDigests, LicenseResolution, SbomMetadata,
    };
    pub use crate::sbom_generation::policies::{LicensePriority, ModuleRoots};
    pub use crate::sbom_generation::services::{
        BuildSettings, GraphBuilder, SbomGenerator, TreeClassifier, DEFAULT_BUILD_TYPE,
    };
    pub use crate::shared::error::{ExitCode, SbomError};
    pub use crate::shared::Result;
}
