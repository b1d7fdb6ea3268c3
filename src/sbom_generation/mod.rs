//! Core of the SBOM generation: the cmd graph model, the rules applied to
//! kernel artifacts, and the services turning a graph into SPDX documents.

pub mod domain;
pub mod policies;
pub mod services;
