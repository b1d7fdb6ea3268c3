use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow build pipelines to distinguish argument mistakes
/// from failures while reconstructing the build graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// All requested documents were written
    Success = 0,
    /// Invalid arguments: clap parse errors, missing source tree or roots,
    /// nothing to generate
    InvalidArguments = 2,
    /// Application error (missing root, dependency cycle, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for SBOM generation.
///
/// Every variant carries a hint pointing at the flag or file to fix.
#[derive(Debug, Error)]
pub enum SbomError {
    #[error("Root artifact not found in the output tree: {path}\nOutput tree: {output_tree}\n\n💡 Hint: Root paths are resolved relative to --obj-tree; check that the build has finished and the path is spelled correctly")]
    RootNotFound { path: PathBuf, output_tree: PathBuf },

    #[error("Dependency cycle detected in the build graph:\n  {chain}\n\n💡 Hint: A correct build never produces a cycle; inspect the .cmd files of the listed artifacts")]
    DependencyCycle { chain: String },

    #[error("Tree is not readable: {path}\nReason: {reason}\n\n💡 Hint: Please specify an existing source or output tree directory")]
    TreeUnreadable { path: PathBuf, reason: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Invalid configuration: {message}\n\n💡 Hint: {hint}")]
    InvalidConfiguration { message: String, hint: String },

    /// Validation error for builder patterns
    #[error("Validation error: {message}")]
    Validation { message: String },
}
