//! Error types and handling for llvm-setup
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`layout`]: Root directory and ledger errors
//! - [`catalog`]: Component lookup and dependency errors
//! - [`acquire`]: Download, extraction and checkout errors
//! - [`config`]: Configuration file errors

pub mod acquire;
pub mod catalog;
pub mod config;
pub mod layout;

#[allow(unused_imports)]
pub use acquire::{checkout_failed, extract_failed, fetch_failed};
#[allow(unused_imports)]
pub use catalog::{circular as circular_dependency, unknown as unknown_component};
#[allow(unused_imports)]
pub use config::{parse_failed as config_parse_failed, read_failed as config_read_failed};
#[allow(unused_imports)]
pub use layout::{conflict as root_conflict, ledger_missing};

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for llvm-setup operations
#[derive(Error, Diagnostic, Debug)]
pub enum SetupError {
    // Layout errors
    #[error("Directory exists but is not a managed root: {path}")]
    #[diagnostic(
        code(llvm_setup::layout::conflict),
        help("Choose an empty location or remove the directory; llvm-setup never reuses unmanaged content")
    )]
    RootConflict { path: String },

    #[error("Installation ledger missing at: {path}")]
    #[diagnostic(
        code(llvm_setup::layout::ledger_missing),
        help("The root layout must be initialized before components are set up")
    )]
    LedgerMissing { path: String },

    #[error("Target directory not found: {path}")]
    #[diagnostic(
        code(llvm_setup::layout::target_not_found),
        help("Create the target directory first")
    )]
    TargetNotFound { path: String },

    #[error("Invalid version identifier: '{version}'")]
    #[diagnostic(
        code(llvm_setup::layout::invalid_version),
        help("Use 'trunk' or a release number such as 7.0.1")
    )]
    InvalidVersion { version: String },

    // Catalog errors
    #[error("Unknown component: {name}")]
    #[diagnostic(
        code(llvm_setup::catalog::unknown),
        help("Run 'llvm-setup components' to see the known components")
    )]
    UnknownComponent { name: String },

    #[error("Circular dependency detected: {chain}")]
    #[diagnostic(code(llvm_setup::catalog::circular))]
    CircularDependency { chain: String },

    // Acquisition errors
    #[error("Failed to download {url}: {reason}")]
    #[diagnostic(
        code(llvm_setup::acquire::fetch_failed),
        help("Check the version number and your network connection, then re-run to resume")
    )]
    FetchFailed { url: String, reason: String },

    #[error("Failed to extract {archive}: {reason}")]
    #[diagnostic(code(llvm_setup::acquire::extract_failed))]
    ExtractFailed { archive: String, reason: String },

    #[error("Failed to check out {url}: {reason}")]
    #[diagnostic(
        code(llvm_setup::acquire::checkout_failed),
        help("Check that the repository is reachable and the checkout tool is installed")
    )]
    CheckoutFailed { url: String, reason: String },

    // Configuration errors
    #[error("Failed to read configuration file: {path}: {reason}")]
    #[diagnostic(code(llvm_setup::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(llvm_setup::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(llvm_setup::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(llvm_setup::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for SetupError {
    fn from(err: std::io::Error) -> Self {
        SetupError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for SetupError {
    fn from(err: serde_yaml::Error) -> Self {
        SetupError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SetupError>;
