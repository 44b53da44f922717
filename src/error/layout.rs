//! Root directory and ledger errors

use super::SetupError;

/// Creates a root conflict error for an unmanaged directory
pub fn conflict(path: impl Into<String>) -> SetupError {
    SetupError::RootConflict { path: path.into() }
}

/// Creates a missing ledger error
pub fn ledger_missing(path: impl Into<String>) -> SetupError {
    SetupError::LedgerMissing { path: path.into() }
}
