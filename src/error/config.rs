//! Configuration errors

use super::SetupError;

/// Creates a configuration read error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> SetupError {
    SetupError::ConfigReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a configuration parse error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> SetupError {
    SetupError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}
