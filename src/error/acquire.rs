//! Acquisition errors
//!
//! Failures of the three acquisition primitives. None of them leave a ledger
//! mark behind, so a re-run retries the same component.

use super::SetupError;

/// Creates a download error
pub fn fetch_failed(url: impl Into<String>, reason: impl Into<String>) -> SetupError {
    SetupError::FetchFailed {
        url: url.into(),
        reason: reason.into(),
    }
}

/// Creates an archive extraction error
pub fn extract_failed(archive: impl Into<String>, reason: impl Into<String>) -> SetupError {
    SetupError::ExtractFailed {
        archive: archive.into(),
        reason: reason.into(),
    }
}

/// Creates a repository checkout error
pub fn checkout_failed(url: impl Into<String>, reason: impl Into<String>) -> SetupError {
    SetupError::CheckoutFailed {
        url: url.into(),
        reason: reason.into(),
    }
}
