//! Component lookup and dependency errors

use super::SetupError;

/// Creates an unknown component error
pub fn unknown(name: impl Into<String>) -> SetupError {
    SetupError::UnknownComponent { name: name.into() }
}

/// Creates a circular dependency error
pub fn circular(chain: impl Into<String>) -> SetupError {
    SetupError::CircularDependency {
        chain: chain.into(),
    }
}
