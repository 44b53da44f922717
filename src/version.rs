//! Version identifiers
//!
//! `trunk` tracks live sources; anything else names an immutable release.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::SetupError;

/// Keyword selecting live, unreleased sources
pub const TRUNK: &str = "trunk";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionId {
    Trunk,
    Release(String),
}

impl VersionId {
    pub fn is_trunk(&self) -> bool {
        matches!(self, VersionId::Trunk)
    }

    pub fn as_str(&self) -> &str {
        match self {
            VersionId::Trunk => TRUNK,
            VersionId::Release(version) => version,
        }
    }

    /// Root directory for this version under `target`
    pub fn root_in(&self, target: &Path) -> PathBuf {
        target.join(self.as_str())
    }
}

impl FromStr for VersionId {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == TRUNK {
            return Ok(VersionId::Trunk);
        }

        // The version doubles as a directory name and a URL segment
        let valid = !s.is_empty()
            && s != "."
            && s != ".."
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '+'));
        if !valid {
            return Err(SetupError::InvalidVersion {
                version: s.to_string(),
            });
        }

        Ok(VersionId::Release(s.to_string()))
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
