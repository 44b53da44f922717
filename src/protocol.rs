//! Version-control protocols for live checkouts

use std::fmt;

use serde::Deserialize;

/// Checkout protocol used for `trunk` sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Subversion checkout from the upstream repository
    #[default]
    Svn,
    /// Git clone from the read-only mirror
    Git,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Svn => write!(f, "svn"),
            Protocol::Git => write!(f, "git"),
        }
    }
}
