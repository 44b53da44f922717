//! Acquisition primitives
//!
//! The three ways sources reach the disk, each behind a small trait so the
//! resource handler can be driven by recording fakes in tests:
//! - [`Fetch`]: retrieve the bytes at a URL into a file
//! - [`Extract`]: unpack a tar-compatible archive, dropping leading path segments
//! - [`Checkout`]: check a repository out into a directory
//!
//! Every primitive either succeeds or returns an error; none of them touches
//! the ledger.

pub mod extract;
pub mod fetch;
pub mod git;
pub mod svn;

use std::path::Path;

use crate::error::Result;
use crate::protocol::Protocol;

pub use extract::TarXzExtractor;
pub use fetch::HttpFetcher;
pub use git::GitCheckout;
pub use svn::SvnCheckout;

/// Retrieve the resource at `url` into `dest`
pub trait Fetch {
    fn fetch(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Extract `archive` into the existing directory `dest`, discarding the
/// first `strip` path segments of every entry
pub trait Extract {
    fn extract(&self, archive: &Path, dest: &Path, strip: usize) -> Result<()>;
}

/// Check the repository at `url` out into `dest`
pub trait Checkout {
    fn checkout(&self, url: &str, dest: &Path) -> Result<()>;
}

/// The set of primitives one run works with
pub struct Toolset {
    pub fetcher: Box<dyn Fetch>,
    pub extractor: Box<dyn Extract>,
    pub git: Box<dyn Checkout>,
    pub svn: Box<dyn Checkout>,
}

impl Toolset {
    /// Production primitives: HTTP downloads, tar.xz extraction, libgit2 and the svn CLI
    pub fn system() -> Result<Self> {
        Ok(Self {
            fetcher: Box::new(HttpFetcher::new()?),
            extractor: Box::new(TarXzExtractor),
            git: Box::new(GitCheckout::default()),
            svn: Box::new(SvnCheckout::default()),
        })
    }

    /// Checkout primitive for `protocol`
    pub fn checkout_for(&self, protocol: Protocol) -> &dyn Checkout {
        match protocol {
            Protocol::Git => self.git.as_ref(),
            Protocol::Svn => self.svn.as_ref(),
        }
    }
}
