//! Per-version root directory layout
//!
//! A managed root looks like this:
//!
//! ```text
//! <target>/<version>/
//! ├── .llvm-setup    installation ledger, one component per line
//! ├── archive/       downloaded release archives
//! ├── build/         left to the caller
//! ├── install/       left to the caller
//! └── src/           assembled source tree
//! ```
//!
//! The ledger file doubles as the ownership marker: an existing directory
//! without it is never touched.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{self, Result, SetupError};

/// Ledger marker filename inside a root
pub const LEDGER_FILE: &str = ".llvm-setup";

pub const ARCHIVE_DIR: &str = "archive";
pub const BUILD_DIR: &str = "build";
pub const INSTALL_DIR: &str = "install";
pub const SRC_DIR: &str = "src";

/// Absolute paths of a managed root and its four subdirectories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootLayout {
    pub root: PathBuf,
    pub archive: PathBuf,
    pub build: PathBuf,
    pub install: PathBuf,
    pub src: PathBuf,
}

impl RootLayout {
    /// Compute the layout paths for `root` without touching the filesystem
    pub fn at(root: &Path) -> Result<Self> {
        let root = std::path::absolute(root)?;
        Ok(Self {
            archive: root.join(ARCHIVE_DIR),
            build: root.join(BUILD_DIR),
            install: root.join(INSTALL_DIR),
            src: root.join(SRC_DIR),
            root,
        })
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.root.join(LEDGER_FILE)
    }

    fn subdirs(&self) -> [&Path; 4] {
        [&self.archive, &self.build, &self.install, &self.src]
    }
}

/// Whether `root` carries the ledger marker
pub fn is_managed(root: &Path) -> bool {
    root.join(LEDGER_FILE).is_file()
}

/// Create or validate the managed root at `root`
///
/// A new root gets an empty ledger. An existing directory must already carry
/// the ledger, otherwise nothing is written and [`SetupError::RootConflict`]
/// is returned. Missing subdirectories are (re)created either way.
pub fn ensure_root(root: &Path) -> Result<RootLayout> {
    let layout = RootLayout::at(root)?;

    if layout.root.exists() {
        if !layout.root.is_dir() || !is_managed(&layout.root) {
            return Err(error::root_conflict(layout.root.display().to_string()));
        }
        debug!(root = %layout.root.display(), "Reusing managed root");
    } else {
        fs::create_dir_all(&layout.root)?;
        let ledger = layout.ledger_path();
        fs::File::create(&ledger).map_err(|e| SetupError::FileWriteFailed {
            path: ledger.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!(root = %layout.root.display(), "Created managed root");
    }

    for dir in layout.subdirs() {
        fs::create_dir_all(dir)?;
    }

    Ok(layout)
}
