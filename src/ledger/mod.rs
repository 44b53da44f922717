//! Installation ledger
//!
//! Append-only record of the components whose acquisition finished for a
//! root. Presence of a name is the only state that matters; duplicate lines
//! are tolerated on read and never written by this module.
//!
//! The file is read once when the ledger is opened and mirrored in memory.
//! Each append is flushed to disk before [`Ledger::mark_installed`] returns,
//! so an interrupted run leaves exactly the completed components behind.
//! Nothing here locks the file: callers must not share one root between
//! concurrent runs.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{self, Result, SetupError};
use crate::layout::LEDGER_FILE;

#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    /// Installed names in the order they were first recorded
    entries: Vec<String>,
    index: HashSet<String>,
    /// The file does not end with a newline yet
    needs_newline: bool,
}

impl Ledger {
    /// Load the ledger of the managed root at `root`
    ///
    /// Fails with [`SetupError::LedgerMissing`] when the root was never
    /// initialized by the layout builder.
    pub fn open(root: &Path) -> Result<Self> {
        let path = root.join(LEDGER_FILE);
        if !path.is_file() {
            return Err(error::ledger_missing(path.display().to_string()));
        }

        let content = fs::read_to_string(&path)?;
        let mut entries = Vec::new();
        let mut index = HashSet::new();
        for line in content.lines() {
            let name = line.trim();
            if !name.is_empty() && index.insert(name.to_string()) {
                entries.push(name.to_string());
            }
        }

        Ok(Self {
            path,
            entries,
            index,
            needs_newline: !content.is_empty() && !content.ends_with('\n'),
        })
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    /// Record `name` as installed; a no-op when it already is
    pub fn mark_installed(&mut self, name: &str) -> Result<()> {
        if self.is_installed(name) {
            return Ok(());
        }

        let write_err = |e: std::io::Error| SetupError::FileWriteFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        };

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(write_err)?;
        let line = if self.needs_newline {
            format!("\n{name}\n")
        } else {
            format!("{name}\n")
        };
        file.write_all(line.as_bytes()).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;

        self.needs_newline = false;
        self.index.insert(name.to_string());
        self.entries.push(name.to_string());
        debug!(component = name, ledger = %self.path.display(), "Marked installed");
        Ok(())
    }

    /// Installed components in ledger order
    pub fn installed(&self) -> &[String] {
        &self.entries
    }
}
