//! Live checkouts through the Subversion command-line client

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::Checkout;
use crate::error::{self, Result};

/// Runs `svn checkout <url> <dest>`
#[derive(Debug, Clone)]
pub struct SvnCheckout {
    program: OsString,
}

impl Default for SvnCheckout {
    fn default() -> Self {
        Self::with_program("svn")
    }
}

impl SvnCheckout {
    /// Use a different client binary (absolute path or name on `PATH`)
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Checkout for SvnCheckout {
    fn checkout(&self, url: &str, dest: &Path) -> Result<()> {
        debug!(url, dest = %dest.display(), "svn checkout");
        let output = Command::new(&self.program)
            .args(["checkout", "--quiet", "--non-interactive", url])
            .arg(dest)
            .output()
            .map_err(|e| {
                error::checkout_failed(
                    url,
                    format!("failed to run {}: {e}", self.program.to_string_lossy()),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => format!("svn exited with {}", output.status),
                message => message.to_string(),
            };
            return Err(error::checkout_failed(url, reason));
        }

        Ok(())
    }
}
