//! Provisioning runs over versions and components
//!
//! For each requested version, in order:
//! 1. Ensure the root layout at `<target>/<version>`
//! 2. Pick the resource handler variant for the version
//! 3. Set up the core
//! 4. Set up each requested component in request order
//!
//! The first failure aborts the whole run. Everything acquired before it
//! stays in the ledgers, so re-running the same request resumes there.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::acquire::Toolset;
use crate::catalog;
use crate::config::SetupConfig;
use crate::error::{self, Result, SetupError};
use crate::handler::ResourceHandler;
use crate::layout::{self, RootLayout};
use crate::ledger::Ledger;
use crate::progress::ProgressDisplay;
use crate::protocol::Protocol;
use crate::version::VersionId;

/// What one provisioning run should produce
#[derive(Debug, Clone)]
pub struct SetupRequest {
    /// Existing directory holding one root per version
    pub target: PathBuf,
    pub versions: Vec<VersionId>,
    /// Overrides the configured protocol for `trunk`
    pub protocol: Option<Protocol>,
    /// Requested satellites in setup order; empty selects the configured or full set
    pub components: Vec<String>,
}

/// Ledger state of one version's root after a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReport {
    pub version: VersionId,
    pub root: PathBuf,
    pub installed: Vec<String>,
}

/// Components a request resolves to, in setup order
pub fn requested_components(request: &SetupRequest, config: &SetupConfig) -> Vec<String> {
    if !request.components.is_empty() {
        request.components.clone()
    } else if !config.components.is_empty() {
        config.components.clone()
    } else {
        catalog::SATELLITES.iter().map(|s| s.to_string()).collect()
    }
}

fn ensure_target(target: &Path) -> Result<()> {
    if target.is_dir() {
        Ok(())
    } else {
        Err(SetupError::TargetNotFound {
            path: target.display().to_string(),
        })
    }
}

/// Provision every requested version, strictly one after another
pub fn provision(
    request: &SetupRequest,
    tools: &Toolset,
    config: &SetupConfig,
    progress: &ProgressDisplay,
) -> Result<Vec<VersionReport>> {
    ensure_target(&request.target)?;

    let components = requested_components(request, config);
    // Reject typos before anything is written
    for name in &components {
        catalog::lookup(name)?;
    }

    let protocol = request.protocol.unwrap_or(config.protocol);
    let steps_per_version = components.len() as u64 + 1;
    progress.set_total(steps_per_version * request.versions.len() as u64);

    let mut reports = Vec::with_capacity(request.versions.len());
    for version in &request.versions {
        let root = version.root_in(&request.target);
        info!(version = %version, root = %root.display(), "Provisioning");
        let layout = layout::ensure_root(&root)?;
        if request.protocol.is_some() && !version.is_trunk() {
            debug!(version = %version, "Protocol only applies to trunk; using release archives");
        }

        let mut handler = ResourceHandler::for_version(version, layout, protocol, config, tools)?;

        progress.update_step(version.as_str(), catalog::CORE);
        handler.setup_core()?;
        progress.inc_step();

        for name in &components {
            progress.update_step(version.as_str(), name);
            handler.setup_component(name)?;
            progress.inc_step();
        }

        reports.push(VersionReport {
            version: version.clone(),
            root: handler.layout().root.clone(),
            installed: handler.ledger().installed().to_vec(),
        });
    }

    Ok(reports)
}

/// Installed and missing components of one root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootStatus {
    pub version: String,
    pub root: PathBuf,
    /// Whether the root has been created yet
    pub exists: bool,
    /// Ledger order
    pub installed: Vec<String>,
    /// Catalog order, core included
    pub missing: Vec<&'static str>,
}

fn root_status(version: String, root: PathBuf) -> Result<RootStatus> {
    if !root.exists() {
        return Ok(RootStatus {
            version,
            root,
            exists: false,
            installed: Vec::new(),
            missing: catalog::all().iter().map(|spec| spec.name).collect(),
        });
    }
    if !layout::is_managed(&root) {
        return Err(error::root_conflict(root.display().to_string()));
    }

    let ledger = Ledger::open(&root)?;
    let missing = catalog::all()
        .iter()
        .map(|spec| spec.name)
        .filter(|name| !ledger.is_installed(name))
        .collect();
    Ok(RootStatus {
        version,
        root,
        exists: true,
        installed: ledger.installed().to_vec(),
        missing,
    })
}

/// Report the roots of `versions` under `target`
///
/// With no versions, every managed root directly under `target` is
/// reported in name order; unmanaged siblings are skipped.
pub fn status(target: &Path, versions: &[VersionId]) -> Result<Vec<RootStatus>> {
    ensure_target(target)?;

    if !versions.is_empty() {
        return versions
            .iter()
            .map(|version| {
                let layout = RootLayout::at(&version.root_in(target))?;
                root_status(version.to_string(), layout.root)
            })
            .collect();
    }

    let mut roots = Vec::new();
    for entry in fs::read_dir(target)? {
        let path = entry?.path();
        if path.is_dir() && layout::is_managed(&path) {
            roots.push(path);
        } else {
            debug!(path = %path.display(), "Skipping unmanaged entry");
        }
    }
    roots.sort();

    roots
        .into_iter()
        .map(|root| {
            let version = root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let layout = RootLayout::at(&root)?;
            root_status(version, layout.root)
        })
        .collect()
}
