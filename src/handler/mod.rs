//! Component resource handler
//!
//! Sets up the core and satellite components of one root. Which way the
//! sources are acquired is decided once per version:
//! - [`ArchiveSource`] for releases: download + extract
//! - [`LiveSource`] for `trunk`: svn or git checkout
//!
//! The ledger guards every acquisition. A component already recorded is
//! skipped together with its whole dependency subtree, and a component is
//! only recorded after its acquisition succeeded, so an interrupted or
//! failed run resumes at the component that did not finish.

pub mod archive;
pub mod live;

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

pub use archive::ArchiveSource;
pub use live::LiveSource;

use crate::acquire::Toolset;
use crate::catalog::{self, ComponentSpec};
use crate::config::SetupConfig;
use crate::error::{self, Result};
use crate::layout::RootLayout;
use crate::ledger::Ledger;
use crate::protocol::Protocol;
use crate::version::VersionId;

/// How a root's sources are acquired
pub enum AcquisitionStrategy<'a> {
    Archive(ArchiveSource<'a>),
    Live(LiveSource<'a>),
}

impl AcquisitionStrategy<'_> {
    fn acquire_core(&self, layout: &RootLayout, clear_src: bool) -> Result<()> {
        match self {
            AcquisitionStrategy::Archive(source) => source.acquire_core(layout, clear_src),
            AcquisitionStrategy::Live(source) => source.acquire_core(layout, clear_src),
        }
    }

    fn acquire_component(&self, spec: &ComponentSpec, layout: &RootLayout) -> Result<()> {
        match self {
            AcquisitionStrategy::Archive(source) => source.acquire_component(spec, layout),
            AcquisitionStrategy::Live(source) => source.acquire_component(spec, layout),
        }
    }
}

pub struct ResourceHandler<'a> {
    layout: RootLayout,
    ledger: Ledger,
    strategy: AcquisitionStrategy<'a>,
}

impl<'a> ResourceHandler<'a> {
    /// Handler for an initialized root; fails when its ledger is missing
    pub fn new(layout: RootLayout, strategy: AcquisitionStrategy<'a>) -> Result<Self> {
        let ledger = Ledger::open(&layout.root)?;
        Ok(Self {
            layout,
            ledger,
            strategy,
        })
    }

    /// Pick the strategy matching `version`: live checkout for `trunk`,
    /// release archives otherwise
    pub fn for_version(
        version: &VersionId,
        layout: RootLayout,
        protocol: Protocol,
        config: &'a SetupConfig,
        tools: &'a Toolset,
    ) -> Result<Self> {
        let strategy = match version {
            VersionId::Trunk => AcquisitionStrategy::Live(LiveSource {
                protocol,
                config,
                checkout: tools.checkout_for(protocol),
            }),
            VersionId::Release(release) => AcquisitionStrategy::Archive(ArchiveSource {
                version: release.clone(),
                config,
                fetcher: tools.fetcher.as_ref(),
                extractor: tools.extractor.as_ref(),
            }),
        };
        Self::new(layout, strategy)
    }

    pub fn layout(&self) -> &RootLayout {
        &self.layout
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Acquire the core unless the ledger already has it
    ///
    /// Leftovers in `src/` are only cleared while the ledger is empty;
    /// satellites it records are never removed.
    pub fn setup_core(&mut self) -> Result<()> {
        if self.ledger.is_installed(catalog::CORE) {
            debug!(component = catalog::CORE, "Already installed");
            return Ok(());
        }
        let clear_src = self.ledger.installed().is_empty();
        if !clear_src {
            warn!(
                installed = ?self.ledger.installed(),
                "Core missing from a ledger that records satellites; keeping src/"
            );
        }
        self.strategy.acquire_core(&self.layout, clear_src)?;
        self.ledger.mark_installed(catalog::CORE)
    }

    /// Acquire `name` after the core and its dependencies, depth-first
    ///
    /// Dependency order is only enforced within this call; the caller
    /// decides the order of sibling requests.
    pub fn setup_component(&mut self, name: &str) -> Result<()> {
        let mut chain = Vec::new();
        self.resolve(name, &mut chain)
    }

    fn resolve(&mut self, name: &str, chain: &mut Vec<&'static str>) -> Result<()> {
        let spec = catalog::lookup(name)?;
        // Every satellite lives inside the core's tree
        self.setup_core()?;
        if spec.is_core() {
            return Ok(());
        }
        if self.ledger.is_installed(spec.name) {
            debug!(component = spec.name, "Already installed");
            return Ok(());
        }
        if chain.contains(&spec.name) {
            let mut cycle = chain.clone();
            cycle.push(spec.name);
            return Err(error::circular_dependency(cycle.join(" -> ")));
        }

        chain.push(spec.name);
        for dependency in catalog::dependencies_of(spec.name)? {
            self.resolve(dependency, chain)?;
        }
        chain.pop();

        self.strategy.acquire_component(spec, &self.layout)?;
        self.ledger.mark_installed(spec.name)
    }
}

/// Remove leftovers of an acquisition that never reached the ledger
///
/// With `keep_dir` the directory itself stays and only its contents go.
fn clear_stale(path: &Path, keep_dir: bool) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    if !keep_dir {
        warn!(path = %path.display(), "Removing output of an interrupted setup");
        fs::remove_dir_all(path)?;
        return Ok(());
    }

    let mut entries = fs::read_dir(path)?.peekable();
    if entries.peek().is_none() {
        return Ok(());
    }
    warn!(path = %path.display(), "Removing output of an interrupted setup");
    for entry in entries {
        let entry_path = entry?.path();
        if entry_path.is_dir() && !entry_path.is_symlink() {
            fs::remove_dir_all(&entry_path)?;
        } else {
            fs::remove_file(&entry_path)?;
        }
    }
    Ok(())
}
