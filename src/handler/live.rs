//! Live-checkout acquisition for `trunk`

use tracing::info;

use super::clear_stale;
use crate::acquire::Checkout;
use crate::catalog::{self, ComponentSpec};
use crate::config::SetupConfig;
use crate::error::Result;
use crate::layout::RootLayout;
use crate::protocol::Protocol;

pub struct LiveSource<'a> {
    pub protocol: Protocol,
    pub config: &'a SetupConfig,
    /// Checkout primitive matching `protocol`
    pub checkout: &'a dyn Checkout,
}

impl LiveSource<'_> {
    fn url_for(&self, name: &str) -> Result<String> {
        let repository = catalog::repository_name(name, self.protocol)?;
        Ok(self.config.checkout_url(self.protocol, repository))
    }

    /// The core is checked out straight into `src/`
    pub fn acquire_core(&self, layout: &RootLayout, clear_src: bool) -> Result<()> {
        let url = self.url_for(catalog::CORE)?;
        if clear_src {
            clear_stale(&layout.src, true)?;
        }
        info!(component = catalog::CORE, %url, protocol = %self.protocol, "Checking out");
        self.checkout.checkout(&url, &layout.src)
    }

    /// The checkout tool creates the component's leaf directory itself
    pub fn acquire_component(&self, spec: &ComponentSpec, layout: &RootLayout) -> Result<()> {
        let placement = catalog::placement_of(spec.name)?;
        let url = self.url_for(spec.name)?;
        let target = layout.src.join(placement.relative_path());
        clear_stale(&target, false)?;
        info!(component = spec.name, %url, protocol = %self.protocol, "Checking out");
        self.checkout.checkout(&url, &target)
    }
}
