//! Release-archive acquisition
//!
//! Each component is one `<name>-<version>.src.tar.xz` under the release's
//! base URL. Archives land in `archive/` and are unpacked with their single
//! wrapper folder stripped.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use super::clear_stale;
use crate::acquire::{Extract, Fetch};
use crate::catalog::{self, ComponentSpec};
use crate::config::SetupConfig;
use crate::error::Result;
use crate::layout::RootLayout;

/// Leading path segments dropped from every release archive entry
pub const STRIP_SEGMENTS: usize = 1;

pub struct ArchiveSource<'a> {
    pub version: String,
    pub config: &'a SetupConfig,
    pub fetcher: &'a dyn Fetch,
    pub extractor: &'a dyn Extract,
}

impl ArchiveSource<'_> {
    fn download(&self, name: &str, layout: &RootLayout) -> Result<PathBuf> {
        let url = self.config.release_url(name, &self.version);
        let dest = layout
            .archive
            .join(self.config.release_file_name(name, &self.version));
        info!(component = name, %url, "Downloading release archive");
        self.fetcher.fetch(&url, &dest)?;
        Ok(dest)
    }

    pub fn acquire_core(&self, layout: &RootLayout, clear_src: bool) -> Result<()> {
        let archive = self.download(catalog::CORE, layout)?;
        if clear_src {
            clear_stale(&layout.src, true)?;
        }
        info!(component = catalog::CORE, dest = %layout.src.display(), "Extracting");
        self.extractor.extract(&archive, &layout.src, STRIP_SEGMENTS)
    }

    pub fn acquire_component(&self, spec: &ComponentSpec, layout: &RootLayout) -> Result<()> {
        let placement = catalog::placement_of(spec.name)?;
        let archive = self.download(spec.name, layout)?;

        // The strip convention needs the component's own directory to exist
        let target = layout.src.join(placement.relative_path());
        clear_stale(&target, false)?;
        fs::create_dir_all(&target)?;

        info!(component = spec.name, dest = %target.display(), "Extracting");
        self.extractor.extract(&archive, &target, STRIP_SEGMENTS)
    }
}
