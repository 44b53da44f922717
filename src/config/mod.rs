//! Tool configuration (config.yaml)
//!
//! Every key is optional; missing keys keep their built-in default:
//!
//! ```yaml
//! release_url: https://releases.llvm.org/{version}/
//! release_file: "{name}-{version}.src.tar.xz"
//! svn_url: https://llvm.org/svn/llvm-project/{name}/trunk
//! git_url: https://github.com/llvm-mirror/{name}.git
//! protocol: svn
//! components: [cfe, compiler-rt]
//! ```
//!
//! `{name}` expands to the component (or, for live checkouts, repository)
//! name and `{version}` to the release version.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::catalog;
use crate::error::{self, Result};
use crate::protocol::Protocol;

/// Config filename inside the user configuration directory
pub const CONFIG_FILE: &str = "config.yaml";

pub const DEFAULT_RELEASE_URL: &str = "https://releases.llvm.org/{version}/";
pub const DEFAULT_RELEASE_FILE: &str = "{name}-{version}.src.tar.xz";
pub const DEFAULT_SVN_URL: &str = "https://llvm.org/svn/llvm-project/{name}/trunk";
pub const DEFAULT_GIT_URL: &str = "https://github.com/llvm-mirror/{name}.git";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetupConfig {
    /// Base URL of a release's archives
    pub release_url: String,
    /// Archive filename within `release_url`
    pub release_file: String,
    pub svn_url: String,
    pub git_url: String,
    /// Protocol used for `trunk` when none is given on the command line
    pub protocol: Protocol,
    /// Components set up when none are given on the command line
    pub components: Vec<String>,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            release_url: DEFAULT_RELEASE_URL.to_string(),
            release_file: DEFAULT_RELEASE_FILE.to_string(),
            svn_url: DEFAULT_SVN_URL.to_string(),
            git_url: DEFAULT_GIT_URL.to_string(),
            protocol: Protocol::default(),
            components: Vec::new(),
        }
    }
}

fn expand(template: &str, name: &str, version: &str) -> String {
    template
        .replace("{name}", name)
        .replace("{version}", version)
}

impl SetupConfig {
    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document deserializes as null rather than an empty map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file that must exist
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| error::config_read_failed(path.display().to_string(), e.to_string()))?;
        Self::from_yaml(&content).map_err(|e| match e {
            crate::error::SetupError::ConfigParseFailed { reason, .. } => {
                error::config_parse_failed(path.display().to_string(), reason)
            }
            other => other,
        })
    }

    /// Resolve the configuration for this run
    ///
    /// An explicit path must exist. Otherwise the user's config directory is
    /// consulted, and the built-in defaults apply when it has no file.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "Loading user configuration");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        for name in &self.components {
            if !catalog::SATELLITES.contains(&name.as_str()) {
                return Err(error::unknown_component(name));
            }
        }
        Ok(())
    }

    /// Download URL of `name`'s release archive
    pub fn release_url(&self, name: &str, version: &str) -> String {
        let mut url = expand(&self.release_url, name, version);
        if !url.ends_with('/') {
            url.push('/');
        }
        url.push_str(&self.release_file_name(name, version));
        url
    }

    /// Local filename of `name`'s release archive
    pub fn release_file_name(&self, name: &str, version: &str) -> String {
        expand(&self.release_file, name, version)
    }

    /// Repository address of `repository` for a live checkout
    pub fn checkout_url(&self, protocol: Protocol, repository: &str) -> String {
        let template = match protocol {
            Protocol::Svn => &self.svn_url,
            Protocol::Git => &self.git_url,
        };
        expand(template, repository, crate::version::TRUNK)
    }
}

/// `<config dir>/llvm-setup/config.yaml`, when the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("llvm-setup").join(CONFIG_FILE))
}
