//! Static component catalog
//!
//! Every component the tool knows about, where its sources are grafted into
//! the core's source tree, and which components must be installed first.
//!
//! ```text
//! src/                         <- llvm (core)
//! ├── projects/
//! │   ├── compiler-rt          <- compiler-rt
//! │   ├── libcxx               <- libcxx
//! │   └── ...
//! └── tools/
//!     ├── clang                <- cfe
//!     │   └── tools/extra      <- clang-tools-extra (needs cfe)
//!     └── lldb                 <- lldb (needs cfe)
//! ```

use std::path::PathBuf;

use crate::error::{self, Result};
use crate::protocol::Protocol;

/// Name of the core component; it forms the root of the source tree.
pub const CORE: &str = "llvm";

/// Where a satellite's sources live relative to the source directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Parent directory relative to `src/` (may be nested inside another component)
    pub parent_dir: &'static str,
    /// Directory name created under `parent_dir`
    pub local_name: &'static str,
}

impl Placement {
    /// Path of the component's directory relative to `src/`
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(self.parent_dir).join(self.local_name)
    }
}

/// Static metadata for one component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentSpec {
    pub name: &'static str,
    /// `None` only for the core
    pub placement: Option<Placement>,
    pub dependencies: &'static [&'static str],
    /// Repository name on the git mirror when it differs from `name`
    pub git_repository: Option<&'static str>,
}

impl ComponentSpec {
    pub fn is_core(&self) -> bool {
        self.placement.is_none()
    }
}

const fn satellite(
    name: &'static str,
    parent_dir: &'static str,
    local_name: &'static str,
    dependencies: &'static [&'static str],
) -> ComponentSpec {
    ComponentSpec {
        name,
        placement: Some(Placement {
            parent_dir,
            local_name,
        }),
        dependencies,
        git_repository: None,
    }
}

static COMPONENTS: &[ComponentSpec] = &[
    ComponentSpec {
        name: CORE,
        placement: None,
        dependencies: &[],
        git_repository: None,
    },
    ComponentSpec {
        git_repository: Some("clang"),
        ..satellite("cfe", "tools", "clang", &[])
    },
    satellite("compiler-rt", "projects", "compiler-rt", &[]),
    satellite("libcxx", "projects", "libcxx", &[]),
    satellite("libcxxabi", "projects", "libcxxabi", &["libcxx"]),
    satellite("libunwind", "projects", "libunwind", &[]),
    satellite("openmp", "projects", "openmp", &[]),
    satellite("clang-tools-extra", "tools/clang/tools", "extra", &["cfe"]),
    satellite("lldb", "tools", "lldb", &["cfe"]),
    satellite("test-suite", "projects", "test-suite", &[]),
];

/// Names of every satellite component, in catalog order
pub const SATELLITES: &[&str] = &[
    "cfe",
    "compiler-rt",
    "libcxx",
    "libcxxabi",
    "libunwind",
    "openmp",
    "clang-tools-extra",
    "lldb",
    "test-suite",
];

/// Look up a component by name
pub fn lookup(name: &str) -> Result<&'static ComponentSpec> {
    COMPONENTS
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| error::unknown_component(name))
}

/// Every catalog entry, core first
pub fn all() -> &'static [ComponentSpec] {
    COMPONENTS
}

/// Placement of a satellite component
///
/// The core has no placement and is reported as unknown here, like any
/// name that is not a satellite.
pub fn placement_of(name: &str) -> Result<Placement> {
    lookup(name)?
        .placement
        .ok_or_else(|| error::unknown_component(name))
}

/// Direct dependencies of a component (possibly empty)
pub fn dependencies_of(name: &str) -> Result<&'static [&'static str]> {
    Ok(lookup(name)?.dependencies)
}

/// Repository name used to form the checkout URL for `protocol`
///
/// The git mirror hosts the front end (`cfe`) as `clang`; svn uses the
/// component names as they are.
pub fn repository_name(name: &str, protocol: Protocol) -> Result<&'static str> {
    let spec = lookup(name)?;
    Ok(match protocol {
        Protocol::Git => spec.git_repository.unwrap_or(spec.name),
        Protocol::Svn => spec.name,
    })
}
