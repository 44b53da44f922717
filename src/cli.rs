//! CLI definitions using clap derive API

use clap::builder::{PossibleValuesParser, Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::catalog;
use crate::protocol::Protocol;
use crate::version::VersionId;

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "LLVM_SETUP_CONFIG";

/// llvm-setup - LLVM source tree provisioning
///
/// Download release archives or check out trunk and assemble them into one source tree per version.
#[derive(Parser, Debug)]
#[command(
    name = "llvm-setup",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Provision LLVM source trees for releases and trunk",
    long_about = "llvm-setup downloads LLVM release archives or checks out trunk, and grafts \
                  the requested sub-projects (clang, compiler-rt, libc++, ...) into one source \
                  tree per version. Re-running a setup resumes where it stopped.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  llvm-setup setup -v 7.0.1 ~/llvm\n    \
                  llvm-setup setup -v trunk --protocol git ~/llvm cfe clang-tools-extra\n    \
                  llvm-setup status ~/llvm\n    \
                  llvm-setup components"
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Hide progress bars
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Configuration file (defaults to <config dir>/llvm-setup/config.yaml)
    #[arg(long, global = true, env = CONFIG_ENV, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Set up source trees for one or more versions
    Setup(SetupArgs),

    /// Show installed and missing components
    Status(StatusArgs),

    /// List known components
    Components,

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the setup command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Set up a release with every component:\n    llvm-setup setup -v 7.0.1 ~/llvm\n\n\
                  Set up several versions:\n    llvm-setup setup -v 6.0.1 -v 7.0.1 ~/llvm cfe\n\n\
                  Check out trunk from the git mirror:\n    llvm-setup setup -v trunk --protocol git ~/llvm cfe lldb\n\n\
                  Resume an interrupted setup:\n    llvm-setup setup -v 7.0.1 ~/llvm")]
pub struct SetupArgs {
    /// The LLVM version (or keyword trunk) to set up
    #[arg(
        long = "llvm-version",
        short = 'v',
        value_name = "VERSION",
        required = true
    )]
    pub versions: Vec<VersionId>,

    /// Checkout protocol for trunk (defaults to the configured one, svn)
    #[arg(long, value_enum)]
    pub protocol: Option<Protocol>,

    /// Existing directory that receives one root per version
    pub target_directory: PathBuf,

    /// Components to set up (defaults to all)
    #[arg(value_parser = PossibleValuesParser::new(catalog::SATELLITES.iter().copied()))]
    pub components: Vec<String>,
}

/// Arguments for the status command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show every managed root:\n    llvm-setup status ~/llvm\n\n\
                  Show one version:\n    llvm-setup status -v trunk ~/llvm")]
pub struct StatusArgs {
    /// Versions to report (defaults to every managed root)
    #[arg(long = "llvm-version", short = 'v', value_name = "VERSION")]
    pub versions: Vec<VersionId>,

    /// Directory holding the version roots
    pub target_directory: PathBuf,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    llvm-setup completions --shell bash > ~/.bash_completion.d/llvm-setup\n\n\
                  Generate zsh completions:\n    llvm-setup completions --shell zsh > ~/.zfunc/_llvm-setup\n\n\
                  Generate fish completions:\n    llvm-setup completions --shell fish > ~/.config/fish/completions/llvm-setup.fish")]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(long, value_enum, ignore_case = true)]
    pub shell: clap_complete::Shell,
}
