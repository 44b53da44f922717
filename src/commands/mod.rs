//! Command implementations for llvm-setup CLI

pub mod completions;
pub mod components;
pub mod setup;
pub mod status;
pub mod version;
