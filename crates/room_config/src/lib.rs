//! Room Config - text-file parameter store.
//!
//! This crate owns a flat `[key]` / value text file and exposes committed
//! and staged views of its parameters. It has no UI or process-startup
//! dependencies; the hosting controller application calls into it.

pub mod config;
pub mod logging;

pub use config::{
    ConfigError, ConfigResult, FileResource, MemoryResource, ParameterStore, ResourceProvider,
    StoreOptions,
};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
