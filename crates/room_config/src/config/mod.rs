//! Parameter store backed by a human-editable text file.
//!
//! This module provides:
//! - Committed parameters, persisted on every `set`
//! - Staged parameters for batch editing, persisted on `flush`
//! - In-place record patching that keeps surrounding prose intact
//! - Default resource generation from registered keys
//!
//! # Example
//!
//! ```no_run
//! use room_config::config::ParameterStore;
//!
//! let mut store = ParameterStore::open("cfg.txt");
//! store.register_key("volume").unwrap();
//! store.register_key("mode").unwrap();
//! store.load().unwrap();
//!
//! // Committed write, persisted at once
//! store.set("volume", "5").unwrap();
//!
//! // Staged edit, persisted on flush
//! store.staged_set("mode", "auto").unwrap();
//! store.flush().unwrap();
//! ```

mod error;
mod options;
pub mod record;
mod resource;
mod store;

pub use error::{ConfigError, ConfigResult};
pub use options::StoreOptions;
pub use resource::{FileResource, MemoryResource, ResourceProvider};
pub use store::ParameterStore;
