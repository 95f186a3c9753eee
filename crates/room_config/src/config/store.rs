//! Parameter store over a `[key]` / value text resource.
//!
//! The store keeps two maps:
//! - committed parameters: every `set` is written to the resource at once
//! - staged parameters: a working copy edited freely and promoted in bulk
//!   by `flush`
//!
//! Writes re-read the resource and patch only the affected records, so
//! hand-written headers and comments survive.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use super::error::{ConfigError, ConfigResult};
use super::options::StoreOptions;
use super::record::{self, MalformedRecord, Record};
use super::resource::{FileResource, ResourceProvider};
use crate::logging::{Diagnostics, SinkCallback};

/// Committed and staged parameters backed by a text resource.
#[derive(Debug)]
pub struct ParameterStore<R: ResourceProvider = FileResource> {
    /// Display name chosen by the host. Never persisted.
    label: String,
    /// Location of the backing resource.
    resource_path: PathBuf,
    provider: R,
    options: StoreOptions,
    /// Authoritative values, in registration/file order.
    params: IndexMap<String, String>,
    /// Working copy. Sorted by key, ignoring case, on every load; later
    /// inserts append.
    staged: IndexMap<String, String>,
    diagnostics: Diagnostics,
}

impl ParameterStore<FileResource> {
    /// Create a store backed by a file on the local filesystem.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(FileResource, path)
    }
}

impl<R: ResourceProvider> ParameterStore<R> {
    /// Create an empty store for the resource at `path`.
    ///
    /// Nothing is read until `load()`.
    pub fn new(provider: R, path: impl Into<PathBuf>) -> Self {
        Self::with_options(provider, path, StoreOptions::default())
    }

    /// Create an empty store with explicit options.
    pub fn with_options(provider: R, path: impl Into<PathBuf>, options: StoreOptions) -> Self {
        let diagnostics = Diagnostics::new().with_timestamps(options.show_timestamps);
        let store = Self {
            label: String::new(),
            resource_path: path.into(),
            provider,
            options,
            params: IndexMap::new(),
            staged: IndexMap::new(),
            diagnostics,
        };
        store.diagnostics.info(&format!(
            "Parameter store... config path = {}",
            store.resource_path.display()
        ));
        store
    }

    /// Mirror diagnostics to a host callback.
    pub fn with_sink(mut self, sink: SinkCallback) -> Self {
        self.diagnostics.set_sink(Some(sink));
        self
    }

    /// Replace the diagnostics (sink, level, timestamps).
    pub fn set_diagnostics(&mut self, diagnostics: Diagnostics) {
        self.diagnostics = diagnostics;
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn resource_path(&self) -> &Path {
        &self.resource_path
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Declare a parameter the application expects.
    ///
    /// Adds the key with the default value unless it is already committed.
    /// Staged parameters are not touched. Declared keys are what a freshly
    /// generated resource contains.
    pub fn register_key(&mut self, key: &str) -> ConfigResult<()> {
        ensure_valid_key(key)?;
        let default = &self.options.default_value;
        self.params
            .entry(key.to_string())
            .or_insert_with(|| default.clone());
        Ok(())
    }

    /// Populate both maps from the resource.
    ///
    /// A missing resource is created with a default body first. Records
    /// overwrite registered defaults. Afterwards the staged parameters are
    /// ordered by key for `staged_key_at`.
    pub fn load(&mut self) -> ConfigResult<()> {
        let text = self.read_resource()?;

        let matches: Vec<_> = record::records(&text).collect();
        self.diagnostics.info(&format!("Matches = {}", matches.len()));
        self.merge_records(matches);

        self.diagnostics
            .info(&format!("Params loaded... ({})", self.params.len()));
        if self.options.log_values_on_load {
            for (key, value) in &self.params {
                self.diagnostics.detail(&format!("{}: {}", key, value));
            }
        }

        self.staged.sort_by(|a, _, b, _| staged_order(a, b));
        Ok(())
    }

    /// Apply scanned records to both maps, skipping malformed matches.
    fn merge_records<'t, I>(&mut self, found: I)
    where
        I: IntoIterator<Item = Result<Record<'t>, MalformedRecord>>,
    {
        for found in found {
            match found {
                Ok(Record { key, value }) => {
                    self.params.insert(key.to_string(), value.to_string());
                    self.staged.insert(key.to_string(), value.to_string());
                }
                Err(malformed) => {
                    self.diagnostics.error(&format!(
                        "Error processing a config parameter at byte {}... check config syntax",
                        malformed.offset
                    ));
                }
            }
        }
    }

    /// Committed value for `key` with placeholders expanded to `\r`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.params
            .get(key)
            .map(|value| record::decode_value(value).into_owned())
    }

    /// Commit `value` for `key` and patch its record in the resource.
    ///
    /// The in-memory value is always updated. When the resource holds no
    /// record for `key` it is left as is and a warning is emitted.
    pub fn set(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        ensure_valid_key(key)?;
        let value = record::encode_value(value).into_owned();
        self.params.insert(key.to_string(), value);

        let text = self.read_resource()?;
        let value = &self.params[key];
        let patch = record::patch_record(&text, key, value);
        if patch.replaced == 0 {
            self.diagnostics.warn(&format!(
                "No [{}] record in {}; value kept in memory only",
                key,
                self.resource_path.display()
            ));
            return Ok(());
        }

        self.write_resource(&patch.text)
    }

    /// Staged value for `key`, as stored.
    pub fn staged_get(&self, key: &str) -> Option<&str> {
        self.staged.get(key).map(String::as_str)
    }

    /// Stage `value` for `key`. Never touches the resource.
    pub fn staged_set(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        ensure_valid_key(key)?;
        let value = record::encode_value(value).into_owned();
        self.staged.insert(key.to_string(), value);
        Ok(())
    }

    /// Promote staged values into the committed map and the resource.
    ///
    /// Only keys that are already committed are promoted; staged-only keys
    /// are skipped. The resource is read once and written once. Returns the
    /// number of promoted keys.
    pub fn flush(&mut self) -> ConfigResult<usize> {
        let mut text = self.read_resource()?;
        let mut promoted = 0;

        for (key, value) in &self.staged {
            let Some(committed) = self.params.get_mut(key) else {
                continue;
            };
            committed.clone_from(value);
            promoted += 1;

            let patch = record::patch_record(&text, key, value);
            if patch.replaced == 0 {
                self.diagnostics.warn(&format!(
                    "No [{}] record in {}; value kept in memory only",
                    key,
                    self.resource_path.display()
                ));
            }
            text = patch.text;
        }

        self.write_resource(&text)?;
        self.diagnostics
            .debug(&format!("Flushed {} staged params", promoted));
        Ok(promoted)
    }

    /// Key at `index` in the staged ordering taken at the last load.
    ///
    /// Keys staged after that load follow the sorted block in insertion
    /// order.
    pub fn staged_key_at(&self, index: usize) -> Option<&str> {
        self.staged.get_index(index).map(|(key, _)| key.as_str())
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn staged_count(&self) -> usize {
        self.staged.len()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Committed parameters as stored (placeholders not expanded).
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Staged keys in positional order.
    pub fn staged_keys(&self) -> impl Iterator<Item = &str> {
        self.staged.keys().map(String::as_str)
    }

    /// Read the resource, creating it with a default body when missing.
    fn read_resource(&mut self) -> ConfigResult<String> {
        if self.provider.exists(&self.resource_path) {
            return self
                .provider
                .read(&self.resource_path)
                .map_err(|e| ConfigError::io("read", &self.resource_path, e));
        }

        let text = self.default_body();
        self.write_resource(&text)?;
        self.diagnostics.info(&format!(
            "Created {} with {} default params",
            self.resource_path.display(),
            self.params.len()
        ));
        Ok(text)
    }

    fn default_body(&mut self) -> String {
        let options = &self.options;
        self.params.retain(|key, _| !options.is_excluded(key));
        record::render_default_body(&self.options.header, self.params())
    }

    fn write_resource(&mut self, text: &str) -> ConfigResult<()> {
        self.provider
            .write(&self.resource_path, text)
            .map_err(|e| ConfigError::io("write", &self.resource_path, e))
    }
}

/// Case-insensitive key order; on a tie lowercase sorts first.
fn staged_order(a: &str, b: &str) -> Ordering {
    a.to_ascii_lowercase()
        .cmp(&b.to_ascii_lowercase())
        .then_with(|| b.cmp(a))
}

fn ensure_valid_key(key: &str) -> ConfigResult<()> {
    if record::is_valid_key(key) {
        Ok(())
    } else {
        Err(ConfigError::invalid_key(key))
    }
}
