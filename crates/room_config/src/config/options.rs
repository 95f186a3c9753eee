//! Store options with serde defaults.
//!
//! Options control how a missing resource is generated and how much the
//! store reports while loading. They can be built in code or parsed from a
//! TOML table supplied by the host.

use serde::{Deserialize, Serialize};

use super::error::ConfigResult;

/// Options for a `ParameterStore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOptions {
    /// Header lines of a generated default resource.
    #[serde(default = "default_header")]
    pub header: Vec<String>,

    /// Value given to keys declared with `register_key`.
    #[serde(default = "default_value")]
    pub default_value: String,

    /// Artifact keys dropped from the committed map before generation.
    #[serde(default = "default_excluded_keys")]
    pub excluded_keys: Vec<String>,

    /// Report every loaded parameter as a detail line.
    #[serde(default = "default_true")]
    pub log_values_on_load: bool,

    /// Timestamp lines sent to the diagnostic sink.
    #[serde(default)]
    pub show_timestamps: bool,
}

fn default_header() -> Vec<String> {
    vec![
        "Config (Auto Generated)".to_string(),
        "Room Config - Parameter Store".to_string(),
    ]
}

fn default_value() -> String {
    "0".to_string()
}

fn default_excluded_keys() -> Vec<String> {
    vec!["0d".to_string()]
}

fn default_true() -> bool {
    true
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            header: default_header(),
            default_value: default_value(),
            excluded_keys: default_excluded_keys(),
            log_values_on_load: default_true(),
            show_timestamps: false,
        }
    }
}

impl StoreOptions {
    /// Parse options from TOML text. Missing fields take their defaults.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Whether `key` is an artifact excluded from generated resources.
    pub fn is_excluded(&self, key: &str) -> bool {
        self.excluded_keys.iter().any(|k| k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn defaults() {
        let options = StoreOptions::default();
        assert_eq!(options.header.len(), 2);
        assert_eq!(options.default_value, "0");
        assert!(options.is_excluded("0d"));
        assert!(!options.is_excluded("volume"));
        assert!(options.log_values_on_load);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let options = StoreOptions::from_toml_str("").unwrap();
        assert_eq!(options, StoreOptions::default());
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let options = StoreOptions::from_toml_str(
            "header = [\"Boardroom\"]\ndefault_value = \"off\"\nlog_values_on_load = false\n",
        )
        .unwrap();

        assert_eq!(options.header, vec!["Boardroom".to_string()]);
        assert_eq!(options.default_value, "off");
        assert!(!options.log_values_on_load);
        assert!(options.is_excluded("0d"));
    }

    #[test]
    fn bad_toml_is_options_error() {
        let err = StoreOptions::from_toml_str("header = 5").unwrap_err();
        assert!(matches!(err, ConfigError::Options(_)));
    }
}
