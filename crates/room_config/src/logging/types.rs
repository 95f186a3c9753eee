//! Logging types.

use serde::{Deserialize, Serialize};

/// Log level for filtering messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace-level debugging (very verbose).
    Trace,
    /// Debug information.
    Debug,
    /// General information.
    #[default]
    Info,
    /// Warnings.
    Warn,
    /// Errors.
    Error,
}

/// Host callback receiving one formatted diagnostic line per call.
pub type SinkCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Message prefix types for console lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePrefix {
    /// `[WARNING]`
    Warning,
    /// `[ERROR]`
    Error,
    /// Indented detail line under a summary.
    Detail,
    /// No prefix
    None,
}

impl MessagePrefix {
    /// Format a message with this prefix.
    pub fn format(&self, message: &str) -> String {
        match self {
            MessagePrefix::Warning => format!("[WARNING] {}", message),
            MessagePrefix::Error => format!("[ERROR] {}", message),
            MessagePrefix::Detail => format!("  {}", message),
            MessagePrefix::None => message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_format() {
        assert_eq!(MessagePrefix::Warning.format("x"), "[WARNING] x");
        assert_eq!(MessagePrefix::Detail.format("a: 1"), "  a: 1");
        assert_eq!(MessagePrefix::None.format("plain"), "plain");
    }

    #[test]
    fn levels_order() {
        assert!(LogLevel::Debug < LogLevel::Warn);
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }
}
