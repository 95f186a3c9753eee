//! Diagnostic sink for store messages.
//!
//! Every message goes to `tracing`. When the host supplies a callback
//! (a controller console, a UI log pane) the same message is also
//! delivered to it as a single formatted line.

use std::fmt;

use chrono::Local;

use super::types::{LogLevel, MessagePrefix, SinkCallback};

/// Dual output diagnostics (tracing + optional host sink).
pub struct Diagnostics {
    /// Host callback for formatted lines.
    sink: Option<SinkCallback>,
    /// Minimum level forwarded to the sink. Tracing filters independently.
    level: LogLevel,
    /// Prefix sink lines with a local timestamp.
    show_timestamps: bool,
}

impl Diagnostics {
    /// Create diagnostics that only emit through `tracing`.
    pub fn new() -> Self {
        Self {
            sink: None,
            level: LogLevel::Info,
            show_timestamps: false,
        }
    }

    /// Attach a host sink callback.
    pub fn with_sink(mut self, sink: SinkCallback) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the minimum level forwarded to the sink.
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Enable or disable sink line timestamps.
    pub fn with_timestamps(mut self, show: bool) -> Self {
        self.show_timestamps = show;
        self
    }

    /// Replace the sink callback.
    pub fn set_sink(&mut self, sink: Option<SinkCallback>) {
        self.sink = sink;
    }

    /// Whether a host sink is attached.
    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    pub fn info(&self, message: &str) {
        self.emit(LogLevel::Info, MessagePrefix::None, message);
    }

    pub fn debug(&self, message: &str) {
        self.emit(LogLevel::Debug, MessagePrefix::None, message);
    }

    /// Indented detail line (parameter dumps), debug level.
    pub fn detail(&self, message: &str) {
        self.emit(LogLevel::Debug, MessagePrefix::Detail, message);
    }

    pub fn warn(&self, message: &str) {
        self.emit(LogLevel::Warn, MessagePrefix::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.emit(LogLevel::Error, MessagePrefix::Error, message);
    }

    fn emit(&self, level: LogLevel, prefix: MessagePrefix, message: &str) {
        match level {
            LogLevel::Trace => tracing::trace!("{}", message),
            LogLevel::Debug => tracing::debug!("{}", message),
            LogLevel::Info => tracing::info!("{}", message),
            LogLevel::Warn => tracing::warn!("{}", message),
            LogLevel::Error => tracing::error!("{}", message),
        }

        if level < self.level {
            return;
        }
        if let Some(ref sink) = self.sink {
            sink(&self.format_line(&prefix.format(message)));
        }
    }

    fn format_line(&self, message: &str) -> String {
        if self.show_timestamps {
            let timestamp = Local::now().format("%H:%M:%S");
            format!("[{}] {}", timestamp, message)
        } else {
            message.to_string()
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("sink", &self.sink.is_some())
            .field("level", &self.level)
            .field("show_timestamps", &self.show_timestamps)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn capture() -> (Arc<Mutex<Vec<String>>>, SinkCallback) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let lines_clone = lines.clone();
        let sink: SinkCallback = Box::new(move |line| {
            lines_clone.lock().push(line.to_string());
        });
        (lines, sink)
    }

    #[test]
    fn forwards_to_sink() {
        let (lines, sink) = capture();
        let diag = Diagnostics::new().with_sink(sink);

        diag.info("Matches = 2");
        diag.warn("bad record");

        let lines = lines.lock();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Matches = 2");
        assert_eq!(lines[1], "[WARNING] bad record");
    }

    #[test]
    fn level_filters_sink_only() {
        let (lines, sink) = capture();
        let diag = Diagnostics::new().with_sink(sink).with_level(LogLevel::Warn);

        diag.info("hidden");
        diag.detail("hidden too");
        diag.error("shown");

        assert_eq!(*lines.lock(), vec!["[ERROR] shown".to_string()]);
    }

    #[test]
    fn debug_level_includes_details() {
        let (lines, sink) = capture();
        let diag = Diagnostics::new().with_sink(sink).with_level(LogLevel::Debug);

        diag.detail("volume: 5");

        assert_eq!(*lines.lock(), vec!["  volume: 5".to_string()]);
    }

    #[test]
    fn timestamps_prefix_lines() {
        let (lines, sink) = capture();
        let diag = Diagnostics::new().with_sink(sink).with_timestamps(true);

        diag.info("hello");

        let lines = lines.lock();
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("] hello"));
    }

    #[test]
    fn no_sink_is_silent() {
        let diag = Diagnostics::default();
        assert!(!diag.has_sink());
        diag.error("goes to tracing only");
    }
}
