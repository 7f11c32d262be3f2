//! Configuration for timers created through a registry.

use crate::sink::Sink;

/// Default report template for registry-created timers.
///
/// Renders like:
///
/// ```text
///   1.234 wall,   0.980 user +   0.120 sys =   1.100 cpu [89.1%]
/// ```
pub const DEFAULT_FORMAT: &str = "%w wall, %u user + %s sys = %t cpu [%p%]";

/// Default decimal digits for rendered durations.
pub const DEFAULT_PRECISION: usize = 3;

/// Options applied to every timer a [`TimerRegistry`](crate::TimerRegistry)
/// creates.
#[derive(Debug, Clone)]
pub struct TimerConfig {
    /// Decimal digits for rendered durations (default: 3).
    ///
    /// Duration fields are right-justified in a minimum width of
    /// `3 + precision` characters.
    pub precision: usize,

    /// Report template (default: [`DEFAULT_FORMAT`]).
    ///
    /// The registry prefixes each timer's template with its padded tag, so a
    /// bare `report()` identifies which region it measured.
    pub format: String,

    /// Column width reserved for the tag prefix (default: 24).
    ///
    /// Longer tags are not truncated; they just push the line wider.
    pub tag_width: usize,

    /// Destination for report lines (default: stdout).
    pub sink: Sink,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            format: DEFAULT_FORMAT.to_string(),
            tag_width: 24,
            sink: Sink::stdout(),
        }
    }
}

impl TimerConfig {
    /// Replace the rendering precision.
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Replace the report template.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Replace the tag column width.
    pub fn tag_width(mut self, width: usize) -> Self {
        self.tag_width = width;
        self
    }

    /// Replace the output sink.
    pub fn sink(mut self, sink: Sink) -> Self {
        self.sink = sink;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = TimerConfig::default();
        assert_eq!(config.precision, DEFAULT_PRECISION);
        assert_eq!(config.format, DEFAULT_FORMAT);
        assert!(config.sink.is_console());
    }

    #[test]
    fn builder_methods_chain() {
        let config = TimerConfig::default()
            .precision(5)
            .format("%w")
            .tag_width(8)
            .sink(Sink::memory());
        assert_eq!(config.precision, 5);
        assert_eq!(config.format, "%w");
        assert_eq!(config.tag_width, 8);
        assert!(!config.sink.is_console());
    }
}
