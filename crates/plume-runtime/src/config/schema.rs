//! Configuration schema definitions.
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "compact"
//! output = "stderr"
//!
//! [logging.filters]
//! plume_framework = "debug"
//!
//! [dispatch]
//! disabled = ["noisy_logger"]
//!
//! [plugins.echo]
//! prefix = ">"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{ConfigError, ConfigResult};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlumeConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Per-plugin sections, keyed by plugin name.
    #[serde(default)]
    pub plugins: BTreeMap<String, Value>,
}

impl PlumeConfig {
    /// The configuration section for `plugin`, or `Value::Null`.
    pub fn plugin_section(&self, plugin: &str) -> Value {
        self.plugins.get(plugin).cloned().unwrap_or(Value::Null)
    }

    /// Checks constraints serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.logging.output == LogOutput::File && self.logging.file_path.is_none() {
            return Err(ConfigError::validation(
                "logging.output = \"file\" requires logging.file_path",
            ));
        }
        if self.dispatch.disabled.iter().any(|name| name.is_empty()) {
            return Err(ConfigError::validation(
                "dispatch.disabled contains an empty handler name",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Dispatch settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Handler names to skip. They stay registered.
    #[serde(default)]
    pub disabled: Vec<String>,
}

// ============================================================================
// Logging
// ============================================================================

/// Logging settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: LogOutput,

    /// Per-module levels, e.g. `plume_framework = "debug"`.
    #[serde(default)]
    pub filters: BTreeMap<String, LogLevel>,

    /// Log file, required when `output = "file"`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    #[serde(default)]
    pub thread_ids: bool,

    /// Include file names and line numbers.
    #[serde(default)]
    pub file_location: bool,

    #[serde(default)]
    pub span_events: SpanEventConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature.
    #[cfg(feature = "json-log")]
    Json,
}

/// Where log lines go.
///
/// Defaults to stderr so hosts that speak a protocol on stdout stay clean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    #[default]
    Stderr,
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = PlumeConfig::default();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.output, LogOutput::Stderr);
        assert!(config.dispatch.disabled.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_plugin_section() {
        let config: PlumeConfig = serde_json::from_value(json!({
            "plugins": { "echo": { "prefix": ">" } }
        }))
        .unwrap();
        assert_eq!(config.plugin_section("echo"), json!({ "prefix": ">" }));
        assert_eq!(config.plugin_section("missing"), Value::Null);
    }

    #[test]
    fn test_file_output_requires_path() {
        let mut config = PlumeConfig::default();
        config.logging.output = LogOutput::File;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { .. })
        ));

        config.logging.file_path = Some("plume.log".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_disabled_name_is_rejected() {
        let mut config = PlumeConfig::default();
        config.dispatch.disabled.push(String::new());
        assert!(config.validate().is_err());
    }
}
