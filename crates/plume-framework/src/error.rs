//! Error types for plugins.

use thiserror::Error;

/// Errors raised while a plugin registers its handlers.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The plugin's configuration section did not match its schema.
    #[error("invalid config for plugin '{plugin}': {source}")]
    Config {
        plugin: String,
        #[source]
        source: serde_json::Error,
    },

    /// The plugin refused to register.
    #[error("plugin '{plugin}' failed: {reason}")]
    Failed { plugin: String, reason: String },
}

impl PluginError {
    pub fn failed(plugin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Failed {
            plugin: plugin.into(),
            reason: reason.into(),
        }
    }

    /// Name of the plugin that failed.
    pub fn plugin(&self) -> &str {
        match self {
            Self::Config { plugin, .. } | Self::Failed { plugin, .. } => plugin,
        }
    }
}

/// Result type for plugin registration.
pub type PluginResult<T> = Result<T, PluginError>;
