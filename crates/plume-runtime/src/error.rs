//! Runtime error types.

use plume_core::EventError;
use plume_framework::PluginError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while building or driving a runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A plugin failed to register; the runtime was not built.
    #[error(transparent)]
    Plugin(#[from] PluginError),

    /// An incoming payload could not be turned into an event.
    #[error("Failed to read event: {0}")]
    Event(#[from] EventError),

    /// `build` was called without a host API.
    #[error("No host API configured")]
    MissingApi,
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
