//! Configuration for the Plume runtime.
//!
//! Layered loading (defaults, files, environment) lives in [`loader`]; the
//! schema and its validation in [`schema`].

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    DispatchConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, PlumeConfig, SpanEventConfig,
};
