//! # Plume Runtime
//!
//! The host side of Plume:
//!
//! - [`config`]: layered configuration loading (`plume.toml`, `PLUME_*`)
//! - [`logging`]: `tracing-subscriber` setup driven by that configuration
//! - [`PlumeRuntime`]: owns the registry and dispatcher, installs plugins
//!   and turns raw OneBot payloads into dispatches
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use plume_runtime::{PlumeRuntime, config::load_config};
//!
//! let runtime = PlumeRuntime::builder()
//!     .config(load_config()?)
//!     .api(Arc::new(host_api))
//!     .with_static_handlers(true)
//!     .with_logging(true)
//!     .build()?;
//!
//! let report = runtime.dispatch_json(raw_payload)?;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

pub use config::{ConfigError, ConfigLoader, ConfigResult, PlumeConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{PlumeRuntime, RuntimeBuilder};

pub use tracing;

/// Logging macros for host code.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
