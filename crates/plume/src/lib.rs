//! # Plume
//!
//! A plugin SDK for OneBot v11 style chat bot hosts.
//!
//! Plugins register named handlers for message, notice and request events.
//! The host hands every incoming event to the runtime, which runs each
//! matching handler in name order with a session it can answer through.
//!
//! ```text
//! ┌──────────┐  JSON  ┌──────────────┐      ┌──────────┐  guard ok  ┌─────────┐
//! │   Host   │──────▶│ PlumeRuntime │─────▶│ Registry │──────────▶│ Handler │──▶ Api
//! └──────────┘        └──────────────┘      └──────────┘            └─────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use plume::prelude::*;
//!
//! #[on_message(crate = ::plume::framework, cond::command(["ping"]))]
//! fn ping(session: &mut MessageSession<'_>) -> ApiResult<()> {
//!     session.reply("pong")?;
//!     Ok(())
//! }
//!
//! let runtime = PlumeRuntime::builder()
//!     .config_loader(ConfigLoader::new())
//!     .api(Arc::new(host_api))
//!     .with_static_handlers(true)
//!     .build()?;
//! runtime.dispatch_json(payload)?;
//! ```
//!
//! Declaration attributes default to `::plume_framework`; crates depending
//! only on `plume` pass `crate = ::plume::framework`.
//!
//! ## Features
//!
//! - `toml-config` *(default)* / `yaml-config`: configuration file formats
//! - `json-log`: JSON log output
//! - `testing`: recording host API for plugin tests

pub use plume_core as core;
pub use plume_framework as framework;
pub use plume_runtime as runtime;

/// Commonly used types for writing plugins and hosts.
pub mod prelude {
    pub use std::sync::Arc;

    pub use plume_runtime::{ConfigLoader, PlumeConfig, PlumeRuntime, RuntimeError, RuntimeResult};

    pub use plume_framework::{
        Cond, Condition, DispatchReport, Dispatcher, Handler, MessageSession, NoticeSession,
        Plugin, PluginContext, PluginError, PluginResult, Registry, RequestSession, Session, cond,
        on_message, on_notice, on_request, plugin_fn,
    };

    pub use plume_core::{
        Api, ApiError, ApiResult, Event, EventCategory, MessageEvent, NoticeEvent, RequestEvent,
        Target, UserEvent, cq,
    };
}
