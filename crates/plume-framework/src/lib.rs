//! # Plume Framework
//!
//! Handler registration and dispatch for Plume plugins.
//!
//! This layer provides:
//! - Guard conditions and the ready-made builders in [`cond`]
//! - [`Handler`]s pairing an optional guard with an optional callback
//! - Per-invocation [`Session`]s that can answer through the host [`Api`]
//! - The [`Registry`] and the [`Dispatcher`] that walks it
//! - [`Plugin`]s and the `#[on_message]` / `#[on_notice]` / `#[on_request]`
//!   declaration attributes
//!
//! ```rust,ignore
//! use plume_framework::{cond, on_message, MessageSession, Registry};
//!
//! #[on_message(cond::command(["ping"]))]
//! fn ping(session: &mut MessageSession<'_>) -> plume_core::ApiResult<()> {
//!     session.reply("pong")?;
//!     Ok(())
//! }
//!
//! let mut registry = Registry::new();
//! registry.register_static();
//! ```

pub mod cond;
pub mod condition;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod plugin;
pub mod registry;
pub mod session;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use condition::{All, Any, Cond, Condition, Not};
pub use dispatch::{DispatchReport, Dispatcher, dispatch, run_handlers};
pub use error::{PluginError, PluginResult};
pub use handler::{Callback, Handler, HandlerResponse};
pub use plugin::{FnPlugin, Plugin, PluginContext, plugin_fn};
pub use registry::{
    HandlerMap, RESERVED_PREFIX, Registry, Routable, STATIC_HANDLERS, StaticHandler, is_reserved,
};
pub use session::{MessageSession, NoticeSession, RequestSession, Session};

pub use plume_core::{
    Api, ApiError, ApiResult, Event, EventCategory, MessageEvent, NoticeEvent, RequestEvent,
    UserEvent,
};
pub use plume_macros::{on_message, on_notice, on_request};

#[doc(hidden)]
pub use linkme;
