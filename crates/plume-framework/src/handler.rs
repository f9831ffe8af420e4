//! Handlers: an optional guard plus an optional callback.
//!
//! A handler has no identity of its own; it is known by the key it is
//! registered under in the [`Registry`](crate::Registry).
//!
//! Callbacks receive a mutable [`Session`] and may return anything that
//! implements [`HandlerResponse`]:
//!
//! ```rust,ignore
//! fn greet(session: &mut MessageSession<'_>) -> ApiResult<()> {
//!     session.reply("hello")?;
//!     Ok(())
//! }
//!
//! let handler = Handler::new(greet).with_condition(cond::command(["hi"]));
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error};

use crate::condition::{Cond, Condition};
use crate::session::Session;

/// A type-erased handler callback.
pub type Callback<E> = Arc<dyn Fn(&mut Session<'_, E>) + Send + Sync>;

// ============================================================================
// HandlerResponse
// ============================================================================

/// A trait for types that can be returned from handler callbacks.
///
/// Errors are logged with the handler name and then dropped; they never
/// stop the dispatch of other handlers.
pub trait HandlerResponse {
    /// Consumes the value returned by the handler named `handler`.
    fn process_response(self, handler: &str);
}

impl HandlerResponse for () {
    fn process_response(self, _handler: &str) {}
}

impl<T: HandlerResponse> HandlerResponse for Option<T> {
    fn process_response(self, handler: &str) {
        if let Some(t) = self {
            t.process_response(handler);
        }
    }
}

impl<T: HandlerResponse, E: fmt::Display> HandlerResponse for Result<T, E> {
    fn process_response(self, handler: &str) {
        match self {
            Ok(t) => t.process_response(handler),
            Err(e) => error!(handler = %handler, error = %e, "Handler returned an error"),
        }
    }
}

fn erase<E, F>(f: F) -> Callback<E>
where
    F: Fn(&mut Session<'_, E>) + Send + Sync + 'static,
{
    Arc::new(f)
}

// ============================================================================
// Handler
// ============================================================================

/// A registry entry for events of type `E`.
pub struct Handler<E> {
    condition: Option<Cond<E>>,
    callback: Option<Callback<E>>,
}

impl<E: 'static> Handler<E> {
    /// Creates an unguarded handler around `f`.
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&mut Session<'_, E>) -> R + Send + Sync + 'static,
        R: HandlerResponse,
    {
        Self {
            condition: None,
            callback: Some(erase(move |session: &mut Session<'_, E>| {
                let name = session.handler_name();
                f(session).process_response(name);
            })),
        }
    }

    /// Creates a handler with neither guard nor callback.
    ///
    /// It matches every event and does nothing when run.
    pub fn empty() -> Self {
        Self {
            condition: None,
            callback: None,
        }
    }

    /// Sets the guard, replacing any previous one.
    pub fn with_condition(mut self, condition: impl Into<Cond<E>>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Removes the guard so the handler matches every event.
    pub fn without_condition(mut self) -> Self {
        self.condition = None;
        self
    }
}

impl<E> Handler<E> {
    /// Evaluates the guard. An absent guard always passes.
    pub fn check_condition(&self, event: &E) -> bool {
        self.condition.as_ref().is_none_or(|c| c.check(event))
    }

    /// Runs the callback. An absent callback does nothing.
    pub fn run(&self, session: &mut Session<'_, E>) {
        match &self.callback {
            Some(callback) => callback(session),
            None => debug!(handler = %session.handler_name(), "Handler has no callback"),
        }
    }

    pub fn has_condition(&self) -> bool {
        self.condition.is_some()
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }
}

impl<E> Clone for Handler<E> {
    fn clone(&self) -> Self {
        Self {
            condition: self.condition.clone(),
            callback: self.callback.clone(),
        }
    }
}

impl<E> fmt::Debug for Handler<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("has_condition", &self.has_condition())
            .field("has_callback", &self.has_callback())
            .finish()
    }
}
