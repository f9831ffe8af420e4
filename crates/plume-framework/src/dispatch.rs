//! Event dispatch.
//!
//! For one incoming event the [`Dispatcher`]:
//!
//! 1. Selects the handler map matching the event's category
//! 2. Walks it in key order
//! 3. Skips reserved names (`_` prefix) and names on its disabled list
//! 4. Evaluates each guard; an absent guard passes
//! 5. Runs every accepted callback with a fresh [`Session`]
//!
//! Dispatch never stops early. A panicking callback unwinds to the caller.

use std::collections::BTreeSet;

use plume_core::{Api, Event, EventCategory};
use tracing::{Level, debug, span, trace};

use crate::registry::{Registry, Routable, is_reserved};
use crate::session::Session;

// ============================================================================
// DispatchReport
// ============================================================================

/// What happened during one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub category: EventCategory,
    /// Handlers whose callbacks ran, in order.
    pub invoked: Vec<String>,
    /// Entries skipped for a reserved or disabled name.
    pub disabled: usize,
    /// Entries whose guard rejected the event.
    pub rejected: usize,
}

impl DispatchReport {
    fn new(category: EventCategory) -> Self {
        Self {
            category,
            invoked: Vec::new(),
            disabled: 0,
            rejected: 0,
        }
    }

    /// Returns `true` if at least one handler ran.
    pub fn matched(&self) -> bool {
        !self.invoked.is_empty()
    }

    pub fn was_invoked(&self, name: &str) -> bool {
        self.invoked.iter().any(|n| n == name)
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Dispatches events over a [`Registry`], honoring a list of disabled
/// handler names.
///
/// Disabled handlers stay registered; they are only skipped.
#[derive(Debug, Default, Clone)]
pub struct Dispatcher {
    disabled: BTreeSet<String>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dispatcher that skips every name in `names`.
    pub fn with_disabled<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            disabled: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn disable(&mut self, name: impl Into<String>) {
        self.disabled.insert(name.into());
    }

    /// Returns `true` if dispatch skips `name`.
    pub fn is_disabled(&self, name: &str) -> bool {
        is_reserved(name) || self.disabled.contains(name)
    }

    /// Runs the handlers of `E`'s category against `event`.
    pub fn run_handlers<E: Routable>(
        &self,
        registry: &Registry,
        event: &E,
        api: &dyn Api,
    ) -> DispatchReport {
        let mut report = DispatchReport::new(E::CATEGORY);

        for (name, handler) in registry.handlers::<E>() {
            if self.is_disabled(name) {
                trace!(handler = %name, "Skipping disabled handler");
                report.disabled += 1;
                continue;
            }

            if !handler.check_condition(event) {
                trace!(handler = %name, "Guard rejected event");
                report.rejected += 1;
                continue;
            }

            if !handler.has_callback() {
                trace!(handler = %name, "Handler has no callback");
                continue;
            }

            debug!(handler = %name, "Running handler");
            let mut session = Session::new(event, api, name);
            handler.run(&mut session);
            report.invoked.push(name.clone());
        }

        report
    }

    /// Routes `event` to the handler map of its category.
    pub fn dispatch(&self, registry: &Registry, event: &Event, api: &dyn Api) -> DispatchReport {
        let category = event.category();
        let span = span!(Level::DEBUG, "dispatch", %category, self_id = event.self_id());
        let _enter = span.enter();

        let report = match event {
            Event::Message(e) => self.run_handlers(registry, e, api),
            Event::Notice(e) => self.run_handlers(registry, e, api),
            Event::Request(e) => self.run_handlers(registry, e, api),
        };

        debug!(
            invoked = report.invoked.len(),
            disabled = report.disabled,
            rejected = report.rejected,
            "Dispatch finished"
        );
        report
    }
}

/// Dispatches `event` with no disabled names besides reserved ones.
pub fn dispatch(registry: &Registry, event: &Event, api: &dyn Api) -> DispatchReport {
    Dispatcher::new().dispatch(registry, event, api)
}

/// Runs the handlers for one category with no disabled names besides
/// reserved ones.
pub fn run_handlers<E: Routable>(registry: &Registry, event: &E, api: &dyn Api) -> DispatchReport {
    Dispatcher::new().run_handlers(registry, event, api)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Cond;
    use crate::handler::Handler;
    use crate::testing::{RecordingApi, group_message, private_message};
    use parking_lot::Mutex;
    use plume_core::{MessageEvent, NoticeEvent};
    use std::sync::Arc;

    type Log = Arc<Mutex<Vec<String>>>;

    fn logging(log: &Log, label: &str) -> Handler<MessageEvent> {
        let log = Arc::clone(log);
        let label = label.to_string();
        Handler::new(move |_: &mut Session<'_, MessageEvent>| log.lock().push(label.clone()))
    }

    #[test]
    fn test_lexicographic_order_and_reserved_prefix() {
        let log = Log::default();
        let mut registry = Registry::new();
        registry.register("b_handler", logging(&log, "b_handler"));
        registry.register("a_handler", logging(&log, "a_handler"));
        registry.register("_hidden", logging(&log, "_hidden"));

        let api = RecordingApi::new();
        let report = dispatch(&registry, &private_message(1, "hi").into(), &api);

        assert_eq!(*log.lock(), ["a_handler", "b_handler"]);
        assert_eq!(report.invoked, ["a_handler", "b_handler"]);
        assert_eq!(report.disabled, 1);
        assert!(registry.contains::<MessageEvent>("_hidden"));
    }

    #[test]
    fn test_reserved_name_never_runs_even_when_guard_accepts() {
        let log = Log::default();
        let mut registry = Registry::new();
        registry.register(
            "_always",
            logging(&log, "_always").with_condition(Cond::new(|_: &MessageEvent| true)),
        );

        let report = run_handlers(&registry, &private_message(1, "hi"), &RecordingApi::new());
        assert!(log.lock().is_empty());
        assert!(!report.matched());
    }

    #[test]
    fn test_last_registration_wins() {
        let log = Log::default();
        let mut registry = Registry::new();
        registry.register("echo", logging(&log, "first"));
        registry.register("echo", logging(&log, "second"));

        run_handlers(&registry, &private_message(1, "hi"), &RecordingApi::new());
        assert_eq!(*log.lock(), ["second"]);
    }

    #[test]
    fn test_guard_controls_invocation() {
        let log = Log::default();
        let mut registry = Registry::new();
        registry.register(
            "groups_only",
            logging(&log, "groups_only")
                .with_condition(Cond::new(|e: &MessageEvent| e.group_id.is_some())),
        );
        registry.register("unguarded", logging(&log, "unguarded"));

        let api = RecordingApi::new();
        let report = run_handlers(&registry, &private_message(1, "hi"), &api);
        assert_eq!(report.rejected, 1);
        assert_eq!(*log.lock(), ["unguarded"]);

        log.lock().clear();
        run_handlers(&registry, &group_message(2, 1, "hi"), &api);
        assert_eq!(*log.lock(), ["groups_only", "unguarded"]);
    }

    #[test]
    fn test_missing_callback_is_skipped() {
        let mut registry = Registry::new();
        registry.register("empty", Handler::<MessageEvent>::empty());

        let report = run_handlers(&registry, &private_message(1, "hi"), &RecordingApi::new());
        assert!(report.invoked.is_empty());
        assert_eq!(report.rejected, 0);
    }

    #[test]
    fn test_only_matching_category_runs() {
        let log = Log::default();
        let mut registry = Registry::new();
        registry.register("message", logging(&log, "message"));
        {
            let log = Arc::clone(&log);
            registry.register(
                "notice",
                Handler::new(move |_: &mut Session<'_, NoticeEvent>| {
                    log.lock().push("notice".into())
                }),
            );
        }

        let notice: Event = Event::from_json(
            r#"{"post_type":"notice","time":0,"self_id":1,"notice_type":"friend_add","user_id":2}"#,
        )
        .unwrap();
        let report = dispatch(&registry, &notice, &RecordingApi::new());

        assert_eq!(report.category, EventCategory::Notice);
        assert_eq!(*log.lock(), ["notice"]);
    }

    #[test]
    fn test_disabled_names_are_skipped() {
        let log = Log::default();
        let mut registry = Registry::new();
        registry.register("a", logging(&log, "a"));
        registry.register("b", logging(&log, "b"));

        let api = RecordingApi::new();
        let event = Event::from(private_message(1, "x"));
        let mut dispatcher = Dispatcher::with_disabled(["a"]);
        assert!(dispatcher.is_disabled("_x"));
        let report = dispatcher.dispatch(&registry, &event, &api);
        assert_eq!(report.invoked, ["b"]);
        assert_eq!(report.disabled, 1);

        dispatcher.disable("b");
        let report = dispatcher.dispatch(&registry, &event, &api);
        assert!(!report.matched());
        assert_eq!(*log.lock(), ["b"]);
    }

    #[test]
    fn test_callback_sees_session() {
        let seen = Arc::new(Mutex::new(None));
        let mut registry = Registry::new();
        {
            let seen = Arc::clone(&seen);
            registry.register(
                "echo",
                Handler::new(move |s: &mut Session<'_, MessageEvent>| {
                    *seen.lock() = Some((s.handler_name().to_string(), s.user_id));
                    s.send("pong").map(drop)
                }),
            );
        }

        let api = RecordingApi::new();
        run_handlers(&registry, &private_message(3, "ping"), &api);
        assert_eq!(*seen.lock(), Some(("echo".to_string(), 3)));
        assert_eq!(api.actions(), ["send_private_msg"]);
    }
}
