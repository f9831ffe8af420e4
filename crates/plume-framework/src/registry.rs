//! The handler registry.
//!
//! A [`Registry`] owns one ordered map per event category. Keys are handler
//! names; dispatch walks each map in key order, which is lexicographic byte
//! order of the names. Plugin authors may rely on this ordering: `a_log`
//! runs before `b_reply` regardless of which was registered first.
//!
//! Registration is insert-or-replace. There is no removal; to keep a handler
//! registered but inactive, list it in the dispatcher's disabled set or
//! register it under a name starting with [`RESERVED_PREFIX`].

use std::collections::BTreeMap;

use linkme::distributed_slice;
use plume_core::{EventCategory, MessageEvent, NoticeEvent, RequestEvent, UserEvent};
use tracing::{debug, info, warn};

use crate::handler::Handler;

/// Names starting with this character are registered but never dispatched.
pub const RESERVED_PREFIX: char = '_';

/// Returns `true` if `name` is hidden from dispatch.
pub fn is_reserved(name: &str) -> bool {
    name.starts_with(RESERVED_PREFIX)
}

/// An ordered handler map for one category.
pub type HandlerMap<E> = BTreeMap<String, Handler<E>>;

// ============================================================================
// Category routing
// ============================================================================

mod private {
    pub trait Sealed {}

    impl Sealed for plume_core::MessageEvent {}
    impl Sealed for plume_core::NoticeEvent {}
    impl Sealed for plume_core::RequestEvent {}
}

/// Event types that own a handler map in the [`Registry`].
///
/// Implemented for the three category events only.
pub trait Routable: UserEvent + private::Sealed {
    fn handlers(registry: &Registry) -> &HandlerMap<Self>;

    fn handlers_mut(registry: &mut Registry) -> &mut HandlerMap<Self>;
}

impl Routable for MessageEvent {
    fn handlers(registry: &Registry) -> &HandlerMap<Self> {
        &registry.message
    }

    fn handlers_mut(registry: &mut Registry) -> &mut HandlerMap<Self> {
        &mut registry.message
    }
}

impl Routable for NoticeEvent {
    fn handlers(registry: &Registry) -> &HandlerMap<Self> {
        &registry.notice
    }

    fn handlers_mut(registry: &mut Registry) -> &mut HandlerMap<Self> {
        &mut registry.notice
    }
}

impl Routable for RequestEvent {
    fn handlers(registry: &Registry) -> &HandlerMap<Self> {
        &registry.request
    }

    fn handlers_mut(registry: &mut Registry) -> &mut HandlerMap<Self> {
        &mut registry.request
    }
}

// ============================================================================
// Static registration
// ============================================================================

/// A handler declared with one of the `#[on_*]` attributes.
///
/// Entries are gathered at link time and applied by
/// [`Registry::register_static`].
pub struct StaticHandler {
    pub name: &'static str,
    pub category: EventCategory,
    pub install: fn(&mut Registry),
}

/// Every handler declared with an `#[on_*]` attribute in the final binary.
#[distributed_slice]
pub static STATIC_HANDLERS: [StaticHandler];

// ============================================================================
// Registry
// ============================================================================

/// Handler storage for all three event categories.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    message: HandlerMap<MessageEvent>,
    notice: HandlerMap<NoticeEvent>,
    request: HandlerMap<RequestEvent>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `handler` under `name` in the map for its event type.
    ///
    /// An existing entry with the same name is replaced. Always returns
    /// `true`.
    pub fn register<E: Routable>(&mut self, name: impl Into<String>, handler: Handler<E>) -> bool {
        let name = name.into();
        let category = E::CATEGORY;
        match E::handlers_mut(self).insert(name.clone(), handler) {
            Some(_) => debug!(handler = %name, %category, "Replaced handler"),
            None => debug!(handler = %name, %category, "Registered handler"),
        }
        true
    }

    /// Applies every `#[on_*]` declaration linked into the binary.
    ///
    /// Declarations sharing a name in one category replace each other in
    /// link order, which is unspecified; each replacement is logged as a
    /// warning. Returns the number of declarations applied.
    pub fn register_static(&mut self) -> usize {
        let replaced = self.install_declared(STATIC_HANDLERS.iter());
        info!(count = STATIC_HANDLERS.len(), replaced, "Installed declared handlers");
        STATIC_HANDLERS.len()
    }

    /// Installs `entries` in order and returns how many replaced an
    /// existing entry.
    fn install_declared<'s>(&mut self, entries: impl IntoIterator<Item = &'s StaticHandler>) -> usize {
        let mut replaced = 0;
        for entry in entries {
            if self.has_entry(entry.category, entry.name) {
                warn!(
                    handler = entry.name,
                    category = %entry.category,
                    "Declared handler replaces an existing entry"
                );
                replaced += 1;
            } else {
                debug!(handler = entry.name, category = %entry.category, "Installing declared handler");
            }
            (entry.install)(self);
        }
        replaced
    }

    fn has_entry(&self, category: EventCategory, name: &str) -> bool {
        match category {
            EventCategory::Message => self.message.contains_key(name),
            EventCategory::Notice => self.notice.contains_key(name),
            EventCategory::Request => self.request.contains_key(name),
        }
    }

    /// The handler map for `E`, in dispatch order.
    pub fn handlers<E: Routable>(&self) -> &HandlerMap<E> {
        E::handlers(self)
    }

    pub fn get<E: Routable>(&self, name: &str) -> Option<&Handler<E>> {
        E::handlers(self).get(name)
    }

    pub fn contains<E: Routable>(&self, name: &str) -> bool {
        E::handlers(self).contains_key(name)
    }

    /// Registered names for `E`, in dispatch order. Reserved names are
    /// included.
    pub fn names<E: Routable>(&self) -> impl Iterator<Item = &str> + '_ {
        E::handlers(self).keys().map(String::as_str)
    }

    /// Number of entries in one category.
    pub fn len_of(&self, category: EventCategory) -> usize {
        match category {
            EventCategory::Message => self.message.len(),
            EventCategory::Notice => self.notice.len(),
            EventCategory::Request => self.request.len(),
        }
    }

    /// Number of entries across all categories.
    pub fn len(&self) -> usize {
        self.message.len() + self.notice.len() + self.request.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
