//! Guard conditions for handlers.
//!
//! A [`Condition`] decides whether a handler takes part in the dispatch of a
//! given event. Conditions are plain predicates over the event; any
//! `Fn(&E) -> bool` closure is one.
//!
//! [`Cond`] is the shareable, type-erased form used by handlers. It supports
//! the usual boolean operators:
//!
//! ```rust,ignore
//! use plume_framework::cond;
//!
//! let guard = cond::group_message() & (cond::startswith("!roll") | cond::to_me());
//! let not_private = !cond::private();
//! ```
//!
//! Ready-made builders live in the [`cond`](crate::cond) module.

use std::fmt;
use std::ops::{BitAnd, BitOr, Not as NotOp};
use std::sync::Arc;

// ============================================================================
// Condition Trait
// ============================================================================

/// A predicate evaluated against an event before a handler runs.
pub trait Condition<E>: Send + Sync {
    /// Returns `true` if the handler should run for `event`.
    fn check(&self, event: &E) -> bool;
}

impl<E, F> Condition<E> for F
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn check(&self, event: &E) -> bool {
        self(event)
    }
}

// ============================================================================
// Cond
// ============================================================================

/// A cheaply clonable, type-erased condition.
pub struct Cond<E>(Arc<dyn Condition<E>>);

impl<E> Cond<E> {
    /// Wraps any condition.
    pub fn new<C>(condition: C) -> Self
    where
        C: Condition<E> + 'static,
    {
        Self(Arc::new(condition))
    }
}

impl<E> Clone for Cond<E> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<E> fmt::Debug for Cond<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cond").finish_non_exhaustive()
    }
}

impl<E> Condition<E> for Cond<E> {
    fn check(&self, event: &E) -> bool {
        self.0.check(event)
    }
}

impl<E: 'static> BitAnd for Cond<E> {
    type Output = Cond<E>;

    fn bitand(self, rhs: Self) -> Self::Output {
        Cond::new(All::new([self, rhs]))
    }
}

impl<E: 'static> BitOr for Cond<E> {
    type Output = Cond<E>;

    fn bitor(self, rhs: Self) -> Self::Output {
        Cond::new(Any::new([self, rhs]))
    }
}

impl<E: 'static> NotOp for Cond<E> {
    type Output = Cond<E>;

    fn not(self) -> Self::Output {
        Cond::new(Not(self))
    }
}

// ============================================================================
// Combinators
// ============================================================================

/// Matches when every inner condition matches.
///
/// An empty `All` matches everything. This is how the guard lists of the
/// `#[on_*]` attributes are combined.
pub struct All<E> {
    conditions: Vec<Cond<E>>,
}

impl<E> All<E> {
    pub fn new(conditions: impl IntoIterator<Item = Cond<E>>) -> Self {
        Self {
            conditions: conditions.into_iter().collect(),
        }
    }

    /// Number of inner conditions.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl<E> Condition<E> for All<E> {
    fn check(&self, event: &E) -> bool {
        self.conditions.iter().all(|c| c.check(event))
    }
}

/// Matches when at least one inner condition matches.
///
/// An empty `Any` matches nothing.
pub struct Any<E> {
    conditions: Vec<Cond<E>>,
}

impl<E> Any<E> {
    pub fn new(conditions: impl IntoIterator<Item = Cond<E>>) -> Self {
        Self {
            conditions: conditions.into_iter().collect(),
        }
    }
}

impl<E> Condition<E> for Any<E> {
    fn check(&self, event: &E) -> bool {
        self.conditions.iter().any(|c| c.check(event))
    }
}

/// Inverts the inner condition.
pub struct Not<C>(pub C);

impl<E, C: Condition<E>> Condition<E> for Not<C> {
    fn check(&self, event: &E) -> bool {
        !self.0.check(event)
    }
}
