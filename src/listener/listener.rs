//! # Interaction listener contract.
//!
//! The host platform's event delivery is opaque to the store. It is reached
//! through [`Listener::next`], which waits until an interaction satisfying the
//! admission predicate arrives.
//!
//! ## Rules
//! - The admission predicate is the store's membership test: only
//!   interactions whose custom id is bound pass it. Everything else must be
//!   left for other consumers of the same source.
//! - `next` **must be cancel-safe**: the dispatch loop drops the pending future
//!   when the idle deadline expires or a stop is requested, and no admitted
//!   interaction may be lost by that.
//! - Returning `None` means the source is closed for good.

use async_trait::async_trait;

use crate::interaction::Interaction;

/// Admission predicate passed to [`Listener::next`].
pub type Admission<'a, I> = &'a (dyn Fn(&I) -> bool + Send + Sync);

/// Async source of interactions.
#[async_trait]
pub trait Listener<I: Interaction>: Send + Sync + 'static {
    /// Waits for the next interaction accepted by `admit`.
    async fn next(&self, admit: Admission<'_, I>) -> Option<I>;
}
