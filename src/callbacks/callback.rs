//! # Callback abstractions.
//!
//! A callback is an async unit invoked by the dispatch loop with the
//! interaction that matched its custom id.
//!
//! - [`Callback`] is bound to a single component.
//! - [`GroupCallback`] is shared by several components and also receives the
//!   ordinal index of the component that fired.
//!
//! Both return a boxed `'static` future so the loop can await it without
//! holding any lock on the registry.

use std::future::Future;
use std::pin::Pin;

use crate::error::CallbackError;

/// Boxed future returned by callbacks.
pub type BoxCallbackFuture = Pin<Box<dyn Future<Output = Result<(), CallbackError>> + Send + 'static>>;

/// # Callback bound to one component.
///
/// Each [`call`](Callback::call) must produce a **new** future. Shared state
/// belongs in an explicit `Arc<...>` captured by the implementation.
pub trait Callback<I>: Send + Sync + 'static {
    /// Creates the future handling `inter`.
    fn call(&self, inter: I) -> BoxCallbackFuture;
}

/// # Callback shared by a group of components.
///
/// `index` is the 0-based position of the triggering component in the list
/// passed to [`CallbackStore::bind_many`](crate::CallbackStore::bind_many).
pub trait GroupCallback<I>: Send + Sync + 'static {
    /// Creates the future handling `inter` fired by the component at `index`.
    fn call(&self, index: usize, inter: I) -> BoxCallbackFuture;
}
