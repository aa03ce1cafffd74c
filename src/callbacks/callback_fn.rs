//! # Function-backed callbacks (`CallbackFn`, `GroupFn`)
//!
//! [`CallbackFn`] wraps a closure `F: Fn(I) -> Fut` and [`GroupFn`] wraps
//! `F: Fn(usize, I) -> Fut`, producing a fresh future per dispatch.
//!
//! ## Example
//! ```rust
//! use callback_store::{CallbackError, CallbackFn, GroupFn};
//!
//! struct Click { id: String }
//!
//! let single = CallbackFn::new(|click: Click| async move {
//!     println!("clicked {}", click.id);
//!     Ok::<_, CallbackError>(())
//! });
//!
//! let group = GroupFn::new(|index: usize, _click: Click| async move {
//!     println!("option #{index}");
//!     Ok::<_, CallbackError>(())
//! });
//! # let _ = (single, group);
//! ```

use std::fmt;
use std::future::Future;

use crate::callbacks::callback::{BoxCallbackFuture, Callback, GroupCallback};
use crate::error::CallbackError;

/// Function-backed single-component callback.
pub struct CallbackFn<F> {
    f: F,
}

impl<F> CallbackFn<F> {
    /// Wraps `f` as a [`Callback`].
    pub fn new<I, Fut>(f: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CallbackError>> + Send + 'static,
    {
        Self { f }
    }
}

impl<F> fmt::Debug for CallbackFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackFn").finish_non_exhaustive()
    }
}

impl<I, F, Fut> Callback<I> for CallbackFn<F>
where
    F: Fn(I) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), CallbackError>> + Send + 'static,
{
    fn call(&self, inter: I) -> BoxCallbackFuture {
        Box::pin((self.f)(inter))
    }
}

/// Function-backed group callback.
pub struct GroupFn<F> {
    f: F,
}

impl<F> GroupFn<F> {
    /// Wraps `f` as a [`GroupCallback`].
    pub fn new<I, Fut>(f: F) -> Self
    where
        F: Fn(usize, I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CallbackError>> + Send + 'static,
    {
        Self { f }
    }
}

impl<F> fmt::Debug for GroupFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupFn").finish_non_exhaustive()
    }
}

impl<I, F, Fut> GroupCallback<I> for GroupFn<F>
where
    F: Fn(usize, I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), CallbackError>> + Send + 'static,
{
    fn call(&self, index: usize, inter: I) -> BoxCallbackFuture {
        Box::pin((self.f)(index, inter))
    }
}
