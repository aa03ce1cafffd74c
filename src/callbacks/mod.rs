//! # Callback and check abstractions.
//!
//! This module provides the application-facing handler types:
//! - [`Callback`] / [`GroupCallback`] - traits for async interaction handlers
//! - [`CallbackFn`] / [`GroupFn`] - closure-backed implementations
//! - [`Check`] - authorization predicate applied before dispatch
//! - [`AllowAll`] / [`CheckFn`] - default and closure-backed checks

mod callback;
mod callback_fn;
mod check;

pub use callback::{BoxCallbackFuture, Callback, GroupCallback};
pub use callback_fn::{CallbackFn, GroupFn};
pub use check::{AllowAll, Check, CheckFn};
