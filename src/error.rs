//! Error types used by the callback store and bound callbacks.
//!
//! This module defines two main error enums:
//!
//! - [`StoreError`]: errors raised by the dispatch loop itself.
//! - [`CallbackError`]: errors raised by individual callback executions.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics.
//! Rejection by a [`Check`](crate::Check) is **not** an error: the interaction is dropped and
//! the loop keeps waiting.

use thiserror::Error;

use crate::core::LifecycleState;

/// # Errors produced by the dispatch loop.
///
/// Every variant is surfaced to the caller of [`CallbackStore::listen`](crate::CallbackStore::listen).
/// The loop never retries internally.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StoreError {
    /// `listen` was called on a store that already ran (or is running) its loop.
    ///
    /// Stores are single-shot; build a new one per session.
    #[error("store is not reusable: listen already called (state: {state:?})")]
    AlreadyListening {
        /// Lifecycle state observed when the call was rejected.
        state: LifecycleState,
    },

    /// An admitted interaction had no callback bound at dispatch time.
    #[error("no callback bound for admitted custom id {custom_id:?}")]
    UnboundId {
        /// The custom id carried by the interaction.
        custom_id: String,
    },

    /// A bound callback failed; the loop was aborted.
    #[error("callback for {custom_id:?} failed: {source}")]
    Callback {
        /// The custom id whose callback failed.
        custom_id: String,
        /// The error returned by the callback.
        #[source]
        source: CallbackError,
    },

    /// The listener reported that no further interactions will arrive.
    #[error("interaction source closed")]
    SourceClosed,
}

impl StoreError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use callback_store::{LifecycleState, StoreError};
    ///
    /// let err = StoreError::AlreadyListening { state: LifecycleState::Stopped };
    /// assert_eq!(err.as_label(), "store_already_listening");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            StoreError::AlreadyListening { .. } => "store_already_listening",
            StoreError::UnboundId { .. } => "store_unbound_id",
            StoreError::Callback { .. } => "store_callback_failed",
            StoreError::SourceClosed => "store_source_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            StoreError::AlreadyListening { state } => format!("already listening: {state:?}"),
            StoreError::UnboundId { custom_id } => format!("unbound id: {custom_id}"),
            StoreError::Callback { custom_id, source } => {
                format!("callback {custom_id}: {}", source.as_message())
            }
            StoreError::SourceClosed => "source closed".to_string(),
        }
    }

    /// True for errors caused by misuse of the store API rather than by a callback.
    pub fn is_usage(&self) -> bool {
        matches!(self, StoreError::AlreadyListening { .. })
    }
}

/// # Errors produced by callback execution.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CallbackError {
    /// Callback failed with a plain message.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Callback failed with an arbitrary error value.
    #[error(transparent)]
    Boxed(#[from] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl CallbackError {
    /// Creates a [`CallbackError::Fail`] from anything displayable.
    pub fn fail(error: impl Into<String>) -> Self {
        CallbackError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CallbackError::Fail { .. } => "callback_failed",
            CallbackError::Boxed(_) => "callback_error",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            CallbackError::Fail { error } => format!("error: {error}"),
            CallbackError::Boxed(e) => format!("error: {e}"),
        }
    }
}
