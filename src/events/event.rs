//! # Runtime events emitted by callback stores.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Loop events**: listen started/finished, timeout hit, stop requested
//! - **Dispatch events**: interaction rejected, callback starting/finished/failed
//! - **Subscriber events**: overflow and panics inside subscribers
//!
//! The [`Event`] struct carries additional metadata such as the store
//! namespace, custom id, group index, and reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use callback_store::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::CallbackFailed)
//!     .with_store("4f1c2a9e0b7d6c35")
//!     .with_custom_id("4f1c2a9e0b7d6c35:0")
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::CallbackFailed);
//! assert_eq!(ev.custom_id.as_deref(), Some("4f1c2a9e0b7d6c35:0"));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `reason`: `subscriber=<name> info=<panic message>`
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `reason`: `subscriber=<name> reason=<full|closed>`
    SubscriberOverflow,

    // === Registry events ===
    /// A callback was bound to a custom id.
    ///
    /// Sets:
    /// - `store`, `custom_id`
    /// - `index`: position within a group binding (absent for single bindings)
    /// - `reason`: `"rebound"` when an existing binding was overwritten
    CallbackBound,

    // === Loop events ===
    /// `listen` admitted the call and the loop is about to wait.
    ///
    /// Sets:
    /// - `store`
    /// - `timeout_ms`: idle timeout for this run
    ListenStarted,

    /// An admitted interaction was rejected by the check.
    ///
    /// Sets:
    /// - `store`, `custom_id`
    InteractionRejected,

    /// A callback is about to run (shielded from timeout and stop).
    ///
    /// Sets:
    /// - `store`, `custom_id`
    /// - `index`: group index (group bindings only)
    CallbackStarting,

    /// A callback returned `Ok`; the idle deadline was reset.
    ///
    /// Sets:
    /// - `store`, `custom_id`
    /// - `index`: group index (group bindings only)
    CallbackFinished,

    /// A callback returned an error; the loop aborts.
    ///
    /// Sets:
    /// - `store`, `custom_id`
    /// - `index`: group index (group bindings only)
    /// - `reason`: error message
    CallbackFailed,

    /// `stop()` was called for the first time.
    ///
    /// Sets:
    /// - `store`
    StopRequested,

    /// The idle deadline elapsed while waiting for an interaction.
    ///
    /// Sets:
    /// - `store`
    /// - `timeout_ms`: idle timeout that elapsed
    TimeoutHit,

    /// The loop exited. Always the last event of a run.
    ///
    /// Sets:
    /// - `store`
    /// - `reason`: `"timeout"`, `"stopped"` or the error label
    ListenFinished,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Namespace of the emitting store.
    pub store: Option<Arc<str>>,
    /// Custom id involved, if any.
    pub custom_id: Option<Arc<str>>,
    /// Group index for group bindings.
    pub index: Option<u32>,
    /// Idle timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            store: None,
            custom_id: None,
            index: None,
            timeout_ms: None,
            reason: None,
        }
    }

    /// Attaches the store namespace.
    #[inline]
    pub fn with_store(mut self, store: impl Into<Arc<str>>) -> Self {
        self.store = Some(store.into());
        self
    }

    /// Attaches a custom id.
    #[inline]
    pub fn with_custom_id(mut self, custom_id: impl Into<Arc<str>>) -> Self {
        self.custom_id = Some(custom_id.into());
        self
    }

    /// Attaches a group index (saturates at `u32::MAX`).
    #[inline]
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(u32::try_from(index).unwrap_or(u32::MAX));
        self
    }

    /// Attaches a group index if present.
    #[inline]
    pub fn with_index_opt(self, index: Option<usize>) -> Self {
        match index {
            Some(i) => self.with_index(i),
            None => self,
        }
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_reason(format!("subscriber={subscriber} info={info}"))
    }

    /// True for the terminal event of a run.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, EventKind::ListenFinished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::ListenStarted);
        let b = Event::new(EventKind::ListenStarted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_timeout_saturates() {
        let ev = Event::new(EventKind::TimeoutHit).with_timeout(Duration::from_secs(u64::MAX));
        assert_eq!(ev.timeout_ms, Some(u32::MAX));
    }

    #[test]
    fn test_index_opt() {
        let ev = Event::new(EventKind::CallbackStarting).with_index_opt(Some(2));
        assert_eq!(ev.index, Some(2));
        let ev = Event::new(EventKind::CallbackStarting).with_index_opt(None);
        assert_eq!(ev.index, None);
    }
}
