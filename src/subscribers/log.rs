//! # LogWriter: event logger
//!
//! A minimal subscriber that writes incoming [`Event`]s through `tracing`.
//! Install any `tracing` subscriber (e.g. `tracing_subscriber::fmt`) to see them.
//!
//! ## Example output
//! ```text
//! DEBUG callback_store: listen started store="4f1c…" timeout_ms=180000
//! DEBUG callback_store: callback starting store="4f1c…" custom_id="4f1c…:0" index=None
//! INFO  callback_store: interaction rejected store="4f1c…" custom_id="4f1c…:1"
//! WARN  callback_store: callback failed store="4f1c…" custom_id="4f1c…:1" reason="boom"
//! INFO  callback_store: listen finished store="4f1c…" reason="timeout"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default, Debug)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let store = e.store.as_deref().unwrap_or("-");
        let custom_id = e.custom_id.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::CallbackBound => {
                tracing::trace!(store, custom_id, index = ?e.index, reason, "callback bound");
            }
            EventKind::ListenStarted => {
                tracing::debug!(store, timeout_ms = ?e.timeout_ms, "listen started");
            }
            EventKind::InteractionRejected => {
                tracing::info!(store, custom_id, "interaction rejected");
            }
            EventKind::CallbackStarting => {
                tracing::debug!(store, custom_id, index = ?e.index, "callback starting");
            }
            EventKind::CallbackFinished => {
                tracing::debug!(store, custom_id, index = ?e.index, "callback finished");
            }
            EventKind::CallbackFailed => {
                tracing::warn!(store, custom_id, index = ?e.index, reason, "callback failed");
            }
            EventKind::StopRequested => {
                tracing::debug!(store, "stop requested");
            }
            EventKind::TimeoutHit => {
                tracing::debug!(store, timeout_ms = ?e.timeout_ms, "timeout hit");
            }
            EventKind::ListenFinished => {
                tracing::info!(store, reason, "listen finished");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(reason, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(reason, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
