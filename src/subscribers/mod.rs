//! # Event subscribers for callback stores.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and (behind the `logging` feature) the built-in [`LogWriter`].
//!
//! ## Architecture
//! ```text
//! Event flow (per listen run):
//!   store ── publish(Event) ──► Bus ──► fan-out task ──► SubscriberSet::emit(&Event)
//!                                                            │
//!                                                  ┌─────────┼─────────┐
//!                                                  ▼         ▼         ▼
//!                                              LogWriter  Metrics   Custom ...
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use callback_store::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct RejectCounter;
//!
//! #[async_trait]
//! impl Subscribe for RejectCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::InteractionRejected {
//!             // increment counter
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "reject-counter"
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
