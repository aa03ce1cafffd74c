//! Store events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by callback stores.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `CallbackStore::bind*`, `Lifecycle::stop`, the dispatch loop,
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the per-run fan-out task feeding the `SubscriberSet`, and any
//!   receiver obtained from `CallbackStore::subscribe()`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
