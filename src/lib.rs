//! # callback-store
//!
//! **callback-store** binds UI component ids to async callbacks for the
//! lifetime of one interactive session (a menu, a paginator, a form).
//!
//! A [`CallbackStore`] hands out namespaced custom ids, remembers which
//! callback belongs to which id, and then runs a single dispatch loop that
//! feeds incoming interactions to their callbacks until the session goes idle
//! or is stopped.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌──────────────┐  make_id / bind / bind_many
//!   │  application │──────────────────────────────┐
//!   └──────┬───────┘                              ▼
//!          │ listen()            ┌───────────────────────────────────────┐
//!          └────────────────────►│  CallbackStore                        │
//!                                │  - IdAllocator  (random namespace)    │
//!                                │  - CallbackRegistry (id → callback)   │
//!                                │  - Lifecycle (single-shot, stop token)│
//!                                │  - Bus (broadcast events)             │
//!                                └──────┬──────────────────────┬─────────┘
//!                                       ▼                      │
//!   ┌──────────────┐  next(admit)  ┌────────────┐              │
//!   │   Listener   │◄──────────────│ Dispatcher │              │
//!   │ (feed, gw…)  │──────────────►│ (one run)  │              │
//!   └──────────────┘  interaction  └─────┬──────┘              │
//!                                        ▼                     │
//!                                  Check ─► Callback           │
//!                                                              ▼
//!                              Bus ─► fan-out ─► SubscriberSet ─► LogWriter / custom
//! ```
//!
//! ### Dispatch loop
//! ```text
//! deadline = now + timeout
//! loop {
//!   ├─► wait for the next interaction whose id is bound   (interruptible)
//!   │       ├─ stop requested    ─► return Stopped
//!   │       └─ deadline elapsed  ─► return Timeout
//!   ├─► check(&interaction)                               (shielded)
//!   │       └─ false ─► drop it, keep the deadline
//!   ├─► callback(interaction).await                       (shielded)
//!   │       └─ Err ─► return Err(StoreError::Callback)
//!   └─► deadline = now + timeout
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                          |
//! |-------------------|---------------------------------------------------------------|---------------------------------------------|
//! | **Store**         | Ids, bindings and the listen loop.                            | [`CallbackStore`], [`StoreBuilder`]         |
//! | **Callbacks**     | Async handlers for one component or a group of components.   | [`Callback`], [`GroupCallback`], [`CallbackFn`], [`GroupFn`] |
//! | **Checks**        | Pre-dispatch authorization.                                   | [`Check`], [`CheckFn`], [`AllowAll`]        |
//! | **Sources**       | Where interactions come from.                                 | [`Listener`], [`InteractionFeed`]           |
//! | **Subscriber API**| Hook into store events (logging, metrics, custom).            | [`Subscribe`], [`Event`]                    |
//! | **Errors**        | Typed errors for the loop and for callbacks.                  | [`StoreError`], [`CallbackError`]           |
//! | **Configuration** | Idle timeout and bus sizing.                                  | [`StoreConfig`]                             |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] subscriber writing through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use callback_store::{CallbackError, CallbackStore, GroupFn, InteractionFeed, Interaction};
//!
//! #[derive(Clone)]
//! struct Click { custom_id: String }
//!
//! impl Interaction for Click {
//!     fn custom_id(&self) -> &str { &self.custom_id }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let feed = InteractionFeed::new(16);
//!     let store = CallbackStore::builder(feed.listener())
//!         .timeout(Duration::from_millis(200))
//!         .build();
//!
//!     // one callback shared by three option buttons
//!     let options = store.bind_many(
//!         [store.make_id(), store.make_id(), store.make_id()],
//!         GroupFn::new(|index: usize, _click: Click| async move {
//!             println!("picked option #{index}");
//!             Ok::<_, CallbackError>(())
//!         }),
//!     );
//!
//!     let publisher = feed.clone();
//!     tokio::spawn(async move {
//!         publisher.publish(Click { custom_id: options[2].clone() });
//!     });
//!
//!     // nobody clicks again, so the session ends idle
//!     let outcome = store.listen().await?;
//!     assert!(outcome.is_timeout());
//!     Ok(())
//! }
//! ```
mod callbacks;
mod core;
mod error;
mod events;
mod interaction;
mod listener;
mod subscribers;

// ---- Public re-exports ----

pub use callbacks::{
    AllowAll, BoxCallbackFuture, Callback, CallbackFn, Check, CheckFn, GroupCallback, GroupFn,
};
pub use core::{
    CallbackStore, DEFAULT_TIMEOUT, IdAllocator, LifecycleState, ListenOutcome, Namespace,
    SEPARATOR, StopHandle, StoreBuilder, StoreConfig,
};
pub use error::{CallbackError, StoreError};
pub use events::{Bus, Event, EventKind};
pub use interaction::{HasCustomId, Interaction};
pub use listener::{Admission, FeedListener, InteractionFeed, Listener};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
