//! Store core: ids, registry, lifecycle and the dispatch loop.
//!
//! The public API from this module is [`CallbackStore`] (plus its builder,
//! configuration and the small value types it hands out).
//!
//! Internal modules:
//! - [`namespace`]: random namespaces and id allocation;
//! - [`registry`]: custom id → callback mapping;
//! - [`lifecycle`]: single-shot state machine, stop token and wait scopes;
//! - [`dispatcher`]: the interaction loop of one `listen` run;
//! - [`store`]: the facade tying them together.

mod builder;
mod config;
mod dispatcher;
mod lifecycle;
mod namespace;
mod registry;
mod store;

pub use builder::StoreBuilder;
pub use config::{DEFAULT_TIMEOUT, StoreConfig};
pub use lifecycle::{LifecycleState, ListenOutcome, StopHandle};
pub use namespace::{IdAllocator, Namespace, SEPARATOR};
pub use store::CallbackStore;
