//! # Store configuration.
//!
//! Provides [`StoreConfig`] centralized settings for one callback store.
//!
//! ## Sentinel values
//! - `timeout = 0s` → the first wait times out immediately (no "infinite" sentinel)
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

/// Default idle timeout: three minutes since the last accepted interaction.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// Configuration for a [`CallbackStore`](crate::CallbackStore).
///
/// ## Field semantics
/// - `timeout`: idle window used by [`listen`](crate::CallbackStore::listen);
///   reset only after an accepted interaction's callback completes.
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
///
/// # Example
/// ```
/// use std::time::Duration;
/// use callback_store::StoreConfig;
///
/// let mut cfg = StoreConfig::default();
/// cfg.timeout = Duration::from_secs(30);
/// assert_eq!(cfg.bus_capacity_clamped(), 1024);
/// ```
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Idle timeout since the last accepted interaction.
    pub timeout: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages will
    /// receive `Lagged` and skip older items.
    pub bus_capacity: usize,
}

impl StoreConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for StoreConfig {
    /// Default configuration:
    ///
    /// - `timeout = 180s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            bus_capacity: 1024,
        }
    }
}
