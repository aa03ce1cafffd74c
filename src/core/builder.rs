//! # StoreBuilder: assembles a [`CallbackStore`] from a listener and options.
//!
//! Defaults: random namespace, [`AllowAll`](crate::AllowAll) check,
//! [`StoreConfig::default`] and no subscribers.

use std::sync::Arc;
use std::time::Duration;

use crate::callbacks::Check;
use crate::core::{config::StoreConfig, namespace::Namespace, store::CallbackStore};
use crate::interaction::Interaction;
use crate::listener::Listener;
use crate::subscribers::Subscribe;

/// Builder for constructing a [`CallbackStore`] with optional features.
pub struct StoreBuilder<I: Interaction> {
    cfg: StoreConfig,
    listener: Box<dyn Listener<I>>,
    check: Option<Box<dyn Check<I>>>,
    namespace: Option<Namespace>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl<I: Interaction> StoreBuilder<I> {
    pub(crate) fn new(listener: Box<dyn Listener<I>>) -> Self {
        Self {
            cfg: StoreConfig::default(),
            listener,
            check: None,
            namespace: None,
            subscribers: Vec::new(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, cfg: StoreConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the idle timeout used by [`CallbackStore::listen`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.cfg.timeout = timeout;
        self
    }

    /// Sets the check run before every dispatch (default: allow all).
    pub fn check<C: Check<I>>(mut self, check: C) -> Self {
        self.check = Some(Box::new(check));
        self
    }

    /// Uses a fixed namespace instead of a random one.
    ///
    /// Two stores sharing a listener source must not share a namespace.
    pub fn namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = Some(namespace);
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive store events (bindings, dispatches, rejections,
    /// end of run) through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the store.
    pub fn build(self) -> CallbackStore<I> {
        CallbackStore::from_parts(
            self.cfg,
            self.namespace.unwrap_or_else(Namespace::random),
            self.listener,
            self.check,
            self.subscribers,
        )
    }
}

impl<I: Interaction> std::fmt::Debug for StoreBuilder<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreBuilder")
            .field("cfg", &self.cfg)
            .field("namespace", &self.namespace)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
