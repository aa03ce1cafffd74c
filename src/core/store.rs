//! # CallbackStore: registry, id allocation and the listen entry point.
//!
//! The [`CallbackStore`] owns everything one UI session needs: a random
//! namespace for its custom ids, the id → callback mapping, the lifecycle
//! controller and the event bus. A store runs its loop **once**.
//!
//! ## High-level architecture
//! ```text
//! make_id()/bind()/bind_many()  ──► IdAllocator + CallbackRegistry   (setup phase)
//!
//! listen()/listen_for(timeout):
//!   lifecycle.begin()            ─► Err(AlreadyListening) if reused
//!   spawn_fanout()               ─► Bus ─► SubscriberSet (only with subscribers)
//!   publish ListenStarted
//!   Dispatcher::run(timeout)     ─► Timeout | Stopped | Err(..)
//!   lifecycle.finish(state)      ─► publish ListenFinished (once per run)
//!   await fan-out                ─► subscribers drained when listen returns
//!
//! stop() / StopHandle::stop()    ─► stop token cancelled (idempotent)
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use callback_store::{CallbackError, CallbackFn, CallbackStore, InteractionFeed, Interaction};
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
//!     let store = CallbackStore::new(feed.listener());
//!
//!     let stop = store.stop_handle();
//!     let quit = store.bind(store.make_id(), CallbackFn::new(move |_click: Click| {
//!         let stop = stop.clone();
//!         async move {
//!             stop.stop();
//!             Ok::<_, CallbackError>(())
//!         }
//!     }));
//!
//!     let publisher = feed.clone();
//!     tokio::spawn(async move {
//!         tokio::time::sleep(Duration::from_millis(10)).await;
//!         publisher.publish(Click { custom_id: quit });
//!     });
//!
//!     let outcome = store.listen_for(Duration::from_secs(5)).await?;
//!     assert!(outcome.is_stopped());
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::callbacks::{AllowAll, Callback, Check, GroupCallback};
use crate::core::builder::StoreBuilder;
use crate::core::config::StoreConfig;
use crate::core::dispatcher::Dispatcher;
use crate::core::lifecycle::{Lifecycle, LifecycleState, ListenOutcome, StopHandle};
use crate::core::namespace::{IdAllocator, Namespace};
use crate::core::registry::{Binding, CallbackRegistry};
use crate::error::StoreError;
use crate::events::{Bus, Event, EventKind};
use crate::interaction::{HasCustomId, Interaction};
use crate::listener::Listener;
use crate::subscribers::{Subscribe, SubscriberSet};

/// Registry and dispatch loop for the callbacks of one UI session.
///
/// Custom ids of bound components must not change afterwards: the store
/// routes interactions by the id seen at bind time, so mutable state cannot
/// live inside the id.
pub struct CallbackStore<I: Interaction> {
    cfg: StoreConfig,
    ids: IdAllocator,
    registry: CallbackRegistry<I>,
    lifecycle: Arc<Lifecycle>,
    listener: Box<dyn Listener<I>>,
    check: Box<dyn Check<I>>,
    bus: Bus,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl<I: Interaction> CallbackStore<I> {
    /// Creates a store with a random namespace, [`AllowAll`] check and default config.
    pub fn new(listener: impl Listener<I>) -> Self {
        Self::builder(listener).build()
    }

    /// Starts a [`StoreBuilder`] for the given listener.
    pub fn builder<L: Listener<I>>(listener: L) -> StoreBuilder<I> {
        StoreBuilder::new(Box::new(listener))
    }

    pub(crate) fn from_parts(
        cfg: StoreConfig,
        namespace: Namespace,
        listener: Box<dyn Listener<I>>,
        check: Option<Box<dyn Check<I>>>,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        let lifecycle = Arc::new(Lifecycle::new(namespace.clone(), bus.clone()));
        Self {
            cfg,
            ids: IdAllocator::new(namespace),
            registry: CallbackRegistry::new(),
            lifecycle,
            listener,
            check: check.unwrap_or_else(|| Box::new(AllowAll)),
            bus,
            subscribers,
        }
    }

    // ---------------------------
    // Ids
    // ---------------------------

    /// Namespace prefixing every id of this store.
    pub fn namespace(&self) -> &Namespace {
        self.ids.namespace()
    }

    /// Returns a fresh anonymous id: `namespace:N`.
    pub fn make_id(&self) -> String {
        self.ids.make_id()
    }

    /// Returns `namespace:part1:part2…`; with no parts, same as [`make_id`](Self::make_id).
    pub fn make_id_with<P, S>(&self, parts: P) -> String
    where
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ids.make_id_with(parts)
    }

    /// Removes this store's `namespace:` prefix; foreign ids are returned unchanged.
    pub fn strip_id<'a>(&self, custom_id: &'a str) -> &'a str {
        self.ids.strip_id(custom_id)
    }

    /// [`strip_id`](Self::strip_id) applied to a component's id.
    pub fn strip_component_id<'a, C: HasCustomId + ?Sized>(&self, component: &'a C) -> &'a str {
        self.ids.strip_id(component.custom_id())
    }

    /// True if `custom_id` carries this store's namespace.
    pub fn owns_id(&self, custom_id: &str) -> bool {
        self.ids.owns_id(custom_id)
    }

    // ---------------------------
    // Binding
    // ---------------------------

    /// Binds `callback` to the component's id and hands the component back.
    ///
    /// Rebinding an id silently replaces the previous callback.
    pub fn bind<C, F>(&self, component: C, callback: F) -> C
    where
        C: HasCustomId,
        F: Callback<I>,
    {
        self.bind_id(component.custom_id(), callback);
        component
    }

    /// Binds `callback` to a raw custom id.
    pub fn bind_id<F: Callback<I>>(&self, custom_id: impl Into<String>, callback: F) {
        let custom_id = custom_id.into();
        self.insert(custom_id, Binding::Single(Arc::new(callback)));
    }

    /// Binds one shared `callback` to every component, in order.
    ///
    /// When component `k` fires, the callback receives `k` as its index.
    pub fn bind_many<C, It, F>(&self, components: It, callback: F) -> Vec<C>
    where
        C: HasCustomId,
        It: IntoIterator<Item = C>,
        F: GroupCallback<I>,
    {
        let callback: Arc<dyn GroupCallback<I>> = Arc::new(callback);
        components
            .into_iter()
            .enumerate()
            .map(|(index, component)| {
                self.insert(
                    component.custom_id().to_owned(),
                    Binding::Grouped {
                        callback: Arc::clone(&callback),
                        index,
                    },
                );
                component
            })
            .collect()
    }

    fn insert(&self, custom_id: String, binding: Binding<I>) {
        let index = binding.index();
        let mut ev = Event::new(EventKind::CallbackBound)
            .with_store(self.namespace().shared())
            .with_custom_id(custom_id.as_str())
            .with_index_opt(index);
        if self.registry.insert(custom_id, binding) {
            ev = ev.with_reason("rebound");
        }
        self.bus.publish(ev);
    }

    /// True if a callback is bound to `custom_id`.
    pub fn is_bound(&self, custom_id: &str) -> bool {
        self.registry.contains(custom_id)
    }

    /// Number of bound ids.
    pub fn bound_count(&self) -> usize {
        self.registry.len()
    }

    /// Sorted list of bound ids.
    pub fn bound_ids(&self) -> Vec<String> {
        self.registry.ids()
    }

    // ---------------------------
    // Lifecycle
    // ---------------------------

    /// Runs the loop with the configured idle timeout ([`StoreConfig::timeout`]).
    pub async fn listen(&self) -> Result<ListenOutcome, StoreError> {
        self.listen_for(self.cfg.timeout).await
    }

    /// Runs the loop until `timeout` passes without an accepted interaction,
    /// or until [`stop`](Self::stop) is called.
    ///
    /// ### Errors
    /// - [`StoreError::AlreadyListening`] if the store already ran (stores are single-shot)
    /// - [`StoreError::Callback`] if a callback failed (the loop is aborted)
    /// - [`StoreError::UnboundId`] if an admitted id had no binding at dispatch time
    /// - [`StoreError::SourceClosed`] if the listener ran dry
    pub async fn listen_for(&self, timeout: Duration) -> Result<ListenOutcome, StoreError> {
        self.lifecycle.begin()?;
        let _guard = AbortGuard {
            lifecycle: &self.lifecycle,
        };
        let fanout = self.spawn_fanout();

        self.bus.publish(
            Event::new(EventKind::ListenStarted)
                .with_store(self.namespace().shared())
                .with_timeout(timeout),
        );

        let dispatcher = Dispatcher {
            namespace: self.ids.namespace(),
            registry: &self.registry,
            lifecycle: &self.lifecycle,
            listener: self.listener.as_ref(),
            check: self.check.as_ref(),
            bus: &self.bus,
        };
        let res = dispatcher.run(timeout).await;

        let (state, reason) = match &res {
            Ok(outcome) => (LifecycleState::from(*outcome), outcome.as_label()),
            Err(e) => (LifecycleState::Aborted, e.as_label()),
        };
        self.lifecycle.finish(state, reason);

        if let Some(fanout) = fanout {
            let _ = fanout.await;
        }
        res
    }

    /// Requests the loop to stop. Idempotent; safe to call from a callback.
    ///
    /// A running callback completes first; `listen` then returns
    /// [`ListenOutcome::Stopped`]. Calling it before `listen` makes the run
    /// end immediately.
    pub fn stop(&self) {
        self.lifecycle.stop();
    }

    /// Cloneable handle for stopping the loop from callbacks or other tasks.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle::new(Arc::clone(&self.lifecycle))
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.cfg
    }

    /// Raw receiver for this store's events (only events sent after the call).
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Subscribes to the bus and forwards events to the subscriber set until
    /// the run's terminal event, then drains the subscriber workers.
    fn spawn_fanout(&self) -> Option<JoinHandle<()>> {
        if self.subscribers.is_empty() {
            return None;
        }
        let mut rx = self.bus.subscribe();
        let set = SubscriberSet::new(self.subscribers.clone(), self.bus.clone());

        Some(tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        set.emit(&ev);
                        if ev.is_terminal() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            set.shutdown().await;
        }))
    }
}

impl<I: Interaction> std::fmt::Debug for CallbackStore<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackStore")
            .field("namespace", self.namespace())
            .field("state", &self.state())
            .field("bound", &self.registry.len())
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

/// Marks the run `Aborted` if `listen_for` unwinds or its future is dropped mid-run.
///
/// The transition publishes `ListenFinished` (reason `aborted`), which also
/// ends the fan-out task. After a regular `finish` the drop is a no-op.
struct AbortGuard<'a> {
    lifecycle: &'a Lifecycle,
}

impl Drop for AbortGuard<'_> {
    fn drop(&mut self) {
        self.lifecycle.finish(LifecycleState::Aborted, "aborted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::{CallbackFn, CheckFn, GroupFn};
    use crate::error::CallbackError;
    use crate::listener::InteractionFeed;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::{Instant, sleep};

    #[derive(Clone, Debug)]
    struct Click {
        id: String,
        user: u64,
    }

    impl Interaction for Click {
        fn custom_id(&self) -> &str {
            &self.id
        }
    }

    fn click(id: &str) -> Click {
        Click {
            id: id.to_owned(),
            user: 1,
        }
    }

    fn noop() -> impl Callback<Click> {
        CallbackFn::new(|_: Click| std::future::ready(Ok::<_, CallbackError>(())))
    }

    /// Publishes `inter` on `feed` after `delay` (paused clock friendly).
    fn publish_after(feed: &InteractionFeed<Click>, delay: Duration, inter: Click) {
        let feed = feed.clone();
        tokio::spawn(async move {
            sleep(delay).await;
            feed.publish(inter);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_without_interactions() {
        let feed = InteractionFeed::<Click>::new(8);
        let store = CallbackStore::new(feed.listener());
        store.bind(store.make_id(), noop());

        let start = Instant::now();
        let outcome = store.listen_for(Duration::from_secs(1)).await.unwrap();

        assert_eq!(outcome, ListenOutcome::Timeout);
        assert!(start.elapsed() >= Duration::from_secs(1));
        assert!(start.elapsed() < Duration::from_millis(1010));
        assert_eq!(store.state(), LifecycleState::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_from_callback_waits_for_completion() {
        let feed = InteractionFeed::new(8);
        let store = CallbackStore::new(feed.listener());
        let finished = Arc::new(AtomicUsize::new(0));

        let stop = store.stop_handle();
        let done = finished.clone();
        let id = store.bind(
            "abc".to_string(),
            CallbackFn::new(move |_: Click| {
                let stop = stop.clone();
                let done = done.clone();
                async move {
                    stop.stop();
                    // keep running well past the idle timeout
                    sleep(Duration::from_secs(5)).await;
                    done.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, CallbackError>(())
                }
            }),
        );
        publish_after(&feed, Duration::from_millis(100), click(&id));

        let outcome = store.listen_for(Duration::from_secs(1)).await.unwrap();
        assert_eq!(outcome, ListenOutcome::Stopped);
        assert_eq!(finished.load(Ordering::SeqCst), 1);
        assert_eq!(store.state(), LifecycleState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_interaction_does_not_reset_deadline() {
        let feed = InteractionFeed::new(8);
        let store = CallbackStore::builder(feed.listener())
            .check(CheckFn::new(|c: &Click| {
                let allowed = c.user == 1;
                async move { allowed }
            }))
            .build();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let id = store.bind(
            store.make_id(),
            CallbackFn::new(move |_: Click| {
                seen.fetch_add(1, Ordering::SeqCst);
                std::future::ready(Ok::<_, CallbackError>(()))
            }),
        );

        let mut intruder = click(&id);
        intruder.user = 2;
        publish_after(&feed, Duration::from_millis(900), intruder);
        publish_after(&feed, Duration::from_millis(1500), click(&id));

        let start = Instant::now();
        let outcome = store.listen_for(Duration::from_secs(1)).await.unwrap();

        assert_eq!(outcome, ListenOutcome::Timeout);
        assert!(start.elapsed() < Duration::from_millis(1100));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_accepted_interaction_resets_deadline() {
        let feed = InteractionFeed::new(8);
        let store = CallbackStore::new(feed.listener());
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let id = store.bind(
            store.make_id(),
            CallbackFn::new(move |_: Click| {
                seen.fetch_add(1, Ordering::SeqCst);
                std::future::ready(Ok::<_, CallbackError>(()))
            }),
        );

        publish_after(&feed, Duration::from_millis(900), click(&id));
        publish_after(&feed, Duration::from_millis(1500), click(&id));

        let start = Instant::now();
        let outcome = store.listen_for(Duration::from_secs(1)).await.unwrap();

        assert_eq!(outcome, ListenOutcome::Timeout);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        // last accepted at 1.5s, so the run ends at 2.5s
        assert!(start.elapsed() >= Duration::from_millis(2500));
        assert!(start.elapsed() < Duration::from_millis(2600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_outlives_deadline() {
        let feed = InteractionFeed::new(8);
        let store = CallbackStore::new(feed.listener());
        let finished = Arc::new(AtomicUsize::new(0));
        let done = finished.clone();
        let id = store.bind(
            store.make_id(),
            CallbackFn::new(move |_: Click| {
                let done = done.clone();
                async move {
                    sleep(Duration::from_secs(3)).await;
                    done.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, CallbackError>(())
                }
            }),
        );
        publish_after(&feed, Duration::from_millis(500), click(&id));

        let start = Instant::now();
        let outcome = store.listen_for(Duration::from_secs(1)).await.unwrap();

        assert_eq!(outcome, ListenOutcome::Timeout);
        assert_eq!(finished.load(Ordering::SeqCst), 1);
        // callback ends at 3.5s, fresh deadline at 4.5s
        assert!(start.elapsed() >= Duration::from_millis(4500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bind_many_passes_index() {
        let feed = InteractionFeed::new(8);
        let store = CallbackStore::new(feed.listener());
        let hits = Arc::new(Mutex::new(Vec::new()));
        let seen = hits.clone();
        let stop = store.stop_handle();

        let selects = store.bind_many(
            [store.make_id(), store.make_id(), store.make_id()],
            GroupFn::new(move |index: usize, _: Click| {
                seen.lock().unwrap().push(index);
                stop.stop();
                std::future::ready(Ok::<_, CallbackError>(()))
            }),
        );
        assert_eq!(selects.len(), 3);
        publish_after(&feed, Duration::from_millis(10), click(&selects[1]));

        let outcome = store.listen_for(Duration::from_secs(1)).await.unwrap();
        assert!(outcome.is_stopped());
        assert_eq!(*hits.lock().unwrap(), vec![1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_listen_is_single_shot() {
        let feed = InteractionFeed::<Click>::new(8);
        let store = CallbackStore::new(feed.listener());

        let first = store.listen_for(Duration::from_millis(10)).await.unwrap();
        assert!(first.is_timeout());

        let err = store.listen_for(Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::AlreadyListening {
                state: LifecycleState::TimedOut
            }
        ));
        assert_eq!(store.state(), LifecycleState::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_listen_ends_immediately() {
        let feed = InteractionFeed::<Click>::new(8);
        let store = CallbackStore::new(feed.listener());
        store.stop();
        store.stop();

        let start = Instant::now();
        let outcome = store.listen_for(Duration::from_secs(60)).await.unwrap();
        assert_eq!(outcome, ListenOutcome::Stopped);
        assert_eq!(start.elapsed(), Duration::ZERO);

        let err = store.listen().await.unwrap_err();
        assert!(err.is_usage());
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_error_aborts_loop() {
        let feed = InteractionFeed::new(8);
        let store = CallbackStore::new(feed.listener());
        let id = store.bind(
            store.make_id(),
            CallbackFn::new(|_: Click| std::future::ready(Err(CallbackError::fail("boom")))),
        );
        publish_after(&feed, Duration::from_millis(10), click(&id));

        let err = store.listen_for(Duration::from_secs(1)).await.unwrap_err();
        match err {
            StoreError::Callback { custom_id, source } => {
                assert_eq!(custom_id, id);
                assert_eq!(source.to_string(), "execution failed: boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.state(), LifecycleState::Aborted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_foreign_interactions_are_not_delivered() {
        let feed = InteractionFeed::new(8);
        let store = CallbackStore::new(feed.listener());
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        store.bind(
            store.make_id(),
            CallbackFn::new(move |_: Click| {
                seen.fetch_add(1, Ordering::SeqCst);
                std::future::ready(Ok::<_, CallbackError>(()))
            }),
        );

        // unbound id in our own namespace, and a foreign one
        publish_after(&feed, Duration::from_millis(10), click(&store.make_id()));
        publish_after(&feed, Duration::from_millis(20), click("ffff:0"));

        let outcome = store.listen_for(Duration::from_secs(1)).await.unwrap();
        assert!(outcome.is_timeout());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_closed() {
        let feed = InteractionFeed::<Click>::new(8);
        let store = CallbackStore::new(feed.listener());
        drop(feed);

        let err = store.listen_for(Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, StoreError::SourceClosed));
        assert_eq!(store.state(), LifecycleState::Aborted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_listen_marks_aborted() {
        let feed = InteractionFeed::<Click>::new(8);
        let store = CallbackStore::new(feed.listener());

        let run = store.listen_for(Duration::from_secs(60));
        let res = tokio::time::timeout(Duration::from_millis(10), run).await;
        assert!(res.is_err());
        assert_eq!(store.state(), LifecycleState::Aborted);
        assert!(store.listen().await.unwrap_err().is_usage());
    }

    /// Records event kinds in arrival order.
    #[derive(Default)]
    struct Recorder {
        kinds: Mutex<Vec<EventKind>>,
    }

    #[async_trait::async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, event: &Event) {
            self.kinds.lock().unwrap().push(event.kind);
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_listen_releases_subscribers() {
        let feed = InteractionFeed::<Click>::new(8);
        let recorder = Arc::new(Recorder::default());
        let store = CallbackStore::builder(feed.listener())
            .with_subscribers(vec![recorder.clone() as Arc<dyn Subscribe>])
            .build();

        let run = store.listen_for(Duration::from_secs(60));
        assert!(tokio::time::timeout(Duration::from_millis(10), run).await.is_err());
        drop(store);
        drop(feed);

        // fan-out and workers exit once the aborted run's terminal event is seen
        sleep(Duration::from_secs(3600)).await;
        assert_eq!(Arc::strong_count(&recorder), 1);
        assert_eq!(
            *recorder.kinds.lock().unwrap(),
            vec![EventKind::ListenStarted, EventKind::ListenFinished]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_drained_when_listen_returns() {
        let feed = InteractionFeed::<Click>::new(8);
        let recorder = Arc::new(Recorder::default());
        let store = CallbackStore::builder(feed.listener())
            .with_subscribers(vec![recorder.clone() as Arc<dyn Subscribe>])
            .build();

        let outcome = store.listen_for(Duration::from_millis(100)).await.unwrap();
        assert!(outcome.is_timeout());

        // no extra await: the run already waited for the fan-out
        assert_eq!(
            *recorder.kinds.lock().unwrap(),
            vec![
                EventKind::ListenStarted,
                EventKind::TimeoutHit,
                EventKind::ListenFinished
            ]
        );
        assert_eq!(Arc::strong_count(&recorder), 2);
    }

    /// Listener which ignores the admission predicate.
    struct Unfiltered {
        custom_id: &'static str,
    }

    #[async_trait::async_trait]
    impl Listener<Click> for Unfiltered {
        async fn next(&self, _admit: crate::listener::Admission<'_, Click>) -> Option<Click> {
            Some(click(self.custom_id))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbound_id_aborts_loop() {
        let store = CallbackStore::new(Unfiltered { custom_id: "x:1" });
        let mut rx = store.subscribe();
        store.bind(store.make_id(), noop());

        let err = store.listen_for(Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(&err, StoreError::UnboundId { custom_id } if custom_id == "x:1"));
        assert_eq!(err.as_label(), "store_unbound_id");
        assert_eq!(store.state(), LifecycleState::Aborted);

        let last = std::iter::from_fn(|| rx.try_recv().ok()).last().unwrap();
        assert_eq!(last.kind, EventKind::ListenFinished);
        assert_eq!(last.reason.as_deref(), Some("store_unbound_id"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_trace_a_run() {
        let feed = InteractionFeed::new(8);
        let store = CallbackStore::new(feed.listener());
        let mut rx = store.subscribe();
        let stop = store.stop_handle();
        let id = store.bind(
            store.make_id(),
            CallbackFn::new(move |_: Click| {
                stop.stop();
                std::future::ready(Ok::<_, CallbackError>(()))
            }),
        );
        publish_after(&feed, Duration::from_millis(10), click(&id));
        store.listen_for(Duration::from_secs(1)).await.unwrap();

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            assert_eq!(ev.store.as_deref(), Some(store.namespace().as_str()));
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            vec![
                EventKind::CallbackBound,
                EventKind::ListenStarted,
                EventKind::CallbackStarting,
                EventKind::StopRequested,
                EventKind::CallbackFinished,
                EventKind::ListenFinished,
            ]
        );
    }
}
