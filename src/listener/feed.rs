//! # In-process interaction feed.
//!
//! [`InteractionFeed`] is a thin wrapper around [`tokio::sync::broadcast`] that
//! lets one producer feed any number of stores. Each store gets its own
//! [`FeedListener`] and filters the shared stream with its admission predicate.
//!
//! ## Architecture
//! ```text
//! Producer:                          Consumers (many):
//!                                  ┌──► FeedListener ──► store A (ids "a1b2…:*")
//!   publish(inter) ──► broadcast ──┼──► FeedListener ──► store B (ids "c3d4…:*")
//!                                  └──► FeedListener ──► ...
//! ```
//!
//! ## Rules
//! - A listener only sees interactions **published after** it was created.
//! - Interactions rejected by one store's admission predicate are skipped by
//!   that listener only; other listeners still receive them.
//! - Lagging listeners skip the oldest items (`RecvError::Lagged`) and keep going.
//! - `FeedListener::next` is cancel-safe: `broadcast::Receiver::recv` does not
//!   lose items when its future is dropped.

use async_trait::async_trait;
use tokio::sync::{Mutex, broadcast};

use crate::interaction::Interaction;
use crate::listener::listener::{Admission, Listener};

/// Broadcast source of interactions shared by several stores.
#[derive(Clone, Debug)]
pub struct InteractionFeed<I> {
    tx: broadcast::Sender<I>,
}

impl<I: Interaction + Clone> InteractionFeed<I> {
    /// Creates a new feed with the given ring capacity (min 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<I>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an interaction to every live listener.
    ///
    /// Returns the number of listeners that received it (0 if none exist).
    pub fn publish(&self, inter: I) -> usize {
        self.tx.send(inter).unwrap_or(0)
    }

    /// Creates a new listener observing subsequent interactions.
    pub fn listener(&self) -> FeedListener<I> {
        FeedListener {
            rx: Mutex::new(self.tx.subscribe()),
        }
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// [`Listener`] reading from an [`InteractionFeed`].
#[derive(Debug)]
pub struct FeedListener<I> {
    rx: Mutex<broadcast::Receiver<I>>,
}

#[async_trait]
impl<I: Interaction + Clone> Listener<I> for FeedListener<I> {
    async fn next(&self, admit: Admission<'_, I>) -> Option<I> {
        let mut rx = self.rx.lock().await;
        loop {
            match rx.recv().await {
                Ok(inter) if admit(&inter) => return Some(inter),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Click(String);

    impl Interaction for Click {
        fn custom_id(&self) -> &str {
            &self.0
        }
    }

    #[tokio::test]
    async fn test_listener_skips_unadmitted() {
        let feed = InteractionFeed::new(8);
        let listener = feed.listener();

        feed.publish(Click("other:0".into()));
        feed.publish(Click("mine:0".into()));

        let admit = |c: &Click| c.0.starts_with("mine:");
        let got = listener.next(&admit).await;
        assert_eq!(got, Some(Click("mine:0".into())));
    }

    #[tokio::test]
    async fn test_each_listener_sees_every_interaction() {
        let feed = InteractionFeed::new(8);
        let a = feed.listener();
        let b = feed.listener();
        assert_eq!(feed.listener_count(), 2);
        assert_eq!(feed.publish(Click("x:1".into())), 2);

        let any = |_: &Click| true;
        assert_eq!(a.next(&any).await, Some(Click("x:1".into())));
        assert_eq!(b.next(&any).await, Some(Click("x:1".into())));
    }

    #[tokio::test]
    async fn test_closed_feed_yields_none() {
        let feed = InteractionFeed::<Click>::new(1);
        let listener = feed.listener();
        drop(feed);

        let any = |_: &Click| true;
        assert_eq!(listener.next(&any).await, None);
    }

    #[tokio::test]
    async fn test_lagged_listener_keeps_newest() {
        let feed = InteractionFeed::new(2);
        let listener = feed.listener();
        for n in 0..5 {
            feed.publish(Click(format!("ns:{n}")));
        }

        let any = |_: &Click| true;
        assert_eq!(listener.next(&any).await, Some(Click("ns:3".into())));
    }
}
