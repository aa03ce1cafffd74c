//! # Interaction checks.
//!
//! A [`Check`] runs after an interaction was admitted (its custom id is bound)
//! and before the callback is dispatched. Returning `false` drops the
//! interaction; the idle deadline is **not** reset for it.
//!
//! Typical use is authorization, e.g. only the user who opened a menu may
//! click its buttons. A check may do I/O (reply "you cannot interact with
//! that") before returning.
//!
//! ## Example
//! ```rust
//! use callback_store::CheckFn;
//!
//! struct Click { user: u64 }
//!
//! let owner = 42;
//! let only_owner = CheckFn::new(move |click: &Click| {
//!     let allowed = click.user == owner;
//!     async move { allowed }
//! });
//! # let _ = only_owner;
//! ```

use std::fmt;
use std::future::Future;

use async_trait::async_trait;

use crate::interaction::Interaction;

/// Contract for interaction checks.
#[async_trait]
pub trait Check<I: Interaction>: Send + Sync + 'static {
    /// Returns `true` if `inter` may be dispatched to its callback.
    async fn check(&self, inter: &I) -> bool;
}

/// Check which allows every interaction.
///
/// Still yields to the scheduler once, so the loop behaves the same way as
/// with a real (suspending) check.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

#[async_trait]
impl<I: Interaction> Check<I> for AllowAll {
    async fn check(&self, _inter: &I) -> bool {
        tokio::task::yield_now().await;
        true
    }
}

/// Function-backed check.
///
/// The closure receives the interaction by reference and returns an owned
/// future: copy what the decision needs out of the interaction first.
pub struct CheckFn<F> {
    f: F,
}

impl<F> CheckFn<F> {
    /// Wraps `f` as a [`Check`].
    pub fn new<I, Fut>(f: F) -> Self
    where
        F: Fn(&I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        Self { f }
    }
}

impl<F> fmt::Debug for CheckFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckFn").finish_non_exhaustive()
    }
}

#[async_trait]
impl<I, F, Fut> Check<I> for CheckFn<F>
where
    I: Interaction,
    F: Fn(&I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    async fn check(&self, inter: &I) -> bool {
        (self.f)(inter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Click {
        id: String,
        user: u64,
    }

    impl Interaction for Click {
        fn custom_id(&self) -> &str {
            &self.id
        }
    }

    fn click(user: u64) -> Click {
        Click {
            id: "ns:0".into(),
            user,
        }
    }

    #[tokio::test]
    async fn test_allow_all_accepts() {
        assert!(AllowAll.check(&click(1)).await);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_allow_all_yields_once() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};

        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        tokio::spawn(async move { flag.store(true, Ordering::SeqCst) });

        // single-threaded: the spawned task only runs if check suspends
        assert!(!ran.load(Ordering::SeqCst));
        assert!(AllowAll.check(&click(1)).await);
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_check_fn_filters_by_user() {
        let check = CheckFn::new(|c: &Click| {
            let allowed = c.user == 7;
            async move { allowed }
        });
        assert!(check.check(&click(7)).await);
        assert!(!check.check(&click(8)).await);
    }
}
