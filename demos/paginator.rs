//! # Demo: paginator
//!
//! A three-button paginator ("prev", "next", "quit") driven by a simulated user.
//!
//! Demonstrates how to:
//! - Allocate readable ids with [`CallbackStore::make_id_with`] and recover the suffix with `strip_id`.
//! - Bind one callback per button, and a group callback for a row of page shortcuts.
//! - Restrict clicks to the session owner with a [`CheckFn`].
//! - End the session from a callback through a [`StopHandle`](callback_store::StopHandle).
//! - Attach the built-in [`LogWriter`] and print its output with `tracing-subscriber`.
//!
//! ## Flow
//! ```text
//! simulated user ──► InteractionFeed ──► FeedListener ──► CallbackStore::listen()
//!     ├─► owner check (stranger's click rejected, deadline kept)
//!     ├─► next / next / shortcut #0 / prev
//!     └─► quit ──► stop() ──► ListenOutcome::Stopped
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example paginator --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use callback_store::{
    CallbackError, CallbackFn, CallbackStore, CheckFn, GroupFn, Interaction, InteractionFeed,
    LogWriter, Subscribe,
};
use tracing_subscriber::EnvFilter;

const PAGES: usize = 5;
const OWNER: u64 = 42;

#[derive(Clone, Debug)]
struct Click {
    custom_id: String,
    user: u64,
}

impl Interaction for Click {
    fn custom_id(&self) -> &str {
        &self.custom_id
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 1. Interaction source (a real bot would adapt its gateway instead)
    let feed = InteractionFeed::new(64);

    // 2. Store: only the owner may press the buttons
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let store = CallbackStore::builder(feed.listener())
        .timeout(Duration::from_secs(3))
        .check(CheckFn::new(|click: &Click| {
            let allowed = click.user == OWNER;
            async move {
                if !allowed {
                    println!("[check] only the owner can turn pages");
                }
                allowed
            }
        }))
        .with_subscribers(subs)
        .build();

    // 3. Buttons
    let page = Arc::new(AtomicUsize::new(0));
    let stop = store.stop_handle();

    let prev = {
        let page = page.clone();
        store.bind(
            store.make_id_with(["prev"]),
            CallbackFn::new(move |_: Click| {
                let now = page
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |p| p.checked_sub(1))
                    .map_or(0, |p| p - 1);
                async move {
                    println!("[prev] page {}/{PAGES}", now + 1);
                    Ok::<_, CallbackError>(())
                }
            }),
        )
    };
    let next = {
        let page = page.clone();
        store.bind(
            store.make_id_with(["next"]),
            CallbackFn::new(move |_: Click| {
                let now = page
                    .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |p| {
                        (p + 1 < PAGES).then_some(p + 1)
                    })
                    .map_or(PAGES - 1, |p| p + 1);
                async move {
                    println!("[next] page {}/{PAGES}", now + 1);
                    Ok::<_, CallbackError>(())
                }
            }),
        )
    };
    let quit = store.bind(
        store.make_id_with(["quit"]),
        CallbackFn::new(move |_: Click| {
            let stop = stop.clone();
            async move {
                println!("[quit] closing the menu");
                stop.stop();
                Ok::<_, CallbackError>(())
            }
        }),
    );

    // 4. One shared callback for the "jump to page N" row
    let shortcuts = {
        let page = page.clone();
        let ids: Vec<String> = (0..PAGES)
            .map(|n| store.make_id_with(["jump", n.to_string().as_str()]))
            .collect();
        store.bind_many(
            ids,
            GroupFn::new(move |index: usize, _: Click| {
                page.store(index, Ordering::SeqCst);
                async move {
                    println!("[jump] page {}/{PAGES}", index + 1);
                    Ok::<_, CallbackError>(())
                }
            }),
        )
    };
    println!(
        "[menu] buttons: {} {} {} + {} shortcuts (namespace {})",
        store.strip_id(&prev),
        store.strip_id(&next),
        store.strip_id(&quit),
        shortcuts.len(),
        store.namespace()
    );

    // 5. Simulated user
    let script = vec![
        (next.clone(), OWNER),
        (next.clone(), 7),
        (next, OWNER),
        (shortcuts[0].clone(), OWNER),
        (prev, OWNER),
        (quit, OWNER),
    ];
    let publisher = feed.clone();
    tokio::spawn(async move {
        for (custom_id, user) in script {
            tokio::time::sleep(Duration::from_millis(300)).await;
            publisher.publish(Click { custom_id, user });
        }
    });

    // 6. Run the session (returns once the LogWriter has drained)
    let outcome = store.listen().await?;
    println!(
        "[menu] finished: {} on page {}",
        outcome.as_label(),
        page.load(Ordering::SeqCst) + 1
    );
    Ok(())
}
