//! # Dispatcher: the single-consumer interaction loop.
//!
//! Drives one `listen` run of a store: wait for an admitted interaction,
//! check it, dispatch it to its callback, repeat.
//!
//! ## Architecture
//! ```text
//! deadline = now + timeout
//! loop {
//!   ├─► scope = lifecycle.scope(deadline)          (fresh per iteration)
//!   ├─► scope.wait(listener.next(admit))
//!   │       ├─ Err(Stop)    ─► return Stopped
//!   │       ├─ Err(Timeout) ─► publish TimeoutHit,     return Timeout
//!   │       ├─ Ok(None)     ─► return Err(SourceClosed)
//!   │       └─ Ok(Some(i))
//!   ├─► check(&i)  (shielded)
//!   │       └─ false ─► publish InteractionRejected, continue   (deadline unchanged)
//!   ├─► registry.get(id) ─ None ─► return Err(UnboundId)
//!   ├─► publish CallbackStarting
//!   ├─► callback(i).await  (shielded: no timeout, no stop)
//!   │       └─ Err(e) ─► publish CallbackFailed, return Err(Callback)
//!   ├─► publish CallbackFinished
//!   └─► deadline = now + timeout
//! }
//! ```
//!
//! ## Rules
//! - Interactions are handled **one at a time** in arrival order; the next
//!   wait starts only after the current callback returned.
//! - Only the wait is interruptible. Checks and callbacks always run to completion.
//! - The deadline is reset **only** after a callback completed successfully.
//! - A stop requested during a callback is observed by the next wait.

use std::time::Duration;

use tokio::time::Instant;

use crate::callbacks::Check;
use crate::core::lifecycle::{Lifecycle, ListenOutcome};
use crate::core::namespace::Namespace;
use crate::core::registry::CallbackRegistry;
use crate::error::StoreError;
use crate::events::{Bus, Event, EventKind};
use crate::interaction::Interaction;
use crate::listener::Listener;

/// Borrowed view of a store used for one `listen` run.
pub(crate) struct Dispatcher<'a, I: Interaction> {
    pub(crate) namespace: &'a Namespace,
    pub(crate) registry: &'a CallbackRegistry<I>,
    pub(crate) lifecycle: &'a Lifecycle,
    pub(crate) listener: &'a dyn Listener<I>,
    pub(crate) check: &'a dyn Check<I>,
    pub(crate) bus: &'a Bus,
}

impl<I: Interaction> Dispatcher<'_, I> {
    /// Runs the loop until timeout, stop, or an error.
    pub(crate) async fn run(&self, timeout: Duration) -> Result<ListenOutcome, StoreError> {
        let registry = self.registry;
        let admit = move |inter: &I| registry.contains(inter.custom_id());
        let mut deadline = deadline_after(timeout);

        loop {
            let scope = self.lifecycle.scope(deadline);
            let inter = match scope.wait(self.listener.next(&admit)).await {
                Ok(Some(inter)) => inter,
                Ok(None) => return Err(StoreError::SourceClosed),
                Err(interrupt) => {
                    let outcome = ListenOutcome::from(interrupt);
                    if outcome.is_timeout() {
                        self.publish(Event::new(EventKind::TimeoutHit).with_timeout(timeout));
                    }
                    return Ok(outcome);
                }
            };

            if !self.check.check(&inter).await {
                self.publish(
                    Event::new(EventKind::InteractionRejected).with_custom_id(inter.custom_id()),
                );
                continue;
            }

            self.dispatch(inter).await?;
            deadline = deadline_after(timeout);
        }
    }

    /// Looks up and runs the callback for an accepted interaction.
    async fn dispatch(&self, inter: I) -> Result<(), StoreError> {
        let custom_id = inter.custom_id().to_owned();
        let binding = self
            .registry
            .get(&custom_id)
            .ok_or_else(|| StoreError::UnboundId {
                custom_id: custom_id.clone(),
            })?;
        let index = binding.index();

        self.publish(
            Event::new(EventKind::CallbackStarting)
                .with_custom_id(custom_id.as_str())
                .with_index_opt(index),
        );

        match binding.invoke(inter).await {
            Ok(()) => {
                self.publish(
                    Event::new(EventKind::CallbackFinished)
                        .with_custom_id(custom_id.as_str())
                        .with_index_opt(index),
                );
                Ok(())
            }
            Err(source) => {
                self.publish(
                    Event::new(EventKind::CallbackFailed)
                        .with_custom_id(custom_id.as_str())
                        .with_index_opt(index)
                        .with_reason(source.to_string()),
                );
                Err(StoreError::Callback { custom_id, source })
            }
        }
    }

    fn publish(&self, ev: Event) {
        self.bus.publish(ev.with_store(self.namespace.shared()));
    }
}

/// Roughly 30 years; used when `now + timeout` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout).unwrap_or(now + FAR_FUTURE)
}
