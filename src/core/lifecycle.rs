//! # Lifecycle and cancellation control for one store.
//!
//! [`Lifecycle`] owns the single-shot state machine and the stop token.
//! The dispatch loop never reuses a cancellation handle across iterations:
//! every wait gets a fresh [`WaitScope`] built from the stored deadline and a
//! child of the stop token. A scope is consumed by [`WaitScope::wait`] and
//! cancels its child token once it is interrupted.
//!
//! ## State machine
//! ```text
//!                 begin()
//!   NotStarted ───────────► Running ──┬──► TimedOut   (deadline elapsed, no stop)
//!                                     ├──► Stopped    (stop observed; wins over timeout)
//!                                     └──► Aborted    (error propagated / listen dropped)
//! ```
//! Terminal states never transition. `begin()` on anything but `NotStarted`
//! is a usage error.
//!
//! ## Rules
//! - `stop()` is idempotent and callable from any context, including from
//!   inside a running callback.
//! - A stop requested before `listen` makes the first wait return `Stopped`.
//! - Interrupts are only observed while waiting; callbacks run outside any scope.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::core::namespace::Namespace;
use crate::error::StoreError;
use crate::events::{Bus, Event, EventKind};

/// Lifecycle state of a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum LifecycleState {
    /// `listen` has not been called yet.
    NotStarted = 0,
    /// The dispatch loop is running.
    Running = 1,
    /// The loop ended because the idle deadline elapsed.
    TimedOut = 2,
    /// The loop ended because `stop()` was called.
    Stopped = 3,
    /// The loop ended with an error, or its future was dropped mid-run.
    Aborted = 4,
}

impl LifecycleState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => LifecycleState::NotStarted,
            1 => LifecycleState::Running,
            2 => LifecycleState::TimedOut,
            3 => LifecycleState::Stopped,
            _ => LifecycleState::Aborted,
        }
    }

    /// True for states no transition leaves.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            LifecycleState::TimedOut | LifecycleState::Stopped | LifecycleState::Aborted
        )
    }
}

/// How a completed `listen` run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenOutcome {
    /// No accepted interaction arrived within the idle timeout.
    Timeout,
    /// `stop()` was called.
    Stopped,
}

impl ListenOutcome {
    /// True if the run ended by timeout.
    #[inline]
    pub fn is_timeout(self) -> bool {
        matches!(self, ListenOutcome::Timeout)
    }

    /// True if the run ended by an explicit stop.
    #[inline]
    pub fn is_stopped(self) -> bool {
        matches!(self, ListenOutcome::Stopped)
    }

    /// Stable label for logs/events.
    pub fn as_label(self) -> &'static str {
        match self {
            ListenOutcome::Timeout => "timeout",
            ListenOutcome::Stopped => "stopped",
        }
    }
}

impl From<ListenOutcome> for LifecycleState {
    fn from(outcome: ListenOutcome) -> Self {
        match outcome {
            ListenOutcome::Timeout => LifecycleState::TimedOut,
            ListenOutcome::Stopped => LifecycleState::Stopped,
        }
    }
}

/// Owner of the state machine and the stop token.
#[derive(Debug)]
pub(crate) struct Lifecycle {
    state: AtomicU8,
    stop: CancellationToken,
    stop_requested: AtomicBool,
    namespace: Namespace,
    bus: Bus,
}

impl Lifecycle {
    pub(crate) fn new(namespace: Namespace, bus: Bus) -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::NotStarted as u8),
            stop: CancellationToken::new(),
            stop_requested: AtomicBool::new(false),
            namespace,
            bus,
        }
    }

    /// Current state.
    pub(crate) fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// `NotStarted → Running`, or a usage error.
    pub(crate) fn begin(&self) -> Result<(), StoreError> {
        self.state
            .compare_exchange(
                LifecycleState::NotStarted as u8,
                LifecycleState::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(|_| ())
            .map_err(|raw| StoreError::AlreadyListening {
                state: LifecycleState::from_u8(raw),
            })
    }

    /// `Running → terminal`, publishing `ListenFinished` with `reason`.
    ///
    /// No-op if the run already finished. Returns `true` for the call that
    /// made the transition, so a run emits exactly one terminal event.
    pub(crate) fn finish(&self, terminal: LifecycleState, reason: &'static str) -> bool {
        debug_assert!(terminal.is_terminal());
        let moved = self
            .state
            .compare_exchange(
                LifecycleState::Running as u8,
                terminal as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok();
        if moved {
            self.bus.publish(
                Event::new(EventKind::ListenFinished)
                    .with_store(self.namespace.shared())
                    .with_reason(reason),
            );
        }
        moved
    }

    /// Requests the loop to stop. Idempotent.
    ///
    /// Returns `true` for the call that actually requested the stop.
    pub(crate) fn stop(&self) -> bool {
        let first = !self.stop_requested.swap(true, Ordering::AcqRel);
        self.stop.cancel();
        if first {
            self.bus.publish(
                Event::new(EventKind::StopRequested).with_store(self.namespace.shared()),
            );
        }
        first
    }

    /// True once `stop()` has been called.
    pub(crate) fn is_stop_requested(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// Builds a fresh single-use wait scope expiring at `deadline`.
    pub(crate) fn scope(&self, deadline: Instant) -> WaitScope {
        WaitScope {
            token: self.stop.child_token(),
            deadline,
        }
    }
}

/// Why a wait was interrupted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Interrupt {
    Timeout,
    Stop,
}

impl From<Interrupt> for ListenOutcome {
    fn from(interrupt: Interrupt) -> Self {
        match interrupt {
            Interrupt::Timeout => ListenOutcome::Timeout,
            Interrupt::Stop => ListenOutcome::Stopped,
        }
    }
}

/// One abortable wait: deadline plus a child of the stop token.
#[derive(Debug)]
pub(crate) struct WaitScope {
    token: CancellationToken,
    deadline: Instant,
}

impl WaitScope {
    /// Drives `fut` until it completes, the deadline elapses, or stop is requested.
    ///
    /// Precedence when several are ready: stop, then timeout, then `fut`.
    /// An expired deadline therefore wins over an already-available value.
    pub(crate) async fn wait<F: Future>(self, fut: F) -> Result<F::Output, Interrupt> {
        // the timer wheel rounds deadlines up; settle already-due interrupts first
        if self.token.is_cancelled() {
            return Err(Interrupt::Stop);
        }
        if Instant::now() >= self.deadline {
            self.token.cancel();
            return Err(Interrupt::Timeout);
        }

        let res = tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Interrupt::Stop),
            _ = time::sleep_until(self.deadline) => {
                // stop may have raced with the deadline
                if self.token.is_cancelled() {
                    Err(Interrupt::Stop)
                } else {
                    Err(Interrupt::Timeout)
                }
            }
            out = fut => Ok(out),
        };
        if res.is_err() {
            self.token.cancel();
        }
        res
    }
}

/// Cloneable handle for stopping a store's loop from anywhere.
///
/// Typically captured by callbacks that end the session (a "Quit" button).
#[derive(Clone, Debug)]
pub struct StopHandle {
    lifecycle: Arc<Lifecycle>,
}

impl StopHandle {
    pub(crate) fn new(lifecycle: Arc<Lifecycle>) -> Self {
        Self { lifecycle }
    }

    /// Requests the loop to stop. Idempotent.
    ///
    /// A running callback is never interrupted; the loop returns
    /// [`ListenOutcome::Stopped`] when it next waits.
    pub fn stop(&self) {
        self.lifecycle.stop();
    }

    /// True once a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.lifecycle.is_stop_requested()
    }
}
