//! # Async Completion Scheduler Module
//!
//! Tracks every outstanding asynchronous unit of work — deferred handler
//! completions and timers, including timers registered outside any
//! request — and defers runtime shutdown until all of it has settled.
//!
//! ## Lifecycle
//!
//! Startup is explicitly two-phase. During the registration phase the
//! script evaluates and may schedule top-level timers; the pending set
//! being empty at that point means nothing. Only after [`Scheduler::seal`]
//! marks registration complete does "no live operations" become the
//! shutdown signal. [`Scheduler::wait_idle`] blocks until both conditions
//! hold, so the race between "runtime finished setting up" and "zero
//! pending ops so far" cannot be observed.
//!
//! ## Pending operations
//!
//! [`PendingOp`] is an RAII guard: registering increments the live count,
//! dropping decrements it and wakes idle waiters when the count reaches
//! zero on a sealed scheduler. Registration and deregistration take the
//! state lock, so they are atomic with respect to the readiness check.
//!
//! ## Timers
//!
//! [`Scheduler::set_timeout`] spawns a `may` coroutine that sleeps for
//! the delay and then runs the callback. The coroutine holds a
//! [`PendingOp`] for its whole lifetime. Cancelling through the returned
//! [`TimerHandle`] releases the pending operation immediately and the
//! callback never runs; the sleeping coroutine wakes at its deadline and
//! exits without side effects.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use may::coroutine;
use tracing::{debug, error, info};

use crate::runtime_config::RuntimeConfig;

#[derive(Debug, Default)]
struct SchedulerState {
    live: usize,
    sealed: bool,
    next_id: u64,
}

#[derive(Debug, Default)]
struct Inner {
    state: Mutex<SchedulerState>,
    idle: Condvar,
}

impl Inner {
    fn lock(&self) -> std::sync::MutexGuard<'_, SchedulerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Registry of outstanding asynchronous work.
///
/// Cheap to clone; all clones share one registry. The shutdown decision
/// is a pure function of the registry: sealed and zero live operations.
#[derive(Debug, Clone)]
pub struct Scheduler {
    inner: Arc<Inner>,
    stack_size: usize,
}

impl Default for Scheduler {
    fn default() -> Self {
        Scheduler::new(RuntimeConfig::default())
    }
}

impl Scheduler {
    /// Create a scheduler in the registration phase.
    #[must_use]
    pub fn new(config: RuntimeConfig) -> Self {
        Scheduler {
            inner: Arc::new(Inner::default()),
            stack_size: config.stack_size,
        }
    }

    /// Register one pending operation.
    ///
    /// `kind` is a diagnostic label ("timer", "deferred") that only shows
    /// up in logs.
    #[must_use]
    pub fn register(&self, kind: &'static str) -> PendingOp {
        let mut state = self.inner.lock();
        state.live += 1;
        state.next_id += 1;
        let id = state.next_id;
        debug!(target: "mockd::scheduler", id, kind, live = state.live, "pending op registered");
        PendingOp {
            inner: Arc::clone(&self.inner),
            id,
            kind,
        }
    }

    /// End the registration phase.
    ///
    /// Until this is called an empty pending set is never treated as
    /// terminal. Idempotent.
    pub fn seal(&self) {
        let mut state = self.inner.lock();
        if !state.sealed {
            state.sealed = true;
            info!(target: "mockd::scheduler", live = state.live, "registration phase sealed");
            if state.live == 0 {
                self.inner.idle.notify_all();
            }
        }
    }

    /// Number of live pending operations.
    #[must_use]
    pub fn live_ops(&self) -> usize {
        self.inner.lock().live
    }

    /// Whether the runtime is ready to shut down.
    ///
    /// Always `false` before [`Scheduler::seal`], regardless of the live
    /// count.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        let state = self.inner.lock();
        state.sealed && state.live == 0
    }

    /// Block until the scheduler is sealed and no operations remain.
    pub fn wait_idle(&self) {
        let mut state = self.inner.lock();
        while !(state.sealed && state.live == 0) {
            state = self
                .inner
                .idle
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        info!(target: "mockd::scheduler", "scheduler idle");
    }

    /// Schedule `callback` to run once after `delay`.
    ///
    /// The timer counts as a pending operation from this call until it
    /// fires or is cancelled. Callback panics are contained to the timer
    /// coroutine and logged; they do not wedge shutdown.
    pub fn set_timeout<F>(&self, delay: Duration, callback: F) -> TimerHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let op = self.register("timer");
        let slot = Arc::new(Mutex::new(Some(op)));
        let cancelled = Arc::new(AtomicBool::new(false));
        let handle = TimerHandle {
            slot: Arc::clone(&slot),
            cancelled: Arc::clone(&cancelled),
        };

        // SAFETY: coroutine::Builder::spawn is unsafe per the may runtime;
        // the closure is Send + 'static and owns everything it touches.
        let spawned = unsafe {
            coroutine::Builder::new()
                .stack_size(self.stack_size)
                .spawn(move || {
                    coroutine::sleep(delay);
                    // A cancelled timer has already released its pending op.
                    let op = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
                    if cancelled.load(Ordering::Acquire) || op.is_none() {
                        return;
                    }
                    if std::panic::catch_unwind(std::panic::AssertUnwindSafe(callback)).is_err() {
                        error!(target: "mockd::scheduler", "timer callback panicked");
                    }
                    drop(op);
                })
        };
        if let Err(e) = spawned {
            // Release the pending op so shutdown is not wedged forever.
            error!(target: "mockd::scheduler", error = %e, "failed to spawn timer coroutine");
            handle.cancel();
        }
        handle
    }
}

/// RAII handle for one outstanding asynchronous unit of work.
///
/// Dropping the handle marks the operation complete.
#[derive(Debug)]
pub struct PendingOp {
    inner: Arc<Inner>,
    id: u64,
    kind: &'static str,
}

impl Drop for PendingOp {
    fn drop(&mut self) {
        let mut state = self.inner.lock();
        state.live -= 1;
        debug!(
            target: "mockd::scheduler",
            id = self.id,
            kind = self.kind,
            live = state.live,
            "pending op completed"
        );
        if state.sealed && state.live == 0 {
            self.inner.idle.notify_all();
        }
    }
}

/// Handle to a scheduled timer.
#[derive(Debug, Clone)]
pub struct TimerHandle {
    slot: Arc<Mutex<Option<PendingOp>>>,
    cancelled: Arc<AtomicBool>,
}

impl TimerHandle {
    /// Cancel the timer.
    ///
    /// The callback will not run and the pending operation is released
    /// immediately. Cancelling a fired or already-cancelled timer is a
    /// no-op.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        let op = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(op);
    }

    /// Whether the timer was cancelled before firing.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}
