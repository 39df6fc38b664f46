//! Recurring feeding scheduler.
//!
//! Drives the feeder's `dispense` operation on a background thread, one
//! tick per period. The scheduler is a two-state machine, **Idle** (no
//! task) and **Active** (exactly one recurring task), with install,
//! replace, stop and shutdown transitions:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │   schedule_recurring_feeding()          schedule (replace)   │
//! │  ┌──────┐ ───────────────────────▶ ┌────────┐ ◀──┐           │
//! │  │ Idle │                          │ Active │ ───┘           │
//! │  └──────┘ ◀─────────────────────── └────┬───┘                │
//! │              stop()                     │ every period       │
//! │                                         ▼                    │
//! │                              feeder.dispense(plan_index)     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every scheduling entry point is an **absorbing boundary**: a bad plan
//! index, a retired facility, thread-spawn exhaustion, or a fault inside a
//! tick is logged and swallowed, never surfaced to the caller and never
//! allowed to kill the recurring task. The worst a broken schedule can do
//! is tick uselessly.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::events::{EventSink, FeederEvent, LogEventSink};
use crate::feeder::PetFeeder;

// ═══════════════════════════════════════════════════════════════
//  Schedule handle
// ═══════════════════════════════════════════════════════════════

/// Observer view of the currently installed recurring task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleInfo {
    /// Monotonic generation number; a replacement task gets a higher one.
    pub task: u64,
    /// Plan slot the task dispenses.
    pub plan_index: usize,
    /// Interval between ticks (also the delay before the first tick).
    pub period: Duration,
}

/// Internal bookkeeping for the live task.
struct ActiveTask {
    task: u64,
    plan_index: usize,
    period: Duration,
    /// Checked by the worker before every tick.
    cancel: Arc<AtomicBool>,
    /// Dropping the sender wakes the worker out of its period sleep so a
    /// cancelled task exits promptly instead of one period later.
    _waker: mpsc::Sender<()>,
}

impl ActiveTask {
    /// Flag the task cancelled. The waker is dropped with `self`, which
    /// wakes the sleeping worker; a tick already past its cancel check is
    /// allowed to finish.
    fn cancel(self) {
        self.cancel.store(true, Ordering::SeqCst);
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler
// ═══════════════════════════════════════════════════════════════

/// The recurring-feeding scheduler.
pub struct FeedingScheduler {
    feeder: Arc<PetFeeder>,
    sink: Arc<dyn EventSink>,
    /// The single mutation lock for install/replace/stop transitions.
    active: Mutex<Option<ActiveTask>>,
    /// Set by `shutdown()`; once true, scheduling requests are absorbed.
    retired: AtomicBool,
    /// Generation counter for task handles.
    next_task: AtomicU64,
}

impl FeedingScheduler {
    /// Scheduler bound to `feeder`, reporting through the log facade.
    pub fn new(feeder: Arc<PetFeeder>) -> Self {
        Self::with_sink(feeder, Arc::new(LogEventSink::new()))
    }

    /// Scheduler with a custom event sink (companion-app adapters, test
    /// recorders).
    pub fn with_sink(feeder: Arc<PetFeeder>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            feeder,
            sink,
            active: Mutex::new(None),
            retired: AtomicBool::new(false),
            next_task: AtomicU64::new(0),
        }
    }

    /// Install a recurring task that dispenses the plan at `plan_index`
    /// once per `period`, starting one full period from now.
    ///
    /// Replaces any active task: the old task is cancelled under the
    /// mutation lock and will not begin another tick (one already in
    /// flight may finish). Never raises toward the caller: an invalid
    /// index simply produces failing ticks, a zero period is clamped to
    /// one second, and a retired facility or failed thread spawn is
    /// logged and ignored.
    pub fn schedule_recurring_feeding(&self, plan_index: usize, period: Duration) {
        let period = if period.is_zero() {
            warn!("Zero feeding period requested; clamping to 1s");
            Duration::from_secs(1)
        } else {
            period
        };

        let task = self.next_task.fetch_add(1, Ordering::Relaxed) + 1;
        let cancel = Arc::new(AtomicBool::new(false));
        let (waker, sleeper) = mpsc::channel();

        let worker = TickWorker {
            feeder: Arc::clone(&self.feeder),
            sink: Arc::clone(&self.sink),
            task,
            plan_index,
            period,
            cancel: Arc::clone(&cancel),
            sleeper,
        };

        let mut active = self.lock_active();
        if self.retired.load(Ordering::SeqCst) {
            warn!("Feeding schedule request ignored: scheduler is shut down");
            return;
        }

        // Cancel-old-then-install-new, all under the mutation lock.
        if let Some(old) = active.take() {
            let old_task = old.task;
            old.cancel();
            self.sink.emit(&FeederEvent::ScheduleStopped { task: old_task });
            info!("Replacing feeding task {} with task {}", old_task, task);
        }

        match thread::Builder::new()
            .name(format!("feed-task-{task}"))
            .spawn(move || worker.run())
        {
            Ok(_handle) => {
                *active = Some(ActiveTask {
                    task,
                    plan_index,
                    period,
                    cancel,
                    _waker: waker,
                });
                info!(
                    "Feeding task {} installed: plan {} every {:?}",
                    task, plan_index, period
                );
                self.sink.emit(&FeederEvent::ScheduleInstalled {
                    task,
                    plan_index,
                    period,
                });
            }
            Err(e) => {
                // Absorbed: the caller's control flow is never interrupted
                // by a scheduling failure.
                error!("Failed to spawn feeding task {}: {}", task, e);
            }
        }
    }

    /// Cancel the active task, if any, and return to Idle.
    ///
    /// Idempotent: calling with no active schedule is a no-op. Once this
    /// returns, no new tick will begin; a tick already in flight may
    /// finish.
    pub fn stop(&self) {
        let mut active = self.lock_active();
        if let Some(task) = active.take() {
            let id = task.task;
            task.cancel();
            info!("Feeding task {} stopped", id);
            self.sink.emit(&FeederEvent::ScheduleStopped { task: id });
        }
    }

    /// Retire the execution facility: cancel the active task and refuse
    /// all future scheduling. Unlike [`stop`](Self::stop), this is
    /// permanent.
    pub fn shutdown(&self) {
        if self.retired.swap(true, Ordering::SeqCst) {
            return; // Already retired.
        }
        self.stop();
        info!("Feeding scheduler shut down");
        self.sink.emit(&FeederEvent::SchedulerRetired);
    }

    /// True iff a recurring task is currently installed.
    pub fn has_active_schedule(&self) -> bool {
        self.lock_active().is_some()
    }

    /// Handle describing the installed task, if any.
    pub fn active_schedule(&self) -> Option<ScheduleInfo> {
        self.lock_active().as_ref().map(|t| ScheduleInfo {
            task: t.task,
            plan_index: t.plan_index,
            period: t.period,
        })
    }

    // ── Internal ──────────────────────────────────────────────

    fn lock_active(&self) -> MutexGuard<'_, Option<ActiveTask>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for FeedingScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ═══════════════════════════════════════════════════════════════
//  Worker
// ═══════════════════════════════════════════════════════════════

/// State moved onto the background thread for one recurring task.
struct TickWorker {
    feeder: Arc<PetFeeder>,
    sink: Arc<dyn EventSink>,
    task: u64,
    plan_index: usize,
    period: Duration,
    cancel: Arc<AtomicBool>,
    sleeper: mpsc::Receiver<()>,
}

impl TickWorker {
    fn run(self) {
        debug!(
            "Feeding task {} running (plan {}, period {:?})",
            self.task, self.plan_index, self.period
        );
        loop {
            match self.sleeper.recv_timeout(self.period) {
                // Period elapsed undisturbed: time to tick.
                Err(RecvTimeoutError::Timeout) => {}
                // Waker dropped: the task was stopped, replaced, or the
                // scheduler retired.
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
            if self.cancel.load(Ordering::SeqCst) {
                break;
            }
            self.tick();
        }
        debug!("Feeding task {} exited", self.task);
    }

    /// One dispense attempt inside the fault boundary. Nothing that
    /// happens in here (a bounds error from a stale index, a panic in
    /// the controller or the sink) may terminate the recurring task or
    /// escape this thread.
    fn tick(&self) {
        let (task, plan_index) = (self.task, self.plan_index);
        let guarded = panic::catch_unwind(AssertUnwindSafe(|| {
            match self.feeder.dispense(plan_index) {
                Ok(true) => self.sink.emit(&FeederEvent::MealDispensed { task, plan_index }),
                Ok(false) => self.sink.emit(&FeederEvent::DispenseSkipped { task, plan_index }),
                Err(e) => {
                    warn!("Feeding task {}: dispense failed: {}", task, e);
                    self.sink.emit(&FeederEvent::TickFaulted { task, plan_index });
                }
            }
        }));
        if guarded.is_err() {
            error!("Feeding task {}: tick panicked; schedule stays active", task);
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
