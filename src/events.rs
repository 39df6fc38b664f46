//! Outbound application events.
//!
//! The [`FeedingScheduler`](crate::scheduler::FeedingScheduler) emits these
//! through the [`EventSink`] port. Adapters on the other side decide what
//! to do with them: log to the console, update a display, publish over a
//! companion-app channel, etc.
//!
//! Unlike a single-threaded sink, `emit` takes `&self` and the trait
//! requires `Send + Sync`: tick events originate on the scheduler's
//! background thread while lifecycle events originate on the caller's.

use std::time::Duration;

use log::{debug, info, warn};

/// Structured events emitted by the scheduling core.
///
/// `task` is the generation number of the recurring task concerned; a
/// replaced schedule's successor carries a higher generation, so sinks can
/// tell the two tick streams apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeederEvent {
    /// A recurring feeding task was installed (fresh or replacing).
    ScheduleInstalled {
        task: u64,
        plan_index: usize,
        period: Duration,
    },

    /// The active task was cancelled via `stop()` or replacement.
    ScheduleStopped { task: u64 },

    /// The scheduler's execution facility was retired; no further
    /// scheduling is possible.
    SchedulerRetired,

    /// A tick dispensed its meal plan.
    MealDispensed { task: u64, plan_index: usize },

    /// A tick completed without dispensing (insufficient stock or energy,
    /// or an empty plan slot).
    DispenseSkipped { task: u64, plan_index: usize },

    /// A tick faulted (bounds error or panic) and was absorbed; the
    /// schedule stays active.
    TickFaulted { task: u64, plan_index: usize },
}

/// Port for structured event observation.
///
/// Implementations must be internally synchronized; `emit` is called
/// concurrently from the scheduler thread and the caller thread.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &FeederEvent);
}

/// Default adapter: writes every event to the `log` facade.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&self, event: &FeederEvent) {
        match event {
            FeederEvent::ScheduleInstalled {
                task,
                plan_index,
                period,
            } => {
                info!(
                    "SCHED | task {} installed: plan {} every {:?}",
                    task, plan_index, period
                );
            }
            FeederEvent::ScheduleStopped { task } => {
                info!("SCHED | task {} stopped", task);
            }
            FeederEvent::SchedulerRetired => {
                info!("SCHED | facility retired");
            }
            FeederEvent::MealDispensed { task, plan_index } => {
                info!("FEED  | task {} dispensed plan {}", task, plan_index);
            }
            FeederEvent::DispenseSkipped { task, plan_index } => {
                debug!("FEED  | task {} skipped plan {}", task, plan_index);
            }
            FeederEvent::TickFaulted { task, plan_index } => {
                warn!("FEED  | task {} tick faulted on plan {}", task, plan_index);
            }
        }
    }
}
