//! Recording event sink for integration tests.
//!
//! Captures every event the scheduler emits so tests can assert on the
//! full tick history without sleeping blind.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use petfeeder::events::{EventSink, FeederEvent};

pub struct RecordingSink {
    events: Mutex<Vec<FeederEvent>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn snapshot(&self) -> Vec<FeederEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn dispensed_count(&self) -> usize {
        self.snapshot()
            .iter()
            .filter(|e| matches!(e, FeederEvent::MealDispensed { .. }))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.snapshot()
            .iter()
            .filter(|e| matches!(e, FeederEvent::DispenseSkipped { .. }))
            .count()
    }

    /// Poll until `pred` holds on the event history or `timeout` elapses.
    pub fn wait_for(&self, timeout: Duration, pred: impl Fn(&[FeederEvent]) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if pred(&self.snapshot()) {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        false
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &FeederEvent) {
        self.events.lock().unwrap().push(*event);
    }
}
