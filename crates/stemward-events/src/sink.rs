use crate::event::{Event, EventState};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Receives progress events
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &Event);
}

/// Sink that keeps every event in memory
#[derive(Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    // a panic while holding the lock leaves the list itself intact
    fn lock(&self) -> MutexGuard<'_, Vec<Event>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of all events so far
    pub fn events(&self) -> Vec<Event> {
        self.lock().clone()
    }

    /// `(step, state)` pairs for step events only
    pub fn step_states(&self) -> Vec<(String, EventState)> {
        self.events()
            .into_iter()
            .filter_map(|e| e.step.map(|step| (step, e.state)))
            .collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &Event) {
        self.lock().push(event.clone());
    }
}
