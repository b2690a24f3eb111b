use crate::console::ConsoleSink;
use crate::event::{Event, EventState};
use crate::sink::EventSink;
use std::future::Future;
use std::sync::Arc;

/// Successful result of a step
///
/// `Skipped` is not a failure: the step found its work already done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome<T> {
    Done(T),
    Skipped { value: T, reason: String },
}

impl<T> StepOutcome<T> {
    pub fn done(value: T) -> Self {
        StepOutcome::Done(value)
    }

    pub fn skipped(value: T, reason: impl Into<String>) -> Self {
        StepOutcome::Skipped {
            value,
            reason: reason.into(),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, StepOutcome::Skipped { .. })
    }

    pub fn into_value(self) -> T {
        match self {
            StepOutcome::Done(value) | StepOutcome::Skipped { value, .. } => value,
        }
    }
}

/// Creates stages that report to a shared sink
#[derive(Clone)]
pub struct EventLogger {
    sink: Arc<dyn EventSink>,
}

impl EventLogger {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    /// Logger rendering spinners and colored lines on the terminal
    pub fn console() -> Self {
        Self::new(Arc::new(ConsoleSink::new()))
    }

    pub fn new_stage(&self, name: impl Into<String>) -> Stage {
        Stage {
            name: name.into(),
            sink: Arc::clone(&self.sink),
        }
    }
}

/// A named group of steps
pub struct Stage {
    name: String,
    sink: Arc<dyn EventSink>,
}

impl Stage {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) {
        tracing::debug!("Stage '{}' started", self.name);
        self.emit(None, EventState::Started);
    }

    pub fn finish(&self) {
        tracing::debug!("Stage '{}' finished", self.name);
        self.emit(None, EventState::Finished);
    }

    /// Run `step`, reporting it as finished, skipped or failed
    pub async fn perform_step<T, E, F, Fut>(&self, name: &str, step: F) -> Result<StepOutcome<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<StepOutcome<T>, E>>,
        E: std::fmt::Display,
    {
        self.emit(Some(name), EventState::Started);

        let result = step().await;
        let state = match &result {
            Ok(StepOutcome::Done(_)) => EventState::Finished,
            Ok(StepOutcome::Skipped { reason, .. }) => EventState::Skipped(reason.clone()),
            Err(err) => EventState::Failed(err.to_string()),
        };
        tracing::debug!("Step '{}' of '{}' {}", name, self.name, state);
        self.emit(Some(name), state);

        result
    }

    fn emit(&self, step: Option<&str>, state: EventState) {
        let event = Event::new(self.name.clone(), step.map(str::to_string), state);
        self.sink.emit(&event);
    }
}
