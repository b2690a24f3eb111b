use chrono::{DateTime, Utc};

/// What happened to a stage or step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventState {
    Started,
    Finished,
    /// The step had nothing to do; carries the reason
    Skipped(String),
    /// The step failed; carries the rendered error
    Failed(String),
}

impl std::fmt::Display for EventState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventState::Started => write!(f, "started"),
            EventState::Finished => write!(f, "finished"),
            EventState::Skipped(reason) => write!(f, "skipped ({})", reason),
            EventState::Failed(message) => write!(f, "failed ({})", message),
        }
    }
}

/// A single progress event
///
/// Stage-level events have no `step`.
#[derive(Debug, Clone)]
pub struct Event {
    pub stage: String,
    pub step: Option<String>,
    pub state: EventState,
    pub time: DateTime<Utc>,
}

impl Event {
    pub fn new(stage: impl Into<String>, step: Option<String>, state: EventState) -> Self {
        Self {
            stage: stage.into(),
            step,
            state,
            time: Utc::now(),
        }
    }

    pub fn is_step(&self) -> bool {
        self.step.is_some()
    }
}
