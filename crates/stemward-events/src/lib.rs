//! Staged progress reporting
//!
//! A [`Stage`] groups named steps. Every step ends in exactly one of three
//! ways: finished, skipped (the work was already done) or failed. Sinks
//! decide how those events are shown.
//!
//! ```ignore
//! let logger = EventLogger::console();
//! let stage = logger.new_stage("uploading stemcell");
//! stage.start();
//! let outcome = stage
//!     .perform_step("Uploading", || async { Ok::<_, MyError>(StepOutcome::done(())) })
//!     .await?;
//! stage.finish();
//! ```

pub mod console;
pub mod event;
pub mod sink;
pub mod stage;

pub use console::ConsoleSink;
pub use event::{Event, EventState};
pub use sink::{EventSink, MemorySink};
pub use stage::{EventLogger, Stage, StepOutcome};
