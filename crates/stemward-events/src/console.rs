use crate::event::{Event, EventState};
use crate::sink::EventSink;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Terminal sink: one spinner per running step, one line per outcome
pub struct ConsoleSink {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn start_spinner(&self, stage: &str, step: &str) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("{} > {}", stage, step));
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(previous) = slot.replace(pb) {
                previous.finish_and_clear();
            }
        }
    }

    fn finish_spinner(&self, message: String) {
        let spinner = self.spinner.lock().ok().and_then(|mut slot| slot.take());
        match spinner {
            Some(pb) if !pb.is_hidden() => pb.finish_with_message(message),
            // no terminal to draw on
            Some(pb) => {
                pb.finish_and_clear();
                println!("{}", message);
            }
            None => println!("{}", message),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for ConsoleSink {
    fn emit(&self, event: &Event) {
        match (&event.step, &event.state) {
            (None, EventState::Started) => {
                println!("{}", format!("Started {}", event.stage).bold());
            }
            (None, EventState::Finished) => {
                println!("{}", format!("Finished {}", event.stage).green());
            }
            (None, state) => {
                println!("{} {}", event.stage, state);
            }
            (Some(step), EventState::Started) => self.start_spinner(&event.stage, step),
            (Some(step), EventState::Finished) => {
                self.finish_spinner(format!("{} {}", "✓".green(), step));
            }
            (Some(step), EventState::Skipped(reason)) => {
                self.finish_spinner(format!("{} {} {}", "↷".yellow(), step, format!("(skipped: {})", reason).yellow()));
            }
            (Some(step), EventState::Failed(message)) => {
                self.finish_spinner(format!("{} {} {}", "✗".red(), step, format!("({})", message).red()));
            }
        }
    }
}
