//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each application event as one
//! structured line to the terminal logger.  A progress bar or web UI
//! would implement the same trait.

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: usize,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.emitted += 1;
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {} -> {}", from, to);
            }
            AppEvent::SmileProgress(progress) => {
                debug!("SMILE | {:.2}", progress);
            }
            AppEvent::ResetCountdown(c) => {
                info!("RESET | {}s left ({:.0}%)", c.remaining_secs, c.ratio * 100.0);
            }
            AppEvent::PoseStatus(status) => {
                info!("POSE  | {}", status);
            }
            AppEvent::FaceStatus(status) => {
                debug!("FACE  | {}", status);
            }
        }
    }
}
