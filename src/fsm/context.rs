//! Shared mutable context threaded through every ritual state handler.
//!
//! `RitualContext` is the single struct that state handlers read from and
//! write to: the input being processed, the wall-clock time it was
//! observed at, the smile session and unlock timer, and the actuator
//! commands produced by the step.

use heapless::Vec;
use log::warn;

use crate::actuator::ActuatorCommand;
use crate::config::RitualConfig;

/// Most commands a single step can produce (unlock exit emits two).
pub const OUTBOX_CAP: usize = 4;

// ---------------------------------------------------------------------------
// Input (written by the service before each step)
// ---------------------------------------------------------------------------

/// The signal a step reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RitualInput {
    /// Nothing new; only deadline checks run.
    Tick,
    /// The greeting detector fired on this pose frame.
    Greeting,
    /// A pose frame without a greeting.
    Pose,
    /// A classified face frame.
    Face { smiling: bool },
}

// ---------------------------------------------------------------------------
// Ritual-owned timers
// ---------------------------------------------------------------------------

/// Start of the current unbroken smile, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmileSession {
    started_at_ms: Option<u64>,
}

impl SmileSession {
    /// Start the session at `now_ms` unless one is running; returns its start.
    pub fn get_or_start(&mut self, now_ms: u64) -> u64 {
        *self.started_at_ms.get_or_insert(now_ms)
    }

    pub fn clear(&mut self) {
        self.started_at_ms = None;
    }

    pub fn started_at_ms(&self) -> Option<u64> {
        self.started_at_ms
    }

    pub fn is_active(&self) -> bool {
        self.started_at_ms.is_some()
    }
}

/// Running while the box is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockTimer {
    pub started_at_ms: u64,
}

impl UnlockTimer {
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.started_at_ms)
    }
}

// ---------------------------------------------------------------------------
// RitualContext
// ---------------------------------------------------------------------------

pub struct RitualContext {
    // -- Input --
    /// Wall-clock time of the input being processed.
    pub now_ms: u64,
    pub input: RitualInput,

    // -- Timers --
    pub smile: SmileSession,
    /// Present only while unlocked.
    pub unlock: Option<UnlockTimer>,
    /// Latest smile hold progress in `[0, 1]`.
    pub smile_progress: f32,

    // -- Outputs --
    outbox: Vec<ActuatorCommand, OUTBOX_CAP>,
    greeting_reset: bool,

    // -- Configuration --
    pub config: RitualConfig,
}

impl RitualContext {
    pub fn new(config: RitualConfig) -> Self {
        Self {
            now_ms: 0,
            input: RitualInput::Tick,
            smile: SmileSession::default(),
            unlock: None,
            smile_progress: 0.0,
            outbox: Vec::new(),
            greeting_reset: false,
            config,
        }
    }

    /// Queue a command for the actuator.
    pub fn command(&mut self, command: ActuatorCommand) {
        if self.outbox.push(command).is_err() {
            warn!("Ritual outbox full, dropping {}", command);
        }
    }

    /// Take every command queued by the last step, in issue order.
    pub fn take_commands(&mut self) -> Vec<ActuatorCommand, OUTBOX_CAP> {
        core::mem::take(&mut self.outbox)
    }

    /// Ask the service to reset the greeting detector after this step.
    pub fn request_greeting_reset(&mut self) {
        self.greeting_reset = true;
    }

    pub fn take_greeting_reset(&mut self) -> bool {
        core::mem::take(&mut self.greeting_reset)
    }

    /// Milliseconds since unlock, if unlocked.
    pub fn unlocked_for_ms(&self) -> Option<u64> {
        self.unlock.map(|t| t.elapsed_ms(self.now_ms))
    }
}
