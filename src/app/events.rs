//! Outbound application events.
//!
//! The [`RitualService`](super::service::RitualService) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log them, drive a progress bar, set a
//! status label.

use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(StateId),

    /// The ritual moved between states.
    StateChanged { from: StateId, to: StateId },

    /// Smile hold progress in `[0, 1]`.
    SmileProgress(f32),

    /// Time left until the box re-locks.  Only emitted while unlocked.
    ResetCountdown(ResetCountdown),

    /// Human-readable pose tracking status.
    PoseStatus(&'static str),

    /// Human-readable face tracking status.
    FaceStatus(FaceStatus),
}

/// Re-lock countdown snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResetCountdown {
    /// Remaining fraction of the reset duration, `1.0` right after unlock.
    pub ratio: f32,
    /// Remaining whole seconds, rounded up.
    pub remaining_secs: u64,
}

/// Face status, kept structured so sinks can format the hold time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FaceStatus {
    Waiting,
    SmileDetected,
    SmilePrompt,
    Holding { held_secs: f32, target_secs: f32 },
    BoxOpen,
}

impl core::fmt::Display for FaceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::SmileDetected => write!(f, "smile detected"),
            Self::SmilePrompt => write!(f, "please smile"),
            Self::Holding {
                held_secs,
                target_secs,
            } => write!(f, "holding smile {:.1} / {:.1}s", held_secs, target_secs),
            Self::BoxOpen => write!(f, "box open"),
        }
    }
}

/// Pose status strings.
pub mod pose_status {
    /// No pose in view.
    pub const WAITING: &str = "waiting for a person";
    /// A pose is visible but has not greeted yet.
    pub const TRACKING: &str = "tracking, please greet the box";
    pub const GREETING_DETECTED: &str = "greeting detected";
}
