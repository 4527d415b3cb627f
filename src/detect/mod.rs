//! Frame-to-signal reducers.
//!
//! ```text
//!  PoseFrame ──▶ GreetingDetector (nod | bow) ──▶ Option<GreetingDetected>
//!  FaceFrame ──▶ SmileDetector                ──▶ bool
//! ```
//!
//! Both reducers treat missing or low-confidence input as "no signal this
//! frame".  Neither ever returns an error.

pub mod bow;
pub mod nod;
pub mod smile;

use crate::config::{GreetingPolicy, RitualConfig};
use crate::frames::PoseFrame;

pub use bow::BowDetector;
pub use nod::{NodDetector, NodPhase, NodState};
pub use smile::{SmileDetector, SmileMetrics};

/// Discrete greeting signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreetingDetected {
    pub policy: GreetingPolicy,
    pub at_ms: u64,
}

/// A temporal greeting policy.
pub trait GreetingStrategy {
    /// Feed one pose frame observed at `now_ms`.
    fn update(&mut self, frame: &PoseFrame, now_ms: u64) -> Option<GreetingDetected>;

    /// Forget all history, as if monitoring just started.
    fn reset(&mut self);
}

/// The configured greeting policy.  Exactly one is active; they are never
/// combined.
#[derive(Debug, Clone)]
pub enum GreetingDetector {
    Nod(NodDetector),
    Bow(BowDetector),
}

impl GreetingDetector {
    pub fn from_config(config: &RitualConfig) -> Self {
        match config.policy {
            GreetingPolicy::Nod => Self::Nod(NodDetector::new(config.nod.clone())),
            GreetingPolicy::Bow => Self::Bow(BowDetector::new(config.bow.clone())),
        }
    }

    pub fn policy(&self) -> GreetingPolicy {
        match self {
            Self::Nod(_) => GreetingPolicy::Nod,
            Self::Bow(_) => GreetingPolicy::Bow,
        }
    }

    /// Nod state, when the nod policy is active.
    pub fn nod_state(&self) -> Option<&NodState> {
        match self {
            Self::Nod(d) => Some(d.state()),
            Self::Bow(_) => None,
        }
    }
}

impl GreetingStrategy for GreetingDetector {
    fn update(&mut self, frame: &PoseFrame, now_ms: u64) -> Option<GreetingDetected> {
        match self {
            Self::Nod(d) => d.update(frame, now_ms),
            Self::Bow(d) => d.update(frame, now_ms),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Nod(d) => d.reset(),
            Self::Bow(d) => d.reset(),
        }
    }
}
