//! Nod greeting detector.
//!
//! Tracks the nose Y coordinate against a slowly adapting rest position
//! and recognises a quick dip followed by a return.
//!
//! ```text
//!            ┌──[Y - base >= down_px]──▶ DOWN ──[Y - base <= return_px]──▶ emit, cooldown
//!  IDLE ◀────┤                            │
//!   (base    └────────────────────────────┘ [window_ms elapsed]
//!    smoothed)
//! ```
//!
//! | Guard             | Effect                                              |
//! |-------------------|-----------------------------------------------------|
//! | Low confidence    | frame ignored, state untouched                      |
//! | First sample      | seeds baseline, no detection                        |
//! | Idle              | baseline lerps toward Y (absorbs postural drift)    |
//! | Cooldown          | no transitions at all                               |

use log::debug;

use super::{GreetingDetected, GreetingStrategy};
use crate::config::{GreetingPolicy, NodConfig};
use crate::frames::{BodyPart, PoseFrame};

/// Phase of the nod gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodPhase {
    Idle,
    Down { since_ms: u64 },
}

/// Mutable detector state.  Owned by one [`NodDetector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodState {
    pub baseline_y: Option<f32>,
    pub phase: NodPhase,
    pub cooldown_until_ms: u64,
}

impl NodState {
    pub const fn new() -> Self {
        Self {
            baseline_y: None,
            phase: NodPhase::Idle,
            cooldown_until_ms: 0,
        }
    }
}

impl Default for NodState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct NodDetector {
    config: NodConfig,
    state: NodState,
}

impl NodDetector {
    pub fn new(config: NodConfig) -> Self {
        Self {
            config,
            state: NodState::new(),
        }
    }

    pub fn state(&self) -> &NodState {
        &self.state
    }

    pub fn baseline_y(&self) -> Option<f32> {
        self.state.baseline_y
    }
}

impl GreetingStrategy for NodDetector {
    fn update(&mut self, frame: &PoseFrame, now_ms: u64) -> Option<GreetingDetected> {
        let pose = frame.pose.as_ref()?;
        let nose_y = pose.confident(BodyPart::Nose, self.config.pose_score_min)?.y;

        let Some(mut baseline) = self.state.baseline_y else {
            self.state.baseline_y = Some(nose_y);
            return None;
        };

        if self.state.phase == NodPhase::Idle {
            baseline += (nose_y - baseline) * self.config.baseline_lerp;
            self.state.baseline_y = Some(baseline);
        }

        let delta = nose_y - baseline;
        if now_ms < self.state.cooldown_until_ms {
            return None;
        }

        match self.state.phase {
            NodPhase::Idle => {
                if delta >= self.config.down_px {
                    debug!("nod: down by {:.1}px", delta);
                    self.state.phase = NodPhase::Down { since_ms: now_ms };
                }
                None
            }
            NodPhase::Down { since_ms } => {
                if now_ms.saturating_sub(since_ms) > self.config.window_ms {
                    debug!("nod: window elapsed without return");
                    self.state.phase = NodPhase::Idle;
                    return None;
                }
                if delta <= self.config.return_px {
                    self.state.phase = NodPhase::Idle;
                    self.state.cooldown_until_ms = now_ms.saturating_add(self.config.cooldown_ms);
                    self.state.baseline_y = Some(nose_y);
                    return Some(GreetingDetected {
                        policy: GreetingPolicy::Nod,
                        at_ms: now_ms,
                    });
                }
                None
            }
        }
    }

    fn reset(&mut self) {
        self.state = NodState::new();
    }
}
