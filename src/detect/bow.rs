//! Bow greeting detector.
//!
//! Level-triggered: emits on every frame where the nose sits at least
//! `offset_px` below the shoulder centre line.  Holds no state, so the
//! consumer must ignore repeats while the ritual is already armed.

use super::{GreetingDetected, GreetingStrategy};
use crate::config::{BowConfig, GreetingPolicy};
use crate::frames::{BodyPart, PoseFrame};

#[derive(Debug, Clone)]
pub struct BowDetector {
    config: BowConfig,
}

impl BowDetector {
    pub fn new(config: BowConfig) -> Self {
        Self { config }
    }
}

impl GreetingStrategy for BowDetector {
    fn update(&mut self, frame: &PoseFrame, now_ms: u64) -> Option<GreetingDetected> {
        let pose = frame.pose.as_ref()?;
        let min = self.config.pose_score_min;
        let nose = pose.confident(BodyPart::Nose, min)?;
        let left = pose.confident(BodyPart::LeftShoulder, min)?;
        let right = pose.confident(BodyPart::RightShoulder, min)?;

        let shoulder_center_y = (left.y + right.y) / 2.0;
        (nose.y >= shoulder_center_y + self.config.offset_px).then_some(GreetingDetected {
            policy: GreetingPolicy::Bow,
            at_ms: now_ms,
        })
    }

    fn reset(&mut self) {}
}
