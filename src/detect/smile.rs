//! Per-frame smile classifier.
//!
//! Uses four face mesh points: both mouth corners and the upper/lower lip
//! centres.  A smile is a corner raise relative to the lip centre line
//! with the lips mostly closed, so laughing or talking does not count.
//!
//! ```text
//!  score = (lip_centre_y - corners_avg_y) / mouth_width
//!  open  = |upper - lower| / mouth_width
//!  smiling = score > threshold && open < mouth_open_max
//! ```

use crate::config::SmileConfig;
use crate::frames::{FaceFrame, Point2D, landmarks};

/// Mouth widths below this (px) are degenerate.
const MIN_MOUTH_WIDTH_PX: f32 = 1.0;

/// Raw mouth geometry for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmileMetrics {
    pub mouth_width: f32,
    pub smile_score: f32,
    pub mouth_open: f32,
}

#[derive(Debug, Clone)]
pub struct SmileDetector {
    config: SmileConfig,
}

impl SmileDetector {
    pub fn new(config: SmileConfig) -> Self {
        Self { config }
    }

    /// Mouth geometry judged in mirrored (display) space, or `None` when
    /// there is no usable face.
    pub fn measure(&self, frame: &FaceFrame, reference_width: f32) -> Option<SmileMetrics> {
        let face = frame.face.as_ref()?;
        if face.landmarks.len() < landmarks::MIN_FACE_LANDMARKS {
            return None;
        }
        let mirror = |idx| face.landmark(idx).map(|p: Point2D| p.mirrored(reference_width));
        let left = mirror(landmarks::MOUTH_LEFT)?;
        let right = mirror(landmarks::MOUTH_RIGHT)?;
        let upper = mirror(landmarks::UPPER_LIP)?;
        let lower = mirror(landmarks::LOWER_LIP)?;

        let mouth_width = left.distance(right);
        if mouth_width.is_nan() || mouth_width < MIN_MOUTH_WIDTH_PX {
            return None;
        }

        let mouth_center_y = (upper.y + lower.y) / 2.0;
        let corners_avg_y = (left.y + right.y) / 2.0;
        Some(SmileMetrics {
            mouth_width,
            smile_score: (mouth_center_y - corners_avg_y) / mouth_width,
            mouth_open: upper.distance(lower) / mouth_width,
        })
    }

    /// `true` if the frame shows a closed-mouth smile.
    pub fn classify(&self, frame: &FaceFrame, reference_width: f32) -> bool {
        self.measure(frame, reference_width).is_some_and(|m| {
            m.smile_score > self.config.threshold && m.mouth_open < self.config.mouth_open_max
        })
    }
}
