//! Ritual configuration parameters
//!
//! All tunable thresholds and durations for greeting detection, smile
//! classification and the unlock cycle.
//! Values can be overridden from a JSON file and from the command line.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which greeting gesture arms the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GreetingPolicy {
    /// Fast down-then-up nose motion relative to an adapting baseline.
    Nod,
    /// Nose dropped a fixed offset below the shoulder line.
    Bow,
}

/// Nod detector thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodConfig {
    /// Minimum nose keypoint confidence.
    pub pose_score_min: f32,
    /// Downward displacement (px) that starts a nod.
    pub down_px: f32,
    /// Displacement (px) at or below which the nod has returned.
    pub return_px: f32,
    /// Maximum time (ms) between going down and coming back.
    pub window_ms: u64,
    /// Refractory period (ms) after a detected nod.
    pub cooldown_ms: u64,
    /// Exponential smoothing factor for the idle baseline.
    pub baseline_lerp: f32,
}

impl Default for NodConfig {
    fn default() -> Self {
        Self {
            pose_score_min: 0.28,
            down_px: 9.0,
            return_px: 4.0,
            window_ms: 700,
            cooldown_ms: 1200,
            baseline_lerp: 0.18,
        }
    }
}

/// Bow detector thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BowConfig {
    /// Minimum confidence for nose and both shoulders.
    pub pose_score_min: f32,
    /// How far (px) the nose must sit below the shoulder centre.
    pub offset_px: f32,
}

impl Default for BowConfig {
    fn default() -> Self {
        Self {
            pose_score_min: 0.5,
            offset_px: 25.0,
        }
    }
}

/// Smile geometry thresholds and hold time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmileConfig {
    /// Corner raise relative to mouth width.
    pub threshold: f32,
    /// Lip gap relative to mouth width above which the mouth counts as open.
    pub mouth_open_max: f32,
    /// How long (ms) the smile must be held to unlock.
    pub hold_ms: u64,
}

impl Default for SmileConfig {
    fn default() -> Self {
        Self {
            threshold: 0.035,
            mouth_open_max: 0.12,
            hold_ms: 3000,
        }
    }
}

/// Core ritual configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RitualConfig {
    // --- Greeting ---
    /// Active greeting policy.
    pub policy: GreetingPolicy,
    pub nod: NodConfig,
    pub bow: BowConfig,

    // --- Smile ---
    pub smile: SmileConfig,
    /// Frame width (px) the face landmarks are mirrored about.
    pub reference_width_px: f32,

    // --- Unlock ---
    /// Time (ms) the box stays open before re-locking.
    pub reset_ms: u64,

    // --- Hardware / timing ---
    /// Serial baud rate of the box controller.
    pub baud_rate: u32,
    /// Interval (ms) between timer ticks when no frames arrive.
    pub tick_interval_ms: u64,
}

impl Default for RitualConfig {
    fn default() -> Self {
        Self {
            policy: GreetingPolicy::Nod,
            nod: NodConfig::default(),
            bow: BowConfig::default(),

            smile: SmileConfig::default(),
            reference_width_px: 640.0,

            reset_ms: 15_000,

            baud_rate: 9600,
            tick_interval_ms: 100,
        }
    }
}

impl RitualConfig {
    /// Reject values that would make the ritual unreachable or unstoppable.
    /// Invalid ranges are rejected, not clamped.
    pub fn validate(&self) -> Result<()> {
        let nod = &self.nod;
        let unit = 0.0..=1.0;
        if !unit.contains(&nod.pose_score_min) || !unit.contains(&self.bow.pose_score_min) {
            return Err(Error::Config("pose_score_min must be within [0, 1]"));
        }
        if nod.down_px <= 0.0 || nod.return_px >= nod.down_px {
            return Err(Error::Config("nod return_px must be below a positive down_px"));
        }
        if !(nod.baseline_lerp > 0.0 && nod.baseline_lerp <= 1.0) {
            return Err(Error::Config("nod baseline_lerp must be within (0, 1]"));
        }
        if nod.window_ms == 0 {
            return Err(Error::Config("nod window_ms must be non-zero"));
        }
        if self.bow.offset_px <= 0.0 {
            return Err(Error::Config("bow offset_px must be positive"));
        }
        if self.smile.mouth_open_max <= 0.0 {
            return Err(Error::Config("smile mouth_open_max must be positive"));
        }
        if self.smile.hold_ms == 0 || self.reset_ms == 0 {
            return Err(Error::Config("smile hold_ms and reset_ms must be non-zero"));
        }
        if self.reference_width_px <= 0.0 {
            return Err(Error::Config("reference_width_px must be positive"));
        }
        if self.baud_rate == 0 || self.tick_interval_ms == 0 {
            return Err(Error::Config("baud_rate and tick_interval_ms must be non-zero"));
        }
        Ok(())
    }
}
