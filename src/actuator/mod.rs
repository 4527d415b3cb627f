//! Box controller link.
//!
//! ```text
//! ┌──────────────┐   ActuatorCommand   ┌──────────────────┐   "S90\n"   ┌────────────┐
//! │ RitualService│────────────────────▶│  ActuatorChannel │────────────▶│ Transport  │
//! └──────────────┘                     │  (connect/send)  │             │ (serial)   │
//!                                      └──────────────────┘             └────────────┘
//! ```
//!
//! Wire protocol: one ASCII command per line, `\n` terminated, no
//! acknowledgement.
//!
//! | Command       | Wire     |
//! |---------------|----------|
//! | LED off       | `L0`     |
//! | LED red blink | `L1`     |
//! | LED green     | `L2`     |
//! | Servo angle   | `S<deg>` |
//! | Servo sweep   | `R`      |

pub mod channel;
pub mod transport;

use core::fmt::{self, Write as _};

use heapless::String;

pub use channel::{ActuatorChannel, ChannelStats, SendOutcome};
pub use transport::{LogProvider, LogTransport, Transport, TransportProvider};

/// Lowest servo angle the box mechanism tolerates (locked).
pub const MIN_ANGLE: u8 = 7;
/// Highest servo angle the box mechanism tolerates (open).
pub const MAX_ANGLE: u8 = 90;

/// Longest encoded line, terminator included (`S90\n`).
pub const MAX_LINE_LEN: usize = 8;

/// One wire line.
pub type WireLine = String<MAX_LINE_LEN>;

/// High-level commands understood by the box controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActuatorCommand {
    LedOff,
    LedRedBlink,
    LedGreen,
    /// Requested angle in degrees; clamped on encode.
    Servo(f32),
    /// Diagnostic sweep across the full range.
    ServoSweep,
}

impl ActuatorCommand {
    /// Servo to the fully open position.
    pub const fn servo_open() -> Self {
        Self::Servo(MAX_ANGLE as f32)
    }

    /// Servo to the locked position.
    pub const fn servo_locked() -> Self {
        Self::Servo(MIN_ANGLE as f32)
    }

    /// Encode into a wire line including the `\n` terminator.
    pub fn encode(self) -> WireLine {
        let mut line = WireLine::new();
        // Longest output is "S90\n", which always fits.
        let _ = writeln!(line, "{self}");
        line
    }
}

impl fmt::Display for ActuatorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LedOff => f.write_str("L0"),
            Self::LedRedBlink => f.write_str("L1"),
            Self::LedGreen => f.write_str("L2"),
            Self::Servo(angle) => write!(f, "S{}", clamp_angle(*angle)),
            Self::ServoSweep => f.write_str("R"),
        }
    }
}

/// Round to the nearest degree and clamp into `[MIN_ANGLE, MAX_ANGLE]`.
/// NaN maps to the locked position.
pub fn clamp_angle(angle: f32) -> u8 {
    if angle.is_nan() {
        return MIN_ANGLE;
    }
    angle.round().clamp(f32::from(MIN_ANGLE), f32::from(MAX_ANGLE)) as u8
}
