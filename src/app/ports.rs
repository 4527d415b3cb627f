//! Port traits: the hexagonal boundary between ritual logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ RitualService (domain)
//! ```
//!
//! Driven adapters (actuator channel, UI/log sinks, clocks, config files)
//! implement these traits.  The [`RitualService`](super::service::RitualService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::actuator::{ActuatorCommand, SendOutcome};
use crate::config::RitualConfig;

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → box controller)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command the box.
///
/// Delivery is best effort.  The returned outcome is informational; the
/// ritual never waits on or reacts to it.
pub trait ActuatorPort {
    fn send(&mut self, command: ActuatorCommand) -> SendOutcome;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → UI / logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (log, progress bar,
/// status text).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads ritual configuration.
///
/// Implementations MUST validate before returning; invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not clamped.
pub trait ConfigPort {
    /// Returns [`RitualConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<RitualConfig, ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored config failed to parse.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
