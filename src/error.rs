//! Unified error types for the ritual controller.
//!
//! A single `Error` enum that every subsystem converts into.  All variants
//! are `Copy` so they can be passed through the channel statistics and the
//! binary's status reporting without allocation.
//!
//! Nothing in the detection or state machine layers returns these: bad
//! input is "no signal", never an error.  Only configuration and the
//! actuator transport boundary can fail.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The actuator transport could not be opened or written.
    Transport(TransportError),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
    /// An inbound frame record could not be parsed.
    Input(&'static str),
    /// The inbox has no room for another subscription.
    SubscriptionsFull,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Input(msg) => write!(f, "input: {msg}"),
            Self::SubscriptionsFull => write!(f, "inbox: subscription table full"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// No transport capability was handed to the channel.
    Unavailable,
    /// `connect` was called while a handle is already open.
    AlreadyConnected,
    /// The provider failed to open the byte stream.
    OpenFailed,
    /// The open stream rejected a write.
    WriteFailed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "no transport available"),
            Self::AlreadyConnected => write!(f, "already connected"),
            Self::OpenFailed => write!(f, "open failed"),
            Self::WriteFailed => write!(f, "write failed"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
