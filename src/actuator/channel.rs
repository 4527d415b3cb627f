//! Connection lifecycle and best-effort command delivery.
//!
//! The channel owns at most one open transport handle.  Sending never
//! fails into the caller: with no handle the command is dropped, and a
//! rejected write is counted and remembered as [`ActuatorChannel::last_failure`].
//! The ritual keeps running either way.

use log::{debug, info, warn};

use super::ActuatorCommand;
use super::transport::{Transport, TransportProvider};
use crate::app::ports::ActuatorPort;
use crate::error::{Result, TransportError};

/// What happened to one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Line handed to the transport.
    Written,
    /// No open handle; command discarded.
    Dropped,
    /// The transport rejected the write.
    Failed,
}

/// Per-channel delivery counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    pub written: u32,
    pub dropped: u32,
    pub failed: u32,
}

pub struct ActuatorChannel<P: TransportProvider> {
    provider: Option<P>,
    handle: Option<P::Transport>,
    baud_rate: u32,
    stats: ChannelStats,
    last_failure: Option<TransportError>,
}

impl<P: TransportProvider> ActuatorChannel<P> {
    /// A channel that may or may not have a way to reach hardware.
    pub fn new(provider: Option<P>, baud_rate: u32) -> Self {
        Self {
            provider,
            handle: None,
            baud_rate,
            stats: ChannelStats::default(),
            last_failure: None,
        }
    }

    pub fn with_provider(provider: P, baud_rate: u32) -> Self {
        Self::new(Some(provider), baud_rate)
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Open the transport.  Calling this while connected is an error so
    /// the current handle is never leaked or silently replaced.
    pub fn connect(&mut self) -> Result<()> {
        if self.handle.is_some() {
            return Err(TransportError::AlreadyConnected.into());
        }
        let provider = self.provider.as_mut().ok_or(TransportError::Unavailable)?;
        match provider.open(self.baud_rate) {
            Ok(handle) => {
                self.handle = Some(handle);
                self.last_failure = None;
                info!("Actuator channel connected at {} baud", self.baud_rate);
                Ok(())
            }
            Err(e) => {
                warn!("Actuator channel connect failed: {}", e);
                self.last_failure = Some(e);
                Err(e.into())
            }
        }
    }

    /// Close the transport.  No-op when already disconnected.
    pub fn disconnect(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            if let Err(e) = handle.flush() {
                debug!("Actuator channel flush on close failed: {:?}", e);
            }
            info!("Actuator channel disconnected");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.handle.is_some()
    }

    // ── Delivery ──────────────────────────────────────────────

    /// Encode and write one command.  Never blocks the caller on an error.
    pub fn send(&mut self, command: ActuatorCommand) -> SendOutcome {
        let Some(handle) = self.handle.as_mut() else {
            debug!("Actuator channel closed, dropping {}", command);
            self.stats.dropped += 1;
            return SendOutcome::Dropped;
        };
        let line = command.encode();
        match handle.write_all(line.as_bytes()) {
            Ok(()) => {
                self.stats.written += 1;
                SendOutcome::Written
            }
            Err(e) => {
                warn!("Actuator write of {} failed: {:?}", command, e);
                self.stats.failed += 1;
                self.last_failure = Some(TransportError::WriteFailed);
                SendOutcome::Failed
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn stats(&self) -> ChannelStats {
        self.stats
    }

    /// Most recent connect or write failure, cleared by a successful connect.
    pub fn last_failure(&self) -> Option<TransportError> {
        self.last_failure
    }
}

impl<P: TransportProvider> ActuatorPort for ActuatorChannel<P> {
    fn send(&mut self, command: ActuatorCommand) -> SendOutcome {
        ActuatorChannel::send(self, command)
    }
}
