//! Transport abstraction: any writable byte stream to the box controller.
//!
//! Concrete implementations:
//! - USB serial ([`crate::adapters::serial`], behind the `serial` feature)
//! - Log-only dry run ([`LogTransport`])
//!
//! The channel is generic over [`TransportProvider`], so the mechanics of
//! obtaining a stream stay outside the core.

use log::info;

use crate::error::TransportError;

/// Byte-oriented, write-only channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Write all of `data`.
    fn write_all(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Capability to open a [`Transport`].  Handed to the channel once.
pub trait TransportProvider {
    type Transport: Transport;

    /// Open a stream at `baud_rate`.
    fn open(&mut self, baud_rate: u32) -> Result<Self::Transport, TransportError>;
}

/// Logs every line instead of writing to hardware.
#[derive(Debug, Default)]
pub struct LogTransport {
    lines_written: usize,
}

impl LogTransport {
    pub fn lines_written(&self) -> usize {
        self.lines_written
    }
}

impl Transport for LogTransport {
    type Error = ();

    fn write_all(&mut self, data: &[u8]) -> Result<(), ()> {
        let text = core::str::from_utf8(data).map_err(|_| ())?;
        info!("WIRE  | {}", text.trim_end());
        self.lines_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

/// Provider for [`LogTransport`]; opening always succeeds.
#[derive(Debug, Default)]
pub struct LogProvider;

impl TransportProvider for LogProvider {
    type Transport = LogTransport;

    fn open(&mut self, baud_rate: u32) -> Result<LogTransport, TransportError> {
        info!("WIRE  | dry run at {} baud", baud_rate);
        Ok(LogTransport::default())
    }
}
