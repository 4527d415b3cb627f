//! USB serial transport to the box controller.
//!
//! 8N1, no flow control.  Writes time out quickly so a wedged controller
//! shows up as a failed send instead of a stalled ritual.

use std::io::Write;
use std::time::Duration;

use log::{info, warn};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::actuator::{Transport, TransportProvider};
use crate::error::TransportError;

const WRITE_TIMEOUT: Duration = Duration::from_millis(200);

/// Opens a serial device by path (`/dev/ttyACM0`, `COM3`, ...).
#[derive(Debug, Clone)]
pub struct SerialProvider {
    path: String,
}

impl SerialProvider {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl TransportProvider for SerialProvider {
    type Transport = SerialTransport;

    fn open(&mut self, baud_rate: u32) -> Result<SerialTransport, TransportError> {
        let port = serialport::new(self.path.as_str(), baud_rate)
            .data_bits(DataBits::Eight)
            .flow_control(FlowControl::None)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(WRITE_TIMEOUT)
            .open()
            .map_err(|e| {
                warn!("Serial: cannot open {}: {}", self.path, e);
                TransportError::OpenFailed
            })?;
        info!("Serial: opened {} at {} baud", self.path, baud_rate);
        Ok(SerialTransport { port })
    }
}

pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl Transport for SerialTransport {
    type Error = std::io::Error;

    fn write_all(&mut self, data: &[u8]) -> Result<(), std::io::Error> {
        self.port.write_all(data)
    }

    fn flush(&mut self) -> Result<(), std::io::Error> {
        self.port.flush()
    }
}
