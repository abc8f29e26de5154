//! Real serial backend built on the `serialport` crate.

use crate::error::{HardwareError, Result};
use crate::settings::{DataBits, Parity, SerialSettings, StopBits};
use crate::transport::{SerialBackend, SerialLink};
use std::io::{Read, Write};
use tracing::warn;

/// Backend that opens real serial devices through `serialport`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialportBackend;

impl SerialportBackend {
    /// Create a new serialport-backed backend.
    pub fn new() -> Self {
        Self
    }
}

impl SerialBackend for SerialportBackend {
    fn open(&self, settings: &SerialSettings) -> Result<Box<dyn SerialLink>> {
        let port = serialport::new(settings.port.clone(), settings.baud_rate)
            .data_bits(data_bits(settings.data_bits))
            .parity(parity(settings.parity))
            .stop_bits(stop_bits(settings.stop_bits))
            .timeout(settings.timeout)
            .open()
            .map_err(|e| map_open_error(&settings.port, e))?;

        Ok(Box::new(SerialportLink {
            port,
            timeout_ms: settings.timeout.as_millis() as u64,
        }))
    }
}

struct SerialportLink {
    port: Box<dyn serialport::SerialPort>,
    timeout_ms: u64,
}

impl SerialLink for SerialportLink {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.port
            .write_all(data)
            .map_err(|e| map_io_error(e, self.timeout_ms))?;
        self.port
            .flush()
            .map_err(|e| map_io_error(e, self.timeout_ms))?;
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.port
            .read(buf)
            .map_err(|e| map_io_error(e, self.timeout_ms))
    }
}

fn map_open_error(port: &str, error: serialport::Error) -> HardwareError {
    warn!(port, %error, "failed to open serial port");
    match error.kind() {
        serialport::ErrorKind::NoDevice => {
            HardwareError::port_unavailable(port, error.to_string())
        }
        serialport::ErrorKind::InvalidInput => HardwareError::configuration(error.to_string()),
        _ => HardwareError::communication(error.to_string()),
    }
}

fn map_io_error(error: std::io::Error, timeout_ms: u64) -> HardwareError {
    match error.kind() {
        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
            HardwareError::timeout(timeout_ms)
        }
        _ => HardwareError::communication(error.to_string()),
    }
}

fn data_bits(bits: DataBits) -> serialport::DataBits {
    match bits {
        DataBits::Five => serialport::DataBits::Five,
        DataBits::Six => serialport::DataBits::Six,
        DataBits::Seven => serialport::DataBits::Seven,
        DataBits::Eight => serialport::DataBits::Eight,
    }
}

fn parity(parity: Parity) -> serialport::Parity {
    match parity {
        Parity::None => serialport::Parity::None,
        Parity::Odd => serialport::Parity::Odd,
        Parity::Even => serialport::Parity::Even,
    }
}

fn stop_bits(bits: StopBits) -> serialport::StopBits {
    match bits {
        StopBits::One => serialport::StopBits::One,
        StopBits::Two => serialport::StopBits::Two,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framing_enums_map_one_to_one() {
        assert_eq!(data_bits(DataBits::Eight), serialport::DataBits::Eight);
        assert_eq!(data_bits(DataBits::Five), serialport::DataBits::Five);
        assert_eq!(parity(Parity::None), serialport::Parity::None);
        assert_eq!(parity(Parity::Even), serialport::Parity::Even);
        assert_eq!(stop_bits(StopBits::One), serialport::StopBits::One);
        assert_eq!(stop_bits(StopBits::Two), serialport::StopBits::Two);
    }

    #[test]
    fn no_device_maps_to_port_unavailable() {
        let err = map_open_error(
            "/dev/ttyUSB9",
            serialport::Error::new(serialport::ErrorKind::NoDevice, "gone"),
        );
        assert!(matches!(err, HardwareError::PortUnavailable { .. }));
    }

    #[test]
    fn io_timeout_maps_to_timeout() {
        let err = map_io_error(std::io::Error::new(std::io::ErrorKind::TimedOut, "t"), 10_000);
        assert!(err.is_timeout());
    }
}
