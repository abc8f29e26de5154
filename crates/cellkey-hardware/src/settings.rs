//! Serial link configuration.
//!
//! The controller hangs off a single point-to-point RS-232 adapter with
//! fixed framing. These defaults match the deployed hardware; tests and the
//! CLI override the port (and the backend) rather than the framing.

use std::time::Duration;

/// Default serial device for the deployed cabinet.
pub const DEFAULT_SERIAL_PORT: &str = "/dev/ttyUSB0";

/// Default baud rate expected by the controller.
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default per-operation timeout for the serial link.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

/// Parity checking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Odd,
    Even,
}

/// Number of stop bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}

/// Complete configuration for opening the controller link.
///
/// Defaults mirror the deployed hardware: 9600 baud, 8 data bits, no
/// parity, 1 stop bit, 10 second timeout.
///
/// # Examples
///
/// ```
/// use cellkey_hardware::settings::SerialSettings;
/// use std::time::Duration;
///
/// let settings = SerialSettings::new("/dev/ttyS1").timeout(Duration::from_secs(2));
/// assert_eq!(settings.port, "/dev/ttyS1");
/// assert_eq!(settings.baud_rate, 9600);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSettings {
    /// Path of the serial device.
    pub port: String,

    /// Line speed in baud.
    pub baud_rate: u32,

    /// Data bits per character.
    pub data_bits: DataBits,

    /// Parity mode.
    pub parity: Parity,

    /// Stop bits per character.
    pub stop_bits: StopBits,

    /// Timeout applied to open, write, and read operations.
    pub timeout: Duration,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_SERIAL_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl SerialSettings {
    /// Create settings for the given port with default framing.
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Default::default()
        }
    }

    /// Set the baud rate.
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the operation timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the data bits.
    pub fn data_bits(mut self, data_bits: DataBits) -> Self {
        self.data_bits = data_bits;
        self
    }

    /// Set the parity mode.
    pub fn parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    /// Set the stop bits.
    pub fn stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }
}
