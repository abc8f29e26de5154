//! Error types for serial hardware operations.
//!
//! The taxonomy separates the three ways a dispatch can fail: the port (or
//! the device behind it) is not there at all, the port is there but talking
//! to it failed, or an individual operation ran out the clock.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur while driving the locker controller's serial link.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// The serial device could not be opened because it is absent or in use.
    ///
    /// This is the compiled-binary rendering of a "driver missing" condition:
    /// the library is always linked in, so the observable failure is the
    /// device node not being there.
    #[error("Serial port unavailable: {port}: {message}")]
    PortUnavailable { port: String, message: String },

    /// The port opened but a write or read failed at the transport level.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// An operation did not complete within the configured timeout.
    #[error("Operation timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// The serial settings were rejected by the driver.
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new port-unavailable error.
    pub fn port_unavailable(port: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PortUnavailable {
            port: port.into(),
            message: message.into(),
        }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    /// Create a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Whether this error is a timeout.
    ///
    /// The transport tolerates a timeout on the acknowledgement read (the
    /// controller is not required to answer) but nowhere else.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
            || matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::TimedOut)
    }
}
