//! Serial transport: scoped dispatch of one command over the locker link.
//!
//! The transport owns nothing long-lived. Every [`SerialTransport::dispatch`]
//! call opens a fresh connection through the injected [`SerialBackend`],
//! writes the whole command, performs exactly one acknowledgement read, and
//! drops the link — so the port is released on every exit path, including
//! errors. The backend is an explicit constructor dependency rather than a
//! process-wide setting, which keeps tests independent of each other.

use crate::error::{HardwareError, Result};
use crate::settings::SerialSettings;
use std::sync::Arc;
use tracing::debug;

/// A live connection capable of the two operations the controller needs.
///
/// Implemented by the real `serialport` adapter and by the in-memory mock.
/// Dropping a link closes the underlying connection.
pub trait SerialLink: Send {
    /// Write the entire buffer to the link.
    fn write_all(&mut self, data: &[u8]) -> Result<()>;

    /// Read up to `buf.len()` bytes, returning how many were read.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;
}

/// Factory that opens serial links.
///
/// Injected into [`SerialTransport`]; substituting a mock backend is how the
/// test suite and headless CI runs avoid the physical hardware.
pub trait SerialBackend: Send + Sync {
    /// Open a connection with the given settings.
    fn open(&self, settings: &SerialSettings) -> Result<Box<dyn SerialLink>>;
}

/// One-shot command dispatcher for the locker controller.
///
/// Cloning is cheap (the backend is shared); each clone dispatches through
/// the same backend with the same settings.
#[derive(Clone)]
pub struct SerialTransport {
    settings: SerialSettings,
    backend: Arc<dyn SerialBackend>,
}

impl SerialTransport {
    /// Create a transport over the given backend and settings.
    pub fn new(backend: Arc<dyn SerialBackend>, settings: SerialSettings) -> Self {
        Self { settings, backend }
    }

    /// The settings this transport opens connections with.
    pub fn settings(&self) -> &SerialSettings {
        &self.settings
    }

    /// Write one command to the controller and wait for its acknowledgement.
    ///
    /// Opens the port, writes the full buffer in one call, then performs a
    /// single blocking read for the controller's acknowledgement byte. The
    /// acknowledgement content is not validated, and the controller staying
    /// quiet until the read times out is not a failure; an open or write
    /// error is. The connection is closed on every path.
    ///
    /// This actuates physical hardware. Callers must not invoke it
    /// speculatively, and never more than once per redemption attempt; retry
    /// policy belongs to the caller, not here.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::PortUnavailable`] when the device cannot be
    /// opened, and [`HardwareError::CommunicationError`] (or `Timeout`/`Io`)
    /// when the write or a non-timeout read failure occurs.
    pub fn dispatch(&self, command: &[u8]) -> Result<()> {
        let mut link = self.backend.open(&self.settings)?;

        debug!(port = %self.settings.port, command = %hex(command), "dispatching command");
        link.write_all(command)?;

        let mut ack = [0u8; 1];
        match link.read(&mut ack) {
            Ok(n) if n > 0 => debug!(ack = ack[0], "controller acknowledged"),
            Ok(_) => debug!("controller closed without acknowledgement"),
            Err(ref e) if e.is_timeout() => {
                debug!(port = %self.settings.port, "no acknowledgement before timeout");
            }
            Err(e) => return Err(e),
        }

        Ok(())
        // link drops here, closing the port
    }
}

fn hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
