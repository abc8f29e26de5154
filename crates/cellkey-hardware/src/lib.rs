//! Serial hardware layer for the cellkey parcel locker system.
//!
//! This crate drives the locker controller over its point-to-point serial
//! link. The design keeps the seam between "what to send" and "how to send
//! it" explicit:
//!
//! - [`SerialLink`] / [`SerialBackend`] are the capability traits — a link
//!   can write bytes and read bytes, a backend can open links.
//! - [`SerialTransport`] performs the one dispatch shape the controller
//!   understands: open, write the whole command, one acknowledgement read,
//!   close. No retries, no connection reuse.
//! - [`SerialportBackend`] is the production backend; [`MockSerialBackend`]
//!   is the scripted in-memory double used by tests and headless runs.
//!
//! The backend is injected at construction. Nothing in this crate is a
//! process-wide mutable setting, so parallel tests can each own their own
//! transport without interfering.
//!
//! # Examples
//!
//! ```
//! use cellkey_hardware::mock::MockSerialBackend;
//! use cellkey_hardware::settings::SerialSettings;
//! use cellkey_hardware::transport::SerialTransport;
//! use std::sync::Arc;
//!
//! let (backend, handle) = MockSerialBackend::new();
//! let transport = SerialTransport::new(Arc::new(backend), SerialSettings::default());
//!
//! transport.dispatch(&[0x7A, 0x01, 0x01, 0x33, 0x49]).unwrap();
//! assert_eq!(handle.writes().len(), 1);
//! ```

pub mod error;
pub mod mock;
pub mod serial;
pub mod settings;
pub mod transport;

pub use error::{HardwareError, Result};
pub use mock::{MockFailure, MockSerialBackend, MockSerialHandle};
pub use serial::SerialportBackend;
pub use settings::{DataBits, Parity, SerialSettings, StopBits};
pub use transport::{SerialBackend, SerialLink, SerialTransport};

use std::sync::Arc;
use tracing::info;

/// Environment variable that selects the serial backend.
///
/// Set to `mock` for headless or CI execution without hardware; any other
/// value (or unset) selects the real serialport backend.
pub const SERIAL_BACKEND_ENV: &str = "CELLKEY_SERIAL_BACKEND";

/// Choose a serial backend from the environment.
///
/// This is a composition-root convenience for binaries; libraries and tests
/// should inject a backend directly into [`SerialTransport::new`].
pub fn backend_from_env() -> Arc<dyn SerialBackend> {
    match std::env::var(SERIAL_BACKEND_ENV) {
        Ok(value) if value.eq_ignore_ascii_case("mock") => {
            info!("using environment-configured mock serial backend");
            let (backend, _handle) = MockSerialBackend::new();
            Arc::new(backend)
        }
        _ => Arc::new(SerialportBackend::new()),
    }
}
