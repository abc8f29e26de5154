//! In-memory serial backend for testing and headless operation.
//!
//! The mock records every open and every written frame, and can be scripted
//! to fail at the open, write, or acknowledgement-read step. Tests hold a
//! [`MockSerialHandle`] to inspect traffic and inject failures while the
//! backend itself is owned by the transport under test.

use crate::error::{HardwareError, Result};
use crate::settings::SerialSettings;
use crate::transport::{SerialBackend, SerialLink};
use std::sync::{Arc, Mutex, MutexGuard};

/// Acknowledgement byte the mock controller answers with (ASCII ACK).
pub const MOCK_ACK: u8 = 0x06;

/// Failure the mock should simulate on the next operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Opening the port fails as if the device node were absent.
    Open,

    /// Writes fail as if the cable were unplugged mid-session.
    Write,

    /// The acknowledgement read times out (controller stays silent).
    ReadTimeout,
}

#[derive(Debug, Default)]
struct MockState {
    writes: Vec<Vec<u8>>,
    opens: usize,
    failure: Option<MockFailure>,
}

/// Simulated serial backend.
///
/// # Examples
///
/// ```
/// use cellkey_hardware::mock::MockSerialBackend;
/// use cellkey_hardware::settings::SerialSettings;
/// use cellkey_hardware::transport::{SerialBackend, SerialLink};
///
/// let (backend, handle) = MockSerialBackend::new();
/// let mut link = backend.open(&SerialSettings::default()).unwrap();
/// link.write_all(&[0x7A, 0x01, 0x01, 0x33, 0x49]).unwrap();
///
/// assert_eq!(handle.writes(), vec![vec![0x7A, 0x01, 0x01, 0x33, 0x49]]);
/// ```
#[derive(Debug, Clone)]
pub struct MockSerialBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockSerialBackend {
    /// Create a mock backend and the handle used to drive it.
    pub fn new() -> (Self, MockSerialHandle) {
        let state = Arc::new(Mutex::new(MockState::default()));
        let backend = Self {
            state: Arc::clone(&state),
        };
        let handle = MockSerialHandle { state };
        (backend, handle)
    }
}

impl SerialBackend for MockSerialBackend {
    fn open(&self, settings: &SerialSettings) -> Result<Box<dyn SerialLink>> {
        let mut state = lock(&self.state);
        state.opens += 1;

        if state.failure == Some(MockFailure::Open) {
            return Err(HardwareError::port_unavailable(
                &settings.port,
                "simulated open failure",
            ));
        }

        Ok(Box::new(MockLink {
            state: Arc::clone(&self.state),
            timeout_ms: settings.timeout.as_millis() as u64,
        }))
    }
}

struct MockLink {
    state: Arc<Mutex<MockState>>,
    timeout_ms: u64,
}

impl SerialLink for MockLink {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        let mut state = lock(&self.state);

        if state.failure == Some(MockFailure::Write) {
            return Err(HardwareError::communication("simulated write failure"));
        }

        state.writes.push(data.to_vec());
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let state = lock(&self.state);

        if state.failure == Some(MockFailure::ReadTimeout) {
            return Err(HardwareError::timeout(self.timeout_ms));
        }

        if buf.is_empty() {
            return Ok(0);
        }
        buf[0] = MOCK_ACK;
        Ok(1)
    }
}

/// Handle for inspecting and scripting a [`MockSerialBackend`].
///
/// Clonable; all clones share the backend's state.
#[derive(Debug, Clone)]
pub struct MockSerialHandle {
    state: Arc<Mutex<MockState>>,
}

impl MockSerialHandle {
    /// Every frame written through the backend, in order.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        lock(&self.state).writes.clone()
    }

    /// How many times the backend has been opened.
    pub fn open_count(&self) -> usize {
        lock(&self.state).opens
    }

    /// Set (or clear) the failure the mock simulates next.
    pub fn set_failure(&self, failure: Option<MockFailure>) {
        lock(&self.state).failure = failure;
    }

    /// Forget recorded traffic and counters, keeping the failure mode.
    pub fn clear(&self) {
        let mut state = lock(&self.state);
        state.writes.clear();
        state.opens = 0;
    }
}

// A poisoned mutex only means another test thread panicked mid-assertion;
// the state itself is still usable.
fn lock(state: &Arc<Mutex<MockState>>) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}
