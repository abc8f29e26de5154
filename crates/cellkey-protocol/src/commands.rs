//! Static unlock command table for the locker controller.

use cellkey_core::LockerNumber;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of every controller command, in bytes.
pub const COMMAND_LENGTH: usize = 5;

/// First byte of every unlock command.
pub const COMMAND_HEADER: u8 = 0x7A;

/// Fixed second byte (controller revision marker, constant across boxes).
pub const COMMAND_RESERVED_1: u8 = 0x01;

/// Fixed fourth byte (constant across boxes).
pub const COMMAND_RESERVED_2: u8 = 0x33;

/// One unlock command per supported locker. The trailer bytes are opaque
/// values lifted from the controller's own tables, not computed.
const UNLOCK_COMMANDS: [(u8, [u8; COMMAND_LENGTH]); 3] = [
    (1, [0x7A, 0x01, 0x01, 0x33, 0x49]),
    (2, [0x7A, 0x01, 0x02, 0x33, 0x4A]),
    (3, [0x7A, 0x01, 0x03, 0x33, 0x4B]),
];

/// A complete 5-byte unlock command ready to be written to the serial link.
///
/// Instances only come out of [`unlock_command`]; there is no constructor
/// that builds a command from arbitrary bytes, so a value of this type is
/// always a frame the controller actually accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockCommand([u8; COMMAND_LENGTH]);

impl UnlockCommand {
    /// The raw command bytes, in wire order.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The cell index byte embedded in the command.
    #[must_use]
    pub fn cell_index(&self) -> u8 {
        self.0[2]
    }
}

impl fmt::Display for UnlockCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

/// Look up the unlock command for a physical locker.
///
/// Pure lookup with no side effects. Returns `None` for locker numbers the
/// controller does not know; callers must treat that as a validation
/// failure, not a hardware failure.
///
/// # Examples
///
/// ```
/// use cellkey_core::LockerNumber;
/// use cellkey_protocol::unlock_command;
///
/// let locker = LockerNumber::new(1).unwrap();
/// let command = unlock_command(locker).unwrap();
/// assert_eq!(command.as_bytes(), &[0x7A, 0x01, 0x01, 0x33, 0x49]);
///
/// let unknown = LockerNumber::new(9).unwrap();
/// assert!(unlock_command(unknown).is_none());
/// ```
#[must_use]
pub fn unlock_command(locker: LockerNumber) -> Option<UnlockCommand> {
    UNLOCK_COMMANDS
        .iter()
        .find(|(number, _)| *number == locker.as_u8())
        .map(|(_, bytes)| UnlockCommand(*bytes))
}
