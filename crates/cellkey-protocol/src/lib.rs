//! Wire format and static mappings for the locker controller.
//!
//! The controller speaks a fixed binary protocol over a point-to-point serial
//! link: one 5-byte command per unlock, one command per physical box, no
//! framing beyond the command itself. This crate owns that command table and
//! the mapping from the opaque cell identifiers stored with access codes to
//! the physical locker numbers the controller understands.
//!
//! Both tables are compiled-in constants. Lookups are pure and total: an
//! unknown locker or cell yields `None`, never a panic and never a guessed
//! default — callers must treat `None` as a validation failure and must not
//! touch the hardware.
//!
//! # Command format
//!
//! ```text
//! [HEADER, 0x01, cell_index, 0x33, trailer]
//!   0x7A
//! ```
//!
//! The trailer byte differs per locker (0x49, 0x4A, 0x4B for lockers 1–3)
//! and looks checksum-like, but no generating formula is documented for this
//! controller. The values are treated as opaque lookup data; supporting a
//! new box means adding an explicit table entry, not computing a byte.

pub mod cells;
pub mod commands;

pub use cells::{known_cells, locker_for_cell};
pub use commands::{COMMAND_LENGTH, UnlockCommand, unlock_command};
