//! Mapping from cell identifiers to physical locker numbers.
//!
//! Access code records store an opaque cell identifier, not a locker number;
//! this table is the single place where those identifiers resolve to the
//! box index the controller expects. The identifiers are deployment keys,
//! not derived data — a new cell requires a new entry here and a matching
//! command in [`crate::commands`].

use cellkey_core::LockerNumber;

/// Compiled-in cell → locker mapping for the deployed cabinet.
const CELL_TO_LOCKER: [(&str, u8); 3] = [
    ("89E154gs12828", 1),
    ("34r0361R8t765", 2),
    ("416d61g56D509", 3),
];

/// Resolve a cell identifier to its physical locker number.
///
/// Pure lookup. Returns `None` for identifiers outside the mapping; both
/// issuance and redemption must short-circuit on `None` without touching
/// the hardware.
///
/// # Examples
///
/// ```
/// use cellkey_protocol::locker_for_cell;
///
/// assert_eq!(locker_for_cell("89E154gs12828").unwrap().as_u8(), 1);
/// assert!(locker_for_cell("not-a-cell").is_none());
/// ```
#[must_use]
pub fn locker_for_cell(cell: &str) -> Option<LockerNumber> {
    CELL_TO_LOCKER
        .iter()
        .find(|(identifier, _)| *identifier == cell)
        .and_then(|(_, number)| LockerNumber::new(*number).ok())
}

/// Iterate over every cell identifier known to this deployment.
///
/// Used by the dashboard to enumerate cells when generating codes.
pub fn known_cells() -> impl Iterator<Item = &'static str> {
    CELL_TO_LOCKER.iter().map(|(identifier, _)| *identifier)
}
