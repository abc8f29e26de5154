//! Domain-level constants for the parcel locker system.
//!
//! Values that encode controller or credential policy live here so that the
//! protocol, storage, and service crates agree on them. The wire-format byte
//! values themselves belong to `cellkey-protocol`.

/// Length of a generated access code, in ASCII digits.
///
/// Codes are uniform random digit strings of exactly this length. With a
/// 10^12 code space and at most a handful of live codes (one per cell),
/// collisions are negligible, but issuance still verifies uniqueness against
/// the store before inserting.
pub const ACCESS_CODE_LENGTH: usize = 12;

/// Upper bound on generate-and-check attempts during issuance.
///
/// Generation retries when a candidate code already exists in the store.
/// Exhausting this bound indicates something is badly wrong (a broken RNG or
/// a saturated code space) and is reported as an internal error rather than
/// looping forever.
pub const MAX_CODE_GENERATION_ATTEMPTS: u32 = 10;

/// Number of leading digits of an access code that may appear in logs.
///
/// Codes are single-use credentials; log lines carry only this prefix so a
/// leaked log cannot be replayed against a locker.
pub const CODE_LOG_PREFIX_LEN: usize = 4;

/// Lowest locker number addressable by the controller.
pub const MIN_LOCKER_NUMBER: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_shorter_than_code() {
        assert!(CODE_LOG_PREFIX_LEN < ACCESS_CODE_LENGTH);
    }
}
