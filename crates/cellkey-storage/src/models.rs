use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A live access code bound to one locker cell.
///
/// Rows in this table are one-shot credentials: created at issuance together
/// with the code's QR artifact, and deleted when the code is successfully
/// redeemed. They are never updated in place — a row either exists (the code
/// is redeemable) or it does not.
///
/// # Fields
///
/// * `id` - Auto-increment primary key
/// * `cell` - Opaque cell identifier the code unlocks (resolver key)
/// * `code` - The access code itself (unique natural key)
/// * `created_at` - Record creation timestamp
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccessCodeRecord {
    /// Auto-increment primary key
    pub id: i64,

    /// Cell identifier this code unlocks.
    ///
    /// Must be a key known to the cell-to-locker resolver; issuance
    /// validates this before creating a row. The mapping can still drift
    /// after the fact, which redemption reports as an internal-consistency
    /// failure rather than a wrong code.
    pub cell: String,

    /// The single-use access code (unique across live rows).
    pub code: String,

    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
}
