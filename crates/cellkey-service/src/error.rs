use crate::artifacts::ArtifactError;
use cellkey_core::LockerNumber;
use cellkey_hardware::HardwareError;
use cellkey_storage::StorageError;
use thiserror::Error;

/// Failures surfaced by the locker service.
///
/// These are operator-facing diagnostics, not user-facing text; the
/// redemption outcome enum carries the strings shown to customers. A
/// `WrongCode` is deliberately *not* an error — it is a normal outcome.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Issuance was asked for a cell the resolver does not know.
    #[error("Unknown cell identifier: {0}")]
    UnknownCell(String),

    /// No unlock command exists for the locker (table gap).
    #[error("No unlock command for locker {0}")]
    UnknownLocker(LockerNumber),

    /// A live access code references a cell that no longer resolves.
    ///
    /// Issuance validated the cell, so this means the mapping drifted
    /// after the code was issued. Kept distinct from a wrong code so logs
    /// can tell data drift from user typos.
    #[error("Live access code references cell {cell} with no locker mapping")]
    InternalConsistency { cell: String },

    /// Generation could not find an unused code within the attempt bound.
    #[error("Could not generate an unused access code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: u32 },

    /// Access code store failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// QR artifact could not be rendered or written.
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// Serial hardware failure on the direct-unlock path.
    #[error("Hardware error: {0}")]
    Hardware(#[from] HardwareError),

    /// Anything that indicates a bug rather than an environmental failure.
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
