//! Access code lifecycle manager.
//!
//! Owns the full life of an unlock credential: issuance (generate, render
//! artifact, persist), redemption (validate exactly once, dispatch, retire),
//! and the dashboard's direct-unlock path that bypasses codes entirely.

use crate::artifacts::QrArtifactStore;
use crate::error::{ServiceError, ServiceResult};
use cellkey_core::constants::{ACCESS_CODE_LENGTH, MAX_CODE_GENERATION_ATTEMPTS};
use cellkey_core::{AccessCode, LockerNumber};
use cellkey_hardware::{HardwareError, SerialTransport};
use cellkey_protocol::{UnlockCommand, locker_for_cell, unlock_command};
use cellkey_storage::AccessCodeRepository;
use rand::Rng;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Result of an issuance: the new credential and where its artifact landed.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    /// The freshly generated access code.
    pub code: AccessCode,

    /// Cell identifier the code unlocks.
    pub cell: String,

    /// Physical locker the cell resolves to.
    pub locker: LockerNumber,

    /// Path of the written QR artifact.
    pub artifact_path: PathBuf,
}

/// Outcome of a redemption attempt.
///
/// Redemption failures that are part of normal operation (a wrong code, the
/// hardware not responding) are outcomes, not errors; [`ServiceError`] is
/// reserved for conditions that need an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemOutcome {
    /// The locker opened and the code was retired.
    Unlocked,

    /// No live code matched; nothing happened.
    WrongCode,

    /// The code matched but the controller could not be driven. The code
    /// stays valid for a later retry.
    HardwareFailure,
}

impl RedeemOutcome {
    /// Whether the locker actually opened.
    pub fn is_unlocked(&self) -> bool {
        matches!(self, Self::Unlocked)
    }

    /// Text the kiosk shows the customer for this outcome.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Unlocked => "Locker open",
            Self::WrongCode => "Wrong Code",
            Self::HardwareFailure => "Unable to open the locker. Please try again.",
        }
    }
}

/// The locker command dispatch and access-code lifecycle service.
///
/// One instance serves the whole process. All hardware access — redemption
/// and direct unlock alike — is serialized behind an internal per-port
/// mutex: the serial port is a singleton physical resource, and holding the
/// guard across the whole lookup-dispatch-retire sequence also prevents two
/// concurrent redemptions of the same code from both reaching the hardware.
pub struct LockerService<R> {
    repo: R,
    transport: SerialTransport,
    artifacts: QrArtifactStore,
    port_guard: Mutex<()>,
}

impl<R: AccessCodeRepository> LockerService<R> {
    /// Create a service over the given store, transport, and artifact root.
    pub fn new(repo: R, transport: SerialTransport, artifacts: QrArtifactStore) -> Self {
        Self {
            repo,
            transport,
            artifacts,
            port_guard: Mutex::new(()),
        }
    }

    /// The artifact store this service writes QR images through.
    pub fn artifacts(&self) -> &QrArtifactStore {
        &self.artifacts
    }

    /// Issue a new single-use access code for `cell`.
    ///
    /// Validates the cell against the resolver first — an unknown cell
    /// creates nothing. The QR artifact is written *before* the database
    /// record so a crash in between can only orphan a harmless image,
    /// never leave a redeemable code without its artifact.
    ///
    /// # Errors
    ///
    /// [`ServiceError::UnknownCell`] for unmapped cells,
    /// [`ServiceError::CodeSpaceExhausted`] if generation cannot find an
    /// unused code, plus storage/artifact failures.
    pub async fn issue(&self, cell: &str) -> ServiceResult<IssuedCode> {
        let Some(locker) = locker_for_cell(cell) else {
            debug!(cell, "refusing to issue for unknown cell");
            return Err(ServiceError::UnknownCell(cell.to_string()));
        };

        let code = self.generate_unused_code().await?;
        let artifact_path = self.artifacts.write(&code)?;
        self.repo.create(cell, code.as_str()).await?;

        info!(cell, %locker, code = %code, "issued access code");
        Ok(IssuedCode {
            code,
            cell: cell.to_string(),
            locker,
            artifact_path,
        })
    }

    /// Redeem a presented code: validate it, drive the hardware, retire it.
    ///
    /// The record and artifact are deleted only after a successful
    /// dispatch; on hardware failure both stay untouched and the same code
    /// remains redeemable. The whole sequence runs under the port guard,
    /// so a code can be actuated at most once no matter how many requests
    /// present it concurrently.
    pub async fn redeem(&self, presented: &str) -> ServiceResult<RedeemOutcome> {
        // A code that cannot even be well-formed cannot be in the store.
        let Ok(code) = AccessCode::new(presented) else {
            debug!(len = presented.len(), "malformed code presented");
            return Ok(RedeemOutcome::WrongCode);
        };

        let _flight = self.port_guard.lock().await;

        let Some(record) = self.repo.find_by_code(code.as_str()).await? else {
            debug!(code = %code, "no live access code matches");
            return Ok(RedeemOutcome::WrongCode);
        };

        let Some(locker) = locker_for_cell(&record.cell) else {
            error!(cell = %record.cell, code = %code, "live code references unmapped cell");
            return Err(ServiceError::InternalConsistency { cell: record.cell });
        };
        let Some(command) = unlock_command(locker) else {
            error!(%locker, "resolved locker has no unlock command");
            return Err(ServiceError::UnknownLocker(locker));
        };

        match self.dispatch(command).await? {
            Ok(()) => {
                // Best-effort artifact cleanup first, then the record. A
                // missing artifact never blocks retirement.
                self.artifacts.remove(&code);
                self.repo.delete_by_code(code.as_str()).await?;
                info!(%locker, code = %code, "locker opened, code retired");
                Ok(RedeemOutcome::Unlocked)
            }
            Err(e) => {
                warn!(%locker, code = %code, error = %e, "dispatch failed, code preserved");
                Ok(RedeemOutcome::HardwareFailure)
            }
        }
    }

    /// Open a locker directly, bypassing access codes (dashboard path).
    ///
    /// Same validation and dispatch as redemption, minus any record or
    /// artifact involvement.
    pub async fn open_locker(&self, locker: LockerNumber) -> ServiceResult<()> {
        let Some(command) = unlock_command(locker) else {
            debug!(%locker, "refusing direct unlock of unknown locker");
            return Err(ServiceError::UnknownLocker(locker));
        };

        let _flight = self.port_guard.lock().await;
        self.dispatch(command).await?.map_err(ServiceError::Hardware)?;

        info!(%locker, "locker opened directly");
        Ok(())
    }

    /// Run the blocking serial dispatch off the async worker.
    ///
    /// The outer error is a task failure (a bug); the inner result is the
    /// hardware's verdict, which redemption maps to an outcome.
    async fn dispatch(
        &self,
        command: UnlockCommand,
    ) -> ServiceResult<Result<(), HardwareError>> {
        let transport = self.transport.clone();
        tokio::task::spawn_blocking(move || transport.dispatch(command.as_bytes()))
            .await
            .map_err(|e| ServiceError::Internal(format!("dispatch task failed: {e}")))
    }

    /// Generate a code no live record is using.
    ///
    /// Collisions are near-impossible in a 10^12 space, but the loop is
    /// bounded anyway so a pathological store can't hang issuance.
    async fn generate_unused_code(&self) -> ServiceResult<AccessCode> {
        for _ in 0..MAX_CODE_GENERATION_ATTEMPTS {
            let candidate = random_code()?;
            if !self.repo.exists_by_code(candidate.as_str()).await? {
                return Ok(candidate);
            }
            debug!(prefix = candidate.prefix(), "code collision, regenerating");
        }

        Err(ServiceError::CodeSpaceExhausted {
            attempts: MAX_CODE_GENERATION_ATTEMPTS,
        })
    }
}

/// Uniform random digit string of the configured length.
///
/// The thread RNG is not cryptographic, which is acceptable for short-lived
/// single-use physical-access codes; uniqueness comes from the store check,
/// not from statistics.
fn random_code() -> ServiceResult<AccessCode> {
    let mut rng = rand::rng();
    let digits: String = (0..ACCESS_CODE_LENGTH)
        .map(|_| char::from(b'0' + rng.random_range(0u8..10)))
        .collect();

    AccessCode::new(&digits)
        .map_err(|e| ServiceError::Internal(format!("generated code invalid: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_codes_are_all_digits() {
        for _ in 0..100 {
            let code = random_code().unwrap();
            assert_eq!(code.as_str().len(), ACCESS_CODE_LENGTH);
            assert!(code.as_str().bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn outcome_messages_match_kiosk_text() {
        assert_eq!(RedeemOutcome::WrongCode.user_message(), "Wrong Code");
        assert_eq!(
            RedeemOutcome::HardwareFailure.user_message(),
            "Unable to open the locker. Please try again."
        );
        assert!(RedeemOutcome::Unlocked.is_unlocked());
        assert!(!RedeemOutcome::HardwareFailure.is_unlocked());
    }
}
