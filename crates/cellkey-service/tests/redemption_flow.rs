//! End-to-end lifecycle tests against the simulated serial controller.
//!
//! These exercise the full issue → redeem → retire flow with an in-memory
//! database, a temp-dir artifact root, and the mock serial backend, checking
//! both the happy path and the no-op guarantees around failures.
//!
//! Run with: cargo test --package cellkey-service --test redemption_flow

use cellkey_core::LockerNumber;
use cellkey_hardware::{MockFailure, MockSerialBackend, MockSerialHandle, SerialSettings, SerialTransport};
use cellkey_service::{LockerService, QrArtifactStore, RedeemOutcome, ServiceError};
use cellkey_storage::{AccessCodeRepository, Database, SqliteAccessCodeRepository};
use std::sync::Arc;
use tempfile::TempDir;

const CELL_1: &str = "89E154gs12828";
const CELL_2: &str = "34r0361R8t765";
const CELL_3: &str = "416d61g56D509";

struct Harness {
    db: Database,
    repo: SqliteAccessCodeRepository,
    service: LockerService<SqliteAccessCodeRepository>,
    serial: MockSerialHandle,
    _artifact_dir: TempDir,
}

async fn harness() -> Harness {
    let db = Database::in_memory().await.unwrap();
    let repo = SqliteAccessCodeRepository::new(db.pool().clone());

    let (backend, serial) = MockSerialBackend::new();
    let transport = SerialTransport::new(Arc::new(backend), SerialSettings::default());

    let artifact_dir = tempfile::tempdir().unwrap();
    let service = LockerService::new(
        repo.clone(),
        transport,
        QrArtifactStore::new(artifact_dir.path()),
    );

    Harness {
        db,
        repo,
        service,
        serial,
        _artifact_dir: artifact_dir,
    }
}

#[tokio::test]
async fn issue_creates_code_record_and_artifact() {
    let h = harness().await;

    let issued = h.service.issue(CELL_1).await.unwrap();

    assert_eq!(issued.code.as_str().len(), 12);
    assert!(issued.code.as_str().bytes().all(|b| b.is_ascii_digit()));
    assert_eq!(issued.cell, CELL_1);
    assert_eq!(issued.locker.as_u8(), 1);

    let record = h.repo.find_by_code(issued.code.as_str()).await.unwrap().unwrap();
    assert_eq!(record.cell, CELL_1);

    assert!(issued.artifact_path.exists());
    assert_eq!(
        issued.artifact_path.file_name().unwrap().to_str().unwrap(),
        format!("{}.png", issued.code.as_str())
    );

    // Issuance alone never touches the hardware.
    assert_eq!(h.serial.open_count(), 0);

    h.db.close().await;
}

#[tokio::test]
async fn redeem_dispatches_exact_command_and_retires_code() {
    let h = harness().await;
    let issued = h.service.issue(CELL_1).await.unwrap();

    let outcome = h.service.redeem(issued.code.as_str()).await.unwrap();

    assert_eq!(outcome, RedeemOutcome::Unlocked);
    assert_eq!(h.serial.writes(), vec![vec![0x7A, 0x01, 0x01, 0x33, 0x49]]);
    assert!(!issued.artifact_path.exists());
    assert!(h.repo.find_by_code(issued.code.as_str()).await.unwrap().is_none());

    h.db.close().await;
}

#[tokio::test]
async fn second_and_third_cells_use_their_own_commands() {
    let h = harness().await;

    let issued = h.service.issue(CELL_2).await.unwrap();
    h.service.redeem(issued.code.as_str()).await.unwrap();
    let issued = h.service.issue(CELL_3).await.unwrap();
    h.service.redeem(issued.code.as_str()).await.unwrap();

    assert_eq!(
        h.serial.writes(),
        vec![
            vec![0x7A, 0x01, 0x02, 0x33, 0x4A],
            vec![0x7A, 0x01, 0x03, 0x33, 0x4B],
        ]
    );

    h.db.close().await;
}

#[tokio::test]
async fn retired_code_cannot_be_redeemed_again() {
    let h = harness().await;
    let issued = h.service.issue(CELL_1).await.unwrap();

    assert_eq!(
        h.service.redeem(issued.code.as_str()).await.unwrap(),
        RedeemOutcome::Unlocked
    );
    h.serial.clear();

    assert_eq!(
        h.service.redeem(issued.code.as_str()).await.unwrap(),
        RedeemOutcome::WrongCode
    );
    assert_eq!(h.serial.open_count(), 0);

    h.db.close().await;
}

#[tokio::test]
async fn never_issued_code_is_wrong_and_touches_nothing() {
    let h = harness().await;

    assert_eq!(
        h.service.redeem("000000000000").await.unwrap(),
        RedeemOutcome::WrongCode
    );
    // Malformed codes short-circuit the same way.
    assert_eq!(
        h.service.redeem("not-a-code").await.unwrap(),
        RedeemOutcome::WrongCode
    );

    assert_eq!(h.serial.open_count(), 0);
    assert_eq!(h.repo.count().await.unwrap(), 0);

    h.db.close().await;
}

#[tokio::test]
async fn unknown_cell_issues_nothing() {
    let h = harness().await;

    let err = h.service.issue("unknown-cell").await.unwrap_err();

    assert!(matches!(err, ServiceError::UnknownCell(_)));
    assert_eq!(h.repo.count().await.unwrap(), 0);
    assert_eq!(h.serial.open_count(), 0);

    h.db.close().await;
}

#[tokio::test]
async fn hardware_failure_preserves_code_for_retry() {
    let h = harness().await;
    let issued = h.service.issue(CELL_1).await.unwrap();

    h.serial.set_failure(Some(MockFailure::Write));
    assert_eq!(
        h.service.redeem(issued.code.as_str()).await.unwrap(),
        RedeemOutcome::HardwareFailure
    );

    // No partial retirement: record and artifact both still there.
    assert!(h.repo.find_by_code(issued.code.as_str()).await.unwrap().is_some());
    assert!(issued.artifact_path.exists());

    // A later attempt with working hardware still succeeds.
    h.serial.set_failure(None);
    assert_eq!(
        h.service.redeem(issued.code.as_str()).await.unwrap(),
        RedeemOutcome::Unlocked
    );
    assert!(!issued.artifact_path.exists());
    assert!(h.repo.find_by_code(issued.code.as_str()).await.unwrap().is_none());

    h.db.close().await;
}

#[tokio::test]
async fn open_failure_preserves_code_for_retry() {
    let h = harness().await;
    let issued = h.service.issue(CELL_2).await.unwrap();

    h.serial.set_failure(Some(MockFailure::Open));
    assert_eq!(
        h.service.redeem(issued.code.as_str()).await.unwrap(),
        RedeemOutcome::HardwareFailure
    );
    assert!(h.repo.find_by_code(issued.code.as_str()).await.unwrap().is_some());

    h.db.close().await;
}

#[tokio::test]
async fn silent_controller_still_counts_as_unlocked() {
    let h = harness().await;
    let issued = h.service.issue(CELL_1).await.unwrap();

    h.serial.set_failure(Some(MockFailure::ReadTimeout));
    assert_eq!(
        h.service.redeem(issued.code.as_str()).await.unwrap(),
        RedeemOutcome::Unlocked
    );

    h.db.close().await;
}

#[tokio::test]
async fn issued_codes_are_unique() {
    let h = harness().await;

    let mut codes = std::collections::HashSet::new();
    for cell in [CELL_1, CELL_2, CELL_3, CELL_1, CELL_2, CELL_3] {
        let issued = h.service.issue(cell).await.unwrap();
        assert!(codes.insert(issued.code.as_str().to_string()));
    }
    assert_eq!(h.repo.count().await.unwrap(), 6);

    h.db.close().await;
}

#[tokio::test]
async fn drifted_record_is_internal_consistency_not_wrong_code() {
    let h = harness().await;

    // A record whose cell fell out of the mapping after issuance.
    h.repo.create("cell-removed-from-site", "123412341234").await.unwrap();

    let err = h.service.redeem("123412341234").await.unwrap_err();
    assert!(matches!(err, ServiceError::InternalConsistency { .. }));
    assert_eq!(h.serial.open_count(), 0);
    // The record is left for an operator to look at.
    assert!(h.repo.find_by_code("123412341234").await.unwrap().is_some());

    h.db.close().await;
}

#[tokio::test]
async fn direct_unlock_bypasses_codes() {
    let h = harness().await;

    h.service
        .open_locker(LockerNumber::new(2).unwrap())
        .await
        .unwrap();

    assert_eq!(h.serial.writes(), vec![vec![0x7A, 0x01, 0x02, 0x33, 0x4A]]);
    assert_eq!(h.repo.count().await.unwrap(), 0);

    h.db.close().await;
}

#[tokio::test]
async fn direct_unlock_of_unknown_locker_never_touches_hardware() {
    let h = harness().await;

    let err = h
        .service
        .open_locker(LockerNumber::new(9).unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::UnknownLocker(_)));
    assert_eq!(h.serial.open_count(), 0);

    h.db.close().await;
}

#[tokio::test]
async fn concurrent_redemptions_actuate_once() {
    let h = harness().await;
    let issued = h.service.issue(CELL_1).await.unwrap();
    let code = issued.code.as_str();

    let (a, b) = tokio::join!(h.service.redeem(code), h.service.redeem(code));
    let (a, b) = (a.unwrap(), b.unwrap());

    // The port guard serializes the two attempts: exactly one unlock, the
    // other sees the already-retired code.
    assert_eq!(h.serial.writes().len(), 1);
    assert!(
        (a == RedeemOutcome::Unlocked && b == RedeemOutcome::WrongCode)
            || (a == RedeemOutcome::WrongCode && b == RedeemOutcome::Unlocked),
        "unexpected outcomes: {a:?} / {b:?}"
    );

    h.db.close().await;
}
