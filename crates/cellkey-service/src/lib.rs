//! Locker command dispatch and access-code lifecycle.
//!
//! This crate ties the workspace together: it generates and persists
//! single-use access codes bound to QR artifacts, validates a presented code
//! exactly once, translates cells to controller commands, drives them over
//! the serial transport, and retires the code atomically with a successful
//! unlock.
//!
//! # Flow
//!
//! ```text
//! issue(cell)    resolver ─→ generate code ─→ QR artifact ─→ record
//! redeem(code)   record ─→ resolver ─→ command table ─→ serial dispatch
//!                 └─ on success only: remove artifact, delete record
//! open_locker(n) command table ─→ serial dispatch        (dashboard path)
//! ```
//!
//! A single access code moves `Issued → Issued` on every failed redemption
//! (unlimited retries) and `Issued → Retired` on the first successful one;
//! retired is terminal — both the record and the artifact are gone.
//!
//! Concurrent redemptions are serialized behind a per-port guard inside
//! [`LockerService`], so one code can actuate the hardware at most once.
//!
//! # Examples
//!
//! ```no_run
//! use cellkey_hardware::{SerialSettings, SerialTransport, SerialportBackend};
//! use cellkey_service::{LockerService, QrArtifactStore};
//! use cellkey_storage::{Database, DatabaseConfig, SqliteAccessCodeRepository};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(DatabaseConfig::new("cellkey.db")).await?;
//! let repo = SqliteAccessCodeRepository::new(db.pool().clone());
//! let transport = SerialTransport::new(
//!     Arc::new(SerialportBackend::new()),
//!     SerialSettings::default(),
//! );
//! let service = LockerService::new(repo, transport, QrArtifactStore::new("static"));
//!
//! let issued = service.issue("89E154gs12828").await?;
//! let outcome = service.redeem(issued.code.as_str()).await?;
//! println!("{}", outcome.user_message());
//! # Ok(())
//! # }
//! ```

pub mod artifacts;
pub mod error;
pub mod service;

pub use artifacts::{ArtifactError, QrArtifactStore};
pub use error::{ServiceError, ServiceResult};
pub use service::{IssuedCode, LockerService, RedeemOutcome};
