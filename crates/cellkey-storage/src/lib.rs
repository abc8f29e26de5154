//! Storage layer for the cellkey parcel locker system.
//!
//! SQLite-backed persistence for access codes. The core treats the store as
//! a durable key-value table keyed by the code string: issuance inserts a
//! row, redemption deletes it, nothing updates in place.
//!
//! # Architecture
//!
//! - [`Database`] / [`DatabaseConfig`] - connection pool wrapper with
//!   embedded migrations (WAL mode, in-memory constructor for tests)
//! - [`AccessCodeRepository`] - data access trait, enabling mocking and
//!   keeping the lifecycle manager independent of SQL
//! - [`SqliteAccessCodeRepository`] - the production implementation
//!
//! All queries use parameterized statements via SQLx; migration files are
//! embedded at compile time by `sqlx::migrate!`.
//!
//! # Examples
//!
//! ```no_run
//! use cellkey_storage::{AccessCodeRepository, Database, DatabaseConfig, SqliteAccessCodeRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(DatabaseConfig::new("cellkey.db")).await?;
//! let repo = SqliteAccessCodeRepository::new(db.pool().clone());
//!
//! repo.create("89E154gs12828", "123456789012").await?;
//! if let Some(record) = repo.find_by_code("123456789012").await? {
//!     println!("code opens cell {}", record.cell);
//! }
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod models;
pub mod repository;

pub use connection::{Database, DatabaseConfig};
pub use error::{StorageError, StorageResult};
pub use models::AccessCodeRecord;
pub use repository::{AccessCodeRepository, SqliteAccessCodeRepository};
