#![allow(async_fn_in_trait)]

use crate::error::StorageResult;
use crate::models::AccessCodeRecord;
use sqlx::SqlitePool;
use tracing::debug;

/// Repository trait for access code records.
///
/// The store is a simple key-value table keyed by the code string. The
/// lifecycle manager owns all mutation: rows are created at issuance and
/// deleted at redemption, never updated.
///
/// # Implementation Note
///
/// This trait uses native async trait methods (Edition 2024 feature),
/// eliminating the need for the async-trait crate while maintaining
/// full async/await support in trait methods.
pub trait AccessCodeRepository: Send + Sync {
    /// Find a live access code record by its code value
    async fn find_by_code(&self, code: &str) -> StorageResult<Option<AccessCodeRecord>>;

    /// Check whether a code value is already in use
    async fn exists_by_code(&self, code: &str) -> StorageResult<bool>;

    /// Create a new record binding `code` to `cell`, returning its id
    async fn create(&self, cell: &str, code: &str) -> StorageResult<i64>;

    /// Delete the record for `code`; returns whether a row was removed
    async fn delete_by_code(&self, code: &str) -> StorageResult<bool>;

    /// Number of live access codes
    async fn count(&self) -> StorageResult<i64>;
}

/// SQLite implementation of AccessCodeRepository
#[derive(Debug, Clone)]
pub struct SqliteAccessCodeRepository {
    pool: SqlitePool,
}

impl SqliteAccessCodeRepository {
    /// Create a new SQLite access code repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl AccessCodeRepository for SqliteAccessCodeRepository {
    async fn find_by_code(&self, code: &str) -> StorageResult<Option<AccessCodeRecord>> {
        let record = sqlx::query_as::<_, AccessCodeRecord>(
            r#"
            SELECT id, cell, code, created_at
            FROM access_codes
            WHERE code = ?
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn exists_by_code(&self, code: &str) -> StorageResult<bool> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM access_codes WHERE code = ?")
            .bind(code)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0 > 0)
    }

    async fn create(&self, cell: &str, code: &str) -> StorageResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO access_codes (cell, code)
            VALUES (?, ?)
            "#,
        )
        .bind(cell)
        .bind(code)
        .execute(&self.pool)
        .await?;

        debug!(cell, id = result.last_insert_rowid(), "access code created");
        Ok(result.last_insert_rowid())
    }

    async fn delete_by_code(&self, code: &str) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM access_codes WHERE code = ?")
            .bind(code)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> StorageResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM access_codes")
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }
}
