use async_trait::async_trait;

use crate::storage::types::EegRecord;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Storage backend for EEG time-series rows.
///
/// The store only needs to accept bulk-row inserts; partitioning and
/// retention belong to the database.
#[async_trait]
pub trait EegRecordStore: Send + Sync {
    /// Create the schema idempotently.
    async fn initialize(&self) -> StorageResult<()>;

    /// Insert a batch of rows, returning the number written.
    async fn insert_batch(&self, records: &[EegRecord]) -> StorageResult<u64>;
}
