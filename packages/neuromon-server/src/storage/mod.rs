mod postgres;
mod traits;
mod types;

pub use postgres::PostgresEegStore;
pub use traits::{EegRecordStore, StorageError, StorageResult};
pub use types::EegRecord;
