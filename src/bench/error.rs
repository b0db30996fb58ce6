use thiserror::Error;

use crate::cache::CacheError;
use crate::storage::StorageError;

/// Benchmark-level errors. A failed invocation surfaces the failure;
/// callers never see a partial or zero result for a failed run.
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Referenced row missing: {table} id {id}")]
    MissingReference { table: &'static str, id: u64 },

    #[error("Timestamp formatting error: {0}")]
    TimestampFormat(#[from] time::error::Format),
}
