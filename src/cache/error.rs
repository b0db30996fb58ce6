use thiserror::Error;

use crate::storage::StorageError;

/// Key cache errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Read attempted before warm-up completed. Callers get this error,
    /// never a silent empty result.
    #[error("Key cache has not been warmed yet")]
    NotWarm,

    /// Warm-up found an empty base table; the dataset was not
    /// bootstrapped and sampling would be meaningless
    #[error("Key cache warm-up found no rows in {0}")]
    EmptyKeySet(&'static str),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
