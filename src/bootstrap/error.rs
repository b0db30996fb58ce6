use std::io;

use thiserror::Error;

use crate::storage::StorageError;

/// Bootstrap-level errors. Any failure ends the run without creating the
/// completion marker; the next process start retries from the beginning.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Completion marker I/O error: {0}")]
    Marker(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_conversion() {
        let storage_err = StorageError::ForeignKey {
            table: "users",
            key: 1,
        };
        let err = BootstrapError::from(storage_err);
        assert!(matches!(err, BootstrapError::Storage(_)));
    }

    #[test]
    fn marker_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = BootstrapError::from(io_err);
        assert!(err.to_string().contains("Completion marker"));
    }
}
