use thiserror::Error;

/// Storage-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Foreign key violation: {table} id {key} does not exist")]
    ForeignKey { table: &'static str, key: u64 },

    #[error("Column arrays have mismatched lengths: expected {expected}, got {actual}")]
    ColumnLengthMismatch { expected: usize, actual: usize },

    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(i64),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Unknown column {column} for table {table}")]
    UnknownColumn { table: String, column: String },

    #[error("Invalid statement: {0}")]
    InvalidStatement(String),

    #[error("Type mismatch in column {column}: expected {expected}")]
    TypeMismatch {
        column: &'static str,
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        assert_eq!(
            StorageError::ForeignKey {
                table: "users",
                key: 7
            }
            .to_string(),
            "Foreign key violation: users id 7 does not exist"
        );
        assert_eq!(
            StorageError::ColumnLengthMismatch {
                expected: 3,
                actual: 2
            }
            .to_string(),
            "Column arrays have mismatched lengths: expected 3, got 2"
        );
        assert_eq!(
            StorageError::InvalidQuantity(0).to_string(),
            "Quantity must be positive, got 0"
        );
        assert_eq!(
            StorageError::UnknownTable("widgets".to_string()).to_string(),
            "Unknown table: widgets"
        );
    }

    #[test]
    fn error_is_cloneable_and_comparable() {
        let err = StorageError::InvalidStatement("expected VALUES".to_string());
        assert_eq!(err.clone(), err);
    }
}
