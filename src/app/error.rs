use std::io;

use thiserror::Error;

use crate::bench::BenchError;
use crate::bootstrap::BootstrapError;
use crate::cache::CacheError;
use crate::storage::StorageError;

/// Top-level application errors unifying all layer errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Bootstrap error: {0}")]
    Bootstrap(#[from] BootstrapError),

    #[error("Benchmark error: {0}")]
    Bench(#[from] BenchError),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}
