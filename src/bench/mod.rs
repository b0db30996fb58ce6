pub mod error;
pub mod strategy;

// Re-export commonly used types
pub use error::BenchError;
pub use strategy::{BenchmarkReport, InsertBenchmark, Strategy};
