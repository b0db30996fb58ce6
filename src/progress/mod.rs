pub mod reporter;

// Re-export commonly used types
pub use reporter::{DEFAULT_ANNOUNCE_INTERVAL, ProgressReporter};
