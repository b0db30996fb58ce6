//! Prelude module for convenient imports
//!
//! Import everything you need with: `use orderbench::prelude::*;`

// Domain types
pub use crate::domain::{
    DomainError, NewOrder, NewOrderItem, NewProduct, NewUser, Order, OrderId, OrderItem,
    OrderItemId, Price, Product, ProductId, User, UserId,
};

// Storage types
pub use crate::storage::{
    BulkWriter, EntityLookup, KeyScan, MemoryOrderStore, ORDER_ITEM_SEQUENCE, ORDER_SEQUENCE,
    OrderWriteTxn, OrderWriter, PRODUCT_SEQUENCE, Sequence, StatementExecutor, StorageError,
    StoreAdmin, USER_SEQUENCE,
};

// Synthetic data generation
pub use crate::synth::RecordGenerator;

// Key cache
pub use crate::cache::{CacheError, KeyCache};

// Progress reporting
pub use crate::progress::{DEFAULT_ANNOUNCE_INTERVAL, ProgressReporter};

// Bootstrap orchestration
pub use crate::bootstrap::{
    BootstrapError, CompletionMarker, DEFAULT_MARKER_FILE, DatasetLoader, FileMarker, LoadConfig,
    LoadOutcome, MemoryMarker,
};

// Benchmarks
pub use crate::bench::{BenchError, BenchmarkReport, InsertBenchmark, Strategy};

// App types
pub use crate::app::{AppError, CliApp};
