pub mod error;
pub mod memory;
pub mod sequence;
pub mod statement;
pub mod traits;

// Re-export commonly used types
pub use error::StorageError;
pub use memory::{
    MemoryOrderStore, MemoryTxn, ORDER_ITEM_SEQUENCE, ORDER_SEQUENCE, PRODUCT_SEQUENCE,
    USER_SEQUENCE,
};
pub use sequence::Sequence;
pub use statement::{InsertStatement, Literal};
pub use traits::{
    BulkWriter, EntityLookup, KeyScan, OrderWriteTxn, OrderWriter, StatementExecutor, StoreAdmin,
};
