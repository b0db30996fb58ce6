use time::OffsetDateTime;

use super::error::StorageError;
use crate::domain::{
    NewOrder, NewOrderItem, OrderId, OrderItemId, Price, Product, ProductId, User, UserId,
};

/// Find-by-identifier lookups used by the row-at-a-time insertion paths
pub trait EntityLookup: Send + Sync {
    /// Fetch a user row by id (returns clone, not reference)
    fn find_user(&self, id: UserId) -> Result<Option<User>, StorageError>;

    /// Fetch a product row by id
    fn find_product(&self, id: ProductId) -> Result<Option<Product>, StorageError>;
}

/// Transactional row-at-a-time order persistence with pluggable backends
pub trait OrderWriter: Send + Sync {
    type Txn<'a>: OrderWriteTxn
    where
        Self: 'a;

    /// Open a transaction; dropping it without commit discards its writes
    fn begin(&self) -> Self::Txn<'_>;
}

/// Writes buffered inside one open transaction.
///
/// Identifiers are assigned eagerly so dependent rows can reference them
/// before commit; the rows themselves become visible only at commit.
pub trait OrderWriteTxn {
    /// Save one order row, returning its assigned identifier
    fn save_order(&mut self, order: NewOrder) -> Result<OrderId, StorageError>;

    /// Save one order item row, returning its assigned identifier
    fn save_item(&mut self, item: NewOrderItem) -> Result<OrderItemId, StorageError>;

    /// Publish all buffered rows as one commit
    fn commit(self) -> Result<(), StorageError>;
}

/// Set-oriented bulk writes. Each call is one statement and one commit;
/// parallel column arrays are zipped into rows inside the store, and every
/// foreign reference is validated before any row is published.
pub trait BulkWriter: Send + Sync {
    /// Insert one user per array element, returning the inserted count
    fn insert_users(
        &self,
        usernames: Vec<String>,
        emails: Vec<String>,
    ) -> Result<u64, StorageError>;

    /// Insert one product per array element, returning the inserted count
    fn insert_products(&self, names: Vec<String>, prices: Vec<Price>)
    -> Result<u64, StorageError>;

    /// Insert one order per array element, returning the assigned
    /// identifiers in row order
    fn insert_orders(
        &self,
        placed_at: Vec<OffsetDateTime>,
        user_ids: Vec<UserId>,
    ) -> Result<Vec<OrderId>, StorageError>;

    /// Insert one order item per array element, returning the inserted count
    fn insert_order_items(
        &self,
        order_ids: Vec<OrderId>,
        product_ids: Vec<ProductId>,
        quantities: Vec<u32>,
    ) -> Result<u64, StorageError>;
}

/// Execution of literal multi-row `INSERT ... VALUES` statement text
pub trait StatementExecutor: Send + Sync {
    /// Execute one insert statement, returning the inserted row count
    fn execute_insert(&self, sql: &str) -> Result<u64, StorageError>;

    /// Execute one insert statement, returning the assigned identifiers
    /// in row order
    fn execute_insert_returning(&self, sql: &str) -> Result<Vec<u64>, StorageError>;
}

/// Administrative operations used by the bootstrap cycle
pub trait StoreAdmin: Send + Sync {
    /// Remove all rows from the four tables in dependency order and
    /// restart every identifier sequence, as one operation
    fn reset_dataset(&self) -> Result<(), StorageError>;

    /// Session-scoped durability relaxation hint for the load window
    fn set_relaxed_durability(&self, enabled: bool);
}

/// Full primary-key scans used for key cache warm-up
pub trait KeyScan: Send + Sync {
    fn user_ids(&self) -> Result<Vec<UserId>, StorageError>;

    fn product_ids(&self) -> Result<Vec<ProductId>, StorageError>;
}
