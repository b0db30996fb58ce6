use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use dashmap::DashMap;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use super::error::StorageError;
use super::sequence::Sequence;
use super::statement::{InsertStatement, Literal, parse_insert};
use super::traits::{
    BulkWriter, EntityLookup, KeyScan, OrderWriteTxn, OrderWriter, StatementExecutor, StoreAdmin,
};
use crate::domain::{
    NewOrder, NewOrderItem, Order, OrderId, OrderItem, OrderItemId, Price, Product, ProductId,
    User, UserId,
};

/// Named sequences matching the store's four identifier counters
pub const USER_SEQUENCE: &str = "user_ids";
pub const PRODUCT_SEQUENCE: &str = "product_ids";
pub const ORDER_SEQUENCE: &str = "order_ids";
pub const ORDER_ITEM_SEQUENCE: &str = "order_item_ids";

const ORDER_COLUMNS: [&str; 3] = ["id", "placed_at", "user_id"];
const ORDER_ITEM_COLUMNS: [&str; 4] = ["id", "order_id", "product_id", "quantity"];

/// Embedded concurrent relational engine backing the store boundary.
///
/// Tables are sharded maps keyed by identifier; identifiers come from
/// per-table restartable sequences. Writes go through transactions or
/// set-oriented statements, both of which validate every foreign reference
/// before publishing any row, so a committed referencing row always points
/// at an existing referenced row.
pub struct MemoryOrderStore {
    users: DashMap<UserId, User>,
    products: DashMap<ProductId, Product>,
    orders: DashMap<OrderId, Order>,
    order_items: DashMap<OrderItemId, OrderItem>,
    user_seq: Sequence,
    product_seq: Sequence,
    order_seq: Sequence,
    item_seq: Sequence,
    relaxed_durability: AtomicBool,
    commits: AtomicU64,
}

impl MemoryOrderStore {
    /// Create an empty store with all sequences at their start value
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            products: DashMap::new(),
            orders: DashMap::new(),
            order_items: DashMap::new(),
            user_seq: Sequence::default(),
            product_seq: Sequence::default(),
            order_seq: Sequence::default(),
            item_seq: Sequence::default(),
            relaxed_durability: AtomicBool::new(false),
            commits: AtomicU64::new(0),
        }
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn order_item_count(&self) -> usize {
        self.order_items.len()
    }

    pub fn contains_user(&self, id: UserId) -> bool {
        self.users.contains_key(&id)
    }

    pub fn contains_product(&self, id: ProductId) -> bool {
        self.products.contains_key(&id)
    }

    pub fn contains_order(&self, id: OrderId) -> bool {
        self.orders.contains_key(&id)
    }

    /// Snapshot of all order rows (for integrity scans)
    pub fn orders_snapshot(&self) -> Vec<Order> {
        self.orders.iter().map(|e| e.value().clone()).collect()
    }

    /// Snapshot of all order item rows (for integrity scans)
    pub fn order_items_snapshot(&self) -> Vec<OrderItem> {
        self.order_items.iter().map(|e| e.value().clone()).collect()
    }

    /// Number of commits the store has seen. Each transaction commit and
    /// each set-oriented statement counts once, which makes the
    /// transaction discipline of a caller observable.
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::Relaxed)
    }

    /// Current durability relaxation hint
    pub fn relaxed_durability(&self) -> bool {
        self.relaxed_durability.load(Ordering::Relaxed)
    }

    fn mark_commit(&self) {
        self.commits.fetch_add(1, Ordering::Relaxed);
    }

    fn require_user(&self, id: UserId) -> Result<(), StorageError> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(StorageError::ForeignKey {
                table: "users",
                key: id,
            })
        }
    }

    fn require_product(&self, id: ProductId) -> Result<(), StorageError> {
        if self.products.contains_key(&id) {
            Ok(())
        } else {
            Err(StorageError::ForeignKey {
                table: "products",
                key: id,
            })
        }
    }

    fn require_order(&self, id: OrderId) -> Result<(), StorageError> {
        if self.orders.contains_key(&id) {
            Ok(())
        } else {
            Err(StorageError::ForeignKey {
                table: "orders",
                key: id,
            })
        }
    }

    /// Execute a parsed statement, returning the assigned ids in row order
    fn apply_insert(&self, stmt: InsertStatement) -> Result<Vec<u64>, StorageError> {
        match stmt.table.as_str() {
            "orders" => {
                check_statement_columns(&stmt, &ORDER_COLUMNS)?;

                // Validate every row before publishing any
                let mut decoded = Vec::with_capacity(stmt.rows.len());
                for row in &stmt.rows {
                    expect_nextval(&row[0], ORDER_SEQUENCE)?;
                    let placed_at = decode_timestamp(&row[1], "placed_at")?;
                    let user_id = decode_key(&row[2], "user_id")?;
                    self.require_user(user_id)?;
                    decoded.push((placed_at, user_id));
                }

                let mut ids = Vec::with_capacity(decoded.len());
                for (placed_at, user_id) in decoded {
                    let id = self.order_seq.next_val();
                    self.orders.insert(
                        id,
                        Order {
                            id,
                            user_id,
                            placed_at,
                        },
                    );
                    ids.push(id);
                }
                self.mark_commit();
                Ok(ids)
            }
            "order_items" => {
                check_statement_columns(&stmt, &ORDER_ITEM_COLUMNS)?;

                let mut decoded = Vec::with_capacity(stmt.rows.len());
                for row in &stmt.rows {
                    expect_nextval(&row[0], ORDER_ITEM_SEQUENCE)?;
                    let order_id = decode_key(&row[1], "order_id")?;
                    let product_id = decode_key(&row[2], "product_id")?;
                    let quantity = decode_quantity(&row[3])?;
                    self.require_order(order_id)?;
                    self.require_product(product_id)?;
                    decoded.push((order_id, product_id, quantity));
                }

                let mut ids = Vec::with_capacity(decoded.len());
                for (order_id, product_id, quantity) in decoded {
                    let id = self.item_seq.next_val();
                    self.order_items.insert(
                        id,
                        OrderItem {
                            id,
                            order_id,
                            product_id,
                            quantity,
                        },
                    );
                    ids.push(id);
                }
                self.mark_commit();
                Ok(ids)
            }
            other => Err(StorageError::UnknownTable(other.to_string())),
        }
    }
}

impl Default for MemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

fn check_columns(expected: usize, actual: usize) -> Result<(), StorageError> {
    if expected == actual {
        Ok(())
    } else {
        Err(StorageError::ColumnLengthMismatch { expected, actual })
    }
}

fn check_statement_columns(
    stmt: &InsertStatement,
    expected: &[&str],
) -> Result<(), StorageError> {
    for column in &stmt.columns {
        if !expected.contains(&column.as_str()) {
            return Err(StorageError::UnknownColumn {
                table: stmt.table.clone(),
                column: column.clone(),
            });
        }
    }
    if stmt.columns.len() != expected.len() || stmt.columns.iter().zip(expected).any(|(a, b)| a != b)
    {
        return Err(StorageError::InvalidStatement(format!(
            "expected columns ({})",
            expected.join(", ")
        )));
    }
    Ok(())
}

fn expect_nextval(literal: &Literal, sequence: &str) -> Result<(), StorageError> {
    match literal {
        Literal::NextVal(name) if name == sequence => Ok(()),
        _ => Err(StorageError::InvalidStatement(format!(
            "id column must draw from nextval('{sequence}')"
        ))),
    }
}

fn decode_key(literal: &Literal, column: &'static str) -> Result<u64, StorageError> {
    match literal {
        Literal::Int(value) => u64::try_from(*value).map_err(|_| StorageError::TypeMismatch {
            column,
            expected: "non-negative integer",
        }),
        _ => Err(StorageError::TypeMismatch {
            column,
            expected: "integer",
        }),
    }
}

fn decode_quantity(literal: &Literal) -> Result<u32, StorageError> {
    match literal {
        Literal::Int(value) => {
            if *value < 1 {
                return Err(StorageError::InvalidQuantity(*value));
            }
            u32::try_from(*value).map_err(|_| StorageError::InvalidQuantity(*value))
        }
        _ => Err(StorageError::TypeMismatch {
            column: "quantity",
            expected: "integer",
        }),
    }
}

fn decode_timestamp(literal: &Literal, column: &'static str) -> Result<OffsetDateTime, StorageError> {
    match literal {
        Literal::Text(text) => {
            OffsetDateTime::parse(text, &Rfc3339).map_err(|_| StorageError::TypeMismatch {
                column,
                expected: "RFC 3339 timestamp",
            })
        }
        _ => Err(StorageError::TypeMismatch {
            column,
            expected: "RFC 3339 timestamp",
        }),
    }
}

impl EntityLookup for MemoryOrderStore {
    fn find_user(&self, id: UserId) -> Result<Option<User>, StorageError> {
        Ok(self.users.get(&id).map(|r| r.value().clone()))
    }

    fn find_product(&self, id: ProductId) -> Result<Option<Product>, StorageError> {
        Ok(self.products.get(&id).map(|r| r.value().clone()))
    }
}

/// An open transaction buffering rows until commit. Dropping the
/// transaction without committing discards the buffered rows; identifiers
/// already drawn stay consumed, exactly as a rolled-back sequence would.
pub struct MemoryTxn<'a> {
    store: &'a MemoryOrderStore,
    pending_orders: Vec<Order>,
    pending_order_ids: HashSet<OrderId>,
    pending_items: Vec<OrderItem>,
}

impl OrderWriteTxn for MemoryTxn<'_> {
    fn save_order(&mut self, order: NewOrder) -> Result<OrderId, StorageError> {
        self.store.require_user(order.user_id)?;
        let id = self.store.order_seq.next_val();
        self.pending_orders.push(Order {
            id,
            user_id: order.user_id,
            placed_at: order.placed_at,
        });
        self.pending_order_ids.insert(id);
        Ok(id)
    }

    fn save_item(&mut self, item: NewOrderItem) -> Result<OrderItemId, StorageError> {
        // The order may be pending in this transaction or already committed
        if !self.pending_order_ids.contains(&item.order_id) {
            self.store.require_order(item.order_id)?;
        }
        self.store.require_product(item.product_id)?;
        if item.quantity < 1 {
            return Err(StorageError::InvalidQuantity(i64::from(item.quantity)));
        }
        let id = self.store.item_seq.next_val();
        self.pending_items.push(OrderItem {
            id,
            order_id: item.order_id,
            product_id: item.product_id,
            quantity: item.quantity,
        });
        Ok(id)
    }

    fn commit(self) -> Result<(), StorageError> {
        for order in self.pending_orders {
            self.store.orders.insert(order.id, order);
        }
        for item in self.pending_items {
            self.store.order_items.insert(item.id, item);
        }
        self.store.mark_commit();
        Ok(())
    }
}

impl OrderWriter for MemoryOrderStore {
    type Txn<'a>
        = MemoryTxn<'a>
    where
        Self: 'a;

    fn begin(&self) -> MemoryTxn<'_> {
        MemoryTxn {
            store: self,
            pending_orders: Vec::new(),
            pending_order_ids: HashSet::new(),
            pending_items: Vec::new(),
        }
    }
}

impl BulkWriter for MemoryOrderStore {
    fn insert_users(
        &self,
        usernames: Vec<String>,
        emails: Vec<String>,
    ) -> Result<u64, StorageError> {
        check_columns(usernames.len(), emails.len())?;
        let count = usernames.len();
        for (username, email) in usernames.into_iter().zip(emails) {
            let id = self.user_seq.next_val();
            self.users.insert(
                id,
                User {
                    id,
                    username,
                    email,
                },
            );
        }
        self.mark_commit();
        Ok(count as u64)
    }

    fn insert_products(
        &self,
        names: Vec<String>,
        prices: Vec<Price>,
    ) -> Result<u64, StorageError> {
        check_columns(names.len(), prices.len())?;
        let count = names.len();
        for (name, price) in names.into_iter().zip(prices) {
            let id = self.product_seq.next_val();
            self.products.insert(id, Product { id, name, price });
        }
        self.mark_commit();
        Ok(count as u64)
    }

    fn insert_orders(
        &self,
        placed_at: Vec<OffsetDateTime>,
        user_ids: Vec<UserId>,
    ) -> Result<Vec<OrderId>, StorageError> {
        check_columns(placed_at.len(), user_ids.len())?;

        // Validate every reference before publishing any row
        for user_id in &user_ids {
            self.require_user(*user_id)?;
        }

        let mut ids = Vec::with_capacity(placed_at.len());
        for (placed_at, user_id) in placed_at.into_iter().zip(user_ids) {
            let id = self.order_seq.next_val();
            self.orders.insert(
                id,
                Order {
                    id,
                    user_id,
                    placed_at,
                },
            );
            ids.push(id);
        }
        self.mark_commit();
        Ok(ids)
    }

    fn insert_order_items(
        &self,
        order_ids: Vec<OrderId>,
        product_ids: Vec<ProductId>,
        quantities: Vec<u32>,
    ) -> Result<u64, StorageError> {
        check_columns(order_ids.len(), product_ids.len())?;
        check_columns(order_ids.len(), quantities.len())?;

        for order_id in &order_ids {
            self.require_order(*order_id)?;
        }
        for product_id in &product_ids {
            self.require_product(*product_id)?;
        }
        for quantity in &quantities {
            if *quantity < 1 {
                return Err(StorageError::InvalidQuantity(i64::from(*quantity)));
            }
        }

        let count = order_ids.len();
        for ((order_id, product_id), quantity) in
            order_ids.into_iter().zip(product_ids).zip(quantities)
        {
            let id = self.item_seq.next_val();
            self.order_items.insert(
                id,
                OrderItem {
                    id,
                    order_id,
                    product_id,
                    quantity,
                },
            );
        }
        self.mark_commit();
        Ok(count as u64)
    }
}

impl StatementExecutor for MemoryOrderStore {
    fn execute_insert(&self, sql: &str) -> Result<u64, StorageError> {
        self.apply_insert(parse_insert(sql)?)
            .map(|ids| ids.len() as u64)
    }

    fn execute_insert_returning(&self, sql: &str) -> Result<Vec<u64>, StorageError> {
        self.apply_insert(parse_insert(sql)?)
    }
}

impl StoreAdmin for MemoryOrderStore {
    fn reset_dataset(&self) -> Result<(), StorageError> {
        // Dependency order: items, orders, products, users
        self.order_items.clear();
        self.orders.clear();
        self.products.clear();
        self.users.clear();
        self.item_seq.restart();
        self.order_seq.restart();
        self.product_seq.restart();
        self.user_seq.restart();
        self.mark_commit();
        Ok(())
    }

    fn set_relaxed_durability(&self, enabled: bool) {
        self.relaxed_durability.store(enabled, Ordering::Relaxed);
        debug!(enabled, "durability hint updated");
    }
}

impl KeyScan for MemoryOrderStore {
    fn user_ids(&self) -> Result<Vec<UserId>, StorageError> {
        Ok(self.users.iter().map(|e| *e.key()).collect())
    }

    fn product_ids(&self) -> Result<Vec<ProductId>, StorageError> {
        Ok(self.products.iter().map(|e| *e.key()).collect())
    }
}
