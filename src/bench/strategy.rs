use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::info;

use super::error::BenchError;
use crate::cache::{CacheError, KeyCache};
use crate::domain::{NewOrder, NewOrderItem};
use crate::storage::{
    BulkWriter, EntityLookup, ORDER_ITEM_SEQUENCE, ORDER_SEQUENCE, OrderWriteTxn, OrderWriter,
    StatementExecutor,
};
use crate::synth::RecordGenerator;

/// Benchmark order quantities are uniform in 1..=this
const MAX_QUANTITY: u32 = 9;

/// The four insertion disciplines under comparison. All produce the same
/// logical output; they differ in transaction scope and statement shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// One commit per order, row-at-a-time saves
    PerRecordTransactions,
    /// One commit for the whole batch, same row-at-a-time shape
    SingleTransaction,
    /// One multi-row INSERT per table built from literal tuples
    ValuesBatch,
    /// One set-oriented insert per table zipping parallel column arrays
    ColumnarBatch,
}

impl Strategy {
    /// Stable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::PerRecordTransactions => "per-record-transactions",
            Self::SingleTransaction => "single-transaction",
            Self::ValuesBatch => "values-batch",
            Self::ColumnarBatch => "columnar-batch",
        }
    }

    /// All strategies in comparison order, most to least expensive
    pub fn all() -> [Self; 4] {
        [
            Self::PerRecordTransactions,
            Self::SingleTransaction,
            Self::ValuesBatch,
            Self::ColumnarBatch,
        ]
    }
}

/// Result of one benchmark invocation: the request-boundary payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchmarkReport {
    pub strategy: &'static str,
    pub total_records: u64,
    pub elapsed_ms: u64,
}

/// Runs insertion strategies against a warmed key cache.
///
/// Each invocation is independent; invocations may run concurrently but
/// compete for the same store, so timings should be compared across
/// non-overlapping runs.
pub struct InsertBenchmark<S> {
    store: Arc<S>,
    cache: Arc<KeyCache>,
}

impl<S> Clone for InsertBenchmark<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<S> InsertBenchmark<S>
where
    S: EntityLookup + OrderWriter + BulkWriter + StatementExecutor,
{
    pub fn new(store: Arc<S>, cache: Arc<KeyCache>) -> Self {
        Self { store, cache }
    }

    /// Insert `orders` orders with `items_per_order` items each using the
    /// given strategy, timing the whole insertion. Zero counts mean no
    /// records processed, not an error.
    pub fn run(
        &self,
        strategy: Strategy,
        orders: u32,
        items_per_order: u32,
    ) -> Result<BenchmarkReport, BenchError> {
        if !self.cache.is_warm() {
            return Err(BenchError::Cache(CacheError::NotWarm));
        }

        let started = Instant::now();
        let total_records = match strategy {
            Strategy::PerRecordTransactions => {
                self.per_record_transactions(orders, items_per_order)?
            }
            Strategy::SingleTransaction => self.single_transaction(orders, items_per_order)?,
            Strategy::ValuesBatch => self.values_batch(orders, items_per_order)?,
            Strategy::ColumnarBatch => self.columnar_batch(orders, items_per_order)?,
        };
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            strategy = strategy.label(),
            total_records, elapsed_ms, "benchmark finished"
        );

        Ok(BenchmarkReport {
            strategy: strategy.label(),
            total_records,
            elapsed_ms,
        })
    }

    /// One transaction per order: find the user, save the order, find a
    /// product per item, save each item, commit, then repeat
    fn per_record_transactions(
        &self,
        orders: u32,
        items_per_order: u32,
    ) -> Result<u64, BenchError> {
        let mut generator = RecordGenerator::new();
        let mut inserted = 0u64;

        for _ in 0..orders {
            let user_id = self.cache.random_user_id()?;
            let user = self
                .store
                .find_user(user_id)?
                .ok_or(BenchError::MissingReference {
                    table: "users",
                    id: user_id,
                })?;

            let mut txn = self.store.begin();
            let order_id = txn.save_order(NewOrder {
                user_id: user.id,
                placed_at: OffsetDateTime::now_utc(),
            })?;

            for _ in 0..items_per_order {
                let product_id = self.cache.random_product_id()?;
                let product =
                    self.store
                        .find_product(product_id)?
                        .ok_or(BenchError::MissingReference {
                            table: "products",
                            id: product_id,
                        })?;
                txn.save_item(NewOrderItem {
                    order_id,
                    product_id: product.id,
                    quantity: generator.quantity(MAX_QUANTITY),
                })?;
                inserted += 1;
            }

            txn.commit()?;
            inserted += 1;
        }

        Ok(inserted)
    }

    /// Same row-at-a-time statement shape, one commit for everything
    fn single_transaction(&self, orders: u32, items_per_order: u32) -> Result<u64, BenchError> {
        let mut generator = RecordGenerator::new();
        let mut inserted = 0u64;
        let mut txn = self.store.begin();

        for _ in 0..orders {
            let user_id = self.cache.random_user_id()?;
            let user = self
                .store
                .find_user(user_id)?
                .ok_or(BenchError::MissingReference {
                    table: "users",
                    id: user_id,
                })?;

            let order_id = txn.save_order(NewOrder {
                user_id: user.id,
                placed_at: OffsetDateTime::now_utc(),
            })?;
            inserted += 1;

            for _ in 0..items_per_order {
                let product_id = self.cache.random_product_id()?;
                let product =
                    self.store
                        .find_product(product_id)?
                        .ok_or(BenchError::MissingReference {
                            table: "products",
                            id: product_id,
                        })?;
                txn.save_item(NewOrderItem {
                    order_id,
                    product_id: product.id,
                    quantity: generator.quantity(MAX_QUANTITY),
                })?;
                inserted += 1;
            }
        }

        txn.commit()?;
        Ok(inserted)
    }

    /// One multi-row INSERT per table, built by concatenating literal
    /// tuples. The orders statement returns the assigned ids, which the
    /// item tuples then reference explicitly.
    fn values_batch(&self, orders: u32, items_per_order: u32) -> Result<u64, BenchError> {
        if orders == 0 {
            return Ok(0);
        }

        let mut generator = RecordGenerator::new();

        let mut orders_sql =
            String::from("INSERT INTO orders (id, placed_at, user_id) VALUES ");
        for i in 0..orders {
            if i > 0 {
                orders_sql.push(',');
            }
            let placed_at = OffsetDateTime::now_utc().format(&Rfc3339)?;
            let user_id = self.cache.random_user_id()?;
            orders_sql
                .push_str(&format!("(nextval('{ORDER_SEQUENCE}'), '{placed_at}', {user_id})"));
        }

        let order_ids = self.store.execute_insert_returning(&orders_sql)?;
        let mut inserted = order_ids.len() as u64;

        if items_per_order > 0 {
            let mut items_sql = String::from(
                "INSERT INTO order_items (id, order_id, product_id, quantity) VALUES ",
            );
            let mut first = true;
            for order_id in &order_ids {
                for _ in 0..items_per_order {
                    if !first {
                        items_sql.push(',');
                    }
                    first = false;
                    let product_id = self.cache.random_product_id()?;
                    let quantity = generator.quantity(MAX_QUANTITY);
                    items_sql.push_str(&format!(
                        "(nextval('{ORDER_ITEM_SEQUENCE}'), {order_id}, {product_id}, {quantity})"
                    ));
                }
            }
            inserted += self.store.execute_insert(&items_sql)?;
        }

        Ok(inserted)
    }

    /// One set-oriented insert per table: parallel column arrays zipped
    /// into rows inside the store, a fixed number of bound parameters
    /// regardless of row count
    fn columnar_batch(&self, orders: u32, items_per_order: u32) -> Result<u64, BenchError> {
        if orders == 0 {
            return Ok(0);
        }

        let mut generator = RecordGenerator::new();

        let mut placed_at = Vec::with_capacity(orders as usize);
        let mut user_refs = Vec::with_capacity(orders as usize);
        for _ in 0..orders {
            placed_at.push(OffsetDateTime::now_utc());
            user_refs.push(self.cache.random_user_id()?);
        }

        let order_ids = self.store.insert_orders(placed_at, user_refs)?;
        let mut inserted = order_ids.len() as u64;

        if items_per_order > 0 {
            let item_count = order_ids.len() * items_per_order as usize;
            let mut order_refs = Vec::with_capacity(item_count);
            let mut product_refs = Vec::with_capacity(item_count);
            let mut quantities = Vec::with_capacity(item_count);
            for order_id in &order_ids {
                for _ in 0..items_per_order {
                    order_refs.push(*order_id);
                    product_refs.push(self.cache.random_product_id()?);
                    quantities.push(generator.quantity(MAX_QUANTITY));
                }
            }
            inserted += self
                .store
                .insert_order_items(order_refs, product_refs, quantities)?;
        }

        Ok(inserted)
    }
}
