use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

use super::error::BootstrapError;
use super::marker::CompletionMarker;
use crate::progress::{DEFAULT_ANNOUNCE_INTERVAL, ProgressReporter};
use crate::storage::{BulkWriter, StoreAdmin};
use crate::synth::RecordGenerator;

/// Row counts and knobs for one full dataset generation cycle
#[derive(Debug, Clone)]
pub struct LoadConfig {
    pub users: u64,
    pub products: u64,
    pub orders: u64,
    /// Item rows generated per order row
    pub items_per_order: u64,
    /// Order timestamps fall within this many days before now
    pub order_window_days: u32,
    /// Bootstrap item quantities are uniform in 1..=this
    pub max_quantity: u32,
    pub progress_interval: Duration,
    /// Fixed generator seed; None draws from entropy
    pub seed: Option<u64>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            users: 100_000,
            products: 100_000,
            orders: 1_000_000,
            items_per_order: 3,
            order_window_days: 365,
            max_quantity: 5,
            progress_interval: DEFAULT_ANNOUNCE_INTERVAL,
            seed: None,
        }
    }
}

/// Outcome of a bootstrap run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The completion marker was already present
    Skipped,
    Completed { total_rows: u64, elapsed: Duration },
}

/// One-shot orchestrator that wipes and regenerates the whole dataset,
/// guarded by the completion marker. One instance per process, one run
/// per process lifetime.
///
/// Generation order follows the dependency chain: users and products
/// first, then orders, then order items. Each phase is one set-based
/// statement and one commit; a mid-run failure leaves earlier phases
/// committed and no marker, so the next start retries from cleanup.
pub struct DatasetLoader<S, M> {
    store: Arc<S>,
    marker: M,
    config: LoadConfig,
}

impl<S, M> DatasetLoader<S, M>
where
    S: BulkWriter + StoreAdmin,
    M: CompletionMarker,
{
    pub fn new(store: Arc<S>, marker: M, config: LoadConfig) -> Self {
        Self {
            store,
            marker,
            config,
        }
    }

    /// Run the bootstrap cycle once
    pub async fn run(&self) -> Result<LoadOutcome, BootstrapError> {
        if self.marker.exists()? {
            info!("dataset already generated, skipping regeneration");
            return Ok(LoadOutcome::Skipped);
        }

        let started = Instant::now();
        info!("starting dataset generation");

        self.store.set_relaxed_durability(true);
        info!("relaxed commit durability for the load window");

        self.store.reset_dataset()?;
        info!("dataset cleanup completed");

        let mut generator = match self.config.seed {
            Some(seed) => RecordGenerator::with_seed(seed),
            None => RecordGenerator::new(),
        };

        let users = self.generate_users(&mut generator).await?;
        let products = self.generate_products(&mut generator).await?;
        let orders = self.generate_orders(&mut generator).await?;
        let items = self.generate_order_items(&mut generator).await?;

        self.marker.create()?;
        info!("completion marker created");

        let elapsed = started.elapsed();
        let total_rows = users + products + orders + items;
        info!(
            total_rows,
            elapsed_secs = elapsed.as_secs(),
            "dataset generation completed"
        );

        Ok(LoadOutcome::Completed {
            total_rows,
            elapsed,
        })
    }

    async fn generate_users(
        &self,
        generator: &mut RecordGenerator,
    ) -> Result<u64, BootstrapError> {
        let count = self.config.users;
        info!(count, "generating users");

        let mut reporter = self.reporter("preparing users", count);
        let mut usernames = Vec::with_capacity(count as usize);
        let mut emails = Vec::with_capacity(count as usize);
        for _ in 0..count {
            usernames.push(generator.username());
            emails.push(generator.email());
        }
        reporter.stop().await;

        let mut reporter = self.reporter("inserting users", count);
        let inserted = self.store.insert_users(usernames, emails)?;
        reporter.stop().await;

        info!(inserted, "users inserted");
        Ok(inserted)
    }

    async fn generate_products(
        &self,
        generator: &mut RecordGenerator,
    ) -> Result<u64, BootstrapError> {
        let count = self.config.products;
        info!(count, "generating products");

        let mut reporter = self.reporter("preparing products", count);
        let mut names = Vec::with_capacity(count as usize);
        let mut prices = Vec::with_capacity(count as usize);
        for _ in 0..count {
            names.push(generator.product_name());
            prices.push(generator.price());
        }
        reporter.stop().await;

        let mut reporter = self.reporter("inserting products", count);
        let inserted = self.store.insert_products(names, prices)?;
        reporter.stop().await;

        info!(inserted, "products inserted");
        Ok(inserted)
    }

    async fn generate_orders(
        &self,
        generator: &mut RecordGenerator,
    ) -> Result<u64, BootstrapError> {
        let count = self.config.orders;
        info!(count, "generating orders");

        let mut reporter = self.reporter("preparing orders", count);
        let mut placed_at = Vec::with_capacity(count as usize);
        let mut user_refs = Vec::with_capacity(count as usize);
        for _ in 0..count {
            placed_at.push(generator.timestamp_within_days(self.config.order_window_days));
            // Raw-range sampling is valid here: sequences were reset, so
            // user ids are contiguous from 1
            user_refs.push(generator.reference(self.config.users));
        }
        reporter.stop().await;

        let mut reporter = self.reporter("inserting orders", count);
        let inserted = self.store.insert_orders(placed_at, user_refs)?.len() as u64;
        reporter.stop().await;

        info!(inserted, "orders inserted");
        Ok(inserted)
    }

    async fn generate_order_items(
        &self,
        generator: &mut RecordGenerator,
    ) -> Result<u64, BootstrapError> {
        let count = self.config.orders * self.config.items_per_order;
        info!(count, "generating order items");

        let mut reporter = self.reporter("preparing order items", count);
        let mut order_refs = Vec::with_capacity(count as usize);
        let mut product_refs = Vec::with_capacity(count as usize);
        let mut quantities = Vec::with_capacity(count as usize);
        for _ in 0..count {
            order_refs.push(generator.reference(self.config.orders));
            product_refs.push(generator.reference(self.config.products));
            quantities.push(generator.quantity(self.config.max_quantity));
        }
        reporter.stop().await;

        let mut reporter = self.reporter("inserting order items", count);
        let inserted = self
            .store
            .insert_order_items(order_refs, product_refs, quantities)?;
        reporter.stop().await;

        info!(inserted, "order items inserted");
        Ok(inserted)
    }

    fn reporter(&self, label: &str, total: u64) -> ProgressReporter {
        ProgressReporter::with_interval(label, total, self.config.progress_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::marker::MemoryMarker;
    use crate::storage::MemoryOrderStore;
    use std::io;

    fn small_config() -> LoadConfig {
        LoadConfig {
            users: 20,
            products: 15,
            orders: 30,
            items_per_order: 3,
            order_window_days: 365,
            max_quantity: 5,
            progress_interval: Duration::from_secs(3),
            seed: Some(11),
        }
    }

    #[tokio::test]
    async fn run_populates_all_four_tables() {
        let store = Arc::new(MemoryOrderStore::new());
        let loader = DatasetLoader::new(Arc::clone(&store), MemoryMarker::new(), small_config());

        let outcome = loader.run().await.unwrap();
        assert!(matches!(
            outcome,
            LoadOutcome::Completed { total_rows: 155, .. }
        ));

        assert_eq!(store.user_count(), 20);
        assert_eq!(store.product_count(), 15);
        assert_eq!(store.order_count(), 30);
        assert_eq!(store.order_item_count(), 90);
    }

    #[tokio::test]
    async fn run_creates_marker_and_second_run_skips() {
        let store = Arc::new(MemoryOrderStore::new());
        let marker = MemoryMarker::new();
        let loader = DatasetLoader::new(Arc::clone(&store), marker, small_config());

        loader.run().await.unwrap();
        let commits = store.commit_count();

        let outcome = loader.run().await.unwrap();
        assert_eq!(outcome, LoadOutcome::Skipped);
        // No rows touched, no commits issued
        assert_eq!(store.commit_count(), commits);
        assert_eq!(store.order_count(), 30);
    }

    #[tokio::test]
    async fn run_relaxes_durability_for_the_load() {
        let store = Arc::new(MemoryOrderStore::new());
        let loader = DatasetLoader::new(Arc::clone(&store), MemoryMarker::new(), small_config());

        loader.run().await.unwrap();
        assert!(store.relaxed_durability());
    }

    #[tokio::test]
    async fn run_wipes_previous_rows_before_generating() {
        let store = Arc::new(MemoryOrderStore::new());
        store
            .insert_users(
                vec!["stale".to_string()],
                vec!["stale@example.com".to_string()],
            )
            .unwrap();

        let loader = DatasetLoader::new(Arc::clone(&store), MemoryMarker::new(), small_config());
        loader.run().await.unwrap();

        // Exactly the configured count; the stale row is gone
        assert_eq!(store.user_count(), 20);
    }

    /// Marker whose create() always fails, simulating a bootstrap that
    /// cannot record completion
    struct BrokenMarker;

    impl CompletionMarker for BrokenMarker {
        fn exists(&self) -> io::Result<bool> {
            Ok(false)
        }

        fn create(&self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }

        fn remove(&self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn failed_run_leaves_data_but_retries_from_cleanup() {
        let store = Arc::new(MemoryOrderStore::new());
        let loader = DatasetLoader::new(Arc::clone(&store), BrokenMarker, small_config());

        // Phases committed, marker write failed
        assert!(loader.run().await.is_err());
        assert_eq!(store.order_count(), 30);

        // Retry truncates first, so nothing is doubled
        assert!(loader.run().await.is_err());
        assert_eq!(store.user_count(), 20);
        assert_eq!(store.order_count(), 30);
        assert_eq!(store.order_item_count(), 90);
    }
}
