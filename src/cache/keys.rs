use std::sync::OnceLock;

use rand::Rng;
use tracing::info;

use super::error::CacheError;
use crate::domain::{ProductId, UserId};
use crate::storage::KeyScan;

/// The published key snapshot
struct CachedKeys {
    users: Vec<UserId>,
    products: Vec<ProductId>,
}

/// In-memory snapshot of existing User and Product primary keys.
///
/// Written exactly once per process lifetime by `warm` and read
/// concurrently afterwards; publish-once visibility comes from the
/// `OnceLock`, so no locks are needed on the read path. Keys inserted
/// after warm-up stay invisible until the process restarts.
#[derive(Default)]
pub struct KeyCache {
    keys: OnceLock<CachedKeys>,
}

impl KeyCache {
    /// Create an un-warmed cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan all existing user and product ids and publish them.
    ///
    /// Fails with `EmptyKeySet` if either base table is empty. Calling
    /// again after a successful warm-up is a no-op.
    pub fn warm<S: KeyScan>(&self, store: &S) -> Result<(), CacheError> {
        if self.keys.get().is_some() {
            return Ok(());
        }

        let users = store.user_ids()?;
        if users.is_empty() {
            return Err(CacheError::EmptyKeySet("users"));
        }

        let products = store.product_ids()?;
        if products.is_empty() {
            return Err(CacheError::EmptyKeySet("products"));
        }

        info!(
            users = users.len(),
            products = products.len(),
            "key cache warmed"
        );

        // A lost set race means another warm-up already published
        let _ = self.keys.set(CachedKeys { users, products });
        Ok(())
    }

    /// Whether warm-up has completed
    pub fn is_warm(&self) -> bool {
        self.keys.get().is_some()
    }

    /// Uniformly random existing user id, O(1)
    pub fn random_user_id(&self) -> Result<UserId, CacheError> {
        let keys = self.keys.get().ok_or(CacheError::NotWarm)?;
        let idx = rand::thread_rng().gen_range(0..keys.users.len());
        Ok(keys.users[idx])
    }

    /// Uniformly random existing product id, O(1)
    pub fn random_product_id(&self) -> Result<ProductId, CacheError> {
        let keys = self.keys.get().ok_or(CacheError::NotWarm)?;
        let idx = rand::thread_rng().gen_range(0..keys.products.len());
        Ok(keys.products[idx])
    }
}
