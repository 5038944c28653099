use super::traits::Storage;
use crate::domain::{NewProduct, Product};
use crate::error::{CatalogError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

struct Inner {
    products: BTreeMap<i64, Product>,
    // Ids are never reused, like SQLite AUTOINCREMENT
    next_id: i64,
}

/// In-memory storage implementation for development/testing
pub struct InMemoryStorage {
    inner: Mutex<Inner>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                products: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner.lock().map_err(|e| CatalogError::Database {
            message: format!("in-memory store lock poisoned: {e}"),
        })
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn get_product_by_id(&self, id: i64) -> Result<Option<Product>> {
        let inner = self.lock()?;
        Ok(inner.products.get(&id).cloned())
    }

    async fn get_all_products(&self) -> Result<Vec<Product>> {
        let inner = self.lock()?;
        Ok(inner.products.values().cloned().collect())
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        let mut inner = self.lock()?;
        let id = inner.next_id;
        inner.next_id += 1;

        let created = Product::from_new(id, product);
        inner.products.insert(id, created.clone());

        debug!("Created product: {} with id {}", created.name, id);
        Ok(created)
    }

    async fn update_product(&self, product: &Product) -> Result<bool> {
        let mut inner = self.lock()?;
        match inner.products.get_mut(&product.id) {
            Some(existing) => {
                *existing = product.clone();
                debug!("Updated product: {} with id {}", product.name, product.id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_product(&self, id: i64) -> Result<bool> {
        let mut inner = self.lock()?;
        let removed = inner.products.remove(&id).is_some();
        if removed {
            debug!("Deleted product with id {}", id);
        }
        Ok(removed)
    }
}
