use super::traits::Storage;
use crate::domain::{NewProduct, Product};
use crate::error::{CatalogError, Result};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id     INTEGER PRIMARY KEY AUTOINCREMENT,
        name   TEXT NOT NULL CHECK (length(name) > 0),
        price  REAL NOT NULL CHECK (price >= 0),
        image  TEXT
    );
"#;

/// SQLite-backed product store. The single connection is shared behind a mutex,
/// so statements from concurrent requests run one at a time.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Opens (or creates) the database file and applies the schema.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        // journal_mode returns a row, so it can't go through execute_batch
        conn.query_row("PRAGMA journal_mode=WAL", [], |_| Ok(()))?;
        info!("Opened product database at {}", path.display());
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| CatalogError::Database {
            message: format!("connection lock poisoned: {e}"),
        })
    }

    fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
        Ok(Product {
            id: row.get(0)?,
            name: row.get(1)?,
            price: row.get(2)?,
            image: row.get(3)?,
        })
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn get_product_by_id(&self, id: i64) -> Result<Option<Product>> {
        let conn = self.conn()?;
        let product = conn
            .query_row(
                "SELECT id, name, price, image FROM products WHERE id = ?1",
                params![id],
                Self::product_from_row,
            )
            .optional()?;
        Ok(product)
    }

    async fn get_all_products(&self) -> Result<Vec<Product>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name, price, image FROM products ORDER BY id")?;
        let rows = stmt.query_map([], Self::product_from_row)?;
        let products = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(products)
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO products (name, price, image) VALUES (?1, ?2, ?3)",
            params![product.name, product.price, product.image],
        )?;
        let id = conn.last_insert_rowid();

        debug!("Created product: {} with id {}", product.name, id);
        Ok(Product::from_new(id, product))
    }

    async fn update_product(&self, product: &Product) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE products SET name = ?1, price = ?2, image = ?3 WHERE id = ?4",
            params![product.name, product.price, product.image, product.id],
        )?;
        if changed > 0 {
            debug!("Updated product: {} with id {}", product.name, product.id);
        }
        Ok(changed > 0)
    }

    async fn delete_product(&self, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM products WHERE id = ?1", params![id])?;
        if changed > 0 {
            debug!("Deleted product with id {}", id);
        }
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_products_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("catalog.db");

        let id = {
            let storage = SqliteStorage::open(&path).unwrap();
            let created = storage
                .create_product(&NewProduct::new("Widget", 9.99).with_image("images/a.jpg"))
                .await
                .unwrap();
            created.id
        };

        let storage = SqliteStorage::open(&path).unwrap();
        let product = storage.get_product_by_id(id).await.unwrap().unwrap();
        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, 9.99);
        assert_eq!(product.image.as_deref(), Some("images/a.jpg"));
    }

    #[tokio::test]
    async fn test_negative_price_rejected_by_schema() {
        // Bypasses domain validation to exercise the CHECK constraint
        let storage = SqliteStorage::open_in_memory().unwrap();
        let result = storage.create_product(&NewProduct::new("Widget", -1.0)).await;

        assert!(matches!(result, Err(CatalogError::Sqlite(_))));
        assert!(storage.get_all_products().await.unwrap().is_empty());
    }
}
