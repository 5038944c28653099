use crate::error::Result;
use crate::domain::{NewProduct, Product};
use async_trait::async_trait;

/// Storage trait for persisting catalog products
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_product_by_id(&self, id: i64) -> Result<Option<Product>>;

    /// All products, ordered by ascending id.
    async fn get_all_products(&self) -> Result<Vec<Product>>;

    /// Inserts a new product and returns it with its assigned id.
    async fn create_product(&self, product: &NewProduct) -> Result<Product>;

    /// Overwrites the stored product with the same id. Returns `false` if there is none.
    async fn update_product(&self, product: &Product) -> Result<bool>;

    /// Returns `false` if no product had this id.
    async fn delete_product(&self, id: i64) -> Result<bool>;
}
