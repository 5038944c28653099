use super::Product;
use async_graphql::SimpleObject;

/// Result of `createProduct`
#[derive(SimpleObject)]
pub struct CreateProductPayload {
    pub product: Option<Product>,
}

/// Result of `updateProduct`. `success` is false and `product` null when the id is unknown.
#[derive(SimpleObject)]
pub struct UpdateProductPayload {
    pub success: bool,
    pub product: Option<Product>,
}

impl UpdateProductPayload {
    pub fn not_found() -> Self {
        Self {
            success: false,
            product: None,
        }
    }
}

/// Result of `deleteProduct`
#[derive(SimpleObject)]
pub struct DeleteProductPayload {
    pub success: bool,
    pub message: String,
}

impl DeleteProductPayload {
    pub const DELETED: &'static str = "Product deleted successfully";
    pub const NOT_FOUND: &'static str = "Product not found";

    pub fn deleted() -> Self {
        Self {
            success: true,
            message: Self::DELETED.to_string(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            success: false,
            message: Self::NOT_FOUND.to_string(),
        }
    }
}
