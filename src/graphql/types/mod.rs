pub mod payloads;
pub mod product;

pub use payloads::{CreateProductPayload, DeleteProductPayload, UpdateProductPayload};
pub use product::Product;
