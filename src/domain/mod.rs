pub mod product;

pub use product::{NewProduct, Product, ProductChanges, MAX_NAME_LEN};
