pub mod config;
pub mod domain;
pub mod error;
pub mod graphql;
pub mod logging;
pub mod media;
pub mod observability;
pub mod server;
pub mod storage;

pub use domain::{NewProduct, Product, ProductChanges};
pub use error::{CatalogError, Result};
