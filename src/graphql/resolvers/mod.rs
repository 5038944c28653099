pub mod mutation;
pub mod query;

pub use mutation::Mutation;
pub use query::Query;

use crate::error::CatalogError;
use async_graphql::ID;

/// Product ids are integers on the wire, whether sent as `ID` strings or numbers.
pub(crate) fn parse_product_id(id: &ID) -> Result<i64, CatalogError> {
    id.trim()
        .parse::<i64>()
        .map_err(|_| CatalogError::Validation(format!("invalid product id '{}'", id.as_str())))
}
