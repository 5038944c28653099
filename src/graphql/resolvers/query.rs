use super::parse_product_id;
use crate::graphql::schema::GraphQLContext;
use crate::graphql::types::Product;
use async_graphql::{Context, ErrorExtensions, FieldResult, Object, ID};

/// Root query object for GraphQL
pub struct Query;

#[Object]
impl Query {
    /// Get every product in the catalog
    async fn all_products(&self, ctx: &Context<'_>) -> FieldResult<Vec<Product>> {
        let context = ctx.data::<GraphQLContext>()?;

        match context.storage.get_all_products().await {
            Ok(products) => Ok(products.into_iter().map(|p| p.into()).collect()),
            Err(e) => Err(e.extend()),
        }
    }

    /// Get a product by ID, or null if it does not exist
    async fn product(&self, ctx: &Context<'_>, id: ID) -> FieldResult<Option<Product>> {
        let context = ctx.data::<GraphQLContext>()?;
        let product_id = parse_product_id(&id).map_err(|e| e.extend())?;

        match context.storage.get_product_by_id(product_id).await {
            Ok(product) => Ok(product.map(|p| p.into())),
            Err(e) => Err(e.extend()),
        }
    }
}
