use crate::domain::Product as DomainProduct;
use crate::graphql::schema::GraphQLContext;
use async_graphql::{Context, FieldResult, Object, ID};

/// GraphQL representation of a Product
#[derive(Clone)]
pub struct Product {
    pub inner: DomainProduct,
}

impl From<DomainProduct> for Product {
    fn from(product: DomainProduct) -> Self {
        Self { inner: product }
    }
}

#[Object]
impl Product {
    /// The unique identifier for the product
    async fn id(&self) -> ID {
        ID(self.inner.id.to_string())
    }

    /// The name of the product
    async fn name(&self) -> &str {
        &self.inner.name
    }

    /// The product's price
    async fn price(&self) -> f64 {
        self.inner.price
    }

    /// Path of the product image relative to the media root
    async fn image(&self) -> Option<&str> {
        self.inner.image.as_deref()
    }

    /// Public URL of the product image
    async fn image_url(&self, ctx: &Context<'_>) -> FieldResult<Option<String>> {
        let context = ctx.data::<GraphQLContext>()?;
        Ok(self
            .inner
            .image
            .as_deref()
            .map(|reference| context.media.url_for(reference)))
    }
}
