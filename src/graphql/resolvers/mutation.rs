use super::parse_product_id;
use crate::domain::{NewProduct, ProductChanges};
use crate::error::Result;
use crate::graphql::schema::GraphQLContext;
use crate::graphql::types::{CreateProductPayload, DeleteProductPayload, UpdateProductPayload};
use crate::media::{self, MediaStore};
use crate::observability::metrics;
use async_graphql::{Context, ErrorExtensions, FieldResult, Object, ID};
use tracing::{info, warn};

/// Root mutation object for GraphQL
pub struct Mutation;

/// Decodes a base64 upload and writes it to the media store, returning the image reference.
fn store_image(media: &MediaStore, encoded: &str) -> Result<String> {
    let image = media::decode_image(encoded).map_err(|e| {
        metrics::image_decode_error();
        warn!("Rejected image upload: {}", e);
        e
    })?;
    let reference = media.save(&image)?;
    metrics::image_stored();
    Ok(reference)
}

/// Blank image strings are treated the same as an omitted image.
fn supplied_image(image: Option<String>) -> Option<String> {
    image.filter(|s| !s.trim().is_empty())
}

#[Object]
impl Mutation {
    /// Create a product, optionally with a base64-encoded image (a data-URI header is allowed)
    async fn create_product(
        &self,
        ctx: &Context<'_>,
        name: String,
        price: f64,
        image: Option<String>,
    ) -> FieldResult<CreateProductPayload> {
        let context = ctx.data::<GraphQLContext>()?;

        let mut new_product = NewProduct::new(name, price);
        new_product.validate().map_err(|e| e.extend())?;

        if let Some(encoded) = supplied_image(image) {
            let reference = store_image(&context.media, &encoded).map_err(|e| e.extend())?;
            new_product.image = Some(reference);
        }

        let product = context
            .storage
            .create_product(&new_product)
            .await
            .map_err(|e| e.extend())?;

        metrics::product_created();
        info!("Created product: {} (ID: {})", product.name, product.id);

        Ok(CreateProductPayload {
            product: Some(product.into()),
        })
    }

    /// Update the supplied fields of a product; omitted fields keep their current value
    async fn update_product(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: Option<String>,
        price: Option<f64>,
        image: Option<String>,
    ) -> FieldResult<UpdateProductPayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let product_id = parse_product_id(&id).map_err(|e| e.extend())?;

        let Some(mut product) = context
            .storage
            .get_product_by_id(product_id)
            .await
            .map_err(|e| e.extend())?
        else {
            return Ok(UpdateProductPayload::not_found());
        };

        let mut changes = ProductChanges {
            name,
            price,
            image: None,
        };
        // Validate before touching the media store
        changes.validate().map_err(|e| e.extend())?;

        if let Some(encoded) = supplied_image(image) {
            changes.image = Some(store_image(&context.media, &encoded).map_err(|e| e.extend())?);
        }

        product.apply(changes).map_err(|e| e.extend())?;

        let updated = context
            .storage
            .update_product(&product)
            .await
            .map_err(|e| e.extend())?;
        if !updated {
            // Deleted between the read and the write
            return Ok(UpdateProductPayload::not_found());
        }

        metrics::product_updated();
        info!("Updated product: {} (ID: {})", product.name, product.id);

        Ok(UpdateProductPayload {
            success: true,
            product: Some(product.into()),
        })
    }

    /// Delete a product by ID
    async fn delete_product(&self, ctx: &Context<'_>, id: ID) -> FieldResult<DeleteProductPayload> {
        let context = ctx.data::<GraphQLContext>()?;
        let product_id = parse_product_id(&id).map_err(|e| e.extend())?;

        match context.storage.delete_product(product_id).await {
            Ok(true) => {
                metrics::product_deleted();
                info!("Deleted product with ID: {}", product_id);
                Ok(DeleteProductPayload::deleted())
            }
            Ok(false) => Ok(DeleteProductPayload::not_found()),
            Err(e) => Err(e.extend()),
        }
    }
}
