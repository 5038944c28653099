use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest product name the catalog accepts, in characters.
pub const MAX_NAME_LEN: usize = 50;

/// A catalog item as persisted by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    /// Path of the stored image relative to the media root, e.g. `images/<sha256>.jpg`.
    pub image: Option<String>,
}

/// Fields of a product that does not have an id yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub image: Option<String>,
}

/// Field-by-field changes for an existing product. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
}

pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CatalogError::Validation("name must not be empty".to_string()));
    }
    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(CatalogError::Validation(format!(
            "name must be at most {MAX_NAME_LEN} characters (got {len})"
        )));
    }
    Ok(())
}

pub fn validate_price(price: f64) -> Result<()> {
    if !price.is_finite() {
        return Err(CatalogError::Validation("price must be a finite number".to_string()));
    }
    if price < 0.0 {
        return Err(CatalogError::Validation(format!(
            "price must be non-negative (got {price})"
        )));
    }
    Ok(())
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_price(self.price)
    }
}

impl ProductChanges {
    /// Checks only the fields that are present.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

impl Product {
    pub fn from_new(id: i64, new: &NewProduct) -> Self {
        Self {
            id,
            name: new.name.clone(),
            price: new.price,
            image: new.image.clone(),
        }
    }

    /// Validates `changes` and merges them into this product.
    /// On error the product is left untouched.
    pub fn apply(&mut self, changes: ProductChanges) -> Result<()> {
        changes.validate()?;
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(image) = changes.image {
            self.image = Some(image);
        }
        Ok(())
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> Product {
        Product {
            id: 1,
            name: "Widget".to_string(),
            price: 9.99,
            image: None,
        }
    }

    #[test]
    fn test_new_product_validation() {
        assert!(NewProduct::new("Widget", 9.99).validate().is_ok());
        assert!(NewProduct::new("Free sample", 0.0).validate().is_ok());

        let err = NewProduct::new("Widget", -1.0).validate().unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        assert!(NewProduct::new("", 1.0).validate().is_err());
        assert!(NewProduct::new("   ", 1.0).validate().is_err());
        assert!(NewProduct::new("Widget", f64::NAN).validate().is_err());
        assert!(NewProduct::new("Widget", f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_name_length_limit() {
        let at_limit = "x".repeat(MAX_NAME_LEN);
        assert!(NewProduct::new(at_limit, 1.0).validate().is_ok());

        let too_long = "x".repeat(MAX_NAME_LEN + 1);
        assert!(NewProduct::new(too_long, 1.0).validate().is_err());

        // Counted in characters, not bytes
        let accented = "é".repeat(MAX_NAME_LEN);
        assert!(NewProduct::new(accented, 1.0).validate().is_ok());
    }

    #[test]
    fn test_apply_only_touches_supplied_fields() {
        let mut product = widget();
        product
            .apply(ProductChanges {
                price: Some(12.50),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, 12.50);
        assert_eq!(product.image, None);

        product
            .apply(ProductChanges {
                image: Some("images/abc.jpg".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(product.image.as_deref(), Some("images/abc.jpg"));
        assert_eq!(product.price, 12.50);
    }

    #[test]
    fn test_rejected_changes_leave_product_unchanged() {
        let mut product = widget();
        let result = product.apply(ProductChanges {
            name: Some("Gadget".to_string()),
            price: Some(-5.0),
            image: None,
        });

        assert!(result.is_err());
        assert_eq!(product, widget());
    }

    #[test]
    fn test_display_is_name() {
        assert_eq!(widget().to_string(), "Widget");
    }
}
