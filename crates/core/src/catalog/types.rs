//! Catalog domain types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::error::CatalogError;
use crate::numeric::{self, PRICE_PRECISION};

/// Longest product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// A product listed by a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Product ID.
    pub id: Uuid,
    /// Display name.
    pub product_name: String,
    /// Description.
    pub description: String,
    /// Base price, before any distance surcharge.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Stored image names, in upload order.
    pub images: Vec<String>,
    /// Owning admin account.
    #[serde(rename = "adminId")]
    pub owner_id: Uuid,
    /// Creation timestamp.
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
}

/// Input for persisting a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Display name.
    pub product_name: String,
    /// Description.
    pub description: String,
    /// Base price.
    pub price: Decimal,
    /// Stored image names.
    pub images: Vec<String>,
    /// Owning admin account.
    pub owner_id: Uuid,
}

/// Changes to an existing product. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    /// New display name.
    pub product_name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New base price.
    pub price: Option<Decimal>,
    /// Replacement image list.
    pub images: Option<Vec<String>>,
}

/// Text fields of a multipart product form, as received.
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    /// `productName` field.
    pub product_name: Option<String>,
    /// `description` field.
    pub description: Option<String>,
    /// `price` field.
    pub price: Option<String>,
}

impl ProductInput {
    /// Validate a complete form for a new product.
    pub(crate) fn into_new(
        self,
        owner_id: Uuid,
        images: Vec<String>,
    ) -> Result<NewProduct, CatalogError> {
        let changes = self.into_changes()?;
        Ok(NewProduct {
            product_name: changes
                .product_name
                .ok_or(CatalogError::MissingField("productName"))?,
            description: changes
                .description
                .ok_or(CatalogError::MissingField("description"))?,
            price: changes.price.ok_or(CatalogError::MissingField("price"))?,
            images,
            owner_id,
        })
    }

    /// Validate the supplied fields of a partial update. Blank text counts
    /// as absent.
    pub(crate) fn into_changes(self) -> Result<ProductChanges, CatalogError> {
        let product_name = non_blank(self.product_name);
        if product_name
            .as_ref()
            .is_some_and(|n| n.chars().count() > MAX_PRODUCT_NAME_LEN)
        {
            return Err(CatalogError::TooLong {
                field: "productName",
                max: MAX_PRODUCT_NAME_LEN,
            });
        }

        Ok(ProductChanges {
            product_name,
            description: non_blank(self.description),
            price: non_blank(self.price).as_deref().map(parse_price).transpose()?,
            images: None,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a non-negative decimal price with at most two decimal places.
pub(crate) fn parse_price(raw: &str) -> Result<Decimal, CatalogError> {
    let price = Decimal::from_str(raw).map_err(|_| CatalogError::InvalidPrice(raw.to_string()))?;
    if (price.is_sign_negative() && !price.is_zero()) || !numeric::fits(price, PRICE_PRECISION) {
        return Err(CatalogError::InvalidPrice(raw.to_string()));
    }
    Ok(price)
}
