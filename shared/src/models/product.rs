//! Product Model

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Upper bound accepted by the product form for price and stock fields
pub const MAX_FORM_VALUE: u32 = 100_000;

/// Product entity
///
/// The front end never mutates a product locally; every change goes through
/// the backend and is observed on the next list fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-assigned identifier
    pub id: i64,
    pub name: String,
    pub category: String,
    pub unit_price: f64,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
    /// Units on hand, 0 = out of stock
    #[serde(default)]
    pub in_stock: u32,
    /// Maintained by the backend, never sent back meaningfully
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Product {
    pub fn is_in_stock(&self) -> bool {
        self.in_stock > 0
    }

    /// Editable fields of this product, used to prefill the edit form
    pub fn draft(&self) -> ProductDraft {
        ProductDraft {
            name: self.name.clone(),
            category: self.category.clone(),
            unit_price: self.unit_price,
            expiration_date: self.expiration_date,
            in_stock: self.in_stock,
        }
    }

    /// Returns a copy of this product with the editable fields replaced by `draft`.
    pub fn with_draft(&self, draft: ProductDraft) -> Self {
        Self {
            id: self.id,
            name: draft.name,
            category: draft.category,
            unit_price: draft.unit_price,
            expiration_date: draft.expiration_date,
            in_stock: draft.in_stock,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Create product payload (server assigns the id)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "category is required"))]
    pub category: String,
    #[validate(
        custom(function = "finite_price"),
        range(min = 0.0, max = 100000.0, message = "unit price out of range")
    )]
    pub unit_price: f64,
    #[serde(default)]
    pub expiration_date: Option<NaiveDate>,
    #[validate(range(max = 100000, message = "stock out of range"))]
    pub in_stock: u32,
}

/// NaN passes both range bounds and serializes as `null`
fn finite_price(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(
            ValidationError::new("finite").with_message("unit price must be a number".into()),
        );
    }
    Ok(())
}
