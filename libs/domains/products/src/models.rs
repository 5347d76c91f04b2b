use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::dto::{UpsertProduct, UpsertProductOption};

/// A product and its pricing.
///
/// Options are stored separately and reached through the owning product's id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub delivery_price: Decimal,
}

impl Product {
    /// Build a new product with a fresh time-ordered id.
    pub fn new(input: UpsertProduct) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: input.name,
            description: input.description,
            price: input.price,
            delivery_price: input.delivery_price,
        }
    }

    /// Replace every mutable field. The id is kept.
    pub fn apply_update(&mut self, input: UpsertProduct) {
        self.name = input.name;
        self.description = input.description;
        self.price = input.price;
        self.delivery_price = input.delivery_price;
    }
}

/// A named variant of a product, e.g. a colour or size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductOption {
    pub id: Uuid,
    /// Owning product
    pub product_id: Uuid,
    pub name: String,
    pub description: String,
}

impl ProductOption {
    pub fn new(product_id: Uuid, input: UpsertProductOption) -> Self {
        Self {
            id: Uuid::now_v7(),
            product_id,
            name: input.name,
            description: input.description,
        }
    }

    pub fn apply_update(&mut self, input: UpsertProductOption) {
        self.name = input.name;
        self.description = input.description;
    }
}

/// Query parameters for listing products
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    /// Only products whose name contains this text (case-sensitive)
    pub name: Option<String>,
}

impl ProductFilter {
    /// The name to search for, if any. Blank means no filter.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}
