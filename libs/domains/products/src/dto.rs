//! Request and response bodies.
//!
//! Amounts are `Decimal` internally and JSON numbers on the wire. Requests may also
//! send them as numeric strings (`"10.00"`).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{Product, ProductOption};

const MIN_PRICE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);
const MAX_PRICE: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);
const MAX_DELIVERY_PRICE: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 10.0)]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 2.0)]
    pub delivery_price: Decimal,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            delivery_price: product.delivery_price,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductsDto {
    pub items: Vec<ProductDto>,
}

impl From<Vec<Product>> for ProductsDto {
    fn from(products: Vec<Product>) -> Self {
        Self {
            items: products.into_iter().map(ProductDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductOptionDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
}

impl From<ProductOption> for ProductOptionDto {
    fn from(option: ProductOption) -> Self {
        Self {
            id: option.id,
            name: option.name,
            description: option.description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductOptionsDto {
    pub items: Vec<ProductOptionDto>,
}

impl From<Vec<ProductOption>> for ProductOptionsDto {
    fn from(options: Vec<ProductOption>) -> Self {
        Self {
            items: options.into_iter().map(ProductOptionDto::from).collect(),
        }
    }
}

/// Body for creating or replacing a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProduct {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    /// Between 0.5 and 10000
    #[validate(custom(function = "validate_price"))]
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    #[schema(value_type = f64, example = 10.0)]
    pub price: Decimal,
    /// Between 0 and 200, defaults to 0
    #[validate(custom(function = "validate_delivery_price"))]
    #[serde(default, serialize_with = "rust_decimal::serde::float::serialize")]
    #[schema(value_type = f64, example = 2.0)]
    pub delivery_price: Decimal,
}

/// Body for creating or replacing a product option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpsertProductOption {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Stored in a `varchar(24)` column
    #[validate(length(min = 1, max = 24, message = "description must be 1 to 24 characters"))]
    #[schema(max_length = 24, example = "Bright red")]
    pub description: String,
}

/// Amounts are stored as `numeric(10,2)`, so anything finer than a cent is refused
fn validate_cents(amount: &Decimal, field: &str) -> Result<(), ValidationError> {
    if amount.normalize().scale() > 2 {
        return Err(ValidationError::new("scale")
            .with_message(format!("{field} must have at most 2 decimal places").into()));
    }
    Ok(())
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    validate_cents(price, "price")?;
    if *price < MIN_PRICE || *price > MAX_PRICE {
        return Err(
            ValidationError::new("range").with_message("price must be between 0.5 and 10000".into()),
        );
    }
    Ok(())
}

fn validate_delivery_price(price: &Decimal) -> Result<(), ValidationError> {
    validate_cents(price, "deliveryPrice")?;
    if *price < Decimal::ZERO || *price > MAX_DELIVERY_PRICE {
        return Err(
            ValidationError::new("range").with_message("deliveryPrice must be between 0 and 200".into()),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn product(price: &str, delivery: &str) -> UpsertProduct {
        UpsertProduct {
            name: "Widget".to_string(),
            description: "d".to_string(),
            price: dec(price),
            delivery_price: dec(delivery),
        }
    }

    #[test]
    fn test_price_bounds() {
        assert!(product("0.5", "0").validate().is_ok());
        assert!(product("10000", "0").validate().is_ok());
        assert!(product("0.49", "0").validate().is_err());
        assert!(product("10000.01", "0").validate().is_err());
    }

    #[test]
    fn test_delivery_price_bounds() {
        assert!(product("10", "200").validate().is_ok());
        assert!(product("10", "200.01").validate().is_err());
        assert!(product("10", "-1").validate().is_err());
    }

    #[test]
    fn test_sub_cent_amounts_are_rejected() {
        assert!(product("10.005", "0").validate().is_err());
        assert!(product("10", "2.001").validate().is_err());
        // trailing zeros do not count
        assert!(product("10.500", "2.000").validate().is_ok());
    }

    #[test]
    fn test_price_error_names_field() {
        let errors = product("0.1", "0").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut input = product("10", "0");
        input.name = String::new();
        assert!(input.validate().unwrap_err().field_errors().contains_key("name"));
    }

    #[test]
    fn test_option_description_max_length() {
        let ok = UpsertProductOption {
            name: "Red".to_string(),
            description: "x".repeat(24),
        };
        assert!(ok.validate().is_ok());

        let too_long = UpsertProductOption {
            name: "Red".to_string(),
            description: "x".repeat(25),
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_upsert_product_accepts_numbers_and_strings() {
        let input: UpsertProduct = serde_json::from_str(
            r#"{"name":"Widget","description":"d","price":10.00,"deliveryPrice":"2.00"}"#,
        )
        .unwrap();

        assert_eq!(input.price, dec("10"));
        assert_eq!(input.delivery_price, dec("2"));
    }

    #[test]
    fn test_delivery_price_defaults_to_zero() {
        let input: UpsertProduct =
            serde_json::from_str(r#"{"name":"Widget","description":"d","price":10}"#).unwrap();
        assert!(input.delivery_price.is_zero());
    }

    #[test]
    fn test_product_dto_is_camel_case_with_numbers() {
        let dto = ProductDto {
            id: Uuid::nil(),
            name: "Widget".to_string(),
            description: "d".to_string(),
            price: dec("10.50"),
            delivery_price: dec("2"),
        };

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["price"], serde_json::json!(10.5));
        assert_eq!(json["deliveryPrice"], serde_json::json!(2.0));
        assert!(json.get("delivery_price").is_none());
    }
}
