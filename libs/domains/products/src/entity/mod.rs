//! SeaORM entities for the `products` and `product_options` tables.

pub mod product;
pub mod product_option;

pub use product::Entity as ProductEntity;
pub use product_option::Entity as ProductOptionEntity;
