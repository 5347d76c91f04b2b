pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_products;
mod m20250301_000002_create_product_options;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_products::Migration),
            Box::new(m20250301_000002_create_product_options::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_ordered() {
        let names: Vec<String> = Migrator::migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        assert_eq!(
            names,
            vec![
                "m20250301_000001_create_products",
                "m20250301_000002_create_product_options",
            ]
        );
    }
}
