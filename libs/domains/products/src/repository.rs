use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dto::{UpsertProduct, UpsertProductOption};
use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductOption};

/// Repository trait for Product and ProductOption persistence
///
/// Lookups return `None` for absent rows and mutations report whether anything
/// was touched; deciding that "absent" is an error is the service's job.
/// Collections come back in creation order.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a new product. The id is already assigned.
    async fn create(&self, product: Product) -> ProductResult<Product>;

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// Every product
    async fn list(&self) -> ProductResult<Vec<Product>>;

    /// Products whose name contains `name` (case-sensitive)
    async fn find_by_name(&self, name: &str) -> ProductResult<Vec<Product>>;

    /// Replace the product's fields. `None` when the product does not exist.
    async fn update(&self, id: Uuid, input: UpsertProduct) -> ProductResult<Option<Product>>;

    /// Delete the product together with its options. `false` when it does not exist.
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;

    async fn list_options(&self, product_id: Uuid) -> ProductResult<Vec<ProductOption>>;

    /// The option, only if it belongs to `product_id`
    async fn get_option(
        &self,
        product_id: Uuid,
        option_id: Uuid,
    ) -> ProductResult<Option<ProductOption>>;

    /// Fails with `InvalidRelationship` when the owning product is gone.
    async fn create_option(&self, option: ProductOption) -> ProductResult<ProductOption>;

    async fn update_option(
        &self,
        product_id: Uuid,
        option_id: Uuid,
        input: UpsertProductOption,
    ) -> ProductResult<Option<ProductOption>>;

    async fn delete_option(&self, product_id: Uuid, option_id: Uuid) -> ProductResult<bool>;
}

/// In-memory repository for development and tests.
///
/// Keyed by UUIDv7 ids, so map order is creation order.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<BTreeMap<Uuid, Product>>>,
    options: Arc<RwLock<BTreeMap<Uuid, ProductOption>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: Product) -> ProductResult<Product> {
        let mut products = self.products.write().await;
        products.insert(product.id, product.clone());

        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn list(&self) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products.values().cloned().collect())
    }

    async fn find_by_name(&self, name: &str) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products
            .values()
            .filter(|p| p.name.contains(name))
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, input: UpsertProduct) -> ProductResult<Option<Product>> {
        let mut products = self.products.write().await;

        let Some(product) = products.get_mut(&id) else {
            return Ok(None);
        };
        product.apply_update(input);

        tracing::info!(product_id = %id, "Updated product");
        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        // Lock order: products, then options
        let mut products = self.products.write().await;
        let mut options = self.options.write().await;

        if products.remove(&id).is_none() {
            return Ok(false);
        }

        let before = options.len();
        options.retain(|_, o| o.product_id != id);

        tracing::info!(product_id = %id, options_removed = before - options.len(), "Deleted product");
        Ok(true)
    }

    async fn list_options(&self, product_id: Uuid) -> ProductResult<Vec<ProductOption>> {
        let options = self.options.read().await;
        Ok(options
            .values()
            .filter(|o| o.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn get_option(
        &self,
        product_id: Uuid,
        option_id: Uuid,
    ) -> ProductResult<Option<ProductOption>> {
        let options = self.options.read().await;
        Ok(options
            .get(&option_id)
            .filter(|o| o.product_id == product_id)
            .cloned())
    }

    async fn create_option(&self, option: ProductOption) -> ProductResult<ProductOption> {
        // Lock order: products, then options
        let products = self.products.read().await;
        if !products.contains_key(&option.product_id) {
            return Err(ProductError::InvalidRelationship(option.product_id));
        }

        let mut options = self.options.write().await;
        options.insert(option.id, option.clone());

        tracing::info!(product_id = %option.product_id, option_id = %option.id, "Created product option");
        Ok(option)
    }

    async fn update_option(
        &self,
        product_id: Uuid,
        option_id: Uuid,
        input: UpsertProductOption,
    ) -> ProductResult<Option<ProductOption>> {
        let mut options = self.options.write().await;

        let Some(option) = options
            .get_mut(&option_id)
            .filter(|o| o.product_id == product_id)
        else {
            return Ok(None);
        };
        option.apply_update(input);

        tracing::info!(%product_id, %option_id, "Updated product option");
        Ok(Some(option.clone()))
    }

    async fn delete_option(&self, product_id: Uuid, option_id: Uuid) -> ProductResult<bool> {
        let mut options = self.options.write().await;

        match options.get(&option_id) {
            Some(o) if o.product_id == product_id => {
                options.remove(&option_id);
                tracing::info!(%product_id, %option_id, "Deleted product option");
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
