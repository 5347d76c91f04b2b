use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::dto::{
    ProductDto, ProductOptionDto, ProductOptionsDto, ProductsDto, UpsertProduct, UpsertProductOption,
};
use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductFilter, ProductOption};
use crate::repository::ProductRepository;

/// Service layer for products and their options.
///
/// Owns the existence rules: a missing product is [`ProductError::NotFound`], a
/// missing or foreign option is [`ProductError::OptionNotFound`], and an option for
/// a missing product is [`ProductError::InvalidRelationship`].
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<ProductDto> {
        self.repository
            .get_by_id(id)
            .await?
            .map(ProductDto::from)
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<ProductsDto> {
        Ok(self.repository.list().await?.into())
    }

    #[instrument(skip(self))]
    pub async fn list_products_by_name(&self, name: &str) -> ProductResult<ProductsDto> {
        Ok(self.repository.find_by_name(name).await?.into())
    }

    /// List everything, or only name matches when the filter carries a name
    pub async fn search_products(&self, filter: ProductFilter) -> ProductResult<ProductsDto> {
        match filter.name() {
            Some(name) => self.list_products_by_name(name).await,
            None => self.list_products().await,
        }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: UpsertProduct) -> ProductResult<ProductDto> {
        validate(&input)?;

        let product = self.repository.create(Product::new(input)).await?;
        Ok(product.into())
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(&self, id: Uuid, input: UpsertProduct) -> ProductResult<ProductDto> {
        validate(&input)?;

        self.repository
            .update(id, input)
            .await?
            .map(ProductDto::from)
            .ok_or(ProductError::NotFound(id))
    }

    /// Delete a product and all of its options
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_options(&self, product_id: Uuid) -> ProductResult<ProductOptionsDto> {
        Ok(self.repository.list_options(product_id).await?.into())
    }

    #[instrument(skip(self))]
    pub async fn get_option(
        &self,
        product_id: Uuid,
        option_id: Uuid,
    ) -> ProductResult<ProductOptionDto> {
        self.repository
            .get_option(product_id, option_id)
            .await?
            .map(ProductOptionDto::from)
            .ok_or(ProductError::OptionNotFound {
                product_id,
                option_id,
            })
    }

    #[instrument(skip(self, input))]
    pub async fn create_option(
        &self,
        product_id: Uuid,
        input: UpsertProductOption,
    ) -> ProductResult<ProductOptionDto> {
        validate(&input)?;

        if self.repository.get_by_id(product_id).await?.is_none() {
            return Err(ProductError::InvalidRelationship(product_id));
        }

        let option = self
            .repository
            .create_option(ProductOption::new(product_id, input))
            .await?;
        Ok(option.into())
    }

    #[instrument(skip(self, input))]
    pub async fn update_option(
        &self,
        product_id: Uuid,
        option_id: Uuid,
        input: UpsertProductOption,
    ) -> ProductResult<ProductOptionDto> {
        validate(&input)?;

        self.repository
            .update_option(product_id, option_id, input)
            .await?
            .map(ProductOptionDto::from)
            .ok_or(ProductError::OptionNotFound {
                product_id,
                option_id,
            })
    }

    #[instrument(skip(self))]
    pub async fn delete_option(&self, product_id: Uuid, option_id: Uuid) -> ProductResult<()> {
        if !self.repository.delete_option(product_id, option_id).await? {
            return Err(ProductError::OptionNotFound {
                product_id,
                option_id,
            });
        }
        Ok(())
    }
}

fn validate<T: Validate>(input: &T) -> ProductResult<()> {
    input
        .validate()
        .map_err(|e| ProductError::Validation(e.to_string()))
}
