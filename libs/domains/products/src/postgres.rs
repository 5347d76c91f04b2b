use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, SqlErr,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::{UpsertProduct, UpsertProductOption},
    entity::{product, product_option},
    error::{ProductError, ProductResult},
    models::{Product, ProductOption},
    repository::ProductRepository,
};

/// PostgreSQL-backed repository.
///
/// Writes are committed as soon as they return. Deleting a product removes its
/// options in the same transaction.
#[derive(Clone)]
pub struct PgProductRepository {
    products: BaseRepository<product::Entity>,
    options: BaseRepository<product_option::Entity>,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            products: BaseRepository::new(db.clone()),
            options: BaseRepository::new(db),
        }
    }

    fn option_condition(product_id: Uuid, option_id: Uuid) -> Condition {
        Condition::all()
            .add(product_option::Column::Id.eq(option_id))
            .add(product_option::Column::ProductId.eq(product_id))
    }
}

/// `LIKE` pattern matching `name` anywhere, with `%`, `_` and `\` taken literally.
/// Pair it with `ESCAPE '\'`.
fn contains_pattern(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len() + 2);
    escaped.push('%');
    for c in name.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// The product can vanish between the service's existence check and the insert
fn option_insert_error(err: DbErr, product_id: Uuid) -> ProductError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            ProductError::InvalidRelationship(product_id)
        }
        _ => ProductError::Database(err),
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: Product) -> ProductResult<Product> {
        let model = self.products.insert(product.into()).await?;

        tracing::info!(product_id = %model.id, "Created product");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let model = self.products.find_by_id(id).await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self) -> ProductResult<Vec<Product>> {
        let models = self.products.find_all(product::Column::Id).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_by_name(&self, name: &str) -> ProductResult<Vec<Product>> {
        let pattern = LikeExpr::new(contains_pattern(name)).escape('\\');
        let models = self
            .products
            .find(product::Column::Name.like(pattern), product::Column::Id)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: Uuid, input: UpsertProduct) -> ProductResult<Option<Product>> {
        let Some(model) = self.products.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut product: Product = model.into();
        product.apply_update(input);

        let updated = self.products.update(product.into()).await?;

        tracing::info!(product_id = %id, "Updated product");
        Ok(Some(updated.into()))
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let txn = self.products.db().begin().await?;

        let options_removed = product_option::Entity::delete_many()
            .filter(product_option::Column::ProductId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;

        let deleted = product::Entity::delete_by_id(id).exec(&txn).await?.rows_affected;
        if deleted == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        txn.commit().await?;

        tracing::info!(product_id = %id, options_removed, "Deleted product");
        Ok(true)
    }

    async fn list_options(&self, product_id: Uuid) -> ProductResult<Vec<ProductOption>> {
        let models = self
            .options
            .find(
                product_option::Column::ProductId.eq(product_id),
                product_option::Column::Id,
            )
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_option(
        &self,
        product_id: Uuid,
        option_id: Uuid,
    ) -> ProductResult<Option<ProductOption>> {
        let model = self
            .options
            .find_one(Self::option_condition(product_id, option_id))
            .await?;
        Ok(model.map(Into::into))
    }

    async fn create_option(&self, option: ProductOption) -> ProductResult<ProductOption> {
        let product_id = option.product_id;
        let model = self
            .options
            .insert(option.into())
            .await
            .map_err(|e| option_insert_error(e, product_id))?;

        tracing::info!(product_id = %model.product_id, option_id = %model.id, "Created product option");
        Ok(model.into())
    }

    async fn update_option(
        &self,
        product_id: Uuid,
        option_id: Uuid,
        input: UpsertProductOption,
    ) -> ProductResult<Option<ProductOption>> {
        let Some(model) = self
            .options
            .find_one(Self::option_condition(product_id, option_id))
            .await?
        else {
            return Ok(None);
        };

        let mut option: ProductOption = model.into();
        option.apply_update(input);

        let updated = self.options.update(option.into()).await?;

        tracing::info!(%product_id, %option_id, "Updated product option");
        Ok(Some(updated.into()))
    }

    async fn delete_option(&self, product_id: Uuid, option_id: Uuid) -> ProductResult<bool> {
        let rows_affected = self
            .options
            .delete_where(Self::option_condition(product_id, option_id))
            .await?;

        if rows_affected > 0 {
            tracing::info!(%product_id, %option_id, "Deleted product option");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
