//! Generic CRUD access for SeaORM entities keyed by a UUID.
//!
//! Domain repositories wrap a [`BaseRepository`] and add their own queries on top:
//!
//! ```ignore
//! pub struct PgProductRepository {
//!     products: BaseRepository<product::Entity>,
//! }
//!
//! let found = self.products.find_by_id(id).await?;
//! ```

use sea_orm::sea_query::IntoCondition;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait, QueryFilter, QueryOrder,
};
use std::marker::PhantomData;
use uuid::Uuid;

/// CRUD operations shared by every UUID-keyed entity.
///
/// Absent rows are `Ok(None)` / zero rows affected, never errors. Every write runs on
/// its own statement and is committed immediately; use [`BaseRepository::db`] to run
/// several writes in one transaction.
pub struct BaseRepository<E: EntityTrait> {
    db: DatabaseConnection,
    _entity: PhantomData<E>,
}

impl<E: EntityTrait> Clone for BaseRepository<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> BaseRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Uuid>,
{
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// Underlying connection, for specialised queries and transactions.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<E::Model>, DbErr> {
        E::find_by_id(id).one(&self.db).await
    }

    /// Every row, ascending by `order_by`.
    pub async fn find_all(&self, order_by: E::Column) -> Result<Vec<E::Model>, DbErr> {
        E::find().order_by_asc(order_by).all(&self.db).await
    }

    /// Rows matching `condition`, ascending by `order_by`.
    pub async fn find<C>(&self, condition: C, order_by: E::Column) -> Result<Vec<E::Model>, DbErr>
    where
        C: IntoCondition,
    {
        E::find()
            .filter(condition)
            .order_by_asc(order_by)
            .all(&self.db)
            .await
    }

    /// First row matching `condition`.
    pub async fn find_one<C>(&self, condition: C) -> Result<Option<E::Model>, DbErr>
    where
        C: IntoCondition,
    {
        E::find().filter(condition).one(&self.db).await
    }

    /// Insert a fully populated active model (including its id) and return the stored row.
    pub async fn insert(&self, model: E::ActiveModel) -> Result<E::Model, DbErr> {
        model.insert(&self.db).await
    }

    /// Write the changed columns of `model`. Fails with `DbErr::RecordNotUpdated` when the
    /// row no longer exists.
    pub async fn update(&self, model: E::ActiveModel) -> Result<E::Model, DbErr> {
        model.update(&self.db).await
    }

    /// Remove the row behind a loaded model. Returns the number of rows removed.
    pub async fn delete(&self, model: E::Model) -> Result<u64, DbErr> {
        let result = model.into_active_model().delete(&self.db).await?;
        Ok(result.rows_affected)
    }

    /// Returns the number of rows removed (0 or 1).
    pub async fn delete_by_id(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = E::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }

    /// Returns the number of rows removed.
    pub async fn delete_where<C>(&self, condition: C) -> Result<u64, DbErr>
    where
        C: IntoCondition,
    {
        let result = E::delete_many().filter(condition).exec(&self.db).await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::entity::prelude::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Set};

    mod widget {
        use sea_orm::entity::prelude::*;

        #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
        #[sea_orm(table_name = "widgets")]
        pub struct Model {
            #[sea_orm(primary_key, auto_increment = false)]
            pub id: Uuid,
            pub label: String,
        }

        #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
        pub enum Relation {}

        impl ActiveModelBehavior for ActiveModel {}
    }

    fn widget(label: &str) -> widget::Model {
        widget::Model {
            id: Uuid::now_v7(),
            label: label.to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_absent_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<widget::Model>::new()])
            .into_connection();
        let repo = BaseRepository::<widget::Entity>::new(db);

        assert!(repo.find_by_id(Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_returns_matching_rows() {
        let a = widget("alpha");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![a.clone()]])
            .into_connection();
        let repo = BaseRepository::<widget::Entity>::new(db);

        let found = repo
            .find(widget::Column::Label.contains("alp"), widget::Column::Id)
            .await
            .unwrap();
        assert_eq!(found, vec![a]);
    }

    #[tokio::test]
    async fn test_insert_returns_stored_row() {
        let w = widget("beta");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![w.clone()]])
            .into_connection();
        let repo = BaseRepository::<widget::Entity>::new(db);

        let stored = repo
            .insert(widget::ActiveModel {
                id: Set(w.id),
                label: Set(w.label.clone()),
            })
            .await
            .unwrap();
        assert_eq!(stored, w);
    }

    #[tokio::test]
    async fn test_delete_by_id_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repo = BaseRepository::<widget::Entity>::new(db);

        assert_eq!(repo.delete_by_id(Uuid::now_v7()).await.unwrap(), 1);
        assert_eq!(repo.delete_by_id(Uuid::now_v7()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_loaded_model() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let repo = BaseRepository::<widget::Entity>::new(db);

        assert_eq!(repo.delete(widget("gamma")).await.unwrap(), 1);
    }
}
