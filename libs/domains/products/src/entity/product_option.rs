use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::ProductOption;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "product_options")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "String(StringLen::N(24))")]
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductOption {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            name: model.name,
            description: model.description,
        }
    }
}

impl From<ProductOption> for ActiveModel {
    fn from(option: ProductOption) -> Self {
        ActiveModel {
            id: Set(option.id),
            product_id: Set(option.product_id),
            name: Set(option.name),
            description: Set(option.description),
        }
    }
}
