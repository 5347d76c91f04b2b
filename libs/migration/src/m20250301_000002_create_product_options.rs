use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductOptions::Table)
                    .if_not_exists()
                    .col(pk_uuid(ProductOptions::Id))
                    .col(uuid(ProductOptions::ProductId))
                    .col(string(ProductOptions::Name))
                    .col(string_len(ProductOptions::Description, 24))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_options_product_id")
                            .from(ProductOptions::Table, ProductOptions::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_options_product_id")
                    .table(ProductOptions::Table)
                    .col(ProductOptions::ProductId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductOptions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProductOptions {
    Table,
    Id,
    ProductId,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
}
