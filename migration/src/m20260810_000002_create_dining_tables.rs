use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DiningTable::Table)
                    .if_not_exists()
                    .col(uuid(DiningTable::Id).primary_key())
                    .col(
                        string_len(DiningTable::TableNumber, 10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(integer(DiningTable::Capacity).not_null())
                    .col(
                        timestamp_with_time_zone(DiningTable::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DiningTable::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum DiningTable {
    Table,
    Id,
    TableNumber,
    Capacity,
    CreatedAt,
}
