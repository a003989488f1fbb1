use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Dish::Table)
                    .if_not_exists()
                    .col(uuid(Dish::Id).primary_key())
                    .col(string_len(Dish::Name, 200).not_null())
                    .col(big_integer(Dish::UnitPrice).not_null())
                    .col(boolean(Dish::IsAvailable).not_null().default(true))
                    .col(
                        timestamp_with_time_zone(Dish::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Dish::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Dish {
    Table,
    Id,
    Name,
    UnitPrice,
    IsAvailable,
    CreatedAt,
}
