use sea_orm_migration::{prelude::*, schema::*};

use super::m20260810_000001_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Voucher::Table)
                    .if_not_exists()
                    .col(uuid(Voucher::Id).primary_key())
                    .col(string_len(Voucher::Code, 50).not_null().unique_key())
                    .col(integer(Voucher::DiscountPercent).not_null())
                    .col(timestamp_with_time_zone(Voucher::ExpiresAt).not_null())
                    .col(boolean(Voucher::IsUsed).not_null().default(false))
                    .col(uuid_null(Voucher::BoundUserId))
                    .col(
                        timestamp_with_time_zone(Voucher::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_voucher_bound_user")
                            .from(Voucher::Table, Voucher::BoundUserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Voucher::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Voucher {
    Table,
    Id,
    Code,
    DiscountPercent,
    ExpiresAt,
    IsUsed,
    BoundUserId,
    CreatedAt,
}
