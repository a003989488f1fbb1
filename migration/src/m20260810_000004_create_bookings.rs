use sea_orm_migration::{prelude::*, schema::*};

use super::m20260810_000001_create_users::User;
use super::m20260810_000002_create_dining_tables::DiningTable;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(uuid_null(Booking::CustomerId))
                    .col(string_null(Booking::GuestName))
                    .col(string_null(Booking::GuestEmail))
                    .col(string_null(Booking::GuestPhone))
                    .col(string_len(Booking::OrderType, 20).not_null())
                    .col(date(Booking::BookingDate).not_null())
                    .col(time(Booking::StartTime).not_null())
                    .col(time(Booking::EndTime).not_null())
                    .col(uuid_null(Booking::TableId))
                    .col(string_len(Booking::Status, 20).not_null())
                    .col(string_null(Booking::Note))
                    .col(
                        timestamp_with_time_zone(Booking::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_customer")
                            .from(Booking::Table, Booking::CustomerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_table")
                            .from(Booking::Table, Booking::TableId)
                            .to(DiningTable::Table, DiningTable::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    Table,
    Id,
    CustomerId,
    GuestName,
    GuestEmail,
    GuestPhone,
    OrderType,
    BookingDate,
    StartTime,
    EndTime,
    TableId,
    Status,
    Note,
    CreatedAt,
}
