use sea_orm_migration::{prelude::*, schema::*};

use super::m20260810_000003_create_dishes::Dish;
use super::m20260810_000004_create_bookings::Booking;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BookingDish::Table)
                    .if_not_exists()
                    .col(uuid(BookingDish::Id).primary_key())
                    .col(uuid(BookingDish::BookingId).not_null())
                    .col(uuid(BookingDish::DishId).not_null())
                    .col(string_len(BookingDish::Name, 200).not_null())
                    .col(big_integer(BookingDish::UnitPrice).not_null())
                    .col(integer(BookingDish::Quantity).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_dish_booking")
                            .from(BookingDish::Table, BookingDish::BookingId)
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_dish_dish")
                            .from(BookingDish::Table, BookingDish::DishId)
                            .to(Dish::Table, Dish::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookingDish::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum BookingDish {
    Table,
    Id,
    BookingId,
    DishId,
    Name,
    UnitPrice,
    Quantity,
}
