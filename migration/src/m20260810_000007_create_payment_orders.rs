use sea_orm_migration::{prelude::*, schema::*};

use super::m20260810_000004_create_bookings::Booking;
use super::m20260810_000006_create_vouchers::Voucher;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PaymentOrder::Table)
                    .if_not_exists()
                    .col(uuid(PaymentOrder::Id).primary_key())
                    .col(uuid(PaymentOrder::BookingId).not_null())
                    .col(big_integer(PaymentOrder::Amount).not_null())
                    .col(string_len(PaymentOrder::Status, 20).not_null())
                    .col(string_len(PaymentOrder::TxnRef, 32).not_null().unique_key())
                    .col(uuid_null(PaymentOrder::VoucherId))
                    .col(
                        timestamp_with_time_zone(PaymentOrder::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_order_booking")
                            .from(PaymentOrder::Table, PaymentOrder::BookingId)
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_order_voucher")
                            .from(PaymentOrder::Table, PaymentOrder::VoucherId)
                            .to(Voucher::Table, Voucher::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PaymentOrder::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PaymentOrder {
    Table,
    Id,
    BookingId,
    Amount,
    Status,
    TxnRef,
    VoucherId,
    CreatedAt,
}
