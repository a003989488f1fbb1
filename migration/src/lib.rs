pub use sea_orm_migration::prelude::*;

mod m20260810_000001_create_users;
mod m20260810_000002_create_dining_tables;
mod m20260810_000003_create_dishes;
mod m20260810_000004_create_bookings;
mod m20260810_000005_create_booking_dishes;
mod m20260810_000006_create_vouchers;
mod m20260810_000007_create_payment_orders;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260810_000001_create_users::Migration),
            Box::new(m20260810_000002_create_dining_tables::Migration),
            Box::new(m20260810_000003_create_dishes::Migration),
            Box::new(m20260810_000004_create_bookings::Migration),
            Box::new(m20260810_000005_create_booking_dishes::Migration),
            Box::new(m20260810_000006_create_vouchers::Migration),
            Box::new(m20260810_000007_create_payment_orders::Migration),
        ]
    }
}
