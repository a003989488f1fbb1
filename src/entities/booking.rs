use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A reservation or delivery order. `status` and `order_type` are stored as
/// strings and go through the total parses in `domain` on every read, so an
/// unrecognized value surfaces as `Unknown` instead of failing decode.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "booking")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Registered customer, or None for a guest booking.
    pub customer_id: Option<Uuid>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub order_type: String,
    pub booking_date: Date,
    pub start_time: Time,
    pub end_time: Time,
    /// Null means awaiting assignment; always null for delivery.
    pub table_id: Option<Uuid>,
    pub status: String,
    pub note: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CustomerId",
        to = "super::user::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::dining_table::Entity",
        from = "Column::TableId",
        to = "super::dining_table::Column::Id"
    )]
    Table,
    #[sea_orm(has_many = "super::booking_dish::Entity")]
    DishLines,
    #[sea_orm(has_many = "super::payment_order::Entity")]
    PaymentOrders,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::dining_table::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Table.def()
    }
}

impl Related<super::booking_dish::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DishLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
