use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "voucher")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub discount_percent: i32,
    pub expires_at: DateTimeWithTimeZone,
    pub is_used: bool,
    /// When set, only this user may redeem the voucher.
    pub bound_user_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::BoundUserId",
        to = "super::user::Column::Id"
    )]
    BoundUser,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BoundUser.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
