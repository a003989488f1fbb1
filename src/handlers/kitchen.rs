use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::billing::DishLine;
use crate::domain::status::{BookingStatus, TransitionRole};
use crate::entities::{booking, booking_dish, dining_table};
use crate::error::AppResult;
use crate::handlers::staff::{apply_transition, StatusResponse};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct KitchenTicket {
    pub booking_id: Uuid,
    pub status: BookingStatus,
    pub order_type: String,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub table_number: Option<String>,
    pub note: Option<String>,
    pub lines: Vec<DishLine>,
}

/// Fulfillment queue: confirmed, cooking and ready bookings in service order
pub async fn queue(State(state): State<AppState>) -> AppResult<Json<Vec<KitchenTicket>>> {
    let bookings = booking::Entity::find().all(&state.db).await?;
    let tables = dining_table::Entity::find().all(&state.db).await?;
    let all_lines = booking_dish::Entity::find().all(&state.db).await?;

    let mut tickets: Vec<KitchenTicket> = bookings
        .into_iter()
        .filter(|b| {
            matches!(
                BookingStatus::parse(&b.status),
                BookingStatus::Confirmed | BookingStatus::Cooking | BookingStatus::Ready
            )
        })
        .map(|b| {
            let table_number = b
                .table_id
                .and_then(|tid| tables.iter().find(|t| t.id == tid))
                .map(|t| t.table_number.clone());

            let lines = all_lines
                .iter()
                .filter(|l| l.booking_id == b.id)
                .map(|l| DishLine {
                    dish_id: l.dish_id,
                    name: l.name.clone(),
                    unit_price: l.unit_price,
                    quantity: l.quantity,
                })
                .collect();

            KitchenTicket {
                booking_id: b.id,
                status: BookingStatus::parse(&b.status),
                order_type: b.order_type,
                booking_date: b.booking_date,
                start_time: b.start_time,
                table_number,
                note: b.note,
                lines,
            }
        })
        .collect();

    tickets.sort_by_key(|t| (t.booking_date, t.start_time));

    Ok(Json(tickets))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Update booking status with the kitchen rule set: orders only move
/// forward, and everything outside Confirmed/Cooking is locked.
pub async fn update_status(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<StatusResponse>> {
    let target = BookingStatus::parse(&payload.status);
    let updated = apply_transition(&state.db, booking_id, target, TransitionRole::Kitchen).await?;

    Ok(Json(StatusResponse {
        booking_id: updated.id,
        status: BookingStatus::parse(&updated.status),
    }))
}
