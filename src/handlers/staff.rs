use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::billing::OrderType;
use crate::domain::status::{can_transition, valid_next_statuses, BookingStatus, TransitionRole};
use crate::entities::{booking, dining_table, user, voucher};
use crate::error::{AppError, AppResult};
use crate::handlers::booking::{replace_dish_lines, snapshot_booking_lines};
use crate::handlers::tables::{assert_table_available, window_end};
use crate::utils::contact::{validate_email, validate_phone};
use crate::AppState;

// ============ Booking overview ============

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    pub date: Option<NaiveDate>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StaffBookingInfo {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_phone: String,
    pub order_type: String,
    pub status: BookingStatus,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub table_number: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// List bookings for the front desk, optionally filtered by date and status
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingListQuery>,
) -> AppResult<Json<Vec<StaffBookingInfo>>> {
    let mut finder = booking::Entity::find();
    if let Some(date) = query.date {
        finder = finder.filter(booking::Column::BookingDate.eq(date));
    }
    let bookings = finder.all(&state.db).await?;

    let status_filter = query.status.as_deref().map(BookingStatus::parse);

    let users = user::Entity::find().all(&state.db).await?;
    let tables = dining_table::Entity::find().all(&state.db).await?;

    let responses = bookings
        .into_iter()
        .filter(|b| match status_filter {
            Some(wanted) => BookingStatus::parse(&b.status) == wanted,
            None => true,
        })
        .map(|b| {
            let customer = b.customer_id.and_then(|id| users.iter().find(|u| u.id == id));
            let (name, phone) = match customer {
                Some(u) => (u.name.clone(), u.phone.clone()),
                None => (
                    b.guest_name.clone().unwrap_or_default(),
                    b.guest_phone.clone().unwrap_or_default(),
                ),
            };
            let table_number = b
                .table_id
                .and_then(|tid| tables.iter().find(|t| t.id == tid))
                .map(|t| t.table_number.clone());

            StaffBookingInfo {
                id: b.id,
                customer_name: name,
                customer_phone: phone,
                order_type: b.order_type,
                status: BookingStatus::parse(&b.status),
                booking_date: b.booking_date,
                start_time: b.start_time,
                end_time: b.end_time,
                table_number,
                note: b.note,
                created_at: b.created_at.with_timezone(&Utc),
            }
        })
        .collect();

    Ok(Json(responses))
}

// ============ Guest bookings (phone / walk-in) ============

#[derive(Debug, Deserialize)]
pub struct GuestBookingRequest {
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub order_type: String,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub table_id: Option<Uuid>,
}

/// Create a booking on behalf of a guest without an account (front desk)
pub async fn create_guest_booking(
    State(state): State<AppState>,
    Json(payload): Json<GuestBookingRequest>,
) -> AppResult<Json<booking::Model>> {
    if payload.guest_name.trim().is_empty() {
        return Err(AppError::Validation("Guest name is required".to_string()));
    }
    validate_email(&payload.guest_email)?;
    validate_phone(&payload.guest_phone)?;

    let order_type = OrderType::parse(&payload.order_type)
        .ok_or_else(|| AppError::Validation("Order type must be dine_in or delivery".to_string()))?;

    let end_time = window_end(payload.start_time, payload.end_time);
    if end_time <= payload.start_time {
        return Err(AppError::Validation(
            "End time must be after start time".to_string(),
        ));
    }

    if order_type == OrderType::Delivery && payload.table_id.is_some() {
        return Err(AppError::Validation(
            "Delivery orders cannot reserve a table".to_string(),
        ));
    }

    if let Some(table_id) = payload.table_id {
        assert_table_available(
            &state.db,
            table_id,
            payload.booking_date,
            payload.start_time,
            end_time,
            None,
        )
        .await?;
    }

    let new_booking = booking::ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(None),
        guest_name: Set(Some(payload.guest_name)),
        guest_email: Set(Some(payload.guest_email)),
        guest_phone: Set(Some(payload.guest_phone)),
        order_type: Set(order_type.as_str().to_string()),
        booking_date: Set(payload.booking_date),
        start_time: Set(payload.start_time),
        end_time: Set(end_time),
        table_id: Set(payload.table_id),
        status: Set(BookingStatus::Pending.as_str().to_string()),
        note: Set(None),
        ..Default::default()
    };

    Ok(Json(new_booking.insert(&state.db).await?))
}

// ============ Status transitions ============

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub booking_id: Uuid,
    pub status: BookingStatus,
}

/// Authoritative transition: re-reads the booking, consults the shared
/// `(role, current) -> targets` table, and rejects anything outside it.
pub async fn apply_transition(
    db: &DatabaseConnection,
    booking_id: Uuid,
    target: BookingStatus,
    role: TransitionRole,
) -> AppResult<booking::Model> {
    if target == BookingStatus::Unknown {
        return Err(AppError::Validation(
            "Unrecognized target status".to_string(),
        ));
    }

    // Current state is read fresh at write time, never taken from the client.
    let booking = booking::Entity::find_by_id(booking_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    let current = BookingStatus::parse(&booking.status);
    if !can_transition(role, current, target) {
        let allowed: Vec<&str> = valid_next_statuses(role, current)
            .iter()
            .map(|s| s.as_str())
            .collect();
        return Err(AppError::Conflict(format!(
            "Cannot move booking from {} to {}; allowed: [{}]",
            current.as_str(),
            target.as_str(),
            allowed.join(", ")
        )));
    }

    let mut active: booking::ActiveModel = booking.into();
    active.status = Set(target.as_str().to_string());
    let updated = active.update(db).await?;

    tracing::info!(
        booking_id = %booking_id,
        from = current.as_str(),
        to = target.as_str(),
        "booking status changed"
    );

    Ok(updated)
}

/// Update booking status with the front-desk rule set
pub async fn update_status(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<StatusResponse>> {
    let target = BookingStatus::parse(&payload.status);
    let updated =
        apply_transition(&state.db, booking_id, target, TransitionRole::FrontDesk).await?;

    Ok(Json(StatusResponse {
        booking_id: updated.id,
        status: BookingStatus::parse(&updated.status),
    }))
}

// ============ Table reassignment ============

#[derive(Debug, Deserialize)]
pub struct ReassignTableRequest {
    pub table_id: Uuid,
}

/// Reassign a booking's table (front desk). Re-selecting the table the
/// booking already holds is a legal no-op even when it would otherwise show
/// as unavailable because of this booking's own occupancy.
pub async fn reassign_table(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<ReassignTableRequest>,
) -> AppResult<Json<booking::Model>> {
    let booking = load_booking(&state.db, booking_id).await?;

    if OrderType::parse(&booking.order_type) == Some(OrderType::Delivery) {
        return Err(AppError::Validation(
            "Delivery orders cannot be assigned a table".to_string(),
        ));
    }

    let status = BookingStatus::parse(&booking.status);
    if !status.is_editable() {
        return Err(AppError::Conflict(format!(
            "Booking is {} and its table can no longer change",
            booking.status
        )));
    }

    if booking.table_id == Some(payload.table_id) {
        return Ok(Json(booking));
    }

    assert_table_available(
        &state.db,
        payload.table_id,
        booking.booking_date,
        booking.start_time,
        booking.end_time,
        Some(booking.id),
    )
    .await?;

    let mut active: booking::ActiveModel = booking.into();
    active.table_id = Set(Some(payload.table_id));
    Ok(Json(active.update(&state.db).await?))
}

// ============ Staff edits to dishes and notes ============

/// Staff may edit dish lines until the booking completes or is canceled
pub async fn update_dishes(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<crate::handlers::booking::UpdateDishesRequest>,
) -> AppResult<Json<booking::Model>> {
    let booking = load_booking(&state.db, booking_id).await?;
    ensure_staff_editable(&booking)?;

    let lines = snapshot_booking_lines(&state.db, booking_id, &payload).await?;
    replace_dish_lines(&state.db, booking_id, &lines).await?;

    Ok(Json(booking))
}

#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub note: Option<String>,
}

pub async fn update_note(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<UpdateNoteRequest>,
) -> AppResult<Json<booking::Model>> {
    let booking = load_booking(&state.db, booking_id).await?;
    ensure_staff_editable(&booking)?;

    let mut active: booking::ActiveModel = booking.into();
    active.note = Set(payload.note);
    Ok(Json(active.update(&state.db).await?))
}

// ============ Vouchers ============

#[derive(Debug, Deserialize)]
pub struct CreateVoucherRequest {
    pub code: String,
    pub discount_percent: i32,
    pub expires_at: DateTime<Utc>,
    pub bound_user_id: Option<Uuid>,
}

/// Issue a voucher (front desk)
pub async fn create_voucher(
    State(state): State<AppState>,
    Json(payload): Json<CreateVoucherRequest>,
) -> AppResult<Json<voucher::Model>> {
    if payload.code.trim().is_empty() {
        return Err(AppError::Validation("Voucher code is required".to_string()));
    }
    if !(0..=100).contains(&payload.discount_percent) {
        return Err(AppError::Validation(
            "Discount percent must be between 0 and 100".to_string(),
        ));
    }

    let existing = voucher::Entity::find()
        .filter(voucher::Column::Code.eq(&payload.code))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Voucher code already exists".to_string()));
    }

    if let Some(user_id) = payload.bound_user_id {
        user::Entity::find_by_id(user_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Bound user not found".to_string()))?;
    }

    let new_voucher = voucher::ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(payload.code),
        discount_percent: Set(payload.discount_percent),
        expires_at: Set(payload.expires_at.into()),
        is_used: Set(false),
        bound_user_id: Set(payload.bound_user_id),
        ..Default::default()
    };

    Ok(Json(new_voucher.insert(&state.db).await?))
}

// ============ Helpers ============

async fn load_booking(db: &DatabaseConnection, booking_id: Uuid) -> AppResult<booking::Model> {
    booking::Entity::find_by_id(booking_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}

fn ensure_staff_editable(booking: &booking::Model) -> AppResult<()> {
    if BookingStatus::parse(&booking.status).is_editable() {
        Ok(())
    } else {
        Err(AppError::Conflict(format!(
            "Booking is {} and can no longer be edited",
            booking.status
        )))
    }
}
