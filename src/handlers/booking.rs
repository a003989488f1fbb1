use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::billing::{
    check_voucher, compute_bill, merge_line_requests, payment_due, Bill, BillingConfig, DishLine,
    OrderType, VoucherTerms,
};
use crate::domain::status::BookingStatus;
use crate::entities::{booking, booking_dish, dining_table, dish, user, voucher};
use crate::error::{AppError, AppResult};
use crate::handlers::payment;
use crate::handlers::tables::{assert_table_available, window_end};
use crate::utils::jwt::Claims;
use crate::AppState;

// ============ Menu (public, feeds the dish-selection stage) ============

#[derive(Debug, Serialize)]
pub struct DishInfo {
    pub id: Uuid,
    pub name: String,
    pub unit_price: i64,
}

/// List dishes currently available for pre-order
pub async fn list_dishes(State(state): State<AppState>) -> AppResult<Json<Vec<DishInfo>>> {
    let dishes = dish::Entity::find()
        .filter(dish::Column::IsAvailable.eq(true))
        .all(&state.db)
        .await?;

    let responses = dishes
        .into_iter()
        .map(|d| DishInfo {
            id: d.id,
            name: d.name,
            unit_price: d.unit_price,
        })
        .collect();

    Ok(Json(responses))
}

// ============ Wizard stage 1: capture ============

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub order_type: String,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub table_id: Option<Uuid>,
}

/// Create a booking (wizard stage 1). Starts `Pending` with no dish lines
/// and becomes the caller's active booking, which is what later stages and
/// a resumed session key off.
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<Json<BookingDetail>> {
    let order_type = OrderType::parse(&payload.order_type)
        .ok_or_else(|| AppError::Validation("Order type must be dine_in or delivery".to_string()))?;

    let end_time = window_end(payload.start_time, payload.end_time);
    if end_time <= payload.start_time {
        return Err(AppError::Validation(
            "End time must be after start time".to_string(),
        ));
    }

    // Delivery orders never occupy a table
    if order_type == OrderType::Delivery && payload.table_id.is_some() {
        return Err(AppError::Validation(
            "Delivery orders cannot reserve a table".to_string(),
        ));
    }

    // Re-checked against current active bookings; the listing the client saw
    // may be stale by now.
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

    let booking_id = Uuid::new_v4();
    let new_booking = booking::ActiveModel {
        id: Set(booking_id),
        customer_id: Set(Some(claims.sub)),
        guest_name: Set(None),
        guest_email: Set(None),
        guest_phone: Set(None),
        order_type: Set(order_type.as_str().to_string()),
        booking_date: Set(payload.booking_date),
        start_time: Set(payload.start_time),
        end_time: Set(end_time),
        table_id: Set(payload.table_id),
        status: Set(BookingStatus::Pending.as_str().to_string()),
        note: Set(None),
        ..Default::default()
    };

    let created = new_booking.insert(&state.db).await?;
    set_active_booking(&state.db, claims.sub, Some(booking_id)).await?;

    tracing::info!(booking_id = %booking_id, customer_id = %claims.sub, "booking created");

    booking_detail(&state, created, None).await.map(Json)
}

// ============ Wizard stage 2: dish selection ============

#[derive(Debug, Deserialize)]
pub struct DishLineRequest {
    pub dish_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDishesRequest {
    /// "pre_order" or "order_at_restaurant"
    pub order_mode: String,
    #[serde(default)]
    pub lines: Vec<DishLineRequest>,
}

/// Replace a booking's dish lines (wizard stage 2). Names and prices are
/// snapshotted from the menu at this moment. A quantity of 0 removes the
/// line; order-at-restaurant clears every line.
pub async fn update_dishes(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<UpdateDishesRequest>,
) -> AppResult<Json<BookingDetail>> {
    let booking = load_owned_booking(&state.db, booking_id, claims.sub).await?;
    ensure_customer_editable(&booking)?;

    let lines = snapshot_booking_lines(&state.db, booking_id, &payload).await?;
    replace_dish_lines(&state.db, booking_id, &lines).await?;

    booking_detail(&state, booking, None).await.map(Json)
}

/// Turn a dish-selection request into snapshot line rows. Order-at-restaurant
/// clears every line; pre-order resolves against the menu, merging duplicates
/// and dropping zero quantities.
pub async fn snapshot_booking_lines(
    db: &DatabaseConnection,
    booking_id: Uuid,
    payload: &UpdateDishesRequest,
) -> AppResult<Vec<booking_dish::ActiveModel>> {
    match payload.order_mode.as_str() {
        "order_at_restaurant" => Ok(Vec::new()),
        "pre_order" => snapshot_lines(db, booking_id, &payload.lines).await,
        _ => Err(AppError::Validation(
            "Order mode must be pre_order or order_at_restaurant".to_string(),
        )),
    }
}

/// Resolve requested lines against the menu, merging duplicates and
/// dropping zero quantities.
async fn snapshot_lines(
    db: &DatabaseConnection,
    booking_id: Uuid,
    requested: &[DishLineRequest],
) -> AppResult<Vec<booking_dish::ActiveModel>> {
    let requested: Vec<(Uuid, i32)> = requested.iter().map(|l| (l.dish_id, l.quantity)).collect();
    let merged = merge_line_requests(&requested)?;

    let dishes = dish::Entity::find().all(db).await?;

    let mut models = Vec::with_capacity(merged.len());
    for (dish_id, quantity) in merged {
        let dish = dishes
            .iter()
            .find(|d| d.id == dish_id)
            .ok_or_else(|| AppError::NotFound("Dish not found".to_string()))?;

        if !dish.is_available {
            return Err(AppError::Validation(format!(
                "Dish {} is not available",
                dish.name
            )));
        }

        models.push(booking_dish::ActiveModel {
            id: Set(Uuid::new_v4()),
            booking_id: Set(booking_id),
            dish_id: Set(dish.id),
            name: Set(dish.name.clone()),
            unit_price: Set(dish.unit_price),
            quantity: Set(quantity),
        });
    }

    Ok(models)
}

pub async fn replace_dish_lines(
    db: &DatabaseConnection,
    booking_id: Uuid,
    lines: &[booking_dish::ActiveModel],
) -> AppResult<()> {
    booking_dish::Entity::delete_many()
        .filter(booking_dish::Column::BookingId.eq(booking_id))
        .exec(db)
        .await?;

    if !lines.is_empty() {
        booking_dish::Entity::insert_many(lines.to_vec())
            .exec(db)
            .await?;
    }

    Ok(())
}

// ============ Wizard stage 3: notes ============

#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub note: Option<String>,
}

/// Attach or clear the free-text note (wizard stage 3, skippable)
pub async fn update_note(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<UpdateNoteRequest>,
) -> AppResult<Json<BookingDetail>> {
    let booking = load_owned_booking(&state.db, booking_id, claims.sub).await?;
    ensure_customer_editable(&booking)?;

    let mut active: booking::ActiveModel = booking.into();
    active.note = Set(payload.note);
    let updated = active.update(&state.db).await?;

    booking_detail(&state, updated, None).await.map(Json)
}

// ============ Wizard stage 4: review ============

#[derive(Debug, Deserialize)]
pub struct ReviewQuery {
    /// Voucher code to preview against the bill; never consumed here.
    pub voucher: Option<String>,
}

/// Fetch a booking with its live-computed bill (review / resume). The bill
/// is always recomputed from the current dish lines, never stored.
pub async fn get_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
    Query(query): Query<ReviewQuery>,
) -> AppResult<Json<BookingDetail>> {
    let booking = load_owned_booking(&state.db, booking_id, claims.sub).await?;
    booking_detail(&state, booking, query.voucher.as_deref())
        .await
        .map(Json)
}

/// Resume the wizard from the session's active booking token alone
pub async fn get_active_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<BookingDetail>> {
    let user = user::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let booking_id = user
        .active_booking_id
        .ok_or_else(|| AppError::NotFound("No booking in progress".to_string()))?;

    let booking = load_owned_booking(&state.db, booking_id, claims.sub).await?;
    booking_detail(&state, booking, None).await.map(Json)
}

#[derive(Debug, Deserialize)]
pub struct ReviewUpdateRequest {
    pub booking_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub table_id: Option<Uuid>,
}

/// In-place review edits to date/time/table. Table changes go through the
/// allocator's write-time check; re-selecting the table the booking already
/// holds is always legal.
pub async fn update_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<ReviewUpdateRequest>,
) -> AppResult<Json<BookingDetail>> {
    let booking = load_owned_booking(&state.db, booking_id, claims.sub).await?;
    ensure_customer_editable(&booking)?;

    let order_type = OrderType::parse(&booking.order_type);

    let date = payload.booking_date.unwrap_or(booking.booking_date);
    let start = payload.start_time.unwrap_or(booking.start_time);
    let end = payload.end_time.unwrap_or(booking.end_time);
    if end <= start {
        return Err(AppError::Validation(
            "End time must be after start time".to_string(),
        ));
    }

    let table_id = payload.table_id.or(booking.table_id);

    if table_id.is_some() && order_type == Some(OrderType::Delivery) {
        return Err(AppError::Validation(
            "Delivery orders cannot reserve a table".to_string(),
        ));
    }

    // Re-validate the (possibly unchanged) table against the new window,
    // ignoring this booking's own occupancy.
    if let Some(tid) = table_id {
        assert_table_available(&state.db, tid, date, start, end, Some(booking.id)).await?;
    }

    let mut active: booking::ActiveModel = booking.into();
    active.booking_date = Set(date);
    active.start_time = Set(start);
    active.end_time = Set(end);
    active.table_id = Set(table_id);
    let updated = active.update(&state.db).await?;

    booking_detail(&state, updated, None).await.map(Json)
}

// ============ Wizard stage 4: confirm ============

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    /// Required for pre-orders; checked before anything is written.
    pub payment_method: Option<String>,
    pub voucher_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    pub booking_id: Uuid,
    pub status: BookingStatus,
    /// Present for pre-orders: hand off to the external payment page.
    pub payment: Option<payment::PaymentRedirect>,
}

/// Confirm the booking (end of the wizard).
///
/// Order-at-restaurant bookings just move `Pending -> Confirmed`. Pre-orders
/// additionally create a payment order and return the gateway redirect; the
/// voucher, if any, is recorded on the payment order and only consumed by
/// the post-payment finalize step.
pub async fn confirm_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
    Json(payload): Json<ConfirmRequest>,
) -> AppResult<Json<ConfirmResponse>> {
    // Current state is read fresh; a stale client cannot confirm twice.
    let booking = load_owned_booking(&state.db, booking_id, claims.sub).await?;
    if BookingStatus::parse(&booking.status) != BookingStatus::Pending {
        return Err(AppError::Conflict(format!(
            "Booking is {} and can no longer be confirmed",
            booking.status
        )));
    }

    let order_type = OrderType::parse(&booking.order_type)
        .ok_or_else(|| AppError::Internal("Booking has invalid order type".to_string()))?;
    let lines = load_dish_lines(&state.db, booking_id).await?;

    // Order-at-restaurant: nothing to pay online
    if lines.is_empty() {
        let updated = set_status(&state.db, booking, BookingStatus::Confirmed).await?;
        set_active_booking(&state.db, claims.sub, None).await?;

        return Ok(Json(ConfirmResponse {
            booking_id: updated.id,
            status: BookingStatus::Confirmed,
            payment: None,
        }));
    }

    let applied_voucher = match payload.voucher_code.as_deref() {
        Some(code) => Some(resolve_voucher(&state.db, code, Some(claims.sub)).await?),
        None => None,
    };
    let voucher_percent = applied_voucher.as_ref().map(|(_, pct)| *pct);

    let bill = compute_bill(
        &billing_config(&state),
        &lines,
        order_type,
        voucher_percent,
    );

    // Dine-in pre-orders pay the deposit up front; delivery pays the total.
    let amount = payment_due(&bill, order_type);

    // A full-discount voucher can zero the amount owed. No gateway is
    // involved, so the voucher is consumed here instead of at finalize.
    if amount == 0 {
        if let Some((v, _)) = applied_voucher {
            let mut active: voucher::ActiveModel = v.into();
            active.is_used = Set(true);
            active.update(&state.db).await?;
        }

        let updated = set_status(&state.db, booking, BookingStatus::Confirmed).await?;
        set_active_booking(&state.db, claims.sub, None).await?;

        return Ok(Json(ConfirmResponse {
            booking_id: updated.id,
            status: BookingStatus::Confirmed,
            payment: None,
        }));
    }

    // Anything owed online needs a payment method chosen; reject before any
    // side effect.
    match payload.payment_method.as_deref() {
        Some(method) if !method.trim().is_empty() => {}
        _ => {
            return Err(AppError::Validation(
                "A payment method is required for pre-orders".to_string(),
            ))
        }
    }

    let order = payment::create_payment_order(
        &state.db,
        booking_id,
        amount,
        applied_voucher.map(|(v, _)| v.id),
    )
    .await?;

    let updated = set_status(&state.db, booking, BookingStatus::Confirmed).await?;
    set_active_booking(&state.db, claims.sub, None).await?;

    let redirect = payment::payment_redirect(&state.config, &order);

    tracing::info!(
        booking_id = %booking_id,
        order_id = %order.id,
        amount,
        "pre-order confirmed, handing off to payment gateway"
    );

    Ok(Json(ConfirmResponse {
        booking_id: updated.id,
        status: BookingStatus::Confirmed,
        payment: Some(redirect),
    }))
}

/// Abandon a booking that has not been confirmed yet
pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let booking = load_owned_booking(&state.db, booking_id, claims.sub).await?;

    if BookingStatus::parse(&booking.status) != BookingStatus::Pending {
        return Err(AppError::Conflict(
            "Only pending bookings can be canceled here; ask the front desk".to_string(),
        ));
    }

    set_status(&state.db, booking, BookingStatus::Canceled).await?;
    set_active_booking(&state.db, claims.sub, None).await?;

    Ok(Json(serde_json::json!({ "message": "Booking canceled" })))
}

// ============ Shared helpers ============

#[derive(Debug, Serialize)]
pub struct TableInfo {
    pub id: Uuid,
    pub table_number: String,
    pub capacity: i32,
}

#[derive(Debug, Serialize)]
pub struct BookingDetail {
    pub id: Uuid,
    pub order_type: String,
    pub status: BookingStatus,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub table: Option<TableInfo>,
    pub note: Option<String>,
    pub lines: Vec<DishLine>,
    pub bill: Bill,
    /// Set when a previewed voucher failed validation; the bill above is
    /// computed without it.
    pub voucher_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub async fn load_owned_booking(
    db: &DatabaseConnection,
    booking_id: Uuid,
    customer_id: Uuid,
) -> AppResult<booking::Model> {
    let booking = booking::Entity::find_by_id(booking_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    if booking.customer_id != Some(customer_id) {
        return Err(AppError::Forbidden(
            "You can only manage your own bookings".to_string(),
        ));
    }

    Ok(booking)
}

fn ensure_customer_editable(booking: &booking::Model) -> AppResult<()> {
    match BookingStatus::parse(&booking.status) {
        BookingStatus::Pending | BookingStatus::Confirmed => Ok(()),
        _ => Err(AppError::Conflict(format!(
            "Booking is {} and can no longer be edited",
            booking.status
        ))),
    }
}

pub async fn load_dish_lines(
    db: &DatabaseConnection,
    booking_id: Uuid,
) -> AppResult<Vec<DishLine>> {
    let rows = booking_dish::Entity::find()
        .filter(booking_dish::Column::BookingId.eq(booking_id))
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|r| DishLine {
            dish_id: r.dish_id,
            name: r.name,
            unit_price: r.unit_price,
            quantity: r.quantity,
        })
        .collect())
}

pub fn billing_config(state: &AppState) -> BillingConfig {
    BillingConfig {
        deposit_percent: state.config.deposit_percent,
        free_shipping_threshold: state.config.free_shipping_threshold,
        shipping_flat_fee: state.config.shipping_flat_fee,
    }
}

/// Look up and validate a voucher for `user_id`. Returns the voucher and its
/// discount percent; does not mark it used.
pub async fn resolve_voucher(
    db: &DatabaseConnection,
    code: &str,
    user_id: Option<Uuid>,
) -> AppResult<(voucher::Model, i64)> {
    let voucher = voucher::Entity::find()
        .filter(voucher::Column::Code.eq(code))
        .one(db)
        .await?
        .ok_or_else(|| AppError::VoucherInvalid("Voucher code not found".to_string()))?;

    let terms = VoucherTerms {
        discount_percent: voucher.discount_percent as i64,
        expires_at: voucher.expires_at.with_timezone(&Utc),
        is_used: voucher.is_used,
        bound_user_id: voucher.bound_user_id,
    };

    let percent = check_voucher(&terms, user_id, Utc::now())?;
    Ok((voucher, percent))
}

async fn set_status(
    db: &DatabaseConnection,
    booking: booking::Model,
    status: BookingStatus,
) -> AppResult<booking::Model> {
    let mut active: booking::ActiveModel = booking.into();
    active.status = Set(status.as_str().to_string());
    Ok(active.update(db).await?)
}

pub async fn set_active_booking(
    db: &DatabaseConnection,
    user_id: Uuid,
    booking_id: Option<Uuid>,
) -> AppResult<()> {
    let user = user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let mut active: user::ActiveModel = user.into();
    active.active_booking_id = Set(booking_id);
    active.update(db).await?;
    Ok(())
}

async fn booking_detail(
    state: &AppState,
    booking: booking::Model,
    voucher_code: Option<&str>,
) -> AppResult<BookingDetail> {
    let lines = load_dish_lines(&state.db, booking.id).await?;

    let table = match booking.table_id {
        Some(tid) => dining_table::Entity::find_by_id(tid)
            .one(&state.db)
            .await?
            .map(|t| TableInfo {
                id: t.id,
                table_number: t.table_number,
                capacity: t.capacity,
            }),
        None => None,
    };

    let order_type = OrderType::parse(&booking.order_type).unwrap_or(OrderType::DineIn);

    // An invalid previewed voucher is surfaced next to the bill instead of
    // failing the whole review.
    let (voucher_percent, voucher_error) = match voucher_code {
        Some(code) => {
            match resolve_voucher(&state.db, code, booking.customer_id).await {
                Ok((_, pct)) => (Some(pct), None),
                Err(AppError::VoucherInvalid(msg)) => (None, Some(msg)),
                Err(other) => return Err(other),
            }
        }
        None => (None, None),
    };

    let bill = compute_bill(&billing_config(state), &lines, order_type, voucher_percent);

    Ok(BookingDetail {
        id: booking.id,
        order_type: booking.order_type,
        status: BookingStatus::parse(&booking.status),
        booking_date: booking.booking_date,
        start_time: booking.start_time,
        end_time: booking.end_time,
        table,
        note: booking.note,
        lines,
        bill,
        voucher_error,
        created_at: booking.created_at.with_timezone(&Utc),
    })
}
