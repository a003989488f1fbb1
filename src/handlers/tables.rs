use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Duration, NaiveDate, NaiveTime};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::status::BookingStatus;
use crate::domain::tables::{table_sort_key, validate_capacity, validate_table_number, windows_overlap};
use crate::entities::{booking, dining_table};
use crate::error::{AppError, AppResult};
use crate::AppState;

/// Default sitting length when the caller gives no end time.
const DEFAULT_SITTING_HOURS: i64 = 2;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
}

#[derive(Debug, Serialize)]
pub struct TableAvailability {
    pub id: Uuid,
    pub table_number: String,
    pub capacity: i32,
    pub is_available: bool,
}

pub fn window_end(start: NaiveTime, end: Option<NaiveTime>) -> NaiveTime {
    end.unwrap_or_else(|| start.overflowing_add_signed(Duration::hours(DEFAULT_SITTING_HOURS)).0)
}

/// List every table for a date/time window, each annotated `is_available`.
/// A table is unavailable iff an active-status booking holding it overlaps
/// the window; completed and canceled bookings never block.
pub async fn list_available(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Vec<TableAvailability>>> {
    let end = window_end(query.start_time, query.end_time);
    if end <= query.start_time {
        return Err(AppError::Validation(
            "End time must be after start time".to_string(),
        ));
    }

    let tables = dining_table::Entity::find().all(&state.db).await?;
    let occupied = occupied_table_ids(&state.db, query.date, query.start_time, end, None).await?;

    let mut responses: Vec<TableAvailability> = tables
        .into_iter()
        .map(|t| TableAvailability {
            is_available: !occupied.contains(&t.id),
            id: t.id,
            table_number: t.table_number,
            capacity: t.capacity,
        })
        .collect();

    responses.sort_by(|a, b| {
        a.capacity
            .cmp(&b.capacity)
            .then_with(|| table_sort_key(&a.table_number).cmp(&table_sort_key(&b.table_number)))
    });

    Ok(Json(responses))
}

/// Tables blocked by an active booking overlapping the window. `exclude`
/// drops one booking from consideration so a booking under edit never
/// conflicts with its own occupancy.
pub async fn occupied_table_ids(
    db: &DatabaseConnection,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    exclude: Option<Uuid>,
) -> AppResult<Vec<Uuid>> {
    let bookings = booking::Entity::find()
        .filter(booking::Column::BookingDate.eq(date))
        .all(db)
        .await?;

    let occupied = bookings
        .into_iter()
        .filter(|b| Some(b.id) != exclude)
        .filter(|b| BookingStatus::parse(&b.status).is_active())
        .filter(|b| windows_overlap(start, end, b.start_time, b.end_time))
        .filter_map(|b| b.table_id)
        .collect();

    Ok(occupied)
}

/// Authoritative availability check at write time. Reads the current set of
/// active bookings, so a table grabbed between the caller's read and this
/// write comes back as `Conflict` (optimistic re-validation, no holds).
pub async fn assert_table_available(
    db: &DatabaseConnection,
    table_id: Uuid,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    exclude_booking: Option<Uuid>,
) -> AppResult<dining_table::Model> {
    let table = dining_table::Entity::find_by_id(table_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Table not found".to_string()))?;

    let occupied = occupied_table_ids(db, date, start, end, exclude_booking).await?;
    if occupied.contains(&table.id) {
        return Err(AppError::Conflict(format!(
            "Table {} is no longer available for that time",
            table.table_number
        )));
    }

    Ok(table)
}

// ============ Table Management (staff) ============

#[derive(Debug, Deserialize)]
pub struct CreateTableRequest {
    pub table_number: String,
    pub capacity: i32,
}

/// Create a table (staff)
pub async fn create_table(
    State(state): State<AppState>,
    Json(payload): Json<CreateTableRequest>,
) -> AppResult<Json<dining_table::Model>> {
    validate_table_number(&payload.table_number)?;
    validate_capacity(payload.capacity)?;

    // Duplicate names are rejected case-insensitively
    let tables = dining_table::Entity::find().all(&state.db).await?;
    if tables
        .iter()
        .any(|t| t.table_number.eq_ignore_ascii_case(&payload.table_number))
    {
        return Err(AppError::Conflict(format!(
            "Table {} already exists",
            payload.table_number
        )));
    }

    let table = dining_table::ActiveModel {
        id: Set(Uuid::new_v4()),
        table_number: Set(payload.table_number.clone()),
        capacity: Set(payload.capacity),
        ..Default::default()
    };

    let result = table.insert(&state.db).await?;
    Ok(Json(result))
}

/// List all tables in display order (staff)
pub async fn list_tables(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<dining_table::Model>>> {
    let mut tables = dining_table::Entity::find().all(&state.db).await?;

    tables.sort_by(|a, b| {
        a.capacity
            .cmp(&b.capacity)
            .then_with(|| table_sort_key(&a.table_number).cmp(&table_sort_key(&b.table_number)))
    });

    Ok(Json(tables))
}
