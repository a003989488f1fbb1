use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use rand::{distributions::Alphanumeric, Rng};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::domain::payment::{decide_finalize, FinalizeDecision};
use crate::domain::status::{BookingStatus, PaymentStatus};
use crate::entities::{booking, payment_order, user, voucher};
use crate::error::{AppError, AppResult};
use crate::handlers::booking::load_owned_booking;
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct PaymentRedirect {
    pub order_id: Uuid,
    pub txn_ref: String,
    pub amount: i64,
    pub redirect_url: String,
}

/// Create a payment order for a booking. Status starts `deposited`; the
/// gateway callback is the only thing that moves it to `success`.
pub async fn create_payment_order(
    db: &DatabaseConnection,
    booking_id: Uuid,
    amount: i64,
    voucher_id: Option<Uuid>,
) -> AppResult<payment_order::Model> {
    if amount <= 0 {
        return Err(AppError::Validation(
            "Payment amount must be positive".to_string(),
        ));
    }

    let order = payment_order::ActiveModel {
        id: Set(Uuid::new_v4()),
        booking_id: Set(booking_id),
        amount: Set(amount),
        status: Set(PaymentStatus::Deposited.as_str().to_string()),
        txn_ref: Set(new_txn_ref()),
        voucher_id: Set(voucher_id),
        ..Default::default()
    };

    Ok(order.insert(db).await?)
}

/// External payment page URL for an order
pub fn payment_redirect(config: &Config, order: &payment_order::Model) -> PaymentRedirect {
    let redirect_url = format!(
        "{}?txn_ref={}&amount={}&return_url={}",
        config.payment_gateway_url, order.txn_ref, order.amount, config.payment_return_url
    );

    PaymentRedirect {
        order_id: order.id,
        txn_ref: order.txn_ref.clone(),
        amount: order.amount,
        redirect_url,
    }
}

/// Re-issue the gateway redirect for a confirmed-but-unpaid booking. The
/// existing payment order (and its recorded voucher) is reused; no new
/// order is created.
pub async fn retry_payment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(booking_id): Path<Uuid>,
) -> AppResult<Json<PaymentRedirect>> {
    let booking = load_owned_booking(&state.db, booking_id, claims.sub).await?;

    if BookingStatus::parse(&booking.status) != BookingStatus::Confirmed {
        return Err(AppError::Conflict(format!(
            "Booking is {}; only confirmed bookings can be paid",
            booking.status
        )));
    }

    let order = payment_order::Entity::find()
        .filter(payment_order::Column::BookingId.eq(booking_id))
        .order_by_desc(payment_order::Column::CreatedAt)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No payment order for this booking".to_string()))?;

    if PaymentStatus::parse(&order.status) == Some(PaymentStatus::Success) {
        return Err(AppError::Conflict("Booking is already paid".to_string()));
    }

    Ok(Json(payment_redirect(&state.config, &order)))
}

fn new_txn_ref() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}

// ============ Finalize (gateway return) ============

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub txn_ref: String,
    pub response_code: i32,
}

/// Payment gateway return URL. Safe to invoke more than once for the same
/// transaction reference: an order already `success` short-circuits with no
/// further mutation, so a replayed callback never double-credits spending or
/// burns the voucher twice.
pub async fn payment_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let order = payment_order::Entity::find()
        .filter(payment_order::Column::TxnRef.eq(&query.txn_ref))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment order not found".to_string()))?;

    // The decision comes before any mutation; a replayed txn_ref is a no-op.
    match decide_finalize(PaymentStatus::parse(&order.status), query.response_code) {
        FinalizeDecision::AlreadyProcessed => {
            return Ok(Json(serde_json::json!({
                "message": "Payment already processed",
                "txn_ref": order.txn_ref,
            })));
        }
        FinalizeDecision::GatewayFailure(code) => {
            tracing::warn!(
                txn_ref = %query.txn_ref,
                code,
                "payment gateway reported failure"
            );
            // Booking stays Confirmed-but-unpaid; the customer may retry.
            return Err(AppError::PaymentProvider(code));
        }
        FinalizeDecision::Settle => {}
    }

    let booking = booking::Entity::find_by_id(order.booking_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    let amount = order.amount;
    let voucher_id = order.voucher_id;
    let txn_ref = order.txn_ref.clone();

    let mut active_order: payment_order::ActiveModel = order.into();
    active_order.status = Set(PaymentStatus::Success.as_str().to_string());
    active_order.update(&state.db).await?;

    // Credit the customer's cumulative spending and close out the wizard.
    if let Some(customer_id) = booking.customer_id {
        if let Some(customer) = user::Entity::find_by_id(customer_id).one(&state.db).await? {
            let mut active: user::ActiveModel = customer.clone().into();
            active.total_spent = Set(customer.total_spent + amount);
            active.active_booking_id = Set(None);
            active.update(&state.db).await?;
        }
    }

    // The applied voucher is only consumed now that payment is certain.
    if let Some(vid) = voucher_id {
        if let Some(v) = voucher::Entity::find_by_id(vid).one(&state.db).await? {
            if !v.is_used {
                let mut active: voucher::ActiveModel = v.into();
                active.is_used = Set(true);
                active.update(&state.db).await?;
            }
        }
    }

    tracing::info!(txn_ref = %txn_ref, amount, "payment finalized");

    Ok(Json(serde_json::json!({
        "message": "Payment successful",
        "txn_ref": txn_ref,
        "amount": amount,
    })))
}
