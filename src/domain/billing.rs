use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    DineIn,
    Delivery,
}

impl OrderType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dine_in" => Some(OrderType::DineIn),
            "delivery" => Some(OrderType::Delivery),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::DineIn => "dine_in",
            OrderType::Delivery => "delivery",
        }
    }
}

/// A dish line snapshot: name and price captured at selection time, so later
/// menu edits never change an existing booking's bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishLine {
    pub dish_id: Uuid,
    pub name: String,
    pub unit_price: i64,
    pub quantity: i32,
}

/// Business constants, supplied from configuration rather than hard-coded.
#[derive(Debug, Clone, Copy)]
pub struct BillingConfig {
    pub deposit_percent: i64,
    pub free_shipping_threshold: i64,
    pub shipping_flat_fee: i64,
}

/// Derived on demand from the booking's current dish lines; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bill {
    pub subtotal: i64,
    pub prepaid_deposit: i64,
    pub voucher_discount: i64,
    pub shipping_fee: i64,
    pub total: i64,
}

/// Pure bill computation. `voucher_percent` must already have passed
/// [`check_voucher`]; pass `None` when no voucher applies.
///
/// With no dish lines the customer settles on site: no deposit is taken and
/// any applied voucher is ignored.
pub fn compute_bill(
    cfg: &BillingConfig,
    lines: &[DishLine],
    order_type: OrderType,
    voucher_percent: Option<i64>,
) -> Bill {
    let subtotal: i64 = lines
        .iter()
        .map(|l| l.unit_price * l.quantity as i64)
        .sum();

    if lines.is_empty() {
        return Bill {
            subtotal: 0,
            prepaid_deposit: 0,
            voucher_discount: 0,
            shipping_fee: 0,
            total: 0,
        };
    }

    let prepaid_deposit = match order_type {
        // Round half up on the percent division.
        OrderType::DineIn => (subtotal * cfg.deposit_percent + 50) / 100,
        OrderType::Delivery => 0,
    };

    let shipping_fee = match order_type {
        OrderType::Delivery if subtotal > 0 && subtotal < cfg.free_shipping_threshold => {
            cfg.shipping_flat_fee
        }
        _ => 0,
    };

    let voucher_discount = voucher_percent
        .map(|pct| subtotal * pct / 100)
        .unwrap_or(0);

    let total = match order_type {
        OrderType::Delivery => subtotal - voucher_discount + shipping_fee,
        // Dine-in invoice reference; the deposit and remainder are tracked
        // separately.
        OrderType::DineIn => subtotal,
    };

    Bill {
        subtotal,
        prepaid_deposit,
        voucher_discount,
        shipping_fee,
        total,
    }
}

/// Amount to collect online at confirm time: the deposit for dine-in
/// pre-orders, the full total for delivery. Zero means nothing is owed up
/// front (a full-discount voucher can do this) and no payment order is
/// created.
pub fn payment_due(bill: &Bill, order_type: OrderType) -> i64 {
    match order_type {
        OrderType::DineIn => bill.prepaid_deposit,
        OrderType::Delivery => bill.total,
    }
}

/// Collapse requested `(dish, quantity)` pairs: duplicate dishes merge into
/// one line, quantities that sum to zero drop out. Negative quantities are
/// rejected outright.
pub fn merge_line_requests(requested: &[(Uuid, i32)]) -> AppResult<Vec<(Uuid, i32)>> {
    let mut merged: Vec<(Uuid, i32)> = Vec::new();
    for &(dish_id, quantity) in requested {
        if quantity < 0 {
            return Err(AppError::Validation(
                "Dish quantity cannot be negative".to_string(),
            ));
        }
        match merged.iter_mut().find(|(id, _)| *id == dish_id) {
            Some((_, qty)) => *qty += quantity,
            None => merged.push((dish_id, quantity)),
        }
    }
    merged.retain(|(_, qty)| *qty > 0);
    Ok(merged)
}

/// Voucher terms as read from storage, decoupled from the persistence layer.
#[derive(Debug, Clone)]
pub struct VoucherTerms {
    pub discount_percent: i64,
    pub expires_at: DateTime<Utc>,
    pub is_used: bool,
    pub bound_user_id: Option<Uuid>,
}

/// Validate a voucher against the requesting user at `now`. Returns the
/// discount percent. Validation never consumes the voucher; only the
/// post-payment finalize step marks it used.
pub fn check_voucher(
    terms: &VoucherTerms,
    user_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> AppResult<i64> {
    if terms.expires_at < now {
        return Err(AppError::VoucherInvalid("Voucher has expired".to_string()));
    }
    if terms.is_used {
        return Err(AppError::VoucherInvalid(
            "Voucher has already been used".to_string(),
        ));
    }
    if let Some(owner) = terms.bound_user_id {
        if user_id != Some(owner) {
            return Err(AppError::VoucherInvalid(
                "Voucher belongs to another account".to_string(),
            ));
        }
    }
    Ok(terms.discount_percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn cfg() -> BillingConfig {
        BillingConfig {
            deposit_percent: 30,
            free_shipping_threshold: 800_000,
            shipping_flat_fee: 25_000,
        }
    }

    fn line(unit_price: i64, quantity: i32) -> DishLine {
        DishLine {
            dish_id: Uuid::new_v4(),
            name: "Pho bo".to_string(),
            unit_price,
            quantity,
        }
    }

    #[test]
    fn delivery_over_threshold_ships_free() {
        // Subtotal 1,000,000 with a 10% voucher.
        let bill = compute_bill(&cfg(), &[line(500_000, 2)], OrderType::Delivery, Some(10));
        assert_eq!(bill.subtotal, 1_000_000);
        assert_eq!(bill.shipping_fee, 0);
        assert_eq!(bill.voucher_discount, 100_000);
        assert_eq!(bill.total, 900_000);
    }

    #[test]
    fn delivery_under_threshold_pays_flat_fee() {
        let bill = compute_bill(&cfg(), &[line(100_000, 2)], OrderType::Delivery, None);
        assert_eq!(bill.subtotal, 200_000);
        assert_eq!(bill.shipping_fee, 25_000);
        assert_eq!(bill.total, 225_000);
    }

    #[test]
    fn dine_in_preorder_deposit_is_thirty_percent() {
        let bill = compute_bill(&cfg(), &[line(250_000, 2)], OrderType::DineIn, None);
        assert_eq!(bill.subtotal, 500_000);
        assert_eq!(bill.prepaid_deposit, 150_000);
        assert_eq!(bill.shipping_fee, 0);
        assert_eq!(bill.total, 500_000);
    }

    #[test]
    fn empty_lines_defer_everything_to_on_site_settlement() {
        let bill = compute_bill(&cfg(), &[], OrderType::DineIn, Some(50));
        assert_eq!(bill.subtotal, 0);
        assert_eq!(bill.prepaid_deposit, 0);
        // Voucher discount is forced to zero with no pre-order.
        assert_eq!(bill.voucher_discount, 0);
        assert_eq!(bill.total, 0);
    }

    #[test]
    fn compute_bill_is_deterministic() {
        let lines = [line(120_000, 3), line(45_000, 1)];
        let a = compute_bill(&cfg(), &lines, OrderType::Delivery, Some(15));
        let b = compute_bill(&cfg(), &lines, OrderType::Delivery, Some(15));
        assert_eq!(a, b);
    }

    #[test]
    fn full_voucher_delivery_owes_nothing_online() {
        // 900,000 subtotal ships free; a 100% voucher zeroes the total, so
        // confirm must settle without an online payment leg.
        let bill = compute_bill(&cfg(), &[line(900_000, 1)], OrderType::Delivery, Some(100));
        assert_eq!(bill.voucher_discount, 900_000);
        assert_eq!(bill.total, 0);
        assert_eq!(payment_due(&bill, OrderType::Delivery), 0);
    }

    #[test]
    fn payment_due_splits_deposit_from_total() {
        let dine_in = compute_bill(&cfg(), &[line(250_000, 2)], OrderType::DineIn, None);
        assert_eq!(payment_due(&dine_in, OrderType::DineIn), 150_000);

        let delivery = compute_bill(&cfg(), &[line(100_000, 2)], OrderType::Delivery, None);
        assert_eq!(payment_due(&delivery, OrderType::Delivery), 225_000);
    }

    #[test]
    fn line_requests_merge_duplicates_and_drop_zeroes() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let merged = merge_line_requests(&[(a, 2), (b, 0), (a, 3)]).unwrap();
        assert_eq!(merged, vec![(a, 5)]);

        // The merged set is order-independent: whatever order the stage-two
        // request lists dishes in, reading the booking back yields the same
        // lines.
        let mut reversed = merge_line_requests(&[(a, 3), (b, 0), (a, 2)]).unwrap();
        reversed.sort();
        let mut forward = merged;
        forward.sort();
        assert_eq!(forward, reversed);

        assert!(merge_line_requests(&[(a, -1)]).is_err());
    }

    #[test]
    fn expired_voucher_is_rejected() {
        let terms = VoucherTerms {
            discount_percent: 10,
            expires_at: Utc::now() - Duration::days(1),
            is_used: false,
            bound_user_id: None,
        };
        assert!(matches!(
            check_voucher(&terms, None, Utc::now()),
            Err(AppError::VoucherInvalid(_))
        ));
    }

    #[test]
    fn used_voucher_is_rejected() {
        let terms = VoucherTerms {
            discount_percent: 10,
            expires_at: Utc::now() + Duration::days(7),
            is_used: true,
            bound_user_id: None,
        };
        assert!(check_voucher(&terms, None, Utc::now()).is_err());
    }

    #[test]
    fn bound_voucher_only_works_for_its_owner() {
        let owner = Uuid::new_v4();
        let terms = VoucherTerms {
            discount_percent: 20,
            expires_at: Utc::now() + Duration::days(7),
            is_used: false,
            bound_user_id: Some(owner),
        };

        assert_eq!(check_voucher(&terms, Some(owner), Utc::now()).unwrap(), 20);
        assert!(check_voucher(&terms, Some(Uuid::new_v4()), Utc::now()).is_err());
        assert!(check_voucher(&terms, None, Utc::now()).is_err());
    }
}
