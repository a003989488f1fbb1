use crate::domain::status::PaymentStatus;

/// What the gateway-return handler should do for a payment order, decided
/// from the order's current status and the provider's response code before
/// any mutation happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeDecision {
    /// Order already settled; replayed callbacks mutate nothing.
    AlreadyProcessed,
    /// Provider reported failure; the order stays open for retry.
    GatewayFailure(i32),
    /// Settle: order to success, credit spending, consume the voucher.
    Settle,
}

/// The already-settled check comes first, so a replayed callback is a no-op
/// regardless of the code it carries.
pub fn decide_finalize(current: Option<PaymentStatus>, response_code: i32) -> FinalizeDecision {
    if current == Some(PaymentStatus::Success) {
        return FinalizeDecision::AlreadyProcessed;
    }
    if response_code != 0 {
        return FinalizeDecision::GatewayFailure(response_code);
    }
    FinalizeDecision::Settle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_callback_settles_an_open_order() {
        assert_eq!(
            decide_finalize(Some(PaymentStatus::Deposited), 0),
            FinalizeDecision::Settle
        );
    }

    #[test]
    fn replayed_callback_is_a_no_op() {
        // Same txn_ref delivered twice: the second pass must not credit
        // spending or burn the voucher again.
        assert_eq!(
            decide_finalize(Some(PaymentStatus::Success), 0),
            FinalizeDecision::AlreadyProcessed
        );
        // Even a late failure code cannot reopen a settled order.
        assert_eq!(
            decide_finalize(Some(PaymentStatus::Success), 24),
            FinalizeDecision::AlreadyProcessed
        );
    }

    #[test]
    fn provider_failure_keeps_the_order_open() {
        assert_eq!(
            decide_finalize(Some(PaymentStatus::Deposited), 24),
            FinalizeDecision::GatewayFailure(24)
        );
    }

    #[test]
    fn unparseable_stored_status_still_honors_the_response_code() {
        assert_eq!(decide_finalize(None, 0), FinalizeDecision::Settle);
        assert_eq!(
            decide_finalize(None, 7),
            FinalizeDecision::GatewayFailure(7)
        );
    }
}
