use serde::{Deserialize, Serialize};

/// Booking fulfillment status. `Unknown` is the total-parse fallback for
/// unrecognized wire or database values; no rule set ever leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cooking,
    Ready,
    Completed,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    /// Total parse: case-insensitive, never fails.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => BookingStatus::Pending,
            "confirmed" => BookingStatus::Confirmed,
            "cooking" => BookingStatus::Cooking,
            "ready" => BookingStatus::Ready,
            "completed" => BookingStatus::Completed,
            "canceled" => BookingStatus::Canceled,
            _ => BookingStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cooking => "cooking",
            BookingStatus::Ready => "ready",
            BookingStatus::Completed => "completed",
            BookingStatus::Canceled => "canceled",
            BookingStatus::Unknown => "unknown",
        }
    }

    /// Active bookings occupy their table; completed/canceled ones never block.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            BookingStatus::Pending
                | BookingStatus::Confirmed
                | BookingStatus::Cooking
                | BookingStatus::Ready
        )
    }

    /// Dish lines, notes and table assignment are frozen once the booking
    /// reaches a terminal state.
    pub fn is_editable(&self) -> bool {
        !matches!(self, BookingStatus::Completed | BookingStatus::Canceled)
    }
}

/// Caller role for status transitions. Front desk and kitchen see different
/// rule sets; both sides of the wire consult the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRole {
    FrontDesk,
    Kitchen,
}

/// The single `(role, current) -> allowed targets` table shared by client
/// validation and the authoritative write-time check.
pub fn valid_next_statuses(role: TransitionRole, current: BookingStatus) -> &'static [BookingStatus] {
    use BookingStatus::*;

    match (role, current) {
        // Kitchen only moves orders forward.
        (TransitionRole::Kitchen, Confirmed) => &[Cooking, Ready],
        (TransitionRole::Kitchen, Cooking) => &[Ready],
        (TransitionRole::Kitchen, _) => &[],

        // Front desk may also confirm or cancel reservations directly.
        (TransitionRole::FrontDesk, Pending) => &[Confirmed, Canceled],
        (TransitionRole::FrontDesk, Confirmed) => &[Cooking, Ready, Canceled],
        (TransitionRole::FrontDesk, Cooking) => &[Ready],
        (TransitionRole::FrontDesk, _) => &[],
    }
}

pub fn can_transition(role: TransitionRole, from: BookingStatus, to: BookingStatus) -> bool {
    valid_next_statuses(role, from).contains(&to)
}

/// Payment-order status. Strictly one-directional: once `Success`, nothing
/// may move it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Deposited,
    Success,
}

impl PaymentStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "deposited" => Some(PaymentStatus::Deposited),
            "success" => Some(PaymentStatus::Success),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Deposited => "deposited",
            PaymentStatus::Success => "success",
        }
    }

    pub fn valid_next(&self) -> &'static [PaymentStatus] {
        match self {
            PaymentStatus::Deposited => &[PaymentStatus::Success],
            PaymentStatus::Success => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;

    #[test]
    fn parse_is_total_and_case_insensitive() {
        assert_eq!(BookingStatus::parse("Confirmed"), Confirmed);
        assert_eq!(BookingStatus::parse("  COOKING "), Cooking);
        assert_eq!(BookingStatus::parse("shipped"), Unknown);
        assert_eq!(BookingStatus::parse(""), Unknown);
    }

    #[test]
    fn round_trips_through_as_str() {
        for s in [Pending, Confirmed, Cooking, Ready, Completed, Canceled, Unknown] {
            assert_eq!(BookingStatus::parse(s.as_str()), s);
        }
    }

    #[test]
    fn kitchen_view_locks_everything_but_confirmed_and_cooking() {
        assert_eq!(
            valid_next_statuses(TransitionRole::Kitchen, Confirmed),
            [Cooking, Ready]
        );
        assert_eq!(valid_next_statuses(TransitionRole::Kitchen, Cooking), [Ready]);

        for locked in [Pending, Ready, Completed, Canceled, Unknown] {
            assert!(valid_next_statuses(TransitionRole::Kitchen, locked).is_empty());
        }
    }

    #[test]
    fn kitchen_cannot_move_confirmed_back_to_pending() {
        assert!(!can_transition(TransitionRole::Kitchen, Confirmed, Pending));
    }

    #[test]
    fn front_desk_can_confirm_and_cancel() {
        assert!(can_transition(TransitionRole::FrontDesk, Pending, Confirmed));
        assert!(can_transition(TransitionRole::FrontDesk, Pending, Canceled));
        assert!(can_transition(TransitionRole::FrontDesk, Confirmed, Canceled));
        assert!(!can_transition(TransitionRole::FrontDesk, Completed, Canceled));
        assert!(!can_transition(TransitionRole::FrontDesk, Canceled, Pending));
    }

    #[test]
    fn unknown_has_no_exits_for_any_role() {
        assert!(valid_next_statuses(TransitionRole::Kitchen, Unknown).is_empty());
        assert!(valid_next_statuses(TransitionRole::FrontDesk, Unknown).is_empty());
    }

    #[test]
    fn payment_status_is_one_directional() {
        assert_eq!(
            PaymentStatus::Deposited.valid_next(),
            [PaymentStatus::Success]
        );
        assert!(PaymentStatus::Success.valid_next().is_empty());
    }
}
