use chrono::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::usermodel::OTP_VALIDITY_SECS;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Assign,
    Arriving,
    Complete,
    Cancel,
}

impl BookingStatus {
    pub fn to_str(&self) -> &str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Assign => "assign",
            BookingStatus::Arriving => "arriving",
            BookingStatus::Complete => "complete",
            BookingStatus::Cancel => "cancel",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Complete | BookingStatus::Cancel)
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Booking {
    pub id: uuid::Uuid,
    pub user_id: uuid::Uuid,
    /// NULL while the row only anchors a checkout OTP.
    pub service_id: Option<uuid::Uuid>,
    pub status: BookingStatus,
    pub technician_required: i32,
    pub assigned_technician: Option<uuid::Uuid>,

    // Manual assignment audit trail
    pub manual_assigned_by: Option<uuid::Uuid>,
    pub manual_assigned_reason: Option<String>,
    pub manual_assigned_at: Option<DateTime<Utc>>,

    pub is_scheduled: bool,
    pub scheduled_datetime: Option<DateTime<Utc>>,

    // Never serialized; the code reaches the customer out of band only
    #[serde(skip_serializing, default)]
    pub service_start_otp: Option<String>,
    pub otp_generated_at: Option<DateTime<Utc>>,
    pub otp_verified_at: Option<DateTime<Utc>>,
    pub otp_verified_by: Option<uuid::Uuid>,

    pub quotation_amount: Option<f64>,
    pub complete_photo: Option<String>,
    pub complete_comment: Option<String>,
    pub is_billed: bool,
    pub payment_id: Option<uuid::Uuid>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Anchor rows hold a checkout OTP before any real booking exists.
    pub fn is_anchor(&self) -> bool {
        self.service_id.is_none()
    }

    pub fn start_otp_window_open(&self, now: DateTime<Utc>) -> bool {
        match self.otp_generated_at {
            Some(generated) => {
                let age = (now - generated).num_seconds();
                (0..=OTP_VALIDITY_SECS).contains(&age)
            }
            None => false,
        }
    }

    pub fn start_otp_matches(&self, entered: &str) -> bool {
        self.service_start_otp.as_deref() == Some(entered)
    }

    /// Whether moving to `next` is legal from the current state.
    ///
    /// Arriving and complete additionally require a verified start OTP;
    /// terminal states accept nothing.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        match next {
            BookingStatus::Pending => false,
            BookingStatus::Assign => {
                matches!(self.status, BookingStatus::Pending | BookingStatus::Assign)
            }
            BookingStatus::Arriving => {
                matches!(self.status, BookingStatus::Assign) && self.otp_verified_at.is_some()
            }
            BookingStatus::Complete => {
                matches!(self.status, BookingStatus::Arriving) && self.otp_verified_at.is_some()
            }
            BookingStatus::Cancel => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn booking_in(status: BookingStatus) -> Booking {
        let now = Utc::now();
        Booking {
            id: uuid::Uuid::new_v4(),
            user_id: uuid::Uuid::new_v4(),
            service_id: Some(uuid::Uuid::new_v4()),
            status,
            technician_required: 1,
            assigned_technician: None,
            manual_assigned_by: None,
            manual_assigned_reason: None,
            manual_assigned_at: None,
            is_scheduled: false,
            scheduled_datetime: None,
            service_start_otp: None,
            otp_generated_at: None,
            otp_verified_at: None,
            otp_verified_by: None,
            quotation_amount: None,
            complete_photo: None,
            complete_comment: None,
            is_billed: false,
            payment_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn pending_can_only_assign_or_cancel() {
        let booking = booking_in(BookingStatus::Pending);
        assert!(booking.can_transition_to(BookingStatus::Assign));
        assert!(booking.can_transition_to(BookingStatus::Cancel));
        assert!(!booking.can_transition_to(BookingStatus::Arriving));
        assert!(!booking.can_transition_to(BookingStatus::Complete));
    }

    #[test]
    fn arriving_requires_verified_otp() {
        let mut booking = booking_in(BookingStatus::Assign);
        assert!(!booking.can_transition_to(BookingStatus::Arriving));

        booking.otp_verified_at = Some(Utc::now());
        assert!(booking.can_transition_to(BookingStatus::Arriving));
    }

    #[test]
    fn complete_requires_arriving_and_verified_otp() {
        let mut booking = booking_in(BookingStatus::Assign);
        booking.otp_verified_at = Some(Utc::now());
        assert!(!booking.can_transition_to(BookingStatus::Complete));

        booking.status = BookingStatus::Arriving;
        assert!(booking.can_transition_to(BookingStatus::Complete));

        booking.otp_verified_at = None;
        assert!(!booking.can_transition_to(BookingStatus::Complete));
    }

    #[test]
    fn reassignment_allowed_while_assigned() {
        let booking = booking_in(BookingStatus::Assign);
        assert!(booking.can_transition_to(BookingStatus::Assign));
    }

    #[test]
    fn cancel_reachable_from_every_non_terminal_state() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Assign,
            BookingStatus::Arriving,
        ] {
            let mut booking = booking_in(status);
            booking.otp_verified_at = Some(Utc::now());
            assert!(booking.can_transition_to(BookingStatus::Cancel));
        }
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for status in [BookingStatus::Complete, BookingStatus::Cancel] {
            let mut booking = booking_in(status);
            booking.otp_verified_at = Some(Utc::now());
            for next in [
                BookingStatus::Pending,
                BookingStatus::Assign,
                BookingStatus::Arriving,
                BookingStatus::Complete,
                BookingStatus::Cancel,
            ] {
                assert!(!booking.can_transition_to(next));
            }
        }
    }

    #[test]
    fn start_otp_window_honours_validity() {
        let now = Utc::now();
        let mut booking = booking_in(BookingStatus::Assign);
        booking.service_start_otp = Some("123456".to_string());

        booking.otp_generated_at = Some(now - Duration::seconds(600));
        assert!(booking.start_otp_window_open(now));

        booking.otp_generated_at = Some(now - Duration::seconds(601));
        assert!(!booking.start_otp_window_open(now));

        booking.otp_generated_at = None;
        assert!(!booking.start_otp_window_open(now));
    }

    #[test]
    fn anchor_has_no_service() {
        let mut booking = booking_in(BookingStatus::Pending);
        booking.service_id = None;
        assert!(booking.is_anchor());
    }

    #[test]
    fn start_otp_never_serialized() {
        let mut booking = booking_in(BookingStatus::Assign);
        booking.service_start_otp = Some("654321".to_string());
        let json = serde_json::to_string(&booking).unwrap();
        assert!(!json.contains("654321"));
        assert!(!json.contains("service_start_otp"));
    }
}
