use uuid::Uuid;

use crate::{
    error::{ErrorMessage, HttpError},
    models::bookingmodel::Booking,
    models::paymentmodel::Payment,
    models::usermodel::{User, UserRole},
};

/// Everything a principal can ask of the system, resolved in one place.
#[derive(Debug)]
pub enum Action<'a> {
    ManageCatalog,
    ApproveProvider,
    ReviewPendingUpdates,
    AssignTechnician,
    ListAllBookings,
    ManageOwnCart { owner_id: Uuid },
    Checkout { customer_id: Uuid },
    ManageProviderProfile,
    ManageOwnAddresses { owner_id: Uuid },
    ManageOwnBankDetails { owner_id: Uuid },
    ViewBooking(&'a Booking),
    CancelBooking(&'a Booking),
    ScheduleBooking(&'a Booking),
    VerifyStartOtp(&'a Booking),
    ReportServiceProgress(&'a Booking),
    VerifyPayment(&'a Payment),
}

/// Single authorization predicate; handlers never test roles directly.
pub fn can(principal: &User, action: &Action) -> bool {
    if principal.is_blocked {
        return false;
    }

    let is_admin = principal.role == UserRole::Admin;

    match action {
        Action::ManageCatalog
        | Action::ApproveProvider
        | Action::ReviewPendingUpdates
        | Action::AssignTechnician
        | Action::ListAllBookings => is_admin,

        Action::ManageOwnCart { owner_id } | Action::Checkout { customer_id: owner_id } => {
            principal.role == UserRole::Customer && principal.id == *owner_id
        }

        Action::ManageProviderProfile => principal.role == UserRole::ServiceProvider,

        Action::ManageOwnAddresses { owner_id } | Action::ManageOwnBankDetails { owner_id } => {
            principal.id == *owner_id
        }

        Action::ViewBooking(booking) => {
            is_admin
                || booking.user_id == principal.id
                || booking.assigned_technician == Some(principal.id)
        }

        Action::CancelBooking(booking) | Action::ScheduleBooking(booking) => {
            is_admin || booking.user_id == principal.id
        }

        Action::VerifyStartOtp(booking) => {
            is_admin || booking.assigned_technician == Some(principal.id)
        }

        Action::ReportServiceProgress(booking) => {
            principal.role == UserRole::ServiceProvider
                && booking.assigned_technician == Some(principal.id)
        }

        Action::VerifyPayment(payment) => is_admin || payment.user_id == principal.id,
    }
}

pub fn require(principal: &User, action: &Action) -> Result<(), HttpError> {
    if can(principal, action) {
        Ok(())
    } else {
        Err(HttpError::forbidden(
            ErrorMessage::PermissionDenied.to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::bookingmodel::BookingStatus;
    use chrono::Utc;

    fn user(role: UserRole) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "someone".to_string(),
            email: "someone@example.com".to_string(),
            country_code: "+91".to_string(),
            mobile: "9898989898".to_string(),
            role,
            profile_image: None,
            experience_year: None,
            service_skill: None,
            service_km: None,
            document_type: None,
            document_file: None,
            is_gov_verified: false,
            is_police_verified: false,
            is_admin_verified: true,
            is_verified: true,
            wallet_balance: 0.0,
            is_blocked: false,
            blocked_reason: None,
            otp: None,
            otp_created_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn booking_of(customer: &User, technician: Option<Uuid>) -> Booking {
        let now = Utc::now();
        Booking {
            id: Uuid::new_v4(),
            user_id: customer.id,
            service_id: Some(Uuid::new_v4()),
            status: BookingStatus::Assign,
            technician_required: 1,
            assigned_technician: technician,
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
    fn only_admin_manages_catalog_and_reviews() {
        let admin = user(UserRole::Admin);
        let customer = user(UserRole::Customer);
        let provider = user(UserRole::ServiceProvider);

        for action in [
            Action::ManageCatalog,
            Action::ApproveProvider,
            Action::ReviewPendingUpdates,
            Action::AssignTechnician,
        ] {
            assert!(can(&admin, &action));
            assert!(!can(&customer, &action));
            assert!(!can(&provider, &action));
        }
    }

    #[test]
    fn cart_is_owner_only_and_customer_only() {
        let customer = user(UserRole::Customer);
        let other = user(UserRole::Customer);
        let provider = user(UserRole::ServiceProvider);

        let own = Action::ManageOwnCart {
            owner_id: customer.id,
        };
        assert!(can(&customer, &own));
        assert!(!can(&other, &own));

        let provider_cart = Action::ManageOwnCart {
            owner_id: provider.id,
        };
        assert!(!can(&provider, &provider_cart));
    }

    #[test]
    fn booking_visible_to_requester_technician_and_admin() {
        let customer = user(UserRole::Customer);
        let technician = user(UserRole::ServiceProvider);
        let admin = user(UserRole::Admin);
        let stranger = user(UserRole::Customer);

        let booking = booking_of(&customer, Some(technician.id));

        assert!(can(&customer, &Action::ViewBooking(&booking)));
        assert!(can(&technician, &Action::ViewBooking(&booking)));
        assert!(can(&admin, &Action::ViewBooking(&booking)));
        assert!(!can(&stranger, &Action::ViewBooking(&booking)));
    }

    #[test]
    fn progress_reports_restricted_to_assigned_technician() {
        let customer = user(UserRole::Customer);
        let technician = user(UserRole::ServiceProvider);
        let other_tech = user(UserRole::ServiceProvider);

        let booking = booking_of(&customer, Some(technician.id));

        assert!(can(&technician, &Action::ReportServiceProgress(&booking)));
        assert!(!can(&other_tech, &Action::ReportServiceProgress(&booking)));
        assert!(!can(&customer, &Action::ReportServiceProgress(&booking)));
    }

    #[test]
    fn otp_verification_allowed_for_technician_or_admin() {
        let customer = user(UserRole::Customer);
        let technician = user(UserRole::ServiceProvider);
        let admin = user(UserRole::Admin);

        let booking = booking_of(&customer, Some(technician.id));

        assert!(can(&technician, &Action::VerifyStartOtp(&booking)));
        assert!(can(&admin, &Action::VerifyStartOtp(&booking)));
        assert!(!can(&customer, &Action::VerifyStartOtp(&booking)));
    }

    #[test]
    fn addresses_and_bank_details_are_owner_only() {
        let provider = user(UserRole::ServiceProvider);
        let other = user(UserRole::ServiceProvider);
        let admin = user(UserRole::Admin);

        let own = Action::ManageOwnBankDetails {
            owner_id: provider.id,
        };
        assert!(can(&provider, &own));
        assert!(!can(&other, &own));
        // Admins review through the pending ledger, not by editing rows directly.
        assert!(!can(&admin, &own));

        let customer = user(UserRole::Customer);
        assert!(can(
            &customer,
            &Action::ManageOwnAddresses {
                owner_id: customer.id
            }
        ));
    }

    #[test]
    fn payment_verification_limited_to_payer_or_admin() {
        use crate::models::paymentmodel::{Payment, PaymentStatus};

        let customer = user(UserRole::Customer);
        let stranger = user(UserRole::Customer);
        let admin = user(UserRole::Admin);
        let now = Utc::now();

        let payment = Payment {
            id: Uuid::new_v4(),
            user_id: customer.id,
            order_id: "order_test".to_string(),
            amount: 499.0,
            currency: "INR".to_string(),
            status: PaymentStatus::Pending,
            provider_payment_id: None,
            payment_method: None,
            receipt: None,
            created_at: now,
            updated_at: now,
        };

        assert!(can(&customer, &Action::VerifyPayment(&payment)));
        assert!(can(&admin, &Action::VerifyPayment(&payment)));
        assert!(!can(&stranger, &Action::VerifyPayment(&payment)));
    }

    #[test]
    fn blocked_principal_is_denied_everything() {
        let mut admin = user(UserRole::Admin);
        admin.is_blocked = true;
        assert!(!can(&admin, &Action::ManageCatalog));

        let mut customer = user(UserRole::Customer);
        customer.is_blocked = true;
        let booking = booking_of(&customer, None);
        assert!(!can(&customer, &Action::ViewBooking(&booking)));
        assert!(!can(
            &customer,
            &Action::ManageOwnCart {
                owner_id: customer.id
            }
        ));
    }

    #[test]
    fn require_maps_denial_to_forbidden() {
        let customer = user(UserRole::Customer);
        let err = require(&customer, &Action::ManageCatalog).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::FORBIDDEN);
    }
}
