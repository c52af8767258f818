use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{bookingmodel::Booking, usermodel::Address};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CheckoutDto {
    /// Anchor booking created by the payment-OTP pre-stage.
    pub booking_id: Uuid,

    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,

    pub scheduled_datetime: Option<DateTime<Utc>>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentDto {
    #[validate(length(min = 1, message = "Order id is required"))]
    pub order_id: String,

    #[validate(length(min = 1, message = "Payment id is required"))]
    pub payment_id: String,

    #[validate(length(min = 1, message = "Signature is required"))]
    pub signature: String,

    pub method: Option<String>,
}

/// Returned by the payment-OTP pre-stage. The code itself travels over SMS
/// and email only.
#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentOtpData {
    pub booking_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentIntentData {
    pub order_id: String,
    pub amount: f64,
    pub currency: String,
    /// Public gateway key the client checkout widget needs.
    pub key_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: String,
    pub username: String,
    pub email: String,
    pub country_code: String,
    pub mobile: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SupportContact {
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutData {
    pub payment: PaymentIntentData,
    pub bookings: Vec<Booking>,
    pub customer: CustomerSummary,
    pub address: Address,
    pub support: SupportContact,
}
