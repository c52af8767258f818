use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct VerifyStartOtpDto {
    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct AssignTechnicianDto {
    pub technician_id: Uuid,

    #[validate(length(max = 255, message = "Reason must be at most 255 characters"))]
    pub reason: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CompleteBookingDto {
    #[validate(range(min = 0.0, message = "Quotation cannot be negative"))]
    pub quotation_amount: Option<f64>,

    pub complete_photo: Option<String>,

    #[validate(length(max = 1000, message = "Comment must be at most 1000 characters"))]
    pub complete_comment: Option<String>,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleBookingDto {
    pub scheduled_datetime: DateTime<Utc>,
}
