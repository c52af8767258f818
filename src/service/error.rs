use thiserror::Error;
use uuid::Uuid;

use crate::error::HttpError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Booking {0} not found")]
    BookingNotFound(Uuid),

    #[error("Payment gateway error: {0}")]
    Gateway(String),

    #[error("Invalid payment signature")]
    InvalidSignature,

    #[error("SMS delivery error: {0}")]
    Sms(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::BookingNotFound(_) => HttpError::not_found(error.to_string()),

            ServiceError::Validation(_) => HttpError::bad_request(error.to_string()),

            ServiceError::InvalidSignature => HttpError::bad_request(error.to_string()),

            ServiceError::Gateway(_) => HttpError::bad_gateway(error.to_string()),

            _ => HttpError::server_error(error.to_string()),
        }
    }
}

impl From<String> for ServiceError {
    fn from(err: String) -> Self {
        ServiceError::Other(err)
    }
}
