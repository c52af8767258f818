use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use validator::ValidationErrors;

#[derive(Debug, PartialEq)]
pub enum ErrorMessage {
    ServerError,
    EmailExist,
    UsernameExist,
    MobileExist,
    AdminExist,
    UserNoLongerExist,
    UserNotFound,
    TokenNotProvided,
    InvalidToken,
    PermissionDenied,
    OtpExpired,
    OtpInvalid,
    CartEmpty,
    NoDefaultAddress,
    InvalidPaymentSignature,
    AlreadyReviewed,
    InvalidReviewAction,
}

impl ErrorMessage {
    fn to_str(&self) -> &'static str {
        match self {
            ErrorMessage::ServerError => "Server Error. Please try again later",
            ErrorMessage::EmailExist => "Email is already registered",
            ErrorMessage::UsernameExist => "Username already exists",
            ErrorMessage::MobileExist => "User with this mobile already exists",
            ErrorMessage::AdminExist => "An admin profile already exists",
            ErrorMessage::UserNoLongerExist => "User belonging to this token no longer exists",
            ErrorMessage::UserNotFound => "User not found",
            ErrorMessage::TokenNotProvided => "You are not logged in, please provide a token",
            ErrorMessage::InvalidToken => "Authentication token is invalid or expired",
            ErrorMessage::PermissionDenied => "You are not allowed to perform this action",
            ErrorMessage::OtpExpired => "OTP expired",
            ErrorMessage::OtpInvalid => "Invalid OTP",
            ErrorMessage::CartEmpty => "Cart is empty",
            ErrorMessage::NoDefaultAddress => "No default address found",
            ErrorMessage::InvalidPaymentSignature => "Invalid payment signature",
            ErrorMessage::AlreadyReviewed => "This update request has already been reviewed",
            ErrorMessage::InvalidReviewAction => "Invalid action. Use 'approve' or 'reject'.",
        }
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Error carried out of handlers; renders as the standard response envelope.
#[derive(Debug, Clone)]
pub struct HttpError {
    pub message: String,
    pub status: StatusCode,
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl HttpError {
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        HttpError {
            message: message.into(),
            status,
            errors: None,
        }
    }

    pub fn server_error(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::BAD_REQUEST)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::UNAUTHORIZED)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::FORBIDDEN)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::NOT_FOUND)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::CONFLICT)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        HttpError::new(message, StatusCode::BAD_GATEWAY)
    }

    /// Collapses validator output into a 400 with a per-field error map.
    pub fn validation(errors: ValidationErrors) -> Self {
        let mut field_errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (field, errs) in errors.field_errors() {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
                .collect();
            field_errors.insert(field.to_string(), messages);
        }
        HttpError {
            message: "Invalid request data".to_string(),
            status: StatusCode::BAD_REQUEST,
            errors: Some(field_errors),
        }
    }

    pub fn into_http_response(self) -> axum::response::Response {
        let body = ErrorResponse {
            status: self.status.as_u16(),
            message: self.message,
            errors: self.errors,
        };
        (self.status, Json(body)).into_response()
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HttpError: message: {}, status: {}",
            self.message, self.status
        )
    }
}

impl std::error::Error for HttpError {}

impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        self.into_http_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_carry_expected_status() {
        assert_eq!(
            HttpError::bad_request("x").status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            HttpError::unauthorized("x").status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(HttpError::forbidden("x").status, StatusCode::FORBIDDEN);
        assert_eq!(HttpError::not_found("x").status, StatusCode::NOT_FOUND);
        assert_eq!(HttpError::conflict("x").status, StatusCode::CONFLICT);
        assert_eq!(
            HttpError::server_error("x").status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            HttpError::bad_gateway("x").status,
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn messages_render_verbatim() {
        assert_eq!(ErrorMessage::CartEmpty.to_string(), "Cart is empty");
        assert_eq!(ErrorMessage::OtpExpired.to_string(), "OTP expired");
        assert_eq!(ErrorMessage::OtpInvalid.to_string(), "Invalid OTP");
        assert_eq!(
            ErrorMessage::InvalidReviewAction.to_string(),
            "Invalid action. Use 'approve' or 'reject'."
        );
    }
}
