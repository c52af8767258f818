use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

pub mod admindtos;
pub mod bookingdtos;
pub mod cartdtos;
pub mod catalogdtos;
pub mod checkoutdtos;
pub mod userdtos;

/// Standard response envelope; the body status mirrors the HTTP status.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        ApiResponse {
            status: status.as_u16(),
            message: message.into(),
            data,
        }
    }

    pub fn ok(message: impl Into<String>, data: Option<T>) -> Self {
        ApiResponse::new(StatusCode::OK, message, data)
    }

    pub fn created(message: impl Into<String>, data: Option<T>) -> Self {
        ApiResponse::new(StatusCode::CREATED, message, data)
    }

    pub fn accepted(message: impl Into<String>, data: Option<T>) -> Self {
        ApiResponse::new(StatusCode::ACCEPTED, message, data)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_status_mirrors_http_status() {
        let resp = ApiResponse::<()>::accepted("queued", None);
        assert_eq!(resp.status, 202);

        let resp = ApiResponse::ok("done", Some(5));
        assert_eq!(resp.status, 200);
        assert_eq!(resp.data, Some(5));
    }

    #[test]
    fn absent_data_is_omitted_from_json() {
        let resp = ApiResponse::<()>::ok("done", None);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("data"));
    }
}
