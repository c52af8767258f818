use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{
        bookingdb::{BookingExt, ERR_INVALID_TRANSITION},
        userdb::UserExt,
    },
    dtos::{
        bookingdtos::{
            AssignTechnicianDto, CompleteBookingDto, ScheduleBookingDto, VerifyStartOtpDto,
        },
        checkoutdtos::PaymentOtpData,
        userdtos::RequestQueryDto,
        ApiResponse,
    },
    error::{ErrorMessage, HttpError},
    mail::mails::send_otp_email,
    middleware::JWTAuthMiddeware,
    models::usermodel::UserRole,
    service::access::{require, Action},
    utils::otp_generator::generate_otp,
    AppState,
};

pub fn booking_handler() -> Router {
    Router::new()
        .route("/", get(list_bookings))
        .route("/payment-otp", post(request_payment_otp))
        .route("/:booking_id", get(get_booking))
        .route("/:booking_id/verify-otp", post(verify_start_otp))
        .route("/:booking_id/assign", put(assign_technician))
        .route("/:booking_id/arriving", put(mark_arriving))
        .route("/:booking_id/complete", put(complete_booking))
        .route("/:booking_id/cancel", put(cancel_booking))
        .route("/:booking_id/schedule", put(schedule_booking))
}

/// Conflicts raised inside booking transactions arrive as protocol errors;
/// everything else is a plain server fault.
fn map_transition_error(err: sqlx::Error) -> HttpError {
    match err {
        sqlx::Error::RowNotFound => HttpError::not_found("Booking not found"),
        sqlx::Error::Protocol(ref reason) if reason == ERR_INVALID_TRANSITION => {
            HttpError::conflict("Booking cannot move to the requested status")
        }
        err => HttpError::server_error(err.to_string()),
    }
}

/// Pre-stage of checkout: parks a fresh code on the customer's anchor
/// booking and delivers it out of band. The response carries only the
/// anchor id the checkout call needs.
pub async fn request_payment_otp(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    require(
        &user.user,
        &Action::Checkout {
            customer_id: user.user.id,
        },
    )?;

    let otp = generate_otp();
    let anchor = app_state
        .db_client
        .refresh_anchor_booking(user.user.id, &otp, Utc::now())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if let Err(e) = app_state
        .sms
        .send_otp(&user.user.country_code, &user.user.mobile, &otp)
        .await
    {
        tracing::warn!("failed to send payment OTP sms to {}: {}", user.user.mobile, e);
    }

    if let Err(e) = send_otp_email(&user.user.email, &user.user.username, &otp).await {
        tracing::warn!("failed to send payment OTP email to {}: {}", user.user.email, e);
    }

    Ok(ApiResponse::ok(
        "OTP sent to your registered mobile number",
        Some(PaymentOtpData { booking_id: anchor.id }),
    ))
}

/// Admins page through everything; customers and technicians see their own.
pub async fn list_bookings(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Query(query): Query<RequestQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    query.validate().map_err(HttpError::validation)?;

    let bookings = match user.user.role {
        UserRole::Admin => {
            require(&user.user, &Action::ListAllBookings)?;
            let page = query.page.unwrap_or(1) as u32;
            let limit = query.limit.unwrap_or(10);
            app_state
                .db_client
                .get_all_bookings(page, limit)
                .await
                .map_err(|e| HttpError::server_error(e.to_string()))?
        }
        UserRole::ServiceProvider => app_state
            .db_client
            .get_bookings_for_technician(user.user.id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?,
        UserRole::Customer => app_state
            .db_client
            .get_bookings_for_user(user.user.id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?,
    };

    Ok(ApiResponse::ok("Bookings fetched successfully", Some(bookings)))
}

pub async fn get_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let booking = app_state
        .db_client
        .get_booking(booking_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Booking not found"))?;

    require(&user.user, &Action::ViewBooking(&booking))?;

    Ok(ApiResponse::ok("Booking fetched successfully", Some(booking)))
}

/// The technician reads the code off the customer at the door. Expired or
/// wrong codes fail alike; a correct one stamps the booking verified.
pub async fn verify_start_otp(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(booking_id): Path<Uuid>,
    Json(body): Json<VerifyStartOtpDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;

    let booking = app_state
        .db_client
        .get_booking(booking_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Booking not found"))?;

    require(&user.user, &Action::VerifyStartOtp(&booking))?;

    let now = Utc::now();
    if !booking.start_otp_window_open(now) {
        return Err(HttpError::bad_request(ErrorMessage::OtpExpired.to_string()));
    }

    let stamped = app_state
        .db_client
        .stamp_otp_verified(booking.id, user.user.id, &body.otp, now)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::bad_request(ErrorMessage::OtpInvalid.to_string()))?;

    Ok(ApiResponse::ok("OTP verified successfully", Some(stamped)))
}

pub async fn assign_technician(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(booking_id): Path<Uuid>,
    Json(body): Json<AssignTechnicianDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;
    require(&user.user, &Action::AssignTechnician)?;

    let booking = app_state
        .db_client
        .get_booking(booking_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Booking not found"))?;

    let technician = app_state
        .db_client
        .get_user(Some(body.technician_id), None, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Technician not found"))?;

    if technician.role != UserRole::ServiceProvider || !technician.is_admin_verified {
        return Err(HttpError::bad_request(
            "Selected user is not an approved service provider",
        ));
    }

    let reason = body.reason.as_deref().unwrap_or("Manual assignment by admin");

    let updated = app_state
        .db_client
        .assign_technician(booking.id, technician.id, user.user.id, reason)
        .await
        .map_err(map_transition_error)?;

    if let Err(e) = app_state
        .notification_service
        .technician_assigned(updated.user_id, &technician, &updated)
        .await
    {
        tracing::warn!("failed to notify assignment on booking {}: {}", updated.id, e);
    }

    if let Err(e) = app_state
        .db_client
        .record_system_log(
            "manual_assign",
            Some(user.user.id),
            &format!(
                "Technician {} assigned to booking {}",
                technician.username, updated.id
            ),
        )
        .await
    {
        tracing::warn!("failed to record assignment on booking {}: {}", updated.id, e);
    }

    Ok(ApiResponse::ok("Technician assigned successfully", Some(updated)))
}

pub async fn mark_arriving(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let booking = app_state
        .db_client
        .get_booking(booking_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Booking not found"))?;

    require(&user.user, &Action::ReportServiceProgress(&booking))?;

    let updated = app_state
        .db_client
        .mark_arriving(booking.id)
        .await
        .map_err(map_transition_error)?;

    Ok(ApiResponse::ok("Technician is on the way", Some(updated)))
}

pub async fn complete_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(booking_id): Path<Uuid>,
    Json(body): Json<CompleteBookingDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;

    let booking = app_state
        .db_client
        .get_booking(booking_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Booking not found"))?;

    require(&user.user, &Action::ReportServiceProgress(&booking))?;

    let updated = app_state
        .db_client
        .complete_booking(
            booking.id,
            body.quotation_amount,
            body.complete_photo.as_deref(),
            body.complete_comment.as_deref(),
        )
        .await
        .map_err(map_transition_error)?;

    Ok(ApiResponse::ok("Booking completed successfully", Some(updated)))
}

pub async fn cancel_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(booking_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let booking = app_state
        .db_client
        .get_booking(booking_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Booking not found"))?;

    require(&user.user, &Action::CancelBooking(&booking))?;

    let updated = app_state
        .db_client
        .cancel_booking(booking.id)
        .await
        .map_err(map_transition_error)?;

    Ok(ApiResponse::ok("Booking cancelled successfully", Some(updated)))
}

pub async fn schedule_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(booking_id): Path<Uuid>,
    Json(body): Json<ScheduleBookingDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;

    let booking = app_state
        .db_client
        .get_booking(booking_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Booking not found"))?;

    require(&user.user, &Action::ScheduleBooking(&booking))?;

    let updated = app_state
        .db_client
        .schedule_booking(booking.id, body.scheduled_datetime)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::conflict("Booking can no longer be rescheduled"))?;

    Ok(ApiResponse::ok("Booking rescheduled successfully", Some(updated)))
}
