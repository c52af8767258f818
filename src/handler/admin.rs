use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{
        pendingdb::{PendingUpdateExt, ERR_ALREADY_REVIEWED},
        userdb::UserExt,
    },
    dtos::{
        admindtos::{ProviderApprovalDto, ReviewPendingUpdateDto},
        userdtos::{FilterUserDto, UserData},
        ApiResponse,
    },
    error::{ErrorMessage, HttpError},
    mail::mails::send_provider_status_email,
    middleware::JWTAuthMiddeware,
    models::usermodel::UserRole,
    service::access::{require, Action},
    AppState,
};

pub fn admin_handler() -> Router {
    Router::new()
        .route("/providers", get(list_providers_awaiting_review))
        .route("/providers/:provider_id/review", put(review_provider))
        .route("/pending-updates/profile", get(list_pending_profile_updates))
        .route(
            "/pending-updates/profile/:update_id",
            put(review_profile_update),
        )
        .route("/pending-updates/bank", get(list_pending_bank_updates))
        .route("/pending-updates/bank/:update_id", put(review_bank_update))
}

fn parse_review_action(action: &str) -> Result<bool, HttpError> {
    match action {
        "approve" => Ok(true),
        "reject" => Ok(false),
        _ => Err(HttpError::bad_request(
            ErrorMessage::InvalidReviewAction.to_string(),
        )),
    }
}

fn map_review_error(err: sqlx::Error) -> HttpError {
    match err {
        sqlx::Error::RowNotFound => HttpError::not_found("Pending update not found"),
        sqlx::Error::Protocol(ref reason) if reason == ERR_ALREADY_REVIEWED => {
            HttpError::conflict(ErrorMessage::AlreadyReviewed.to_string())
        }
        err => HttpError::server_error(err.to_string()),
    }
}

pub async fn list_providers_awaiting_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    require(&user.user, &Action::ApproveProvider)?;

    let providers = app_state
        .db_client
        .get_providers_awaiting_review()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::ok(
        "Providers fetched successfully",
        Some(FilterUserDto::filter_users(&providers)),
    ))
}

/// Approval opens the login gate for the provider; rejection blocks the
/// account with the stored reason. Either outcome is mailed out.
pub async fn review_provider(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(provider_id): Path<Uuid>,
    Json(body): Json<ProviderApprovalDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;
    require(&user.user, &Action::ApproveProvider)?;

    let approve = parse_review_action(&body.action)?;

    let provider = app_state
        .db_client
        .get_user(Some(provider_id), None, None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::UserNotFound.to_string()))?;

    if provider.role != UserRole::ServiceProvider {
        return Err(HttpError::bad_request("User is not a service provider"));
    }

    let (updated, message) = if approve {
        let updated = app_state
            .db_client
            .approve_provider(provider.id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;
        (updated, "Provider approved successfully")
    } else {
        let reason = body.reason.as_deref().unwrap_or("Rejected by admin");
        let updated = app_state
            .db_client
            .reject_provider(provider.id, reason)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;
        (updated, "Provider rejected")
    };

    if let Err(e) = send_provider_status_email(
        &updated.email,
        &updated.username,
        approve,
        updated.blocked_reason.as_deref(),
    )
    .await
    {
        tracing::warn!("failed to send status email to {}: {}", updated.email, e);
    }

    if let Err(e) = app_state
        .db_client
        .record_system_log(
            "provider_review",
            Some(user.user.id),
            &format!(
                "Provider {} {}",
                updated.username,
                if approve { "approved" } else { "rejected" }
            ),
        )
        .await
    {
        tracing::warn!("failed to record review of provider {}: {}", updated.id, e);
    }

    Ok(ApiResponse::ok(
        message,
        Some(UserData {
            user: FilterUserDto::filter_user(&updated),
        }),
    ))
}

pub async fn list_pending_profile_updates(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    require(&user.user, &Action::ReviewPendingUpdates)?;

    let updates = app_state
        .db_client
        .get_unreviewed_profile_updates()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::ok("Pending updates fetched successfully", Some(updates)))
}

pub async fn review_profile_update(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(update_id): Path<Uuid>,
    Json(body): Json<ReviewPendingUpdateDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;
    require(&user.user, &Action::ReviewPendingUpdates)?;

    let approve = parse_review_action(&body.action)?;

    let entry = app_state
        .db_client
        .review_profile_update(update_id, user.user.id, approve)
        .await
        .map_err(map_review_error)?;

    let message = if approve {
        "Update approved and applied"
    } else {
        "Update rejected"
    };

    Ok(ApiResponse::ok(message, Some(entry)))
}

pub async fn list_pending_bank_updates(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    require(&user.user, &Action::ReviewPendingUpdates)?;

    let updates = app_state
        .db_client
        .get_unreviewed_bank_updates()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::ok("Pending updates fetched successfully", Some(updates)))
}

pub async fn review_bank_update(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(update_id): Path<Uuid>,
    Json(body): Json<ReviewPendingUpdateDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;
    require(&user.user, &Action::ReviewPendingUpdates)?;

    let approve = parse_review_action(&body.action)?;

    let entry = app_state
        .db_client
        .review_bank_update(update_id, user.user.id, approve)
        .await
        .map_err(map_review_error)?;

    let message = if approve {
        "Update approved and applied"
    } else {
        "Update rejected"
    };

    Ok(ApiResponse::ok(message, Some(entry)))
}
