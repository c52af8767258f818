use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, patch},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{bankdb::BankDetailExt, pendingdb::PendingUpdateExt, userdb::UserExt},
    dtos::{
        userdtos::{BankDetailDto, FilterUserDto, UserData},
        ApiResponse,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::usermodel::BankDetail,
    service::access::{require, Action},
    AppState,
};

pub fn provider_handler() -> Router {
    Router::new()
        .route(
            "/profile",
            get(get_profile).patch(request_profile_update).delete(delete_profile),
        )
        .route("/bank-details", get(list_bank_details).post(add_bank_detail))
        .route(
            "/bank-details/:bank_detail_id",
            patch(request_bank_update).delete(remove_bank_detail),
        )
}

pub async fn get_profile(
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    require(&user.user, &Action::ManageProviderProfile)?;

    Ok(ApiResponse::ok(
        "Profile fetched successfully",
        Some(UserData {
            user: FilterUserDto::filter_user(&user.user),
        }),
    ))
}

/// Edits never land directly. The patch is parked in the pending ledger and
/// applied only when an admin approves it.
pub async fn request_profile_update(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, HttpError> {
    require(&user.user, &Action::ManageProviderProfile)?;

    if !body.is_object() || body.as_object().is_some_and(|map| map.is_empty()) {
        return Err(HttpError::bad_request("Nothing to update"));
    }

    let entry = app_state
        .db_client
        .create_profile_update(user.user.id, body)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::accepted(
        "Profile update submitted for admin review",
        Some(entry),
    ))
}

pub async fn delete_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    require(&user.user, &Action::ManageProviderProfile)?;

    app_state
        .db_client
        .delete_user(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::<()>::ok("Profile deleted successfully", None))
}

pub async fn list_bank_details(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let details = app_state
        .db_client
        .get_bank_details(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::ok("Bank details fetched successfully", Some(details)))
}

pub async fn add_bank_detail(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<BankDetailDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;

    let detail = app_state
        .db_client
        .save_bank_detail(
            user.user.id,
            &body.account_holder_name,
            &body.account_number,
            &body.ifsc_code,
            &body.bank_name,
            body.upi_id.as_deref(),
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::created("Bank detail added successfully", Some(detail)))
}

/// Same review gate as profile edits: the change waits for an admin.
pub async fn request_bank_update(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(bank_detail_id): Path<Uuid>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, HttpError> {
    let detail = owned_bank_detail(&app_state, &user, bank_detail_id).await?;

    if !body.is_object() || body.as_object().is_some_and(|map| map.is_empty()) {
        return Err(HttpError::bad_request("Nothing to update"));
    }

    let entry = app_state
        .db_client
        .create_bank_update(detail.id, body)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::accepted(
        "Bank detail update submitted for admin review",
        Some(entry),
    ))
}

pub async fn remove_bank_detail(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(bank_detail_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let detail = owned_bank_detail(&app_state, &user, bank_detail_id).await?;

    app_state
        .db_client
        .delete_bank_detail(detail.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::<()>::ok("Bank detail deleted successfully", None))
}

async fn owned_bank_detail(
    app_state: &Arc<AppState>,
    user: &JWTAuthMiddeware,
    bank_detail_id: Uuid,
) -> Result<BankDetail, HttpError> {
    let detail = app_state
        .db_client
        .get_bank_detail(bank_detail_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Bank detail not found"))?;

    require(
        &user.user,
        &Action::ManageOwnBankDetails {
            owner_id: detail.customer_id,
        },
    )?;

    Ok(detail)
}
