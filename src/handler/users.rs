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
    db::{addressdb::AddressExt, notificationdb::NotificationExt},
    dtos::{
        userdtos::{AddressDto, FilterUserDto, UpdateAddressDto, UserData},
        ApiResponse,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::usermodel::Address,
    service::access::{require, Action},
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/me", get(get_me))
        .route("/addresses", get(list_addresses).post(add_address))
        .route(
            "/addresses/:address_id",
            put(update_address).delete(remove_address),
        )
        .route("/notifications", get(list_notifications))
}

pub async fn get_me(
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(ApiResponse::ok(
        "User fetched successfully",
        Some(UserData {
            user: FilterUserDto::filter_user(&user.user),
        }),
    ))
}

pub async fn list_addresses(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let addresses = app_state
        .db_client
        .get_addresses(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::ok("Addresses fetched successfully", Some(addresses)))
}

pub async fn add_address(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<AddressDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;

    let address = app_state
        .db_client
        .save_address(
            user.user.id,
            body.label.as_deref().unwrap_or("home"),
            &body.address,
            &body.city,
            &body.state,
            &body.pincode,
            // new addresses become the default unless the client opts out
            body.is_default.unwrap_or(true),
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::created("Address added successfully", Some(address)))
}

pub async fn update_address(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(address_id): Path<Uuid>,
    Json(body): Json<UpdateAddressDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;

    let address = owned_address(&app_state, &user, address_id).await?;

    let updated = app_state
        .db_client
        .update_address(address.id, &body.into_patch())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::ok("Address updated successfully", Some(updated)))
}

pub async fn remove_address(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(address_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let address = owned_address(&app_state, &user, address_id).await?;

    app_state
        .db_client
        .delete_address(address.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::<()>::ok("Address deleted successfully", None))
}

pub async fn list_notifications(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let notifications = app_state
        .db_client
        .get_notifications_for_user(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::ok(
        "Notifications fetched successfully",
        Some(notifications),
    ))
}

async fn owned_address(
    app_state: &Arc<AppState>,
    user: &JWTAuthMiddeware,
    address_id: Uuid,
) -> Result<Address, HttpError> {
    let address = app_state
        .db_client
        .get_address(address_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Address not found"))?;

    require(
        &user.user,
        &Action::ManageOwnAddresses {
            owner_id: address.user_id,
        },
    )?;

    Ok(address)
}
