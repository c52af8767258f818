use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{cartdb::CartExt, catalogdb::CatalogExt},
    dtos::{
        cartdtos::{AddCartItemDto, CartData, UpdateCartItemDto},
        ApiResponse,
    },
    error::{ErrorMessage, HttpError},
    middleware::JWTAuthMiddeware,
    models::cartmodel::CartItem,
    service::access::{require, Action},
    AppState,
};

pub fn cart_handler() -> Router {
    Router::new()
        .route("/", get(get_cart).delete(clear_cart))
        .route("/items", post(add_item))
        .route("/items/:item_id", patch(update_item).delete(remove_item))
}

pub async fn get_cart(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    require(
        &user.user,
        &Action::ManageOwnCart {
            owner_id: user.user.id,
        },
    )?;

    let cart = app_state
        .db_client
        .get_cart(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let data = match cart {
        Some(cart) => {
            let items = app_state
                .db_client
                .get_cart_items(cart.id)
                .await
                .map_err(|e| HttpError::server_error(e.to_string()))?;
            CartData::from_items(cart.id, items)
        }
        None => CartData::empty(),
    };

    Ok(ApiResponse::ok("Cart fetched successfully", Some(data)))
}

pub async fn add_item(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<AddCartItemDto>,
) -> Result<impl IntoResponse, HttpError> {
    require(
        &user.user,
        &Action::ManageOwnCart {
            owner_id: user.user.id,
        },
    )?;
    body.validate().map_err(HttpError::validation)?;

    // Unit price is resolved server side; clients never send prices.
    let service = app_state
        .db_client
        .get_service(body.service_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Service not found"))?;

    let cart = app_state
        .db_client
        .get_or_create_cart(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let item = app_state
        .db_client
        .upsert_cart_item(
            cart.id,
            service.id,
            body.quantity,
            body.technician_count.unwrap_or(1),
            service.price,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::created("Item added to cart", Some(item)))
}

pub async fn update_item(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(item_id): Path<Uuid>,
    Json(body): Json<UpdateCartItemDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate().map_err(HttpError::validation)?;

    let item = owned_cart_item(&app_state, &user, item_id).await?;

    let updated = app_state
        .db_client
        .update_cart_item(item.id, body.quantity, body.technician_count)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::ok("Cart item updated", Some(updated)))
}

pub async fn remove_item(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let item = owned_cart_item(&app_state, &user, item_id).await?;

    app_state
        .db_client
        .delete_cart_item(item.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::<()>::ok("Item removed from cart", None))
}

pub async fn clear_cart(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    require(
        &user.user,
        &Action::ManageOwnCart {
            owner_id: user.user.id,
        },
    )?;

    if let Some(cart) = app_state
        .db_client
        .get_cart(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
    {
        app_state
            .db_client
            .clear_cart(cart.id)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?;
    }

    Ok(ApiResponse::<()>::ok("Cart cleared", None))
}

/// Resolves the line and proves it sits in the caller's cart.
async fn owned_cart_item(
    app_state: &Arc<AppState>,
    user: &JWTAuthMiddeware,
    item_id: Uuid,
) -> Result<CartItem, HttpError> {
    require(
        &user.user,
        &Action::ManageOwnCart {
            owner_id: user.user.id,
        },
    )?;

    let item = app_state
        .db_client
        .get_cart_item(item_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Cart item not found"))?;

    let cart = app_state
        .db_client
        .get_cart(user.user.id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    match cart {
        Some(cart) if cart.id == item.cart_id => Ok(item),
        _ => Err(HttpError::forbidden(
            ErrorMessage::PermissionDenied.to_string(),
        )),
    }
}
