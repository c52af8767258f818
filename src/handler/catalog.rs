use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::catalogdb::CatalogExt,
    dtos::{
        catalogdtos::{
            CategoryDto, ServiceDto, ServiceQueryDto, UpdateCategoryDto, UpdateServiceDto,
        },
        ApiResponse,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    service::access::{require, Action},
    AppState,
};

pub fn category_handler() -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/:category_id",
            get(get_category).put(update_category).delete(delete_category),
        )
}

pub fn service_handler() -> Router {
    Router::new()
        .route("/", get(list_services).post(create_service))
        .route(
            "/:service_id",
            get(get_service).put(update_service).delete(delete_service),
        )
}

pub async fn list_categories(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let categories = app_state
        .db_client
        .get_categories()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::ok("Categories fetched successfully", Some(categories)))
}

pub async fn get_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let category = app_state
        .db_client
        .get_category(category_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Category not found"))?;

    Ok(ApiResponse::ok("Category fetched successfully", Some(category)))
}

pub async fn create_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<CategoryDto>,
) -> Result<impl IntoResponse, HttpError> {
    require(&user.user, &Action::ManageCatalog)?;
    body.validate().map_err(HttpError::validation)?;

    let category = app_state
        .db_client
        .save_category(&body.category_name, body.image.as_deref())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::created("Category created successfully", Some(category)))
}

pub async fn update_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(category_id): Path<Uuid>,
    Json(body): Json<UpdateCategoryDto>,
) -> Result<impl IntoResponse, HttpError> {
    require(&user.user, &Action::ManageCatalog)?;
    body.validate().map_err(HttpError::validation)?;

    app_state
        .db_client
        .get_category(category_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Category not found"))?;

    let category = app_state
        .db_client
        .update_category(category_id, body.category_name.as_deref(), body.image.as_deref())
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::ok("Category updated successfully", Some(category)))
}

pub async fn delete_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    require(&user.user, &Action::ManageCatalog)?;

    app_state
        .db_client
        .get_category(category_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Category not found"))?;

    app_state
        .db_client
        .delete_category(category_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::<()>::ok("Category deleted successfully", None))
}

pub async fn list_services(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<ServiceQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    let services = app_state
        .db_client
        .get_services(query.category_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::ok("Services fetched successfully", Some(services)))
}

pub async fn get_service(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(service_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let service = app_state
        .db_client
        .get_service(service_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Service not found"))?;

    Ok(ApiResponse::ok("Service fetched successfully", Some(service)))
}

pub async fn create_service(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Json(body): Json<ServiceDto>,
) -> Result<impl IntoResponse, HttpError> {
    require(&user.user, &Action::ManageCatalog)?;
    body.validate().map_err(HttpError::validation)?;

    app_state
        .db_client
        .get_category(body.category_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Category not found"))?;

    let service = app_state
        .db_client
        .save_service(
            body.category_id,
            &body.name,
            &body.description,
            body.cover_image.as_deref(),
            body.image.as_deref(),
            &body.section,
            &body.steps,
            &body.faqs,
            body.price,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::created("Service created successfully", Some(service)))
}

pub async fn update_service(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(service_id): Path<Uuid>,
    Json(body): Json<UpdateServiceDto>,
) -> Result<impl IntoResponse, HttpError> {
    require(&user.user, &Action::ManageCatalog)?;
    body.validate().map_err(HttpError::validation)?;

    app_state
        .db_client
        .get_service(service_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Service not found"))?;

    let service = app_state
        .db_client
        .update_service(
            service_id,
            body.name.as_deref(),
            body.description.as_deref(),
            body.cover_image.as_deref(),
            body.image.as_deref(),
            body.section.as_deref(),
            body.steps.as_deref(),
            body.faqs.as_deref(),
            body.price,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::ok("Service updated successfully", Some(service)))
}

pub async fn delete_service(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(user): Extension<JWTAuthMiddeware>,
    Path(service_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    require(&user.user, &Action::ManageCatalog)?;

    app_state
        .db_client
        .get_service(service_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("Service not found"))?;

    app_state
        .db_client
        .delete_service(service_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(ApiResponse::<()>::ok("Service deleted successfully", None))
}
