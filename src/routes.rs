use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        admin::admin_handler,
        auth::auth_handler,
        booking::booking_handler,
        cart::cart_handler,
        catalog::{category_handler, service_handler},
        checkout::checkout_handler,
        provider::provider_handler,
        users::users_handler,
    },
    middleware::auth,
    AppState,
};

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/auth", auth_handler())
        .nest("/users", users_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/provider",
            provider_handler().layer(middleware::from_fn(auth)),
        )
        .nest(
            "/categories",
            category_handler().layer(middleware::from_fn(auth)),
        )
        .nest(
            "/services",
            service_handler().layer(middleware::from_fn(auth)),
        )
        .nest("/cart", cart_handler().layer(middleware::from_fn(auth)))
        .nest(
            "/bookings",
            booking_handler().layer(middleware::from_fn(auth)),
        )
        .nest(
            "/checkout",
            checkout_handler().layer(middleware::from_fn(auth)),
        )
        .nest("/admin", admin_handler().layer(middleware::from_fn(auth)))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}
