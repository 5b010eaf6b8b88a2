use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id;
use crate::store::DirectoryStore;

pub mod catalogs;
pub mod families;
pub mod recommendations;
pub mod restaurants;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DirectoryStore>,
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http().make_span_with(request_id::make_span))
        .layer(middleware::from_fn(request_id::set_request_id))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/restaurants",
            get(restaurants::list).post(restaurants::create),
        )
        .route("/restaurants/:id", get(restaurants::get_by_id))
        .route(
            "/families/:family_id/members",
            get(families::list_members).post(families::create_member),
        )
        .route("/catalogs/cuisines", get(catalogs::cuisines))
        .route(
            "/catalogs/dietary-restrictions",
            get(catalogs::dietary_restrictions),
        )
        .route("/recommendations", post(recommendations::recommend))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
