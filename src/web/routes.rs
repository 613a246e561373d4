// src/web/routes.rs
use crate::{
    state::AppState,
    web::{auth_handlers, dtr_handlers},
};
use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

async fn handle_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Endpoint not found" })),
    )
}

pub fn create_router(app_state: AppState) -> Router {
    // --- DTR actions ---
    let dtr_routes = Router::new()
        .route("/stats/{user_id}", get(dtr_handlers::handle_stats))
        .route("/logs/{user_id}", get(dtr_handlers::handle_logs))
        .route("/clockIn", post(dtr_handlers::handle_clock_in))
        .route("/clockOut", post(dtr_handlers::handle_clock_out))
        .route("/editLog", post(dtr_handlers::handle_edit_log))
        .route("/importCsv", post(dtr_handlers::handle_import_csv))
        .route(
            "/reset-data",
            get(dtr_handlers::handle_reset_data).delete(dtr_handlers::handle_reset_data),
        );

    let api_routes = Router::new()
        .nest("/dtr", dtr_routes)
        .route("/login", post(auth_handlers::handle_login));

    Router::new()
        .nest("/api", api_routes)
        .fallback(handle_not_found)
        .with_state(app_state)
}
