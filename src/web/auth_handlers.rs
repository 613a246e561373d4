// src/web/auth_handlers.rs
use crate::{
    error::AppResult,
    models::user::LoginForm,
    services::auth_service,
    store::AttendanceStore,
};
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

/// POST /api/login
///
/// The token is a random placeholder; nothing checks it on later requests.
pub async fn handle_login(
    State(store): State<Arc<dyn AttendanceStore>>,
    Json(form): Json<LoginForm>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("POST /api/login for '{}'", form.student_id);
    let user = auth_service::login(store.as_ref(), &form.student_id, &form.password).await?;

    Ok(Json(json!({
        "status": 200,
        "message": "Login Successful",
        "user_id": user.id,
        "token": Uuid::new_v4().simple().to_string(),
        "user": {
            "name": user.name,
            "student_id": user.student_id,
        },
    })))
}
