// src/web/dtr_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::attendance::{
        AttendanceLog, ClockInRequest, ClockOutRequest, EditLogRequest, LogEdit, StatsView,
    },
    services::{
        datetime_parse,
        import_service::ImportReconciler,
        session_service::{ClockIn, SessionManager},
        stats_service,
    },
    store::AttendanceStore,
};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Local, NaiveDateTime, Timelike};
use serde_json::json;
use std::sync::Arc;

// Server clock, truncated to whole seconds like the stored timestamps
fn server_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// GET /api/dtr/stats/{user_id}
pub async fn handle_stats(
    State(store): State<Arc<dyn AttendanceStore>>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<StatsView>> {
    tracing::debug!("GET stats for user {}", user_id);
    Ok(Json(stats_service::stats(store.as_ref(), user_id).await?))
}

/// GET /api/dtr/logs/{user_id}
pub async fn handle_logs(
    State(store): State<Arc<dyn AttendanceStore>>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<AttendanceLog>>> {
    tracing::debug!("GET logs for user {}", user_id);
    Ok(Json(stats_service::logs(store.as_ref(), user_id).await?))
}

/// POST /api/dtr/clockIn
pub async fn handle_clock_in(
    State(sessions): State<SessionManager>,
    Json(body): Json<ClockInRequest>,
) -> AppResult<impl IntoResponse> {
    let now = server_now();

    // Missing date/time default to the server clock
    let date = match body.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => datetime_parse::parse_date(raw)
            .ok_or_else(|| AppError::InvalidInput(format!("unrecognised date '{}'", raw)))?,
        None => now.date(),
    };
    let time_in = datetime_parse::parse_optional_timestamp(body.time_in.as_deref())
        .map_err(AppError::InvalidInput)?
        .unwrap_or(now);
    let time_out = datetime_parse::parse_optional_timestamp(body.time_out.as_deref())
        .map_err(AppError::InvalidInput)?;

    let log = sessions
        .clock_in(ClockIn {
            user_id: body.user_id,
            date,
            time_in,
            time_out,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Clock In Successful",
            "time": log.time_in,
            "log": log,
        })),
    ))
}

/// POST /api/dtr/clockOut
pub async fn handle_clock_out(
    State(sessions): State<SessionManager>,
    Json(body): Json<ClockOutRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = sessions
        .clock_out(body.user_id, server_now(), body.remarks.as_deref())
        .await?;

    Ok(Json(json!({
        "message": "Clock Out Successful",
        "hours_added": outcome.hours_added,
        "log": outcome.log,
    })))
}

/// POST /api/dtr/editLog
pub async fn handle_edit_log(
    State(sessions): State<SessionManager>,
    Json(body): Json<EditLogRequest>,
) -> AppResult<impl IntoResponse> {
    let date = datetime_parse::parse_date(&body.date)
        .ok_or_else(|| AppError::InvalidInput(format!("unrecognised date '{}'", body.date)))?;
    let time_in = datetime_parse::parse_timestamp(&body.time_in).ok_or_else(|| {
        AppError::InvalidInput(format!("unrecognised timestamp '{}'", body.time_in))
    })?;
    let time_out = datetime_parse::parse_optional_timestamp(body.time_out.as_deref())
        .map_err(AppError::InvalidInput)?;

    let log = sessions
        .edit_log(
            body.id,
            body.user_id,
            LogEdit {
                date,
                time_in,
                time_out,
                remarks: blank_to_none(body.remarks),
            },
        )
        .await?;

    Ok(Json(json!({
        "message": "Log updated successfully",
        "log": log,
    })))
}

/// POST /api/dtr/importCsv (multipart: `file`, `userId`)
pub async fn handle_import_csv(
    State(importer): State<ImportReconciler>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut user_id: Option<i64> = None;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Failed to read multipart field: {}", e);
        AppError::InvalidImportFile(format!("unreadable upload: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    tracing::warn!("Failed to read uploaded file '{}': {}", filename, e);
                    AppError::InvalidImportFile(format!("unreadable upload: {}", e))
                })?;
                upload = Some((filename, bytes.to_vec()));
            }
            "userId" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("userId: {}", e)))?;
                let parsed = raw.trim().parse().map_err(|_| {
                    AppError::InvalidInput(format!("userId '{}' is not a number", raw))
                })?;
                user_id = Some(parsed);
            }
            other => tracing::debug!("Ignoring multipart field '{}'", other),
        }
    }

    let (filename, bytes) =
        upload.ok_or_else(|| AppError::InvalidImportFile("no file uploaded".into()))?;
    let user_id = user_id.ok_or_else(|| AppError::InvalidInput("userId is required".into()))?;

    let imported = importer.import_csv(user_id, &filename, &bytes).await?;

    Ok(Json(json!({
        "message": format!("{} records imported successfully", imported),
        "imported": imported,
    })))
}

/// GET|DELETE /api/dtr/reset-data
pub async fn handle_reset_data(
    State(sessions): State<SessionManager>,
) -> AppResult<impl IntoResponse> {
    tracing::warn!("Reset requested: wiping all attendance logs.");
    sessions.reset_all().await?;
    Ok(Json(json!({
        "message": "All attendance logs deleted and hours reset."
    })))
}
