// src/error.rs
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Environment variable error: {0}")]
    EnvVarError(#[from] std::env::VarError),

    #[error("Failed to process password")]
    PasswordHashingError,

    #[error("Invalid student ID or password")]
    InvalidCredentials,

    // --- Attendance engine errors ---
    #[error("You are currently clocked in. Please clock out first.")]
    AlreadyClockedIn,

    #[error("No active clock-in record found for today")]
    NoActiveSession,

    #[error("Invalid CSV file: {0}")]
    InvalidImportFile(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unexpected internal error")]
    InternalServerError,
}

impl AppError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => "DatabaseError",
            AppError::EnvVarError(_) => "ConfigurationError",
            AppError::PasswordHashingError => "PasswordHashingError",
            AppError::InvalidCredentials => "InvalidCredentials",
            AppError::AlreadyClockedIn => "AlreadyClockedIn",
            AppError::NoActiveSession => "NoActiveSession",
            AppError::InvalidImportFile(_) => "InvalidImportFile",
            AppError::NotFound(_) => "NotFound",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::InternalServerError => "InternalServerError",
        }
    }
}

// Turns an AppError into a JSON failure (kind + message)
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::AlreadyClockedIn
            | AppError::NoActiveSession
            | AppError::InvalidImportFile(_)
            | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Internal details stay in the log, the client gets a generic message
        let message = if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self);
            "An unexpected error occurred.".to_string()
        } else {
            tracing::debug!("Request rejected: {}", self);
            self.to_string()
        };

        (status, Json(json!({ "error": self.kind(), "message": message }))).into_response()
    }
}

// Standard Result type for the application
pub type AppResult<T = ()> = Result<T, AppError>;
