// src/models/user.rs
use crate::error::{AppError, AppResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;

// A trainee read from the 'users' table
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub student_id: String,
    pub name: String,
    #[serde(skip_serializing)] // Never leaves the server
    pub password_hash: String,
    pub total_hours_required: Decimal,
    pub hours_rendered: Decimal, // Cached sum of closed logs
}

// Raw row as SQLite stores it (decimals kept as TEXT)
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub student_id: String,
    pub name: String,
    pub password_hash: String,
    pub total_hours_required: String,
    pub hours_rendered: String,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> AppResult<Self> {
        let parse = |field: &str, raw: &str| {
            Decimal::from_str(raw).map_err(|e| {
                tracing::error!("Corrupt {} '{}' for user {}: {}", field, raw, row.id, e);
                AppError::InternalServerError
            })
        };
        Ok(User {
            total_hours_required: parse("total_hours_required", &row.total_hours_required)?,
            hours_rendered: parse("hours_rendered", &row.hours_rendered)?,
            id: row.id,
            student_id: row.student_id,
            name: row.name,
            password_hash: row.password_hash,
        })
    }
}

// Data needed to create an account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub student_id: String,
    pub name: String,
    pub password_hash: String,
    pub total_hours_required: Decimal,
}

// Body of POST /api/login
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub password: String,
}
