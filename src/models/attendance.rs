// src/models/attendance.rs
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::user::User;

/// Arrival classification, fixed at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum AttendanceStatus {
    Present,
    Late,
}

/// One row of the `attendance` table.
/// `time_out == None` means the session is still open.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct AttendanceLog {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub time_in: NaiveDateTime,
    pub time_out: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

impl AttendanceLog {
    pub fn is_open(&self) -> bool {
        self.time_out.is_none()
    }
}

// Row to insert (id assigned by the store)
#[derive(Debug, Clone)]
pub struct NewAttendanceLog {
    pub user_id: i64,
    pub date: NaiveDate,
    pub time_in: NaiveDateTime,
    pub time_out: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

// Full overwrite applied by a manual edit; status is deliberately absent
#[derive(Debug, Clone)]
pub struct LogEdit {
    pub date: NaiveDate,
    pub time_in: NaiveDateTime,
    pub time_out: Option<NaiveDateTime>,
    pub remarks: Option<String>,
}

/// Result of a successful clock-out.
#[derive(Debug, Clone, Serialize)]
pub struct ClockOutOutcome {
    pub log: AttendanceLog,
    pub hours_added: Decimal,
}

/// Progress summary returned by the stats endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StatsView {
    #[serde(flatten)]
    pub user: User,
    pub remaining: Decimal,
    pub percentage: Decimal,
    pub total_lates: usize,
}

// --- JSON bodies accepted by the DTR endpoints ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockInRequest {
    pub user_id: i64,
    pub date: Option<String>,
    pub time_in: Option<String>,
    pub time_out: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockOutRequest {
    pub user_id: i64,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditLogRequest {
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub date: String,
    pub time_in: String,
    pub time_out: Option<String>,
    pub remarks: Option<String>,
}
