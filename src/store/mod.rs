// src/store/mod.rs
//! Persistence boundary for users and attendance logs.
//!
//! The engine only talks to [`AttendanceStore`]; it never opens a connection itself.
//! Lookups return `Ok(None)` when nothing matches. Updates addressed by id return
//! [`AppError::NotFound`](crate::error::AppError::NotFound) when the row is missing.

pub mod memory;
pub mod sqlite;

use crate::{
    error::AppResult,
    models::{
        attendance::{AttendanceLog, LogEdit, NewAttendanceLog},
        user::{NewUser, User},
    },
};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    // --- users ---
    async fn find_user(&self, user_id: i64) -> AppResult<Option<User>>;

    async fn find_user_by_student_id(&self, student_id: &str) -> AppResult<Option<User>>;

    async fn insert_user(&self, user: NewUser) -> AppResult<User>;

    async fn set_total_hours_required(&self, user_id: i64, total: Decimal) -> AppResult<()>;

    async fn set_hours_rendered(&self, user_id: i64, hours: Decimal) -> AppResult<()>;

    // --- attendance ---
    async fn insert_log(&self, log: NewAttendanceLog) -> AppResult<AttendanceLog>;

    async fn find_log(&self, log_id: i64) -> AppResult<Option<AttendanceLog>>;

    /// Open sessions (null time_out) of a user on a day, latest time_in first.
    async fn find_open_logs(&self, user_id: i64, date: NaiveDate) -> AppResult<Vec<AttendanceLog>>;

    async fn find_log_by_time_in(
        &self,
        user_id: i64,
        date: NaiveDate,
        time_in: NaiveDateTime,
    ) -> AppResult<Option<AttendanceLog>>;

    /// Closes a session: sets time_out and remarks only.
    async fn complete_log(
        &self,
        log_id: i64,
        time_out: NaiveDateTime,
        remarks: Option<String>,
    ) -> AppResult<AttendanceLog>;

    /// Overwrites date, time_in, time_out and remarks. Status is left untouched.
    async fn update_log(&self, log_id: i64, edit: LogEdit) -> AppResult<AttendanceLog>;

    /// All logs of a user, date descending then time_in descending.
    async fn logs_for_user(&self, user_id: i64) -> AppResult<Vec<AttendanceLog>>;

    /// Deletes every attendance log and zeroes every user's `hours_rendered`,
    /// as one unit: no reader sees logs gone with hours still set, or the reverse.
    async fn clear_attendance(&self) -> AppResult<()>;
}
