// src/store/memory.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        attendance::{AttendanceLog, LogEdit, NewAttendanceLog},
        user::{NewUser, User},
    },
    store::AttendanceStore,
};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    attendance: Vec<AttendanceLog>,
    next_user_id: i64,
    next_log_id: i64,
}

/// In-process store, mainly a test double for the SQLite adapter.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_latest_first(logs: &mut [AttendanceLog]) {
    logs.sort_by(|a, b| b.date.cmp(&a.date).then(b.time_in.cmp(&a.time_in)));
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn find_user(&self, user_id: i64) -> AppResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn find_user_by_student_id(&self, student_id: &str) -> AppResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.student_id == student_id)
            .cloned())
    }

    async fn insert_user(&self, user: NewUser) -> AppResult<User> {
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|u| u.student_id == user.student_id) {
            return Err(AppError::InvalidInput(format!(
                "student id '{}' already exists",
                user.student_id
            )));
        }
        tables.next_user_id += 1;
        let created = User {
            id: tables.next_user_id,
            student_id: user.student_id,
            name: user.name,
            password_hash: user.password_hash,
            total_hours_required: user.total_hours_required,
            hours_rendered: Decimal::ZERO,
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn set_total_hours_required(&self, user_id: i64, total: Decimal) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;
        user.total_hours_required = total;
        Ok(())
    }

    async fn set_hours_rendered(&self, user_id: i64, hours: Decimal) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;
        user.hours_rendered = hours;
        Ok(())
    }

    async fn insert_log(&self, log: NewAttendanceLog) -> AppResult<AttendanceLog> {
        let mut tables = self.tables.lock().await;
        tables.next_log_id += 1;
        let created = AttendanceLog {
            id: tables.next_log_id,
            user_id: log.user_id,
            date: log.date,
            time_in: log.time_in,
            time_out: log.time_out,
            status: log.status,
            remarks: log.remarks,
        };
        tables.attendance.push(created.clone());
        Ok(created)
    }

    async fn find_log(&self, log_id: i64) -> AppResult<Option<AttendanceLog>> {
        let tables = self.tables.lock().await;
        Ok(tables.attendance.iter().find(|l| l.id == log_id).cloned())
    }

    async fn find_open_logs(&self, user_id: i64, date: NaiveDate) -> AppResult<Vec<AttendanceLog>> {
        let tables = self.tables.lock().await;
        let mut open: Vec<AttendanceLog> = tables
            .attendance
            .iter()
            .filter(|l| l.user_id == user_id && l.date == date && l.is_open())
            .cloned()
            .collect();
        sort_latest_first(&mut open);
        Ok(open)
    }

    async fn find_log_by_time_in(
        &self,
        user_id: i64,
        date: NaiveDate,
        time_in: NaiveDateTime,
    ) -> AppResult<Option<AttendanceLog>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .attendance
            .iter()
            .find(|l| l.user_id == user_id && l.date == date && l.time_in == time_in)
            .cloned())
    }

    async fn complete_log(
        &self,
        log_id: i64,
        time_out: NaiveDateTime,
        remarks: Option<String>,
    ) -> AppResult<AttendanceLog> {
        let mut tables = self.tables.lock().await;
        let log = tables
            .attendance
            .iter_mut()
            .find(|l| l.id == log_id)
            .ok_or_else(|| AppError::NotFound(format!("attendance log {}", log_id)))?;
        log.time_out = Some(time_out);
        log.remarks = remarks;
        Ok(log.clone())
    }

    async fn update_log(&self, log_id: i64, edit: LogEdit) -> AppResult<AttendanceLog> {
        let mut tables = self.tables.lock().await;
        let log = tables
            .attendance
            .iter_mut()
            .find(|l| l.id == log_id)
            .ok_or_else(|| AppError::NotFound(format!("attendance log {}", log_id)))?;
        log.date = edit.date;
        log.time_in = edit.time_in;
        log.time_out = edit.time_out;
        log.remarks = edit.remarks;
        Ok(log.clone())
    }

    async fn logs_for_user(&self, user_id: i64) -> AppResult<Vec<AttendanceLog>> {
        let tables = self.tables.lock().await;
        let mut logs: Vec<AttendanceLog> = tables
            .attendance
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        sort_latest_first(&mut logs);
        Ok(logs)
    }

    async fn clear_attendance(&self) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        tables.attendance.clear();
        for user in tables.users.iter_mut() {
            user.hours_rendered = Decimal::ZERO;
        }
        Ok(())
    }
}
