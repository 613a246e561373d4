// src/services/session_service.rs
use crate::{
    error::{AppError, AppResult},
    models::attendance::{AttendanceLog, ClockOutOutcome, LogEdit, NewAttendanceLog},
    services::{aggregator, hours, time_rule},
    state::UserLocks,
    store::AttendanceStore,
};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

/// Remarks written on clock-out when neither the caller nor the row has any.
pub const DEFAULT_REMARKS: &str = "Task done";

/// A clock-in request after defaults (today / now) have been applied.
#[derive(Debug, Clone)]
pub struct ClockIn {
    pub user_id: i64,
    pub date: NaiveDate,
    pub time_in: NaiveDateTime,
    /// When present the entry is recorded already closed.
    pub time_out: Option<NaiveDateTime>,
}

/// Picks the remarks for a closing session.
///
/// Precedence:
/// 1. remarks supplied by the caller, if not blank
/// 2. remarks already on the row, if not blank
/// 3. [`DEFAULT_REMARKS`]
pub fn resolve_remarks(supplied: Option<&str>, existing: Option<&str>) -> String {
    let non_blank: fn(Option<&str>) -> Option<&str> = |value| value.filter(|v| !v.trim().is_empty());

    if let Some(caller) = non_blank(supplied) {
        return caller.to_string();
    }
    if let Some(stored) = non_blank(existing) {
        return stored.to_string();
    }
    DEFAULT_REMARKS.to_string()
}

/// Clock-in / clock-out / edit / reset for attendance sessions.
///
/// Invariant: at most one open session (null time_out) per user per day is
/// created through `clock_in`. Each operation that changes a user's logs ends
/// with a full recompute of that user's `hours_rendered`.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn AttendanceStore>,
    locks: UserLocks,
}

impl SessionManager {
    pub fn new(store: Arc<dyn AttendanceStore>, locks: UserLocks) -> Self {
        Self { store, locks }
    }

    async fn require_user(&self, user_id: i64) -> AppResult<()> {
        match self.store.find_user(user_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("user {}", user_id))),
        }
    }

    pub async fn clock_in(&self, request: ClockIn) -> AppResult<AttendanceLog> {
        self.require_user(request.user_id).await?;
        let _guard = self.locks.acquire(request.user_id).await;

        // A complete entry skips the open-session check
        if request.time_out.is_none() {
            let open = self
                .store
                .find_open_logs(request.user_id, request.date)
                .await?;
            if !open.is_empty() {
                tracing::debug!(
                    "User {} already has an open session on {}.",
                    request.user_id,
                    request.date
                );
                return Err(AppError::AlreadyClockedIn);
            }
        }

        let status = time_rule::classify(request.time_in);
        let log = self
            .store
            .insert_log(NewAttendanceLog {
                user_id: request.user_id,
                date: request.date,
                time_in: request.time_in,
                time_out: request.time_out,
                status,
                remarks: None,
            })
            .await?;
        tracing::info!(
            "Clock-in for user {} at {} ({:?}).",
            request.user_id,
            request.time_in,
            status
        );

        if log.time_out.is_some() {
            aggregator::recompute(self.store.as_ref(), request.user_id).await?;
        }
        Ok(log)
    }

    /// Closes the latest open session of `now`'s day, stamping `now` as time_out.
    pub async fn clock_out(
        &self,
        user_id: i64,
        now: NaiveDateTime,
        remarks: Option<&str>,
    ) -> AppResult<ClockOutOutcome> {
        self.require_user(user_id).await?;
        let _guard = self.locks.acquire(user_id).await;

        // Store returns open sessions latest time_in first
        let active = self
            .store
            .find_open_logs(user_id, now.date())
            .await?
            .into_iter()
            .next()
            .ok_or(AppError::NoActiveSession)?;

        let hours_added = hours::elapsed(active.time_in, now);
        let remarks = resolve_remarks(remarks, active.remarks.as_deref());
        let log = self
            .store
            .complete_log(active.id, now, Some(remarks))
            .await?;
        tracing::info!(
            "Clock-out for user {} on log {}: {} hours.",
            user_id,
            log.id,
            hours_added
        );

        aggregator::recompute(self.store.as_ref(), user_id).await?;
        Ok(ClockOutOutcome { log, hours_added })
    }

    /// Overwrites date, time_in, time_out and remarks of a log.
    /// The status keeps the value classified at creation.
    pub async fn edit_log(
        &self,
        log_id: i64,
        user_id: i64,
        edit: LogEdit,
    ) -> AppResult<AttendanceLog> {
        let _guard = self.locks.acquire(user_id).await;

        let existing = self
            .store
            .find_log(log_id)
            .await?
            .filter(|log| log.user_id == user_id)
            .ok_or_else(|| {
                AppError::NotFound(format!("attendance log {} for user {}", log_id, user_id))
            })?;

        let log = self.store.update_log(existing.id, edit).await?;
        tracing::info!("Edited log {} of user {}.", log.id, user_id);

        aggregator::recompute(self.store.as_ref(), user_id).await?;
        Ok(log)
    }

    /// Deletes every attendance log and zeroes every user's rendered hours.
    ///
    /// Takes no per-user lock: the store clears both tables in one call, so a
    /// concurrent recompute either runs before (and is wiped) or after (and
    /// sees only the logs written since).
    pub async fn reset_all(&self) -> AppResult<()> {
        self.store.clear_attendance().await?;
        tracing::info!("All attendance logs deleted and hours reset.");
        Ok(())
    }
}
