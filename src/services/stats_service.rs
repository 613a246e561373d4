// src/services/stats_service.rs
use crate::{
    error::{AppError, AppResult},
    models::attendance::{AttendanceLog, AttendanceStatus, StatsView},
    store::AttendanceStore,
};
use rust_decimal::Decimal;

/// Progress of a user towards the required hours.
pub async fn stats(store: &dyn AttendanceStore, user_id: i64) -> AppResult<StatsView> {
    let user = store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))?;

    let total_lates = store
        .logs_for_user(user_id)
        .await?
        .iter()
        .filter(|log| log.status == AttendanceStatus::Late)
        .count();

    let remaining = user.total_hours_required - user.hours_rendered;
    // No requirement configured yet: report 0% instead of dividing by zero
    let percentage = if user.total_hours_required.is_zero() {
        Decimal::ZERO
    } else {
        (user.hours_rendered / user.total_hours_required * Decimal::ONE_HUNDRED).round_dp(2)
    };

    Ok(StatsView {
        user,
        remaining,
        percentage,
        total_lates,
    })
}

/// All logs of a user, newest date first.
pub async fn logs(store: &dyn AttendanceStore, user_id: i64) -> AppResult<Vec<AttendanceLog>> {
    if store.find_user(user_id).await?.is_none() {
        return Err(AppError::NotFound(format!("user {}", user_id)));
    }
    store.logs_for_user(user_id).await
}
