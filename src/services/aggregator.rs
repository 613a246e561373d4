// src/services/aggregator.rs
use crate::{error::AppResult, services::hours, store::AttendanceStore};
use rust_decimal::Decimal;

/// Recomputes a user's `hours_rendered` from the full log and stores it.
/// Always a full scan; returns the new total.
pub async fn recompute(store: &dyn AttendanceStore, user_id: i64) -> AppResult<Decimal> {
    let logs = store.logs_for_user(user_id).await?;
    let total = hours::aggregate(&logs);
    store.set_hours_rendered(user_id, total).await?;
    tracing::debug!(
        "Recomputed hours for user {}: {} over {} logs.",
        user_id,
        total,
        logs.len()
    );
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::{
            attendance::{AttendanceStatus, NewAttendanceLog},
            user::NewUser,
        },
        store::MemoryStore,
    };
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_recompute_overwrites_stale_total() {
        let store = MemoryStore::new();
        let user = store
            .insert_user(NewUser {
                student_id: "s1".into(),
                name: "Trainee".into(),
                password_hash: String::new(),
                total_hours_required: dec!(100),
            })
            .await
            .unwrap();
        store.set_hours_rendered(user.id, dec!(999)).await.unwrap();

        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        for (h_in, h_out) in [(8, Some(12)), (13, Some(17)), (18, None)] {
            store
                .insert_log(NewAttendanceLog {
                    user_id: user.id,
                    date: day,
                    time_in: day.and_hms_opt(h_in, 0, 0).unwrap(),
                    time_out: h_out.map(|h| day.and_hms_opt(h, 0, 0).unwrap()),
                    status: AttendanceStatus::Present,
                    remarks: None,
                })
                .await
                .unwrap();
        }

        assert_eq!(recompute(&store, user.id).await.unwrap(), dec!(8));
        let stored = store.find_user(user.id).await.unwrap().unwrap();
        assert_eq!(stored.hours_rendered, dec!(8));
    }

    #[tokio::test]
    async fn test_recompute_unknown_user() {
        let store = MemoryStore::new();
        assert!(matches!(recompute(&store, 42).await, Err(AppError::NotFound(_))));
    }
}
