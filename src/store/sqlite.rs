// src/store/sqlite.rs
use crate::{
    error::{AppError, AppResult},
    models::{
        attendance::{AttendanceLog, LogEdit, NewAttendanceLog},
        user::{NewUser, User, UserRow},
    },
    store::AttendanceStore,
};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::SqlitePool;

const USER_COLUMNS: &str =
    "id, student_id, name, password_hash, total_hours_required, hours_rendered";
const LOG_COLUMNS: &str = "id, user_id, date, time_in, time_out, status, remarks";

/// `AttendanceStore` backed by the SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }
}

fn log_not_found(log_id: i64) -> AppError {
    AppError::NotFound(format!("attendance log {}", log_id))
}

#[async_trait]
impl AttendanceStore for SqliteStore {
    async fn find_user(&self, user_id: i64) -> AppResult<Option<User>> {
        tracing::debug!("Looking up user by id: {}", user_id);
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(user_id)
        .fetch_optional(&self.db_pool)
        .await?;
        row.map(User::try_from).transpose()
    }

    async fn find_user_by_student_id(&self, student_id: &str) -> AppResult<Option<User>> {
        tracing::debug!("Looking up user by student id: {}", student_id);
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE student_id = ?1"
        ))
        .bind(student_id)
        .fetch_optional(&self.db_pool)
        .await?;
        row.map(User::try_from).transpose()
    }

    async fn insert_user(&self, user: NewUser) -> AppResult<User> {
        let result = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (student_id, name, password_hash, total_hours_required, hours_rendered)
            VALUES (?1, ?2, ?3, ?4, '0')
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.student_id)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.total_hours_required.to_string())
        .fetch_one(&self.db_pool)
        .await;

        // UNIQUE constraint codes in SQLite
        if let Err(sqlx::Error::Database(db_err)) = &result {
            if db_err.code().map_or(false, |c| c == "19" || c == "2067" || c == "1555") {
                tracing::warn!("Student id '{}' already exists.", user.student_id);
                return Err(AppError::InvalidInput(format!(
                    "student id '{}' already exists",
                    user.student_id
                )));
            }
        }
        User::try_from(result?)
    }

    async fn set_total_hours_required(&self, user_id: i64, total: Decimal) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET total_hours_required = ?1 WHERE id = ?2")
            .bind(total.to_string())
            .bind(user_id)
            .execute(&self.db_pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user {}", user_id)));
        }
        Ok(())
    }

    async fn set_hours_rendered(&self, user_id: i64, hours: Decimal) -> AppResult<()> {
        let result = sqlx::query("UPDATE users SET hours_rendered = ?1 WHERE id = ?2")
            .bind(hours.to_string())
            .bind(user_id)
            .execute(&self.db_pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("user {}", user_id)));
        }
        Ok(())
    }

    async fn insert_log(&self, log: NewAttendanceLog) -> AppResult<AttendanceLog> {
        let created = sqlx::query_as::<_, AttendanceLog>(&format!(
            r#"
            INSERT INTO attendance (user_id, date, time_in, time_out, status, remarks)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {LOG_COLUMNS}
            "#
        ))
        .bind(log.user_id)
        .bind(log.date)
        .bind(log.time_in)
        .bind(log.time_out)
        .bind(log.status)
        .bind(log.remarks)
        .fetch_one(&self.db_pool)
        .await?;
        Ok(created)
    }

    async fn find_log(&self, log_id: i64) -> AppResult<Option<AttendanceLog>> {
        let log = sqlx::query_as::<_, AttendanceLog>(&format!(
            "SELECT {LOG_COLUMNS} FROM attendance WHERE id = ?1"
        ))
        .bind(log_id)
        .fetch_optional(&self.db_pool)
        .await?;
        Ok(log)
    }

    async fn find_open_logs(&self, user_id: i64, date: NaiveDate) -> AppResult<Vec<AttendanceLog>> {
        let logs = sqlx::query_as::<_, AttendanceLog>(&format!(
            r#"
            SELECT {LOG_COLUMNS} FROM attendance
            WHERE user_id = ?1 AND date = ?2 AND time_out IS NULL
            ORDER BY time_in DESC, id DESC
            "#
        ))
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.db_pool)
        .await?;
        Ok(logs)
    }

    async fn find_log_by_time_in(
        &self,
        user_id: i64,
        date: NaiveDate,
        time_in: NaiveDateTime,
    ) -> AppResult<Option<AttendanceLog>> {
        let log = sqlx::query_as::<_, AttendanceLog>(&format!(
            r#"
            SELECT {LOG_COLUMNS} FROM attendance
            WHERE user_id = ?1 AND date = ?2 AND time_in = ?3
            ORDER BY id ASC
            LIMIT 1
            "#
        ))
        .bind(user_id)
        .bind(date)
        .bind(time_in)
        .fetch_optional(&self.db_pool)
        .await?;
        Ok(log)
    }

    async fn complete_log(
        &self,
        log_id: i64,
        time_out: NaiveDateTime,
        remarks: Option<String>,
    ) -> AppResult<AttendanceLog> {
        sqlx::query_as::<_, AttendanceLog>(&format!(
            "UPDATE attendance SET time_out = ?1, remarks = ?2 WHERE id = ?3 RETURNING {LOG_COLUMNS}"
        ))
        .bind(time_out)
        .bind(remarks)
        .bind(log_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| log_not_found(log_id))
    }

    async fn update_log(&self, log_id: i64, edit: LogEdit) -> AppResult<AttendanceLog> {
        sqlx::query_as::<_, AttendanceLog>(&format!(
            r#"
            UPDATE attendance
            SET date = ?1, time_in = ?2, time_out = ?3, remarks = ?4
            WHERE id = ?5
            RETURNING {LOG_COLUMNS}
            "#
        ))
        .bind(edit.date)
        .bind(edit.time_in)
        .bind(edit.time_out)
        .bind(edit.remarks)
        .bind(log_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| log_not_found(log_id))
    }

    async fn logs_for_user(&self, user_id: i64) -> AppResult<Vec<AttendanceLog>> {
        let logs = sqlx::query_as::<_, AttendanceLog>(&format!(
            r#"
            SELECT {LOG_COLUMNS} FROM attendance
            WHERE user_id = ?1
            ORDER BY date DESC, time_in DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await?;
        tracing::debug!("Found {} logs for user {}.", logs.len(), user_id);
        Ok(logs)
    }

    async fn clear_attendance(&self) -> AppResult<()> {
        let mut tx = self.db_pool.begin().await?;
        let result = sqlx::query("DELETE FROM attendance")
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE users SET hours_rendered = '0'")
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        tracing::info!("Deleted {} attendance logs.", result.rows_affected());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db, models::attendance::AttendanceStatus};
    use chrono::NaiveTime;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_store() -> SqliteStore {
        // A single connection, otherwise every pooled connection gets its own memory db
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::run_migrations(&pool).await.unwrap();
        SqliteStore::new(pool)
    }

    fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    async fn seed_user(store: &SqliteStore) -> User {
        store
            .insert_user(NewUser {
                student_id: "2001501".into(),
                name: "Test Trainee".into(),
                password_hash: "x".into(),
                total_hours_required: dec!(386.00),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_user_decimals_survive_text_columns() {
        let store = setup_store().await;
        let user = seed_user(&store).await;
        store.set_hours_rendered(user.id, dec!(12.75)).await.unwrap();

        let found = store.find_user_by_student_id("2001501").await.unwrap().unwrap();
        assert_eq!(found.total_hours_required, dec!(386.00));
        assert_eq!(found.hours_rendered, dec!(12.75));

        let dup = store
            .insert_user(NewUser {
                student_id: "2001501".into(),
                name: "Again".into(),
                password_hash: "y".into(),
                total_hours_required: dec!(1),
            })
            .await;
        assert!(matches!(dup, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_open_session_and_time_in_lookup() {
        let store = setup_store().await;
        let user = seed_user(&store).await;
        let day = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();

        let first = store
            .insert_log(NewAttendanceLog {
                user_id: user.id,
                date: day,
                time_in: at(day, 8, 5),
                time_out: None,
                status: AttendanceStatus::Late,
                remarks: None,
            })
            .await
            .unwrap();
        store
            .insert_log(NewAttendanceLog {
                user_id: user.id,
                date: day,
                time_in: at(day, 13, 0),
                time_out: Some(at(day, 17, 0)),
                status: AttendanceStatus::Present,
                remarks: Some("ok".into()),
            })
            .await
            .unwrap();

        let open = store.find_open_logs(user.id, day).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, first.id);
        assert_eq!(open[0].status, AttendanceStatus::Late);

        let by_time = store
            .find_log_by_time_in(user.id, day, at(day, 13, 0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_time.time_out, Some(at(day, 17, 0)));

        let closed = store
            .complete_log(first.id, at(day, 12, 0), Some("Task done".into()))
            .await
            .unwrap();
        assert_eq!(closed.time_out, Some(at(day, 12, 0)));
        assert!(store.find_open_logs(user.id, day).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_rows_are_not_found() {
        let store = setup_store().await;
        let day = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();

        let edit = LogEdit {
            date: day,
            time_in: at(day, 8, 0),
            time_out: None,
            remarks: None,
        };
        assert!(matches!(store.update_log(99, edit).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            store.set_hours_rendered(99, dec!(1)).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_logs_ordered_by_date_descending() {
        let store = setup_store().await;
        let user = seed_user(&store).await;
        for d in [3, 1, 2] {
            let day = NaiveDate::from_ymd_opt(2026, 2, d).unwrap();
            store
                .insert_log(NewAttendanceLog {
                    user_id: user.id,
                    date: day,
                    time_in: at(day, 8, 0),
                    time_out: Some(at(day, 12, 0)),
                    status: AttendanceStatus::Present,
                    remarks: None,
                })
                .await
                .unwrap();
        }

        let days: Vec<u32> = store
            .logs_for_user(user.id)
            .await
            .unwrap()
            .iter()
            .map(|l| chrono::Datelike::day(&l.date))
            .collect();
        assert_eq!(days, vec![3, 2, 1]);

        store.set_hours_rendered(user.id, dec!(12)).await.unwrap();
        store.clear_attendance().await.unwrap();
        assert!(store.logs_for_user(user.id).await.unwrap().is_empty());
        let user = store.find_user(user.id).await.unwrap().unwrap();
        assert!(user.hours_rendered.is_zero());
    }
}
