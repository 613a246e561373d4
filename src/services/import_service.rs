// src/services/import_service.rs
use crate::{
    error::{AppError, AppResult},
    models::attendance::NewAttendanceLog,
    services::{aggregator, datetime_parse, time_rule},
    state::UserLocks,
    store::AttendanceStore,
};
use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use std::{path::Path, sync::Arc};

// Column layout of a DTR sheet
const COL_DATE: usize = 0;
const COL_AM_IN: usize = 1;
const COL_AM_OUT: usize = 2;
const COL_PM_IN: usize = 3;
const COL_PM_OUT: usize = 4;
const COL_REMARKS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HalfDay {
    Am,
    Pm,
}

/// What happened to one half-day pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted,
    /// An open row with the same time_in was closed.
    Completed,
    /// A closed row with the same time_in already exists.
    AlreadyRecorded,
    Skipped,
}

impl MergeOutcome {
    fn counts(self) -> bool {
        matches!(self, MergeOutcome::Inserted | MergeOutcome::Completed)
    }
}

/// Reads an uploaded sheet into rows of text cells (header included).
pub fn parse_table(bytes: &[u8]) -> AppResult<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| AppError::InvalidImportFile(e.to_string()))
        })
        .collect()
}

/// Rejects anything that is not named `*.csv`.
pub fn check_extension(filename: &str) -> AppResult<()> {
    let is_csv = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Ok(())
    } else {
        Err(AppError::InvalidImportFile(format!(
            "'{}' is not a .csv file",
            filename
        )))
    }
}

fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(|c| c.trim()).unwrap_or("")
}

/// Merges DTR sheets into a user's attendance without duplicating rows.
///
/// Each data row carries an AM and a PM pair. A pair is matched against the
/// existing logs by (user, date, time_in): an open match gets closed, a closed
/// match is left alone, no match inserts a closed row. Re-importing the same
/// sheet therefore changes nothing.
#[derive(Clone)]
pub struct ImportReconciler {
    store: Arc<dyn AttendanceStore>,
    locks: UserLocks,
}

impl ImportReconciler {
    pub fn new(store: Arc<dyn AttendanceStore>, locks: UserLocks) -> Self {
        Self { store, locks }
    }

    /// Validates and parses an upload, then imports it. Returns the number of
    /// half-days inserted or completed.
    pub async fn import_csv(
        &self,
        user_id: i64,
        filename: &str,
        bytes: &[u8],
    ) -> AppResult<usize> {
        check_extension(filename)?;
        let rows = parse_table(bytes)?;
        tracing::info!(
            "Importing '{}' for user {} ({} rows incl. header).",
            filename,
            user_id,
            rows.len()
        );
        self.import_rows(user_id, &rows).await
    }

    /// Imports an already-parsed table. The first row is the header and is ignored.
    ///
    /// Rows are committed one by one; a store failure stops the import but keeps
    /// what was written before it.
    pub async fn import_rows(&self, user_id: i64, rows: &[Vec<String>]) -> AppResult<usize> {
        if self.store.find_user(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("user {}", user_id)));
        }
        let _guard = self.locks.acquire(user_id).await;

        let mut count = 0;
        for (line, row) in rows.iter().enumerate().skip(1) {
            if row.len() < 2 {
                continue;
            }

            let Some(date) = datetime_parse::parse_date(cell(row, COL_DATE)) else {
                tracing::warn!(
                    "Line {}: unreadable date '{}', row skipped.",
                    line + 1,
                    cell(row, COL_DATE)
                );
                continue;
            };
            let remarks = cell(row, COL_REMARKS);

            let pairs = [
                (cell(row, COL_AM_IN), cell(row, COL_AM_OUT), HalfDay::Am),
                (cell(row, COL_PM_IN), cell(row, COL_PM_OUT), HalfDay::Pm),
            ];
            for (in_cell, out_cell, half) in pairs {
                let outcome = self
                    .merge_half_day(user_id, date, in_cell, out_cell, remarks, half)
                    .await?;
                tracing::debug!("Line {} {:?}: {:?}", line + 1, half, outcome);
                if outcome.counts() {
                    count += 1;
                }
            }
        }

        aggregator::recompute(self.store.as_ref(), user_id).await?;
        tracing::info!("{} records imported for user {}.", count, user_id);
        Ok(count)
    }

    async fn merge_half_day(
        &self,
        user_id: i64,
        date: NaiveDate,
        in_cell: &str,
        out_cell: &str,
        remarks: &str,
        half: HalfDay,
    ) -> AppResult<MergeOutcome> {
        if in_cell.is_empty() || out_cell.is_empty() {
            return Ok(MergeOutcome::Skipped);
        }

        let (Some(time_in), Some(time_out)) = (
            half_day_timestamp(date, in_cell, half),
            half_day_timestamp(date, out_cell, half),
        ) else {
            tracing::warn!(
                "Unreadable {:?} times '{}' / '{}' on {}, pair skipped.",
                half,
                in_cell,
                out_cell,
                date
            );
            return Ok(MergeOutcome::Skipped);
        };

        let remarks = (!remarks.is_empty()).then(|| remarks.to_string());

        match self.store.find_log_by_time_in(user_id, date, time_in).await? {
            Some(existing) if existing.is_open() => {
                self.store.complete_log(existing.id, time_out, remarks).await?;
                Ok(MergeOutcome::Completed)
            }
            Some(_) => Ok(MergeOutcome::AlreadyRecorded),
            None => {
                self.store
                    .insert_log(NewAttendanceLog {
                        user_id,
                        date,
                        time_in,
                        time_out: Some(time_out),
                        status: time_rule::classify(time_in),
                        remarks,
                    })
                    .await?;
                Ok(MergeOutcome::Inserted)
            }
        }
    }
}

/// `date` + time cell; PM cells written on a 12-hour clock ("1:00") move to the afternoon.
fn half_day_timestamp(date: NaiveDate, raw: &str, half: HalfDay) -> Option<NaiveDateTime> {
    let ts = date.and_time(datetime_parse::parse_time_of_day(raw)?);
    if half == HalfDay::Pm && ts.hour() < 12 {
        Some(ts + Duration::hours(12))
    } else {
        Some(ts)
    }
}
