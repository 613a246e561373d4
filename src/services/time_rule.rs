// src/services/time_rule.rs
use crate::models::attendance::AttendanceStatus;
use chrono::{NaiveDateTime, Timelike};

/// Classifies a clock-in by its hour and minute only.
///
/// Before noon the AM cutoff applies (08:00:59 is the last on-time second),
/// from noon on the PM cutoff applies (13:00:59). There are no other shifts,
/// so an evening clock-in is always judged against the PM cutoff.
pub fn classify(time_in: NaiveDateTime) -> AttendanceStatus {
    let (h, m) = (time_in.hour(), time_in.minute());

    let is_late = if h < 12 {
        h > 8 || (h == 8 && m >= 1)
    } else {
        h > 13 || (h == 13 && m >= 1)
    };

    if is_late {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    }
}
