// src/services/hours.rs
use crate::models::attendance::AttendanceLog;
use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};

const SECONDS_PER_HOUR: i64 = 3600;

/// Hours between two timestamps, rounded half-up to 2 decimals.
/// The difference is taken in absolute value, so a reversed pair still counts.
pub fn elapsed(time_in: NaiveDateTime, time_out: NaiveDateTime) -> Decimal {
    let seconds = (time_out - time_in).num_seconds().abs();
    (Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum of `elapsed` over closed logs; open sessions add nothing.
pub fn aggregate<'a, I>(logs: I) -> Decimal
where
    I: IntoIterator<Item = &'a AttendanceLog>,
{
    logs.into_iter()
        .filter_map(|log| log.time_out.map(|out| elapsed(log.time_in, out)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::AttendanceStatus;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 10)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn log(id: i64, time_in: NaiveDateTime, time_out: Option<NaiveDateTime>) -> AttendanceLog {
        AttendanceLog {
            id,
            user_id: 1,
            date: time_in.date(),
            time_in,
            time_out,
            status: AttendanceStatus::Present,
            remarks: None,
        }
    }

    #[test]
    fn test_elapsed_is_symmetric() {
        assert_eq!(elapsed(at(9, 0, 0), at(17, 30, 0)), dec!(8.5));
        assert_eq!(elapsed(at(17, 30, 0), at(9, 0, 0)), dec!(8.5));
    }

    #[test]
    fn test_elapsed_rounds_half_up() {
        // 18 seconds = 0.005h exactly
        assert_eq!(elapsed(at(8, 0, 0), at(8, 0, 18)), dec!(0.01));
        // 17 seconds = 0.00472h
        assert_eq!(elapsed(at(8, 0, 0), at(8, 0, 17)), dec!(0.00));
        // 20 minutes = 0.3333h
        assert_eq!(elapsed(at(8, 0, 0), at(8, 20, 0)), dec!(0.33));
    }

    #[test]
    fn test_aggregate_skips_open_logs() {
        assert_eq!(aggregate(&Vec::<AttendanceLog>::new()), Decimal::ZERO);

        let logs = vec![
            log(1, at(8, 0, 0), Some(at(12, 0, 0))),
            log(2, at(13, 0, 0), Some(at(17, 20, 0))),
            log(3, at(18, 0, 0), None),
        ];
        assert_eq!(aggregate(&logs), dec!(8.33));
        assert_eq!(aggregate(&logs[2..]), Decimal::ZERO);
    }
}
