use chrono::{Datelike, Days, NaiveDate};

use crate::error::LoanScheduleError;
use crate::LoanScheduleResult;

/// Number of days in `month` of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Shift `date` forward by `months` calendar months.
///
/// If the day does not exist in the target month (e.g. Jan 31 + 1 month),
/// it is clamped to the last day of that month.
pub fn add_months_clamped(date: NaiveDate, months: u32) -> LoanScheduleResult<NaiveDate> {
    let total_months = i64::from(date.year()) * 12 + i64::from(date.month0()) + i64::from(months);
    let year = i32::try_from(total_months.div_euclid(12))
        .map_err(|_| LoanScheduleError::DateOverflow(format!("{date} + {months} months")))?;
    let month = total_months.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| LoanScheduleError::DateOverflow(format!("{date} + {months} months")))
}

/// `date` plus a fixed number of days.
pub fn add_days(date: NaiveDate, days: u64) -> LoanScheduleResult<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| LoanScheduleError::DateOverflow(format!("{date} + {days} days")))
}

/// Whole days from `from` to `to` (negative when `to` is earlier).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}
