pub mod payments;
pub mod penalty;
pub mod schedule;

use chrono::NaiveDate;

/// Calendar date used when neither `--today` nor the request names one.
pub(crate) fn today_or_local(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| chrono::Local::now().date_naive())
}
