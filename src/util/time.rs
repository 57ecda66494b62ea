use chrono::{DateTime, Local, NaiveDate};

/// Current local time
pub fn now() -> DateTime<Local> {
    Local::now()
}

/// Today's calendar date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Epoch milliseconds, the timestamp unit of `createdAt`/`completedAt`
pub fn millis(at: DateTime<Local>) -> i64 {
    at.timestamp_millis()
}

/// `YYYY-MM-DD`, used in suggested file names
pub fn date_stamp(at: DateTime<Local>) -> String {
    at.format("%Y-%m-%d").to_string()
}
