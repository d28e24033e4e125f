use chrono::{DateTime, NaiveDate, Utc};

pub struct TimeUtils;

impl TimeUtils {
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";
}

/// Used for display purposes
pub fn format_date(date: NaiveDate) -> String {
    date.format(TimeUtils::STANDARD_TIME_FORMAT).to_string()
}

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Renders a bar count as a compact session duration, e.g. `12d`.
pub fn format_sessions(bars: usize) -> String {
    format!("{}d", bars)
}
