mod maths_utils;
mod perf;
mod time_utils;

pub use time_utils::{TimeUtils, format_date, format_sessions, now_utc};

pub(crate) use maths_utils::{
    ema, finite, linreg_last_value, pct_of, rolling_apply, rolling_mean, rolling_std_dev,
};
