//! Universal tick ↔ local calendar conversion.
//!
//! The universal tick (one unscaled minute) is the only persisted form of
//! in-world time. A [`LocalDate`] is a computed view of `(tick, config)` and
//! can be thrown away and re-derived at any time.
//!
//! # Calendar model
//!
//! Every year has twelve months of `year_length / 12` days. When the year
//! length is not divisible by twelve, the trailing days of the year are
//! clamped onto the last day of month 12 rather than redistributed.
//!
//! Arithmetic is done on 128-bit integers. Floating point is only used to
//! apply a tick multiplier other than 1.0, and the result is floored back
//! to an integer immediately. Ticks before the epoch use floor division,
//! so year 0 is the year before year 1 and every other component stays in
//! range.
//!
//! ```
//! use chronos_engine::config::TimeConfig;
//! use chronos_engine::convert::{calendar_to_ticks, ticks_to_calendar};
//!
//! let config = TimeConfig::default();
//! let date = ticks_to_calendar(1440, &config);
//! assert_eq!((date.year, date.month, date.day), (1, 1, 2));
//! assert_eq!(calendar_to_ticks(&date, &config), 1440);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::TimeConfig;
use crate::constants::{defaults, ticks, MONTHS_PER_YEAR};

/// A point in time under a specific calendar.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalDate {
    /// 1-based; zero and below are years before the epoch.
    pub year: i64,
    /// 1..=12.
    pub month: u32,
    /// 1..=days per month.
    pub day: u32,
    /// 0..day_length.
    pub hour: u32,
    /// 0..60.
    pub minute: u32,
    #[serde(rename = "epochName")]
    pub epoch_name: String,
}

impl LocalDate {
    /// First minute of the given year.
    pub fn start_of_year(year: i64, epoch_name: impl Into<String>) -> Self {
        Self {
            year,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            epoch_name: epoch_name.into(),
        }
    }

    /// True when every component is inside the bounds `config` allows.
    pub fn is_valid_for(&self, config: &TimeConfig) -> bool {
        (1..=MONTHS_PER_YEAR).contains(&self.month)
            && self.day >= 1
            && self.day as i128 <= config.days_per_month()
            && self.hour < config.day_length.get()
            && self.minute < ticks::MINUTES_PER_HOUR
    }
}

fn saturate_i64(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Apply the calendar's flow rate. Exact when the multiplier is 1.0.
fn scale_ticks(ticks: i64, multiplier: f64) -> i128 {
    if multiplier == defaults::TICK_MULTIPLIER {
        return ticks as i128;
    }
    (ticks as f64 * multiplier).floor() as i128
}

/// Convert a universal tick to a local date under `config`.
pub fn ticks_to_calendar(ticks: i64, config: &TimeConfig) -> LocalDate {
    let adjusted = scale_ticks(ticks, config.effective_multiplier());
    let per_hour = ticks::PER_HOUR as i128;
    let per_day = config.ticks_per_day();
    let per_year = config.ticks_per_year();

    let year = adjusted.div_euclid(per_year) + 1;
    let into_year = adjusted.rem_euclid(per_year);

    let day_of_year = into_year / per_day + 1;
    let into_day = into_year % per_day;

    let hour = into_day / per_hour;
    let minute = into_day % per_hour;

    let days_per_month = config.days_per_month();
    let month = ((day_of_year - 1) / days_per_month + 1).min(MONTHS_PER_YEAR as i128);
    let day = ((day_of_year - 1) % days_per_month + 1).min(days_per_month);

    LocalDate {
        year: saturate_i64(year),
        month: month as u32,
        day: day as u32,
        hour: hour as u32,
        minute: minute as u32,
        epoch_name: config.epoch_name.clone(),
    }
}

/// Convert a local date back to a universal tick under `config`.
///
/// No clamping is applied to the date's components. The result is floored
/// and saturates at the `i64` bounds.
pub fn calendar_to_ticks(date: &LocalDate, config: &TimeConfig) -> i64 {
    let per_day = config.ticks_per_day();

    let year_ticks = (date.year as i128 - 1).saturating_mul(config.ticks_per_year());
    let month_ticks = (date.month as i128 - 1) * config.days_per_month() * per_day;
    let day_ticks = (date.day as i128 - 1) * per_day;
    let hour_ticks = date.hour as i128 * ticks::PER_HOUR as i128;
    let minute_ticks = date.minute as i128;

    let total = year_ticks
        .saturating_add(month_ticks)
        .saturating_add(day_ticks)
        .saturating_add(hour_ticks)
        .saturating_add(minute_ticks);

    let multiplier = config.effective_multiplier();
    if multiplier == defaults::TICK_MULTIPLIER {
        return saturate_i64(total);
    }
    saturate_i64((total as f64 / multiplier).floor() as i128)
}
