//! Display formatting for local dates and raw universal ticks.
//!
//! Pure presentation: no calendar logic lives here.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::month_name;
use crate::convert::LocalDate;

/// Rendering mode for [`format_local_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// `CE 12, Mar 4, 09:05`
    #[default]
    Full,
    /// `12/3/4`
    Short,
    /// `Mar 4, CE 12`
    Date,
    /// `09:05`
    Time,
    /// `CE 12`
    Epoch,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown date format '{0}'")]
pub struct UnknownDateFormat(pub String);

impl FromStr for DateFormat {
    type Err = UnknownDateFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "full" => Ok(Self::Full),
            "short" => Ok(Self::Short),
            "date" => Ok(Self::Date),
            "time" => Ok(Self::Time),
            "epoch" => Ok(Self::Epoch),
            other => Err(UnknownDateFormat(other.to_string())),
        }
    }
}

/// Month abbreviation, or the bare number for an out-of-range month.
fn month_label(month: u32) -> Cow<'static, str> {
    match month_name(month) {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(month.to_string()),
    }
}

/// Render a local date in the given mode. Hours and minutes are zero-padded.
pub fn format_local_date(date: &LocalDate, mode: DateFormat) -> String {
    match mode {
        DateFormat::Full => format!(
            "{} {}, {} {}, {:02}:{:02}",
            date.epoch_name,
            date.year,
            month_label(date.month),
            date.day,
            date.hour,
            date.minute
        ),
        DateFormat::Short => format!("{}/{}/{}", date.year, date.month, date.day),
        DateFormat::Date => format!(
            "{} {}, {} {}",
            month_label(date.month),
            date.day,
            date.epoch_name,
            date.year
        ),
        DateFormat::Time => format!("{:02}:{:02}", date.hour, date.minute),
        DateFormat::Epoch => format!("{} {}", date.epoch_name, date.year),
    }
}

impl fmt::Display for LocalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_local_date(self, DateFormat::Full))
    }
}

/// Insert comma separators every three digits.
fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Fixed-point rendering that rounds ties away from zero.
///
/// `{:.N}` alone rounds an exact tie like `1.25` to even.
fn to_fixed(value: f64, digits: u32) -> String {
    let scale = 10f64.powi(digits as i32);
    format!("{:.*}", digits as usize, (value * scale).round() / scale)
}

/// Compact rendering of a raw tick count: `1.50M`, `2.3K`, `500`.
pub fn format_universal_tick(ticks: i64) -> String {
    let value = ticks as f64;
    if value >= 1_000_000_000.0 {
        format!("{}B", to_fixed(value / 1_000_000_000.0, 2))
    } else if value >= 1_000_000.0 {
        format!("{}M", to_fixed(value / 1_000_000.0, 2))
    } else if value >= 1_000.0 {
        format!("{}K", to_fixed(value / 1_000.0, 1))
    } else {
        group_thousands(ticks)
    }
}
