//! Engine constants — tick units, fallback calendar values, month names.
//!
//! These are plain constants with no storage or UI dependency.
//! Both the engine and the native simtest harness use these.

/// Tick unit conversions. One universal tick is one unscaled minute.
pub mod ticks {
    pub const PER_MINUTE: i64 = 1;
    pub const PER_HOUR: i64 = 60 * PER_MINUTE;
    pub const MINUTES_PER_HOUR: u32 = 60;
}

/// Hardcoded fallbacks used when neither the explicit config nor the
/// calendar preset supplies a value.
pub mod defaults {
    pub const TICK_MULTIPLIER: f64 = 1.0;
    pub const YEAR_LENGTH: u32 = 365;
    pub const DAY_LENGTH: u32 = 24;
    pub const EPOCH_NAME: &str = "Year";
}

/// Every calendar has twelve equal months.
pub const MONTHS_PER_YEAR: u32 = 12;

/// English month abbreviations, indexed by `month - 1`.
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Abbreviated month name for a 1-based month, `None` outside 1..=12.
pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
}
