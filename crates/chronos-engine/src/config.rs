//! Time configuration — merging stored settings with calendar presets.
//!
//! A spacetime stores a possibly partial [`PartialTimeConfig`]. Before any
//! conversion it is resolved field by field into a complete [`TimeConfig`]
//! with precedence: explicit value > calendar preset > hardcoded default.
//!
//! Two resolution entry points exist:
//! - [`get_full_config`] never fails. Invalid explicit fields are ignored
//!   (with a warning) and the preset value is used instead.
//! - [`try_full_config`] fails fast with a [`ConfigError`], for settings
//!   screens that must reject bad input before it is saved.
//!
//! ```
//! use chronos_engine::calendar::CalendarType;
//! use chronos_engine::config::{get_full_config, PartialTimeConfig};
//!
//! let partial = PartialTimeConfig {
//!     calendar: Some(CalendarType::MarsStandard),
//!     year_length: Some(700),
//!     ..PartialTimeConfig::default()
//! };
//! let config = get_full_config(&partial);
//! assert_eq!(config.year_length.get(), 700);
//! assert_eq!(config.epoch_name, "Mars Year");
//! ```

use std::fmt::Debug;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::CalendarType;
use crate::constants::{defaults, ticks, MONTHS_PER_YEAR};

const fn non_zero(n: u32) -> NonZeroU32 {
    match NonZeroU32::new(n) {
        Some(v) => v,
        None => panic!("calendar length must be non-zero"),
    }
}

const DEFAULT_YEAR_LENGTH: NonZeroU32 = non_zero(defaults::YEAR_LENGTH);
const DEFAULT_DAY_LENGTH: NonZeroU32 = non_zero(defaults::DAY_LENGTH);

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Multiplier zero, negative, NaN or infinite.
    #[error("tick multiplier must be positive and finite, got {0}")]
    InvalidMultiplier(f64),
    #[error("year length must be at least one day")]
    ZeroYearLength,
    #[error("day length must be at least one hour")]
    ZeroDayLength,
    #[error("epoch name must not be blank")]
    EmptyEpochName,
    /// Calendar key outside the preset table.
    #[error("unknown calendar '{0}'")]
    UnknownCalendar(String),
    /// Stored config could not be decoded.
    #[error("invalid time config: {0}")]
    Parse(String),
}

/// Calendar settings as stored on a spacetime. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialTimeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_multiplier: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar: Option<CalendarType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epoch_name: Option<String>,
    /// Days per year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_length: Option<u32>,
    /// Hours per day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_length: Option<u32>,
}

impl PartialTimeConfig {
    /// A config that only names its calendar; everything else comes from the preset.
    pub fn for_calendar(calendar: CalendarType) -> Self {
        Self {
            calendar: Some(calendar),
            ..Self::default()
        }
    }

    /// Check every explicitly set field, returning all errors found.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(m) = self.tick_multiplier {
            if !valid_multiplier(&m) {
                errors.push(ConfigError::InvalidMultiplier(m));
            }
        }
        if self.year_length == Some(0) {
            errors.push(ConfigError::ZeroYearLength);
        }
        if self.day_length == Some(0) {
            errors.push(ConfigError::ZeroDayLength);
        }
        if let Some(name) = &self.epoch_name {
            if !valid_epoch(name) {
                errors.push(ConfigError::EmptyEpochName);
            }
        }

        errors
    }
}

/// A fully resolved calendar configuration.
///
/// Lengths are non-zero by construction, so conversions never divide by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeConfig {
    /// Local time flow relative to universal time (1.0 = unscaled).
    pub tick_multiplier: f64,
    pub calendar: CalendarType,
    pub epoch_name: String,
    /// Days per year.
    pub year_length: NonZeroU32,
    /// Hours per day.
    pub day_length: NonZeroU32,
}

/// Default for new spacetimes: Earth calendar labelled "Year".
impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            tick_multiplier: defaults::TICK_MULTIPLIER,
            calendar: CalendarType::EarthStandard,
            epoch_name: defaults::EPOCH_NAME.to_string(),
            year_length: DEFAULT_YEAR_LENGTH,
            day_length: DEFAULT_DAY_LENGTH,
        }
    }
}

impl TimeConfig {
    /// Parse a stored partial config and resolve it strictly.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let partial: PartialTimeConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        try_full_config(&partial)
    }

    /// Same config with a different epoch label.
    pub fn with_epoch_name(mut self, name: impl Into<String>) -> Self {
        self.epoch_name = name.into();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !valid_multiplier(&self.tick_multiplier) {
            return Err(ConfigError::InvalidMultiplier(self.tick_multiplier));
        }
        if !valid_epoch(&self.epoch_name) {
            return Err(ConfigError::EmptyEpochName);
        }
        Ok(())
    }

    /// Explicit form of this config, suitable for storage.
    pub fn to_partial(&self) -> PartialTimeConfig {
        PartialTimeConfig {
            tick_multiplier: Some(self.tick_multiplier),
            calendar: Some(self.calendar),
            epoch_name: Some(self.epoch_name.clone()),
            year_length: Some(self.year_length.get()),
            day_length: Some(self.day_length.get()),
        }
    }

    /// Multiplier used by conversions; out-of-domain values count as 1.0.
    pub fn effective_multiplier(&self) -> f64 {
        if valid_multiplier(&self.tick_multiplier) {
            self.tick_multiplier
        } else {
            defaults::TICK_MULTIPLIER
        }
    }

    pub fn ticks_per_day(&self) -> i128 {
        self.day_length.get() as i128 * ticks::PER_HOUR as i128
    }

    pub fn ticks_per_year(&self) -> i128 {
        self.year_length.get() as i128 * self.ticks_per_day()
    }

    /// Equal month length. Years shorter than twelve days get one-day months.
    pub fn days_per_month(&self) -> i128 {
        (self.year_length.get() / MONTHS_PER_YEAR).max(1) as i128
    }
}

fn valid_multiplier(m: &f64) -> bool {
    m.is_finite() && *m > 0.0
}

fn valid_epoch(name: &str) -> bool {
    !name.trim().is_empty()
}

fn valid_length(n: &u32) -> bool {
    *n > 0
}

/// Pick the explicit value if valid, else the preset value, else the fallback.
fn resolve<T: Clone + Debug>(
    field: &str,
    explicit: Option<T>,
    preset: Option<T>,
    fallback: T,
    valid: impl Fn(&T) -> bool,
) -> T {
    if let Some(value) = explicit {
        if valid(&value) {
            return value;
        }
        log::warn!("ignoring invalid {field} {value:?}, falling back to preset");
    }
    preset.filter(|v| valid(v)).unwrap_or(fallback)
}

/// Merge a partial config with its calendar preset and the hardcoded defaults.
///
/// Total: never fails. A missing calendar resolves to `EarthStandard`.
pub fn get_full_config(partial: &PartialTimeConfig) -> TimeConfig {
    let calendar = partial.calendar.unwrap_or_default();
    let preset = calendar.preset();

    let tick_multiplier = resolve(
        "tick_multiplier",
        partial.tick_multiplier,
        preset.tick_multiplier,
        defaults::TICK_MULTIPLIER,
        valid_multiplier,
    );
    let epoch_name = resolve(
        "epoch_name",
        partial.epoch_name.clone(),
        preset.epoch_name,
        defaults::EPOCH_NAME.to_string(),
        |name: &String| valid_epoch(name),
    );
    let year_length = resolve(
        "year_length",
        partial.year_length,
        preset.year_length,
        defaults::YEAR_LENGTH,
        valid_length,
    );
    let day_length = resolve(
        "day_length",
        partial.day_length,
        preset.day_length,
        defaults::DAY_LENGTH,
        valid_length,
    );

    TimeConfig {
        tick_multiplier,
        calendar,
        epoch_name,
        year_length: NonZeroU32::new(year_length).unwrap_or(DEFAULT_YEAR_LENGTH),
        day_length: NonZeroU32::new(day_length).unwrap_or(DEFAULT_DAY_LENGTH),
    }
}

/// Strict resolution: reject the config if any explicit field is invalid.
pub fn try_full_config(partial: &PartialTimeConfig) -> Result<TimeConfig, ConfigError> {
    if let Some(err) = partial.validate().into_iter().next() {
        return Err(err);
    }
    Ok(get_full_config(partial))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_partial_resolves_to_earth_standard() {
        let config = get_full_config(&PartialTimeConfig::default());
        assert_eq!(config.calendar, CalendarType::EarthStandard);
        assert_eq!(config.tick_multiplier, 1.0);
        assert_eq!(config.year_length.get(), 365);
        assert_eq!(config.day_length.get(), 24);
        assert_eq!(config.epoch_name, "CE");
    }

    #[test]
    fn explicit_overrides_preset() {
        let partial = PartialTimeConfig {
            calendar: Some(CalendarType::MarsStandard),
            year_length: Some(700),
            ..PartialTimeConfig::default()
        };
        let config = get_full_config(&partial);
        assert_eq!(config.tick_multiplier, 1.027);
        assert_eq!(config.year_length.get(), 700);
        assert_eq!(config.day_length.get(), 24);
        assert_eq!(config.epoch_name, "Mars Year");
        assert_eq!(config.calendar, CalendarType::MarsStandard);
    }

    #[test]
    fn every_field_overridable() {
        let partial = PartialTimeConfig {
            tick_multiplier: Some(2.5),
            calendar: Some(CalendarType::Custom),
            epoch_name: Some("Age of Fire".to_string()),
            year_length: Some(400),
            day_length: Some(30),
        };
        let config = get_full_config(&partial);
        assert_eq!(config.to_partial(), partial);
    }

    #[test]
    fn invalid_fields_fall_back_to_preset() {
        let partial = PartialTimeConfig {
            tick_multiplier: Some(0.0),
            calendar: Some(CalendarType::EarthSimple),
            epoch_name: Some("   ".to_string()),
            year_length: Some(0),
            day_length: Some(0),
        };
        let config = get_full_config(&partial);
        assert_eq!(config.tick_multiplier, 1.0);
        assert_eq!(config.epoch_name, "Year");
        assert_eq!(config.year_length.get(), 360);
        assert_eq!(config.day_length.get(), 24);
    }

    #[test]
    fn non_finite_multiplier_rejected() {
        for m in [f64::NAN, f64::INFINITY, -1.0] {
            let partial = PartialTimeConfig {
                tick_multiplier: Some(m),
                ..PartialTimeConfig::default()
            };
            assert_eq!(get_full_config(&partial).tick_multiplier, 1.0);
            assert!(matches!(
                try_full_config(&partial),
                Err(ConfigError::InvalidMultiplier(_))
            ));
        }
    }

    #[test]
    fn validate_collects_all_errors() {
        let partial = PartialTimeConfig {
            tick_multiplier: Some(-2.0),
            calendar: None,
            epoch_name: Some(String::new()),
            year_length: Some(0),
            day_length: Some(0),
        };
        let errors = partial.validate();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ConfigError::InvalidMultiplier(-2.0)));
        assert!(errors.contains(&ConfigError::ZeroYearLength));
        assert!(errors.contains(&ConfigError::ZeroDayLength));
        assert!(errors.contains(&ConfigError::EmptyEpochName));
    }

    #[test]
    fn try_full_config_accepts_valid() {
        let partial = PartialTimeConfig::for_calendar(CalendarType::EarthSimple);
        let config = try_full_config(&partial).unwrap();
        assert_eq!(config.year_length.get(), 360);
    }

    #[test]
    fn from_json_resolves_partial() {
        let config =
            TimeConfig::from_json(r#"{"calendar":"mars_standard","epoch_name":"Red Era"}"#)
                .unwrap();
        assert_eq!(config.year_length.get(), 668);
        assert_eq!(config.epoch_name, "Red Era");
    }

    #[test]
    fn from_json_rejects_unknown_calendar() {
        let err = TimeConfig::from_json(r#"{"calendar":"lunar"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn from_json_rejects_zero_day() {
        let err = TimeConfig::from_json(r#"{"day_length":0}"#).unwrap_err();
        assert_eq!(err, ConfigError::ZeroDayLength);
    }

    #[test]
    fn default_config_values() {
        let config = TimeConfig::default();
        assert_eq!(config.calendar, CalendarType::EarthStandard);
        assert_eq!(config.epoch_name, "Year");
        assert_eq!(config.year_length.get(), 365);
        assert_eq!(config.day_length.get(), 24);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn effective_multiplier_guards_hand_built_configs() {
        let config = TimeConfig {
            tick_multiplier: 0.0,
            ..TimeConfig::default()
        };
        assert!(config.validate().is_err());
        assert_eq!(config.effective_multiplier(), 1.0);
    }

    #[test]
    fn derived_tick_spans() {
        let config = TimeConfig::default();
        assert_eq!(config.ticks_per_day(), 1440);
        assert_eq!(config.ticks_per_year(), 365 * 1440);
        assert_eq!(config.days_per_month(), 30);

        let tiny = TimeConfig {
            year_length: NonZeroU32::new(5).unwrap(),
            ..TimeConfig::default()
        };
        assert_eq!(tiny.days_per_month(), 1);
    }

    #[test]
    fn partial_serializes_only_present_fields() {
        let partial = PartialTimeConfig::for_calendar(CalendarType::Custom);
        let json = serde_json::to_string(&partial).unwrap();
        assert_eq!(json, r#"{"calendar":"custom"}"#);
    }
}
