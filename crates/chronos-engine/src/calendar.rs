//! Calendar presets — the four built-in calendar templates.
//!
//! A spacetime's calendar is picked from a closed set of variants. Each
//! variant carries a preset that supplies baseline values for any field the
//! stored configuration leaves out. The table is fixed; custom calendars are
//! expressed by overriding fields on top of the `Custom` preset.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, PartialTimeConfig};

/// Calendar system selecting a preset baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarType {
    /// Earth calendar, 365 days, era "CE".
    #[default]
    EarthStandard,
    /// Earth with 12 equal 30-day months.
    EarthSimple,
    /// Martian calendar: 668 sols, slightly slower flow.
    MarsStandard,
    /// User-defined; starts from Earth values.
    Custom,
}

impl CalendarType {
    pub fn all() -> &'static [CalendarType] {
        &[
            Self::EarthStandard,
            Self::EarthSimple,
            Self::MarsStandard,
            Self::Custom,
        ]
    }

    /// Storage key, as used in persisted configs.
    pub fn key(&self) -> &'static str {
        match self {
            Self::EarthStandard => "earth_standard",
            Self::EarthSimple => "earth_simple",
            Self::MarsStandard => "mars_standard",
            Self::Custom => "custom",
        }
    }

    /// Preset values for this calendar. Every preset is fully populated.
    pub fn preset(&self) -> PartialTimeConfig {
        let (multiplier, year_length, day_length, epoch) = match self {
            Self::EarthStandard => (1.0, 365, 24, "CE"),
            Self::EarthSimple => (1.0, 360, 24, "Year"),
            // Martian sol is about 24h 37m
            Self::MarsStandard => (1.027, 668, 24, "Mars Year"),
            Self::Custom => (1.0, 365, 24, "Year"),
        };
        PartialTimeConfig {
            tick_multiplier: Some(multiplier),
            calendar: Some(*self),
            epoch_name: Some(epoch.to_string()),
            year_length: Some(year_length),
            day_length: Some(day_length),
        }
    }
}

/// The full preset table, keyed by calendar.
pub fn preset_configs() -> Vec<(CalendarType, PartialTimeConfig)> {
    CalendarType::all()
        .iter()
        .map(|c| (*c, c.preset()))
        .collect()
}

impl fmt::Display for CalendarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.key())
    }
}

impl FromStr for CalendarType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.key() == s.trim())
            .ok_or_else(|| ConfigError::UnknownCalendar(s.to_string()))
    }
}
