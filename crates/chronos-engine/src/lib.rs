//! Pure time logic for Chronos Atlas.
//!
//! In-world time is stored as a single integer universal tick (one unscaled
//! minute). This crate turns ticks into human-readable dates under
//! configurable calendars and back, with no database, UI or runtime
//! dependency. Functions take plain data and return results, so every UI
//! layer can call them synchronously on each render.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`calendar`] | Closed set of calendar types and their preset values |
//! | [`config`] | Partial → full config resolution and validation |
//! | [`constants`] | Tick units, fallback defaults, month names |
//! | [`convert`] | Tick ↔ local date conversion |
//! | [`cursor`] | Clamped "current tick" for timeline navigation |
//! | [`format`] | Date and raw tick display strings |
//! | [`lifespan`] | Alive / dead / unborn status of entities at a tick |
//! | [`spacetime`] | Canon timeline, what-if branches, divergence lookup |

pub mod calendar;
pub mod config;
pub mod constants;
pub mod convert;
pub mod cursor;
pub mod format;
pub mod lifespan;
pub mod spacetime;

pub use calendar::{preset_configs, CalendarType};
pub use config::{get_full_config, try_full_config, ConfigError, PartialTimeConfig, TimeConfig};
pub use convert::{calendar_to_ticks, ticks_to_calendar, LocalDate};
pub use format::{format_local_date, format_universal_tick, DateFormat};
