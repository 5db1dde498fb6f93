//! Time cursor — the tick currently being viewed.
//!
//! The timeline slider, playback controls and every date widget read the
//! same cursor. The current tick is always kept inside `[0, max_tick]`.

use serde::{Deserialize, Serialize};

use crate::config::TimeConfig;
use crate::convert::ticks_to_calendar;
use crate::format::{format_local_date, format_universal_tick, DateFormat};

/// Upper bound of the timeline for a new project.
pub const DEFAULT_MAX_TICK: i64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeCursor {
    current_tick: i64,
    max_tick: i64,
    playing: bool,
}

impl Default for TimeCursor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TICK)
    }
}

impl TimeCursor {
    /// A paused cursor at tick 0. A negative maximum is treated as 0.
    pub fn new(max_tick: i64) -> Self {
        Self {
            current_tick: 0,
            max_tick: max_tick.max(0),
            playing: false,
        }
    }

    pub fn current_tick(&self) -> i64 {
        self.current_tick
    }

    pub fn max_tick(&self) -> i64 {
        self.max_tick
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Jump to `tick`, clamped into the timeline.
    pub fn set_tick(&mut self, tick: i64) {
        self.current_tick = tick.clamp(0, self.max_tick);
    }

    /// Move the end of the timeline. The current tick is pulled back if it
    /// would fall past the new end.
    pub fn set_max_tick(&mut self, max_tick: i64) {
        self.max_tick = max_tick.max(0);
        self.current_tick = self.current_tick.min(self.max_tick);
    }

    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
    }

    pub fn step_forward(&mut self, amount: i64) {
        self.set_tick(self.current_tick.saturating_add(amount));
    }

    pub fn step_backward(&mut self, amount: i64) {
        self.set_tick(self.current_tick.saturating_sub(amount));
    }

    /// Fraction of the timeline covered, 0.0..=1.0.
    pub fn progress(&self) -> f64 {
        if self.max_tick == 0 {
            return 0.0;
        }
        self.current_tick as f64 / self.max_tick as f64
    }

    /// Current tick as a local date string.
    pub fn local_time(&self, config: &TimeConfig) -> String {
        format_local_date(
            &ticks_to_calendar(self.current_tick, config),
            DateFormat::Full,
        )
    }

    /// Current tick as a raw counter, e.g. `Tick 1.50M`.
    pub fn universal_time(&self) -> String {
        format!("Tick {}", format_universal_tick(self.current_tick))
    }
}
