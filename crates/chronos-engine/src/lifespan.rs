//! Entity lifespans — alive, dead or not yet born at a given tick.
//!
//! Characters and other entities carry optional birth and death ticks.
//! A lifespan covers the half-open range `[birth, death)`: an entity is
//! already dead on the tick it dies. An explicitly recorded status always
//! wins over the ticks.

use serde::{Deserialize, Serialize};

/// Status of an entity at a specific tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Alive,
    Dead,
    Unborn,
    /// No record for the entity in the current spacetime.
    Unknown,
}

/// Status set by hand on an entity, independent of its ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordedStatus {
    Alive,
    Dead,
}

/// Whether `tick` lies in `[start, end)`. A missing bound is open.
pub fn is_tick_in_range(tick: i64, start: Option<i64>, end: Option<i64>) -> bool {
    start.map_or(true, |s| tick >= s) && end.map_or(true, |e| tick < e)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lifespan {
    pub birth_tick: Option<i64>,
    pub death_tick: Option<i64>,
    pub recorded: Option<RecordedStatus>,
}

impl Lifespan {
    pub fn new(birth_tick: Option<i64>, death_tick: Option<i64>) -> Self {
        Self {
            birth_tick,
            death_tick,
            recorded: None,
        }
    }

    pub fn status_at(&self, tick: i64) -> EntityStatus {
        match self.recorded {
            Some(RecordedStatus::Alive) => return EntityStatus::Alive,
            Some(RecordedStatus::Dead) => return EntityStatus::Dead,
            None => {}
        }
        // Before birth takes priority over a death tick
        if self.birth_tick.is_some_and(|b| tick < b) {
            return EntityStatus::Unborn;
        }
        if self.death_tick.is_some_and(|d| tick >= d) {
            return EntityStatus::Dead;
        }
        EntityStatus::Alive
    }

    pub fn is_alive_at(&self, tick: i64) -> bool {
        self.status_at(tick) == EntityStatus::Alive
    }

    /// Ticks lived so far, `None` when unborn or birth is unknown.
    pub fn ticks_lived(&self, tick: i64) -> Option<i64> {
        let birth = self.birth_tick?;
        if tick < birth {
            return None;
        }
        let end = self.death_tick.map_or(tick, |d| d.min(tick));
        Some(end.saturating_sub(birth).max(0))
    }
}

/// Status of a possibly missing entity record.
pub fn status_of(lifespan: Option<&Lifespan>, tick: i64) -> EntityStatus {
    lifespan.map_or(EntityStatus::Unknown, |l| l.status_at(tick))
}
