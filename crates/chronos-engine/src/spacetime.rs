//! Spacetimes — the canon timeline and its "what-if" branches.
//!
//! Each spacetime owns its own calendar settings. A what-if branch splits
//! from a parent at a divergence tick: everything before that tick is
//! inherited from the parent, so lookups for earlier ticks resolve to the
//! parent (and recursively to its parents).
//!
//! The canon spacetime always exists and cannot be removed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{get_full_config, ConfigError, PartialTimeConfig, TimeConfig};
use crate::convert::ticks_to_calendar;
use crate::format::{format_local_date, DateFormat};

pub const CANON_ID: &str = "canon";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpacetimeError {
    #[error("spacetime name must not be blank")]
    EmptyName,
    #[error("unknown spacetime '{0}'")]
    UnknownSpacetime(String),
    #[error("spacetime id '{0}' already exists")]
    DuplicateId(String),
    #[error("the canon spacetime cannot be removed")]
    CannotRemoveCanon,
    /// Other branches still diverge from this one.
    #[error("spacetime '{0}' still has branches")]
    HasBranches(String),
    #[error("divergence tick must not be negative, got {0}")]
    NegativeDivergence(i64),
    #[error("catalogue has no canon spacetime")]
    MissingCanon,
    #[error("catalogue already has a canon spacetime '{0}'")]
    DuplicateCanon(String),
    #[error("the canon spacetime cannot diverge from another")]
    CanonDivergence,
    #[error("invalid spacetime catalogue: {0}")]
    Parse(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Where a branch splits from its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Divergence {
    pub parent_id: String,
    pub tick: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spacetime {
    pub id: String,
    pub name: String,
    pub is_canon: bool,
    #[serde(default)]
    pub time_config: PartialTimeConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divergence: Option<Divergence>,
}

impl Spacetime {
    pub fn canon() -> Self {
        Self {
            id: CANON_ID.to_string(),
            name: "Canon".to_string(),
            is_canon: true,
            time_config: TimeConfig::default().to_partial(),
            divergence: None,
        }
    }

    pub fn resolved_config(&self) -> TimeConfig {
        get_full_config(&self.time_config)
    }

    pub fn is_divergent(&self) -> bool {
        !self.is_canon
    }
}

/// All spacetimes of a universe plus the one currently selected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpacetimeCatalog {
    spacetimes: Vec<Spacetime>,
    current_id: Option<String>,
    next_branch: u64,
}

impl Default for SpacetimeCatalog {
    fn default() -> Self {
        Self {
            spacetimes: vec![Spacetime::canon()],
            current_id: Some(CANON_ID.to_string()),
            next_branch: 1,
        }
    }
}

impl SpacetimeCatalog {
    /// Build a catalogue from stored spacetimes. A branch's parent must be
    /// listed before the branch itself. The canon spacetime is selected.
    pub fn from_spacetimes(spacetimes: Vec<Spacetime>) -> Result<Self, SpacetimeError> {
        let mut catalog = Self {
            spacetimes: Vec::with_capacity(spacetimes.len()),
            current_id: None,
            next_branch: 1,
        };
        for spacetime in spacetimes {
            catalog.add(spacetime)?;
        }
        let canon_id = catalog
            .canon()
            .map(|c| c.id.clone())
            .ok_or(SpacetimeError::MissingCanon)?;
        catalog.current_id = Some(canon_id);
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self, SpacetimeError> {
        let spacetimes: Vec<Spacetime> =
            serde_json::from_str(json).map_err(|e| SpacetimeError::Parse(e.to_string()))?;
        Self::from_spacetimes(spacetimes)
    }

    pub fn spacetimes(&self) -> &[Spacetime] {
        &self.spacetimes
    }

    pub fn get(&self, id: &str) -> Option<&Spacetime> {
        self.spacetimes.iter().find(|s| s.id == id)
    }

    fn require(&self, id: &str) -> Result<&Spacetime, SpacetimeError> {
        self.get(id)
            .ok_or_else(|| SpacetimeError::UnknownSpacetime(id.to_string()))
    }

    pub fn canon(&self) -> Option<&Spacetime> {
        self.spacetimes.iter().find(|s| s.is_canon)
    }

    pub fn current(&self) -> Option<&Spacetime> {
        self.current_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn select(&mut self, id: &str) -> Result<(), SpacetimeError> {
        self.require(id)?;
        self.current_id = Some(id.to_string());
        Ok(())
    }

    /// Add a spacetime after validating its name, id, calendar and parent.
    /// A catalogue holds at most one canon, and the canon never diverges.
    pub fn add(&mut self, spacetime: Spacetime) -> Result<(), SpacetimeError> {
        if spacetime.name.trim().is_empty() {
            return Err(SpacetimeError::EmptyName);
        }
        if self.get(&spacetime.id).is_some() {
            return Err(SpacetimeError::DuplicateId(spacetime.id));
        }
        if spacetime.is_canon {
            if let Some(existing) = self.canon() {
                return Err(SpacetimeError::DuplicateCanon(existing.id.clone()));
            }
            if spacetime.divergence.is_some() {
                return Err(SpacetimeError::CanonDivergence);
            }
        }
        if let Some(err) = spacetime.time_config.validate().into_iter().next() {
            return Err(err.into());
        }
        if let Some(div) = &spacetime.divergence {
            if div.tick < 0 {
                return Err(SpacetimeError::NegativeDivergence(div.tick));
            }
            self.require(&div.parent_id)?;
        }
        log::debug!("adding spacetime '{}' ({})", spacetime.name, spacetime.id);
        self.spacetimes.push(spacetime);
        Ok(())
    }

    /// Remove a branch. Selection falls back to canon if it was current.
    pub fn remove(&mut self, id: &str) -> Result<Spacetime, SpacetimeError> {
        let index = self
            .spacetimes
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| SpacetimeError::UnknownSpacetime(id.to_string()))?;
        if self.spacetimes[index].is_canon {
            return Err(SpacetimeError::CannotRemoveCanon);
        }
        let has_branches = self.spacetimes.iter().any(|s| {
            s.divergence
                .as_ref()
                .is_some_and(|d| d.parent_id == id)
        });
        if has_branches {
            return Err(SpacetimeError::HasBranches(id.to_string()));
        }

        let removed = self.spacetimes.remove(index);
        if self.current_id.as_deref() == Some(id) {
            self.current_id = self.canon().map(|c| c.id.clone());
        }
        log::debug!("removed spacetime '{}'", removed.id);
        Ok(removed)
    }

    fn fresh_branch_id(&mut self) -> String {
        loop {
            let id = format!("st-{}", self.next_branch);
            self.next_branch += 1;
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    /// Branch off `parent_id` at `diverge_tick` and select the new branch.
    ///
    /// The branch starts with the default calendar, labelled with its own name.
    pub fn create_what_if(
        &mut self,
        name: &str,
        parent_id: &str,
        diverge_tick: i64,
    ) -> Result<&Spacetime, SpacetimeError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SpacetimeError::EmptyName);
        }
        self.require(parent_id)?;

        let id = self.fresh_branch_id();
        self.add(Spacetime {
            id: id.clone(),
            name: name.to_string(),
            is_canon: false,
            time_config: TimeConfig::default().with_epoch_name(name).to_partial(),
            divergence: Some(Divergence {
                parent_id: parent_id.to_string(),
                tick: diverge_tick,
            }),
        })?;
        self.current_id = Some(id.clone());
        self.require(&id)
    }

    /// The spacetime whose records are authoritative for `tick` when
    /// viewing `id`: the branch itself, or the ancestor it inherited from.
    pub fn source_for_tick(&self, id: &str, tick: i64) -> Result<&Spacetime, SpacetimeError> {
        let mut spacetime = self.require(id)?;
        // Parents are always added before their branches, so chains are acyclic
        for _ in 0..self.spacetimes.len() {
            match &spacetime.divergence {
                Some(div) if tick < div.tick => spacetime = self.require(&div.parent_id)?,
                _ => break,
            }
        }
        Ok(spacetime)
    }

    /// Whether the selected spacetime is a branch.
    pub fn is_divergent(&self) -> bool {
        self.current().is_some_and(Spacetime::is_divergent)
    }

    /// `tick` as a full local date under the selected spacetime's calendar.
    pub fn local_time(&self, tick: i64) -> String {
        match self.current() {
            Some(spacetime) => format_local_date(
                &ticks_to_calendar(tick, &spacetime.resolved_config()),
                DateFormat::Full,
            ),
            None => "Unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarType;

    #[test]
    fn default_has_selected_canon() {
        let catalog = SpacetimeCatalog::default();
        assert_eq!(catalog.spacetimes().len(), 1);
        assert_eq!(catalog.current().unwrap().id, CANON_ID);
        assert!(!catalog.is_divergent());
        assert_eq!(catalog.current().unwrap().resolved_config(), TimeConfig::default());
    }

    #[test]
    fn what_if_branch_is_selected_and_labelled() {
        let mut catalog = SpacetimeCatalog::default();
        let branch = catalog.create_what_if("  The King Lives ", CANON_ID, 5000).unwrap();
        assert_eq!(branch.name, "The King Lives");
        assert_eq!(branch.id, "st-1");
        assert_eq!(branch.resolved_config().epoch_name, "The King Lives");
        assert!(catalog.is_divergent());
        assert_eq!(catalog.local_time(0), "The King Lives 1, Jan 1, 00:00");
    }

    #[test]
    fn what_if_rejects_bad_input() {
        let mut catalog = SpacetimeCatalog::default();
        assert_eq!(
            catalog.create_what_if(" ", CANON_ID, 0).unwrap_err(),
            SpacetimeError::EmptyName
        );
        assert_eq!(
            catalog.create_what_if("Branch", "nowhere", 0).unwrap_err(),
            SpacetimeError::UnknownSpacetime("nowhere".to_string())
        );
        assert_eq!(
            catalog.create_what_if("Branch", CANON_ID, -1).unwrap_err(),
            SpacetimeError::NegativeDivergence(-1)
        );
        assert_eq!(catalog.spacetimes().len(), 1);
        assert_eq!(catalog.current().unwrap().id, CANON_ID);
    }

    #[test]
    fn source_for_tick_walks_ancestors() {
        let mut catalog = SpacetimeCatalog::default();
        let a = catalog.create_what_if("A", CANON_ID, 100).unwrap().id.clone();
        let b = catalog.create_what_if("B", &a, 200).unwrap().id.clone();

        assert_eq!(catalog.source_for_tick(&b, 250).unwrap().id, b);
        assert_eq!(catalog.source_for_tick(&b, 200).unwrap().id, b);
        assert_eq!(catalog.source_for_tick(&b, 150).unwrap().id, a);
        assert_eq!(catalog.source_for_tick(&b, 99).unwrap().id, CANON_ID);
        assert_eq!(catalog.source_for_tick(CANON_ID, 0).unwrap().id, CANON_ID);
    }

    #[test]
    fn remove_falls_back_to_canon() {
        let mut catalog = SpacetimeCatalog::default();
        let id = catalog.create_what_if("Branch", CANON_ID, 10).unwrap().id.clone();
        let removed = catalog.remove(&id).unwrap();
        assert_eq!(removed.name, "Branch");
        assert_eq!(catalog.current().unwrap().id, CANON_ID);
    }

    #[test]
    fn remove_guards() {
        let mut catalog = SpacetimeCatalog::default();
        assert_eq!(
            catalog.remove(CANON_ID).unwrap_err(),
            SpacetimeError::CannotRemoveCanon
        );
        let parent = catalog.create_what_if("P", CANON_ID, 10).unwrap().id.clone();
        catalog.create_what_if("C", &parent, 20).unwrap();
        assert_eq!(
            catalog.remove(&parent).unwrap_err(),
            SpacetimeError::HasBranches(parent.clone())
        );
        assert!(matches!(
            catalog.remove("ghost"),
            Err(SpacetimeError::UnknownSpacetime(_))
        ));
    }

    #[test]
    fn add_validates_calendar() {
        let mut catalog = SpacetimeCatalog::default();
        let bad = Spacetime {
            id: "bad".to_string(),
            name: "Bad".to_string(),
            is_canon: false,
            time_config: PartialTimeConfig {
                day_length: Some(0),
                ..PartialTimeConfig::default()
            },
            divergence: None,
        };
        assert_eq!(
            catalog.add(bad).unwrap_err(),
            SpacetimeError::Config(ConfigError::ZeroDayLength)
        );
        assert!(matches!(
            catalog.add(Spacetime::canon()),
            Err(SpacetimeError::DuplicateId(_))
        ));
    }

    #[test]
    fn only_one_canon() {
        let mut catalog = SpacetimeCatalog::default();
        let second = Spacetime {
            id: "canon2".to_string(),
            ..Spacetime::canon()
        };
        assert_eq!(
            catalog.add(second).unwrap_err(),
            SpacetimeError::DuplicateCanon(CANON_ID.to_string())
        );
        assert_eq!(catalog.spacetimes().len(), 1);

        let json = r#"[
            {"id":"canon","name":"Canon","is_canon":true},
            {"id":"other","name":"Other","is_canon":true}
        ]"#;
        assert_eq!(
            SpacetimeCatalog::from_json(json).unwrap_err(),
            SpacetimeError::DuplicateCanon(CANON_ID.to_string())
        );
    }

    #[test]
    fn canon_cannot_diverge() {
        let json = r#"[
            {"id":"canon","name":"Canon","is_canon":true,
             "divergence":{"parent_id":"canon","tick":10}}
        ]"#;
        assert_eq!(
            SpacetimeCatalog::from_json(json).unwrap_err(),
            SpacetimeError::CanonDivergence
        );
    }

    #[test]
    fn branch_ids_skip_taken_ones() {
        let mut catalog = SpacetimeCatalog::default();
        catalog
            .add(Spacetime {
                id: "st-1".to_string(),
                name: "Imported".to_string(),
                is_canon: false,
                time_config: PartialTimeConfig::default(),
                divergence: None,
            })
            .unwrap();
        let id = catalog.create_what_if("New", CANON_ID, 0).unwrap().id.clone();
        assert_eq!(id, "st-2");
    }

    #[test]
    fn from_json_catalogue() {
        let json = r#"[
            {"id":"canon","name":"Canon","is_canon":true,
             "time_config":{"calendar":"earth_simple"}},
            {"id":"mars","name":"Red Dawn","is_canon":false,
             "time_config":{"calendar":"mars_standard"},
             "divergence":{"parent_id":"canon","tick":1000}}
        ]"#;
        let mut catalog = SpacetimeCatalog::from_json(json).unwrap();
        assert_eq!(catalog.current().unwrap().id, "canon");
        assert_eq!(catalog.local_time(518_400), "Year 2, Jan 1, 00:00");

        catalog.select("mars").unwrap();
        let config = catalog.current().unwrap().resolved_config();
        assert_eq!(config.calendar, CalendarType::MarsStandard);
        assert_eq!(catalog.source_for_tick("mars", 999).unwrap().id, "canon");
    }

    #[test]
    fn from_json_requires_canon_and_ordered_parents() {
        let no_canon = r#"[{"id":"x","name":"X","is_canon":false}]"#;
        assert_eq!(
            SpacetimeCatalog::from_json(no_canon).unwrap_err(),
            SpacetimeError::MissingCanon
        );

        let orphan = r#"[
            {"id":"canon","name":"Canon","is_canon":true},
            {"id":"b","name":"B","is_canon":false,
             "divergence":{"parent_id":"later","tick":5}}
        ]"#;
        assert!(matches!(
            SpacetimeCatalog::from_json(orphan),
            Err(SpacetimeError::UnknownSpacetime(_))
        ));

        assert!(matches!(
            SpacetimeCatalog::from_json("{"),
            Err(SpacetimeError::Parse(_))
        ));
    }

    #[test]
    fn select_unknown_fails() {
        let mut catalog = SpacetimeCatalog::default();
        assert!(catalog.select("nope").is_err());
        assert_eq!(catalog.current().unwrap().id, CANON_ID);
    }
}
