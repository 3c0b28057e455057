//! SystemSnapshot - the unit of persistence and of the presence pipeline

use super::person::{CycleStatus, PersonRecord};
use serde::{Deserialize, Serialize};

/// Full tracked state for one run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemSnapshot {
    /// Hub endpoint base used for notifications
    #[serde(rename = "baseurl")]
    pub base_url: String,

    /// True if any person changed this cycle, or the snapshot is fresh
    #[serde(default)]
    pub changed: bool,

    /// Tracked people in config order
    #[serde(default)]
    pub people: Vec<PersonRecord>,
}

impl SystemSnapshot {
    /// Build a never-persisted snapshot; always marked changed
    pub fn fresh(base_url: impl Into<String>, people: Vec<PersonRecord>) -> Self {
        let people = people
            .into_iter()
            .map(|mut p| {
                p.at_home = false;
                p.cycle = CycleStatus::default();
                p
            })
            .collect();

        Self {
            base_url: base_url.into(),
            changed: true,
            people,
        }
    }

    /// Mark a snapshot read back from disk: loading is not a change
    pub fn loaded(mut self) -> Self {
        self.changed = false;
        self
    }

    /// Clear the per-cycle scratch flags on every person
    ///
    /// The aggregate `changed` flag is left alone so a fresh snapshot stays
    /// marked for notification and persistence.
    pub fn reset_cycle(mut self) -> Self {
        for person in &mut self.people {
            person.cycle = CycleStatus::default();
        }
        self
    }

    /// People whose presence flipped this cycle
    pub fn changed_people(&self) -> impl Iterator<Item = &PersonRecord> {
        self.people.iter().filter(|p| p.cycle.changed)
    }

    pub fn at_home_count(&self) -> usize {
        self.people.iter().filter(|p| p.at_home).count()
    }
}
