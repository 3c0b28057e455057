//! Reconciler - merges one scan against the prior snapshot
//!
//! Works in two phases. Every scan line is tested against every person and
//! matches accumulate in a per-person [`Observation`]. Only once the scan is
//! exhausted are observations folded into the snapshot, since absence cannot
//! be concluded until the last line has been seen.
//!
//! | was at home | matched | next at home | changed |
//! |-------------|---------|--------------|---------|
//! | false       | false   | false        | false   |
//! | false       | true    | true         | true    |
//! | true        | true    | true         | false   |
//! | true        | false   | false        | true    |

use crate::error::PatternError;
use crate::matcher::{matching_indices, MacMatcher};
use crate::models::SystemSnapshot;

/// What one cycle saw of a person
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Observation {
    pub matched: bool,
}

/// Outcome of a cycle for one person
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Arrived,
    Departed,
    StillHome,
    StillAway,
}

impl Transition {
    pub fn between(was_at_home: bool, matched: bool) -> Self {
        match (was_at_home, matched) {
            (false, false) => Transition::StillAway,
            (false, true) => Transition::Arrived,
            (true, true) => Transition::StillHome,
            (true, false) => Transition::Departed,
        }
    }

    pub fn at_home(&self) -> bool {
        matches!(self, Transition::Arrived | Transition::StillHome)
    }

    pub fn is_change(&self) -> bool {
        matches!(self, Transition::Arrived | Transition::Departed)
    }
}

/// Accumulates scan lines for one cycle
#[derive(Debug)]
pub struct Reconciler {
    snapshot: SystemSnapshot,
    matchers: Vec<MacMatcher>,
    observations: Vec<Observation>,
}

impl Reconciler {
    /// Start a cycle; the snapshot's scratch flags are reset here
    pub fn new(snapshot: SystemSnapshot) -> Self {
        let snapshot = snapshot.reset_cycle();
        let matchers = snapshot.people.iter().map(MacMatcher::compile).collect();
        let observations = vec![Observation::default(); snapshot.people.len()];
        Self {
            snapshot,
            matchers,
            observations,
        }
    }

    /// Patterns that failed to compile; those people never match
    pub fn pattern_errors(&self) -> impl Iterator<Item = &PatternError> {
        self.matchers.iter().filter_map(MacMatcher::error)
    }

    /// Feed one line of scan output
    pub fn observe_line(&mut self, line: &str) {
        for index in matching_indices(&self.matchers, line) {
            self.observations[index].matched = true;
        }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Fold observations into the snapshot after the whole scan was consumed
    pub fn finish(self) -> SystemSnapshot {
        let mut snapshot = self.snapshot;
        for (person, observation) in snapshot.people.iter_mut().zip(self.observations) {
            let transition = Transition::between(person.at_home, observation.matched);
            person.at_home = transition.at_home();
            person.cycle.checked = observation.matched;
            person.cycle.changed = transition.is_change();
            if person.cycle.changed {
                snapshot.changed = true;
            }
        }
        snapshot
    }
}

/// Run a full cycle over an in-memory scan
pub fn reconcile<I, S>(snapshot: SystemSnapshot, lines: I) -> SystemSnapshot
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut reconciler = Reconciler::new(snapshot);
    for line in lines {
        reconciler.observe_line(line.as_ref());
    }
    reconciler.finish()
}
