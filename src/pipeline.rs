//! Presence cycle: build-or-load → reset → scan → reconcile → notify → persist
//!
//! Each stage takes and returns the snapshot by value. Any fatal error stops
//! the cycle before later stages run, so a failed notification never persists.

use crate::config;
use crate::error::Result;
use crate::models::{Presence, SystemSnapshot};
use crate::notify::{notify_all, Delivery, Notifier};
use crate::reconcile::Reconciler;
use crate::scan::ScanSource;
use crate::store::StateStore;
use colored::Colorize;
use std::path::PathBuf;

/// Where the starting snapshot comes from
#[derive(Debug, Clone)]
pub enum StateSource {
    /// Build fresh from a CSV config, ignoring any persisted snapshot
    Config { path: PathBuf, base_url: String },
    /// Read the persisted snapshot
    Snapshot,
}

/// What one cycle did
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub snapshot: SystemSnapshot,
    pub deliveries: Vec<Delivery>,
    pub saved: bool,
}

/// One reconciliation cycle over a scan source and notifier
pub struct Cycle<'a, S: ?Sized, N: ?Sized> {
    store: &'a StateStore,
    scanner: &'a S,
    notifier: &'a N,
    force: bool,
    verbose: bool,
}

impl<'a, S, N> Cycle<'a, S, N>
where
    S: ScanSource + ?Sized,
    N: Notifier + ?Sized,
{
    pub fn new(store: &'a StateStore, scanner: &'a S, notifier: &'a N) -> Self {
        Self {
            store,
            scanner,
            notifier,
            force: false,
            verbose: false,
        }
    }

    /// Notify even when nothing changed
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Echo every scan line to stderr
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Produce the starting snapshot
    pub fn load(&self, source: &StateSource) -> Result<SystemSnapshot> {
        match source {
            StateSource::Config { path, base_url } => {
                let snapshot = config::build_from_config(path, base_url.as_str())?;
                eprintln!(
                    "{}",
                    format!(
                        "Loaded {} people from {}",
                        snapshot.people.len(),
                        path.display()
                    )
                    .cyan()
                );
                Ok(snapshot)
            }
            StateSource::Snapshot => Ok(self.store.load()?),
        }
    }

    /// Reset scratch flags, stream the scan through the reconciler, and fold
    pub async fn observe(&self, snapshot: SystemSnapshot) -> Result<SystemSnapshot> {
        let mut reconciler = Reconciler::new(snapshot);

        for err in reconciler.pattern_errors() {
            eprintln!("{}", format!("⚠ {}; treating as not present", err).yellow());
        }

        let verbose = self.verbose;
        self.scanner
            .scan(&mut |line: &str| {
                if verbose {
                    eprintln!(">>> {}", line);
                }
                reconciler.observe_line(line);
            })
            .await?;

        let snapshot = reconciler.finish();
        report_transitions(&snapshot);
        Ok(snapshot)
    }

    /// Run the full cycle
    pub async fn run(&self, source: &StateSource) -> Result<CycleReport> {
        let snapshot = self.load(source)?;
        let snapshot = self.observe(snapshot).await?;

        let deliveries = notify_all(self.notifier, &snapshot, self.force).await?;
        for delivery in &deliveries {
            print!("{}", delivery.body);
        }
        if !snapshot.changed && !self.force {
            eprintln!("{}", "No presence change, skipping notifications".dimmed());
        }

        if snapshot.changed {
            eprintln!(
                "{}",
                format!("Writing state file {}", self.store.path().display()).cyan()
            );
        }
        let saved = self.store.save_if_changed(&snapshot)?;

        Ok(CycleReport {
            snapshot,
            deliveries,
            saved,
        })
    }
}

fn report_transitions(snapshot: &SystemSnapshot) {
    for person in snapshot.changed_people() {
        let line = format!(
            "{}: {} → {}",
            person.name,
            Presence::from(!person.at_home),
            person.presence()
        );
        if person.at_home {
            eprintln!("{}", line.green());
        } else {
            eprintln!("{}", line.yellow());
        }
    }
}
