//! Command-line entry point for one presence cycle

use crate::notify::SmartThingsNotifier;
use crate::pipeline::{Cycle, StateSource};
use crate::scan::ArpScanner;
use crate::store::{StateStore, DEFAULT_STATE_FILE};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

/// Options collected from the command line
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// CSV config to build fresh state from
    pub load: Option<PathBuf>,
    /// Snapshot location; defaults to `~/.presence.json`
    pub state: Option<PathBuf>,
    pub base_url: String,
    pub force: bool,
    pub verbose: bool,
}

/// Default snapshot path under the user's home directory
pub fn default_state_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Cannot find home directory")?;
    Ok(home.join(DEFAULT_STATE_FILE))
}

/// Run one cycle against the live ARP table and the SmartThings hub
pub async fn run(options: RunOptions) -> Result<()> {
    let state_path = match options.state {
        Some(path) => path,
        None => default_state_path()?,
    };
    let store = StateStore::new(state_path);

    let source = match options.load {
        Some(path) => StateSource::Config {
            path,
            base_url: options.base_url,
        },
        None => StateSource::Snapshot,
    };

    let scanner = ArpScanner::default();
    let notifier = SmartThingsNotifier::new();

    let report = Cycle::new(&store, &scanner, &notifier)
        .force(options.force)
        .verbose(options.verbose)
        .run(&source)
        .await?;

    if options.verbose {
        eprintln!(
            "{}",
            format!(
                "{} of {} tracked people at home, {} notifications sent",
                report.snapshot.at_home_count(),
                report.snapshot.people.len(),
                report.deliveries.len()
            )
            .dimmed()
        );
    }

    Ok(())
}
