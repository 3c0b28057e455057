// mac-presence - ARP-based home presence tracking
// Scans the neighbor table for known MAC addresses and tells a home-automation hub who is home

pub mod cli;
pub mod config;
pub mod error;
pub mod matcher;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod reconcile;
pub mod scan;
pub mod store;

pub use error::{Error, Result};

// Re-export commonly used types
pub use models::{PersonRecord, Presence, SystemSnapshot};
pub use pipeline::{Cycle, CycleReport, StateSource};
pub use reconcile::{reconcile, Reconciler};
