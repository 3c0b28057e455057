//! Error taxonomy for a presence cycle
//!
//! Every fatal condition funnels into [`Error`] and is reported once by the
//! binary. [`PatternError`] is the only non-fatal kind: it is isolated to the
//! person whose pattern failed to compile.

use std::path::PathBuf;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for one presence cycle
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("State file error: {0}")]
    StateIo(#[from] StoreError),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Notification error: {0}")]
    Notification(#[from] NotifyError),
}

/// CSV configuration could not be turned into people
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to open config '{path}': {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] csv::Error),

    #[error("Config record {record} has {found} fields, expected 4 (name, mac, appid, token)")]
    FieldCount { record: usize, found: usize },
}

/// Snapshot file could not be read or written
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read state file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse state file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write state file '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The neighbor-table dump did not complete cleanly
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Command '{command}' could not be started: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("Failed to read output of '{command}': {source}")]
    Read {
        command: String,
        source: std::io::Error,
    },

    #[error("Command '{command}' failed with exit code {code:?}")]
    Exit { command: String, code: Option<i32> },
}

/// An outbound hub call failed
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Request for '{person}' failed: {source}")]
    Request {
        person: String,
        source: reqwest::Error,
    },

    #[error("Hub rejected update for '{person}' with status {status}")]
    Status { person: String, status: u16 },
}

/// A person's match pattern is not a valid regular expression
#[derive(Debug, Clone, thiserror::Error)]
#[error("Invalid pattern '{pattern}' for '{person}': {message}")]
pub struct PatternError {
    pub person: String,
    pub pattern: String,
    pub message: String,
}
