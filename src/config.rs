//! CSV configuration loader
//!
//! One record per person, no header row: `name, macPattern, appId, token`.

use crate::error::ConfigError;
use crate::models::{PersonRecord, SystemSnapshot};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const FIELDS_PER_RECORD: usize = 4;

/// Build a fresh snapshot from a CSV config file
pub fn build_from_config(
    path: &Path,
    base_url: impl Into<String>,
) -> Result<SystemSnapshot, ConfigError> {
    let people = load_people(path)?;
    Ok(SystemSnapshot::fresh(base_url, people))
}

/// Read every person from a CSV config file
pub fn load_people(path: &Path) -> Result<Vec<PersonRecord>, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_people(file)
}

/// Parse people from any CSV source
pub fn parse_people<R: Read>(reader: R) -> Result<Vec<PersonRecord>, ConfigError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut people = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        if record.len() != FIELDS_PER_RECORD {
            return Err(ConfigError::FieldCount {
                record: index + 1,
                found: record.len(),
            });
        }
        people.push(PersonRecord::new(
            &record[0], &record[1], &record[2], &record[3],
        ));
    }

    Ok(people)
}
