//! Per-person tracking record

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scratch flags for the current reconciliation cycle
///
/// Persisted alongside the record for format compatibility, but always reset
/// before a scan and never consulted by the notifier or the store.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CycleStatus {
    /// `at_home` flipped during this cycle
    #[serde(default)]
    pub changed: bool,

    /// Matched by at least one scan line this cycle
    #[serde(default)]
    pub checked: bool,
}

/// One monitored device and its owner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersonRecord {
    /// Display label, not used for matching
    pub name: String,

    /// Regex searched for in each scan line (usually a MAC address)
    #[serde(rename = "macaddr")]
    pub mac_pattern: String,

    /// Hub application id
    #[serde(rename = "appid")]
    pub app_id: String,

    /// Hub access token
    pub token: String,

    #[serde(flatten)]
    pub cycle: CycleStatus,

    /// Last known presence; the only field that matters across runs
    #[serde(rename = "athome", default)]
    pub at_home: bool,
}

impl PersonRecord {
    /// Create a record that starts out away
    pub fn new(
        name: impl Into<String>,
        mac_pattern: impl Into<String>,
        app_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mac_pattern: mac_pattern.into(),
            app_id: app_id.into(),
            token: token.into(),
            cycle: CycleStatus::default(),
            at_home: false,
        }
    }

    pub fn presence(&self) -> Presence {
        Presence::from(self.at_home)
    }
}

/// Presence state as reported to the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Home,
    Away,
}

impl Presence {
    /// Path segment used by the hub API
    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Home => "home",
            Presence::Away => "away",
        }
    }
}

impl From<bool> for Presence {
    fn from(at_home: bool) -> Self {
        if at_home {
            Presence::Home
        } else {
            Presence::Away
        }
    }
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_person_starts_away() {
        let person = PersonRecord::new("Alice", "AA:BB", "app1", "tok1");
        assert!(!person.at_home);
        assert_eq!(person.cycle, CycleStatus::default());
        assert_eq!(person.presence(), Presence::Away);
    }

    #[test]
    fn test_presence_tokens() {
        assert_eq!(Presence::from(true).as_str(), "home");
        assert_eq!(Presence::from(false).to_string(), "away");
    }

    #[test]
    fn test_person_json_field_names() {
        let mut person = PersonRecord::new("Alice", "AA:BB", "app1", "tok1");
        person.at_home = true;
        let json = serde_json::to_value(&person).unwrap();

        assert_eq!(json["name"], "Alice");
        assert_eq!(json["macaddr"], "AA:BB");
        assert_eq!(json["appid"], "app1");
        assert_eq!(json["token"], "tok1");
        assert_eq!(json["changed"], false);
        assert_eq!(json["checked"], false);
        assert_eq!(json["athome"], true);
    }

    #[test]
    fn test_person_missing_cycle_fields_default() {
        let json = r#"{"name":"Bob","macaddr":"11:22","appid":"a","token":"t","athome":true}"#;
        let person: PersonRecord = serde_json::from_str(json).unwrap();

        assert!(person.at_home);
        assert!(!person.cycle.changed);
        assert!(!person.cycle.checked);
    }
}
