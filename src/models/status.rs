//! PEP status expectation table.

use serde::{Deserialize, Serialize};

/// Acceptable authoritative statuses for one preview-status code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusExpectation {
    /// Single-character abbreviation from the index, or empty when the
    /// index row carries no status character
    pub code: String,

    /// Full status strings considered valid for the code
    pub statuses: Vec<String>,
}

/// Immutable mapping from preview-status codes to acceptable statuses.
///
/// Built once at startup (configuration defaults carry the canonical
/// table) and passed into the PEP tally routine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusExpectations(Vec<StatusExpectation>);

impl StatusExpectations {
    /// Acceptable statuses for a preview code, if the code is registered.
    pub fn expected_for(&self, code: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|e| e.code == code)
            .map(|e| e.statuses.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusExpectation> {
        self.0.iter()
    }
}

impl From<Vec<StatusExpectation>> for StatusExpectations {
    fn from(entries: Vec<StatusExpectation>) -> Self {
        Self(entries)
    }
}

impl Default for StatusExpectations {
    fn default() -> Self {
        let entry = |code: &str, statuses: &[&str]| StatusExpectation {
            code: code.to_string(),
            statuses: statuses.iter().map(|s| s.to_string()).collect(),
        };

        Self(vec![
            entry("A", &["Active", "Accepted"]),
            entry("D", &["Deferred"]),
            entry("F", &["Final"]),
            entry("P", &["Provisional"]),
            entry("R", &["Rejected"]),
            entry("S", &["Superseded"]),
            entry("W", &["Withdrawn"]),
            entry("", &["Draft", "Active"]),
        ])
    }
}
