//! Advocate profile records as stored in the document store.

use serde::{Deserialize, Serialize};

/// A candidate advocate profile.
///
/// Seeded externally and read-only to the matcher. `sl_no` is unique within
/// the pool. Field names follow the stored document layout and are what the
/// HTTP surface returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advocate {
    pub sl_no: i64,
    pub name: String,
    pub age: u32,
    pub short_description: String,
    /// Comma-separated capability tags, e.g. "Contract Law, Arbitration".
    pub skills: String,
    /// Years of practice.
    pub experience: u32,
    pub gender: String,
    /// Rating on a 1–10 scale.
    pub rating: f64,
    pub email: String,
}

impl Advocate {
    /// Individual skill tags, trimmed, empty entries dropped.
    pub fn skill_tags(&self) -> Vec<&str> {
        self.skills
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}
