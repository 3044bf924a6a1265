//! Match decision output types.
//!
//! A [`MatchResult`] always carries exactly one advocate. The scoring fields
//! serialise with the camelCase names the HTTP surface exposes, and the
//! advocate's own fields are flattened alongside them.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::Advocate;

/// Fixed user-facing strings.
pub mod messages {
    pub const GOOD_MATCH: &str = "Good match found based on case requirements";
    pub const NO_SPECIFIC_MATCH: &str = "No specific match found - showing available advocate";
    pub const AI_FAILED: &str = "AI processing failed - showing available advocate";
    pub const DEFAULT_REASON: &str = "Selected based on available expertise";
}

/// Oracle confidence in its pick, on a 0–10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchQuality(u8);

impl MatchQuality {
    pub const MAX: u8 = 10;
    /// Lowest quality at which the oracle's named advocate is trusted.
    pub const THRESHOLD: u8 = 6;
    /// Used when the oracle output carries no readable rating.
    pub const DEFAULT: MatchQuality = MatchQuality(5);

    /// Build a quality from a raw parsed value, clamped to [`Self::MAX`].
    pub fn new(raw: u64) -> Self {
        Self(raw.min(Self::MAX as u64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether the oracle's pick clears the confidence threshold (inclusive).
    pub fn is_confident(self) -> bool {
        self.0 >= Self::THRESHOLD
    }

    /// Quality expressed as a percentage (quality × 10).
    pub fn accuracy(self) -> MatchAccuracy {
        MatchAccuracy(self.0 * 10)
    }
}

impl Default for MatchQuality {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Integer percentage in 0–100, serialised as `"80%"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchAccuracy(u8);

impl MatchAccuracy {
    /// Reported when the oracle could not be consulted at all.
    pub const ORACLE_UNAVAILABLE: MatchAccuracy = MatchAccuracy(50);

    pub fn percent(self) -> u8 {
        self.0
    }
}

impl fmt::Display for MatchAccuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl Serialize for MatchAccuracy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MatchAccuracy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let digits = raw.trim().trim_end_matches('%');
        let value: u8 = digits
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid match accuracy: {raw:?}")))?;
        if value > 100 {
            return Err(serde::de::Error::custom(format!(
                "match accuracy out of range: {raw:?}"
            )));
        }
        Ok(Self(value))
    }
}

/// How the winning advocate was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    #[serde(rename = "AI Selected")]
    AiSelected,
    #[serde(rename = "Random Selection")]
    RandomSelection,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AiSelected => "AI Selected",
            Self::RandomSelection => "Random Selection",
        }
    }
}

/// The matcher's sole output: one advocate plus how and why it was chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    #[serde(flatten)]
    pub advocate: Advocate,
    pub reason: String,
    pub match_type: MatchType,
    pub match_accuracy: MatchAccuracy,
    pub message: String,
}

impl MatchResult {
    /// Result for an advocate chosen after the oracle answered.
    ///
    /// The message depends only on `quality`, not on how the advocate was
    /// picked.
    pub fn scored(
        advocate: Advocate,
        reason: impl Into<String>,
        match_type: MatchType,
        quality: MatchQuality,
    ) -> Self {
        let message = if quality.is_confident() {
            messages::GOOD_MATCH
        } else {
            messages::NO_SPECIFIC_MATCH
        };
        Self {
            advocate,
            reason: reason.into(),
            match_type,
            match_accuracy: quality.accuracy(),
            message: message.to_string(),
        }
    }

    /// Result for a random advocate substituted after the oracle failed.
    pub fn oracle_unavailable(advocate: Advocate) -> Self {
        Self {
            advocate,
            reason: messages::AI_FAILED.to_string(),
            match_type: MatchType::RandomSelection,
            match_accuracy: MatchAccuracy::ORACLE_UNAVAILABLE,
            message: messages::AI_FAILED.to_string(),
        }
    }
}
