pub mod advocate;
pub mod case;
pub mod outcome;

pub use advocate::Advocate;
pub use case::{CaseDescription, MIN_CASE_DESCRIPTION_CHARS, ValidationError};
pub use outcome::{MatchAccuracy, MatchQuality, MatchResult, MatchType, messages};
