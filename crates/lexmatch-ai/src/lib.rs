//! Match decision layer: prompt building, oracle response parsing, and the
//! engine that turns a case description into exactly one advocate.

pub mod matcher;
pub mod oracle;
pub mod parser;
pub mod prompt;

pub use matcher::{DEFAULT_ORACLE_TIMEOUT, MatchError, Matcher};
pub use oracle::{OracleError, ScoringOracle};
pub use parser::{ParsedResponse, parse_response};
pub use prompt::{build_prompt, format_advocates};

#[cfg(feature = "http")]
pub mod gemini;
#[cfg(feature = "http")]
pub use gemini::GeminiClient;
