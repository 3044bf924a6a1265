//! Caller-supplied case descriptions.

use thiserror::Error;

/// Minimum number of characters a case description must have after trimming.
pub const MIN_CASE_DESCRIPTION_CHARS: usize = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please provide a detailed case description (min 20 characters).")]
    CaseTooShort { chars: usize },
}

/// Free text describing a legal matter, validated on construction.
///
/// The original text is kept untrimmed; only the length check uses the
/// trimmed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseDescription(String);

impl CaseDescription {
    pub fn new(text: impl Into<String>) -> Result<Self, ValidationError> {
        let text = text.into();
        let chars = text.trim().chars().count();
        if chars < MIN_CASE_DESCRIPTION_CHARS {
            return Err(ValidationError::CaseTooShort { chars });
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
