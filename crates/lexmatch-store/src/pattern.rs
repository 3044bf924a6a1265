//! Case-insensitive name patterns for advocate lookup.
//!
//! The fragment is compiled as a regular expression and matched anywhere in
//! the advocate's full name, so "asha" finds "Asha Rao" and "Rao|Shah" finds
//! either. Fragments that are not valid patterns (an oracle echoing
//! "Dr. Rao (Senior" for instance) are matched literally instead. A
//! literal miss is an ordinary unresolved name, so the match degrades to a
//! random pick scored by the oracle's quality, not to the oracle-failure
//! path with its fixed 50% accuracy.

use regex::{Regex, RegexBuilder};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct NamePattern {
    regex: Regex,
    literal: bool,
}

impl NamePattern {
    /// Compile `fragment`. Returns `None` for an empty or whitespace-only
    /// fragment, which would otherwise match every name.
    pub fn new(fragment: &str) -> Option<Self> {
        if fragment.trim().is_empty() {
            return None;
        }
        match build(fragment) {
            Ok(regex) => Some(Self {
                regex,
                literal: false,
            }),
            Err(err) => {
                debug!(
                    fragment,
                    error = %err,
                    "name fragment is not a valid pattern, matching literally"
                );
                build(&regex::escape(fragment)).ok().map(|regex| Self {
                    regex,
                    literal: true,
                })
            }
        }
    }

    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Pattern source, without the case-insensitivity flag.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Whether the fragment had to be escaped.
    pub fn is_literal(&self) -> bool {
        self.literal
    }
}

fn build(source: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(source).case_insensitive(true).build()
}
