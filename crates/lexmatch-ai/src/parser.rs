//! Extraction of the match rating and selected advocate from oracle text.
//!
//! The oracle has no structured output mode. It is asked to answer as
//!
//! ```text
//! Match Quality: 8/10
//!
//! Selected Advocate:
//! Asha Rao - strong contract law background
//! ```
//!
//! but nothing here assumes it complied. Every field has a default, and the
//! extracted name is not checked against the pool.

use std::sync::LazyLock;

use lexmatch_core::{MatchQuality, messages};
use regex::Regex;

const SEPARATOR: &str = " - ";
const SELECTED_LABEL: &str = "selected advocate:";

static QUALITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Match Quality:\s*([0-9]+)").expect("quality pattern is valid")
});

/// What could be read out of one oracle response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub quality: MatchQuality,
    /// Name as written by the oracle; `None` when no selection line was found.
    pub selected_name: Option<String>,
    pub reason: String,
}

pub fn parse_response(text: &str) -> ParsedResponse {
    let quality = parse_quality(text);
    let (selected_name, reason) = match selection_line(text) {
        Some((name, reason)) => (
            Some(name).filter(|n| !n.is_empty()),
            Some(reason).filter(|r| !r.is_empty()),
        ),
        None => (None, None),
    };
    ParsedResponse {
        quality,
        selected_name,
        reason: reason.unwrap_or_else(|| messages::DEFAULT_REASON.to_string()),
    }
}

fn parse_quality(text: &str) -> MatchQuality {
    let Some(digits) = QUALITY.captures(text).and_then(|c| c.get(1)) else {
        return MatchQuality::DEFAULT;
    };
    // Only overflow can fail here; an absurdly large rating is still "maximal".
    let raw = digits.as_str().parse::<u64>().unwrap_or(u64::MAX);
    MatchQuality::new(raw)
}

/// Split the first line containing `" - "` into `(name, reason)`.
///
/// The reason is the text between the first and second separator.
fn selection_line(text: &str) -> Option<(String, String)> {
    let line = text.lines().find(|l| l.contains(SEPARATOR))?;
    let mut parts = line.split(SEPARATOR);
    let name = clean_name(parts.next().unwrap_or_default());
    let reason = parts.next().unwrap_or_default().trim().to_string();
    Some((name, reason))
}

/// Strip markdown emphasis and a leading `Selected Advocate:` label, in
/// either order: `**Asha Rao**`, `Selected Advocate: Asha Rao` and
/// `**Selected Advocate:** Asha Rao` all yield `Asha Rao`.
fn clean_name(raw: &str) -> String {
    let mut name = strip_emphasis(raw);
    if name.len() >= SELECTED_LABEL.len()
        && name.is_char_boundary(SELECTED_LABEL.len())
        && name[..SELECTED_LABEL.len()].eq_ignore_ascii_case(SELECTED_LABEL)
    {
        name = strip_emphasis(&name[SELECTED_LABEL.len()..]);
    }
    name.to_string()
}

fn strip_emphasis(s: &str) -> &str {
    s.trim_matches(|c: char| c == '*' || c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_response() {
        let parsed = parse_response(
            "Match Quality: 8/10\n\nSelected Advocate:\nAsha Rao - strong contract law background",
        );
        assert_eq!(parsed.quality.value(), 8);
        assert_eq!(parsed.selected_name.as_deref(), Some("Asha Rao"));
        assert_eq!(parsed.reason, "strong contract law background");
    }

    #[test]
    fn quality_label_case_insensitive() {
        let parsed = parse_response("match quality:9/10");
        assert_eq!(parsed.quality.value(), 9);
    }

    #[test]
    fn missing_quality_defaults_to_five() {
        let parsed = parse_response("Selected Advocate:\nAsha Rao - good fit");
        assert_eq!(parsed.quality, MatchQuality::DEFAULT);
        assert_eq!(parsed.selected_name.as_deref(), Some("Asha Rao"));
    }

    #[test]
    fn non_numeric_quality_defaults_to_five() {
        let parsed = parse_response("Match Quality: high\nAsha Rao - good fit");
        assert_eq!(parsed.quality.value(), 5);
    }

    #[test]
    fn quality_over_ten_is_clamped() {
        assert_eq!(parse_response("Match Quality: 85/100").quality.value(), 10);
        assert_eq!(
            parse_response("Match Quality: 99999999999999999999999").quality.value(),
            10
        );
    }

    #[test]
    fn label_on_same_line_is_stripped() {
        let parsed = parse_response(
            "Match Quality: 7/10\nSelected Advocate: Vikram Shah - criminal defence",
        );
        assert_eq!(parsed.selected_name.as_deref(), Some("Vikram Shah"));
        assert_eq!(parsed.reason, "criminal defence");
    }

    #[test]
    fn first_separator_line_wins() {
        let parsed = parse_response(
            "Match Quality: 7/10\nMeera Iyer - family law\nAsha Rao - contracts",
        );
        assert_eq!(parsed.selected_name.as_deref(), Some("Meera Iyer"));
        assert_eq!(parsed.reason, "family law");
    }

    #[test]
    fn reason_stops_at_second_separator() {
        let parsed = parse_response("Asha Rao - contracts - 15 years");
        assert_eq!(parsed.reason, "contracts");
    }

    #[test]
    fn hyphenated_names_survive() {
        let parsed = parse_response("Anne-Marie D'Souza - maritime law");
        assert_eq!(parsed.selected_name.as_deref(), Some("Anne-Marie D'Souza"));
    }

    #[test]
    fn no_selection_line() {
        let parsed = parse_response("Match Quality: 4/10\n\nNone of the advocates fit.");
        assert_eq!(parsed.quality.value(), 4);
        assert!(parsed.selected_name.is_none());
        assert_eq!(parsed.reason, messages::DEFAULT_REASON);
    }

    #[test]
    fn empty_name_or_reason() {
        let parsed = parse_response("Selected Advocate: - no name given");
        assert!(parsed.selected_name.is_none());
        assert_eq!(parsed.reason, "no name given");

        let parsed = parse_response("Asha Rao - ");
        assert_eq!(parsed.selected_name.as_deref(), Some("Asha Rao"));
        assert_eq!(parsed.reason, messages::DEFAULT_REASON);
    }

    #[test]
    fn markdown_bold_name() {
        let parsed = parse_response("**Selected Advocate:**\n**Asha Rao** - contracts");
        assert_eq!(parsed.selected_name.as_deref(), Some("Asha Rao"));
    }

    #[test]
    fn bold_label_on_same_line_is_stripped() {
        for text in [
            "**Selected Advocate:** Asha Rao - contracts",
            "**Selected Advocate: Asha Rao** - contracts",
            "*Selected Advocate:* **Asha Rao** - contracts",
        ] {
            let parsed = parse_response(text);
            assert_eq!(parsed.selected_name.as_deref(), Some("Asha Rao"), "{text}");
            assert_eq!(parsed.reason, "contracts");
        }
    }

    #[test]
    fn crlf_line_endings() {
        let parsed = parse_response(
            "Match Quality: 6/10\r\n\r\nSelected Advocate:\r\nAsha Rao - contracts\r\n",
        );
        assert_eq!(parsed.quality.value(), 6);
        assert_eq!(parsed.reason, "contracts");
    }

    #[test]
    fn empty_text() {
        let parsed = parse_response("");
        assert_eq!(parsed.quality.value(), 5);
        assert!(parsed.selected_name.is_none());
    }
}
