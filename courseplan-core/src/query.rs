//! Query classification: turn a free-form search string into a search intent.
//!
//! Rules are tried in order against the whole trimmed, uppercased query; the
//! first one that matches builds the intent. Anything else is general text.

use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::lookup::resolve_subject;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParsedQuery {
    /// "01:198:111" or "198:111"
    Code {
        school: Option<String>,
        subject: String,
        number: String,
    },
    /// "CS 111"; `subject` is the resolved catalog code when the
    /// abbreviation is known, otherwise the literal letters.
    SubjectNumber { subject: String, number: String },
    /// "111"
    Number { number: String },
    General { text: String },
}

impl ParsedQuery {
    pub fn kind(&self) -> &'static str {
        match self {
            ParsedQuery::Code { .. } => "code",
            ParsedQuery::SubjectNumber { .. } => "subject-number",
            ParsedQuery::Number { .. } => "number",
            ParsedQuery::General { .. } => "general",
        }
    }
}

impl fmt::Display for ParsedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedQuery::Code {
                school: Some(school),
                subject,
                number,
            } => write!(f, "{school}:{subject}:{number}"),
            ParsedQuery::Code {
                school: None,
                subject,
                number,
            } => write!(f, "{subject}:{number}"),
            ParsedQuery::SubjectNumber { subject, number } => write!(f, "{subject} {number}"),
            ParsedQuery::Number { number } => write!(f, "{number}"),
            ParsedQuery::General { text } => write!(f, "{text}"),
        }
    }
}

struct Rule {
    pattern: Regex,
    build: fn(&Captures<'_>) -> ParsedQuery,
}

fn group(caps: &Captures<'_>, i: usize) -> String {
    caps.get(i).map(|m| m.as_str().to_string()).unwrap_or_default()
}

fn build_code(caps: &Captures<'_>) -> ParsedQuery {
    ParsedQuery::Code {
        school: caps.get(1).map(|m| m.as_str().to_string()),
        subject: group(caps, 2),
        number: group(caps, 3),
    }
}

fn build_subject_number(caps: &Captures<'_>) -> ParsedQuery {
    let letters = group(caps, 1);
    let subject = resolve_subject(&letters)
        .map(str::to_string)
        .unwrap_or(letters);
    ParsedQuery::SubjectNumber {
        subject,
        number: group(caps, 2),
    }
}

fn build_number(caps: &Captures<'_>) -> ParsedQuery {
    ParsedQuery::Number {
        number: group(caps, 1),
    }
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let rule = |pattern: &str, build: fn(&Captures<'_>) -> ParsedQuery| Rule {
        pattern: Regex::new(pattern).expect("classifier pattern is valid"),
        build,
    };
    vec![
        rule(r"^(?:([0-9]+):)?([0-9]+):([0-9]+)$", build_code),
        rule(r"^([A-Z]+)\s*([0-9]+)$", build_subject_number),
        rule(r"^([0-9]{3,4})$", build_number),
    ]
});

/// Classify a raw search string. Total: every input yields exactly one intent.
pub fn classify(query: &str) -> ParsedQuery {
    let trimmed = query.trim();
    let normalized = trimmed.to_uppercase();

    RULES
        .iter()
        .find_map(|rule| rule.pattern.captures(&normalized).map(|c| (rule.build)(&c)))
        .unwrap_or_else(|| ParsedQuery::General {
            text: trimmed.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_code() {
        assert_eq!(
            classify("01:198:111"),
            ParsedQuery::Code {
                school: Some("01".to_string()),
                subject: "198".to_string(),
                number: "111".to_string(),
            }
        );
    }

    #[test]
    fn test_code_without_school() {
        assert_eq!(
            classify(" 198:111 "),
            ParsedQuery::Code {
                school: None,
                subject: "198".to_string(),
                number: "111".to_string(),
            }
        );
    }

    #[test]
    fn test_subject_number_resolves_abbreviation() {
        let expected = ParsedQuery::SubjectNumber {
            subject: "198".to_string(),
            number: "111".to_string(),
        };
        assert_eq!(classify("CS 111"), expected);
        assert_eq!(classify("cs111"), expected);
    }

    #[test]
    fn test_subject_number_unknown_abbreviation_passes_through() {
        assert_eq!(
            classify("art 101"),
            ParsedQuery::SubjectNumber {
                subject: "ART".to_string(),
                number: "101".to_string(),
            }
        );
    }

    #[test]
    fn test_bare_number() {
        assert_eq!(
            classify("111"),
            ParsedQuery::Number {
                number: "111".to_string()
            }
        );
        assert_eq!(
            classify("1110"),
            ParsedQuery::Number {
                number: "1110".to_string()
            }
        );
    }

    #[test]
    fn test_short_or_long_numbers_are_general() {
        assert!(matches!(classify("11"), ParsedQuery::General { .. }));
        assert!(matches!(classify("11111"), ParsedQuery::General { .. }));
    }

    #[test]
    fn test_letters_only_is_general() {
        assert_eq!(
            classify("CS"),
            ParsedQuery::General {
                text: "CS".to_string()
            }
        );
    }

    #[test]
    fn test_general_keeps_original_case() {
        assert_eq!(
            classify("  Intro to Programming "),
            ParsedQuery::General {
                text: "Intro to Programming".to_string()
            }
        );
    }

    #[test]
    fn test_patterns_are_anchored() {
        assert!(matches!(classify("see 01:198:111"), ParsedQuery::General { .. }));
        assert!(matches!(classify("CS 111 honors"), ParsedQuery::General { .. }));
    }

    #[test]
    fn test_empty_is_general() {
        assert_eq!(
            classify("   "),
            ParsedQuery::General {
                text: String::new()
            }
        );
    }

    #[test]
    fn test_display_round_trips_code() {
        assert_eq!(classify("01:198:111").to_string(), "01:198:111");
        assert_eq!(classify("math 152").to_string(), "640 152");
    }
}
