//! Tiered course matching.
//!
//! Scoring runs as an ordered pipeline of tiers. Each tier is a pure function
//! over the deduplicated corpus; the first tier that produces anything wins
//! and later tiers never run. Precise code lookups therefore never get mixed
//! with noisy text matches.
//!
//! | tier   | applies to               | score |
//! |--------|--------------------------|-------|
//! | exact  | code, subject+number     | 100   |
//! | high   | subject+number           | 95/90 |
//! | number | bare number              | 85    |
//! | fuzzy  | everything (fallback)    | sum   |

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::CourseRecord;
use crate::lookup::resolve_subject;
use crate::query::{ParsedQuery, classify};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Exact,
    High,
    Fuzzy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredMatch<'a> {
    pub course: &'a CourseRecord,
    pub score: u32,
    pub tier: Tier,
}

const EXACT_SCORE: u32 = 100;
const SUBJECT_NUMBER_SCORE: u32 = 95;
const ABBREVIATION_NUMBER_SCORE: u32 = 90;
const NUMBER_SCORE: u32 = 85;

// Fuzzy weights, applied per token and summed.
const EQ_COURSE_STRING: u32 = 80;
const EQ_COURSE_NUMBER: u32 = 75;
const EQ_SUBJECT: u32 = 70;
const SUB_COURSE_STRING: u32 = 50;
const SUB_TITLE: u32 = 40;
const SUB_SUBJECT: u32 = 35;
const SUB_SUBJECT_DESCRIPTION: u32 = 30;
const SUB_COURSE_NUMBER: u32 = 25;
const SUB_DESCRIPTION: u32 = 10;
const WORD_TITLE: u32 = 20;
const WORD_SUBJECT_DESCRIPTION: u32 = 15;

type TierFn = for<'a> fn(&[&'a CourseRecord], &ParsedQuery, &str) -> Vec<ScoredMatch<'a>>;

const PIPELINE: &[(&str, TierFn)] = &[
    ("exact", exact_tier),
    ("high", high_tier),
    ("number", number_tier),
    ("fuzzy", fuzzy_tier),
];

fn scored(course: &CourseRecord, score: u32, tier: Tier) -> ScoredMatch<'_> {
    ScoredMatch {
        course,
        score,
        tier,
    }
}

/// Collapse records sharing a `course_string`; the first one seen is kept.
pub fn dedupe(courses: &[CourseRecord]) -> Vec<&CourseRecord> {
    let mut seen = HashSet::new();
    courses
        .iter()
        .filter(|c| seen.insert(c.course_string.as_str()))
        .collect()
}

fn exact_tier<'a>(
    courses: &[&'a CourseRecord],
    query: &ParsedQuery,
    _text: &str,
) -> Vec<ScoredMatch<'a>> {
    let (identifier, subject_number) = match query {
        ParsedQuery::Code { .. } => (query.to_string(), None),
        ParsedQuery::SubjectNumber { subject, number } => {
            (format!("{subject}:{number}"), Some((subject, number)))
        }
        _ => return Vec::new(),
    };

    courses
        .iter()
        .copied()
        .filter(|c| {
            c.course_string.eq_ignore_ascii_case(&identifier)
                || subject_number.is_some_and(|(subject, number)| {
                    c.subject.eq_ignore_ascii_case(subject)
                        && c.course_number.eq_ignore_ascii_case(number)
                })
        })
        .map(|c| scored(c, EXACT_SCORE, Tier::Exact))
        .collect()
}

fn high_tier<'a>(
    courses: &[&'a CourseRecord],
    query: &ParsedQuery,
    _text: &str,
) -> Vec<ScoredMatch<'a>> {
    let ParsedQuery::SubjectNumber { subject, number } = query else {
        return Vec::new();
    };
    let table_subject = resolve_subject(subject);

    courses
        .iter()
        .copied()
        .filter_map(|c| {
            if !c.course_number.to_uppercase().contains(number.as_str()) {
                return None;
            }
            if c.subject.eq_ignore_ascii_case(subject) {
                Some(scored(c, SUBJECT_NUMBER_SCORE, Tier::High))
            } else if table_subject.is_some_and(|code| c.subject.eq_ignore_ascii_case(code)) {
                Some(scored(c, ABBREVIATION_NUMBER_SCORE, Tier::High))
            } else {
                None
            }
        })
        .collect()
}

fn number_tier<'a>(
    courses: &[&'a CourseRecord],
    query: &ParsedQuery,
    _text: &str,
) -> Vec<ScoredMatch<'a>> {
    let ParsedQuery::Number { number } = query else {
        return Vec::new();
    };

    courses
        .iter()
        .copied()
        .filter(|c| c.course_number.eq_ignore_ascii_case(number))
        .map(|c| scored(c, NUMBER_SCORE, Tier::High))
        .collect()
}

struct Token {
    text: String,
    word: Option<Regex>,
}

impl Token {
    fn new(text: &str) -> Self {
        Self {
            word: Regex::new(&format!(r"\b{}\b", regex::escape(text))).ok(),
            text: text.to_string(),
        }
    }

    fn is_word_in(&self, field: &str) -> bool {
        self.word.as_ref().is_some_and(|re| re.is_match(field))
    }
}

/// Lowercased view of the fields fuzzy scoring reads.
struct Fields {
    course_string: String,
    title: String,
    subject: String,
    subject_description: String,
    course_number: String,
    description: String,
}

impl Fields {
    fn of(c: &CourseRecord) -> Self {
        Self {
            course_string: c.course_string.to_lowercase(),
            title: c.title.to_lowercase(),
            subject: c.subject.to_lowercase(),
            subject_description: c.subject_description.to_lowercase(),
            course_number: c.course_number.to_lowercase(),
            description: c.description.to_lowercase(),
        }
    }

    fn score(&self, token: &Token) -> u32 {
        let t = token.text.as_str();
        let mut score = 0;

        if self.course_string == t {
            score += EQ_COURSE_STRING;
        }
        if self.course_number == t {
            score += EQ_COURSE_NUMBER;
        }
        if self.subject == t {
            score += EQ_SUBJECT;
        }

        if self.course_string.contains(t) {
            score += SUB_COURSE_STRING;
        }
        if self.title.contains(t) {
            score += SUB_TITLE;
        }
        if self.subject.contains(t) {
            score += SUB_SUBJECT;
        }
        if self.subject_description.contains(t) {
            score += SUB_SUBJECT_DESCRIPTION;
        }
        if self.course_number.contains(t) {
            score += SUB_COURSE_NUMBER;
        }
        if self.description.contains(t) {
            score += SUB_DESCRIPTION;
        }

        if token.is_word_in(&self.title) {
            score += WORD_TITLE;
        }
        if token.is_word_in(&self.subject_description) {
            score += WORD_SUBJECT_DESCRIPTION;
        }

        score
    }
}

fn fuzzy_tier<'a>(
    courses: &[&'a CourseRecord],
    _query: &ParsedQuery,
    text: &str,
) -> Vec<ScoredMatch<'a>> {
    let lowered = text.to_lowercase();
    let tokens: Vec<Token> = lowered.split_whitespace().map(Token::new).collect();
    if tokens.is_empty() {
        return Vec::new();
    }

    courses
        .iter()
        .copied()
        .filter_map(|c| {
            let fields = Fields::of(c);
            let score: u32 = tokens.iter().map(|t| fields.score(t)).sum();
            (score > 0).then(|| scored(c, score, Tier::Fuzzy))
        })
        .collect()
}

fn rank<'a>(courses: &'a [CourseRecord], query: &ParsedQuery, text: &str) -> Vec<ScoredMatch<'a>> {
    let unique = dedupe(courses);

    for (name, tier) in PIPELINE {
        let mut matches = tier(&unique, query, text);
        if matches.is_empty() {
            continue;
        }
        // Stable: equal scores keep corpus order.
        matches.sort_by(|a, b| b.score.cmp(&a.score));
        debug!(
            tier = *name,
            kind = query.kind(),
            matches = matches.len(),
            corpus = unique.len(),
            "course match"
        );
        return matches;
    }

    debug!(kind = query.kind(), corpus = unique.len(), "no course match");
    Vec::new()
}

/// Score a corpus against an already classified query. When the precise
/// tiers miss, the fuzzy tier scores the query's canonical text form.
pub fn score_courses<'a>(
    courses: &'a [CourseRecord],
    query: &ParsedQuery,
) -> Vec<ScoredMatch<'a>> {
    rank(courses, query, &query.to_string())
}

/// Ranked, deduplicated courses for a classified query.
pub fn match_courses<'a>(
    courses: &'a [CourseRecord],
    query: &ParsedQuery,
) -> Vec<&'a CourseRecord> {
    score_courses(courses, query)
        .into_iter()
        .map(|m| m.course)
        .collect()
}

/// Classify `raw` and score the corpus; the fuzzy tier uses the raw text.
pub fn search<'a>(courses: &'a [CourseRecord], raw: &str) -> Vec<ScoredMatch<'a>> {
    let query = classify(raw);
    rank(courses, &query, raw.trim())
}

pub fn search_courses<'a>(courses: &'a [CourseRecord], raw: &str) -> Vec<&'a CourseRecord> {
    search(courses, raw).into_iter().map(|m| m.course).collect()
}

/// Every record in `all` whose course string was matched, in `all` order.
/// Used when the corpus holds one record per section.
pub fn expand_sections<'a>(
    matched: &[&CourseRecord],
    all: &'a [CourseRecord],
) -> Vec<&'a CourseRecord> {
    let wanted: HashSet<&str> = matched.iter().map(|c| c.course_string.as_str()).collect();
    all.iter()
        .filter(|c| wanted.contains(c.course_string.as_str()))
        .collect()
}
