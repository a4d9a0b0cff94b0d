use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://sis.rutgers.edu/soc/api";

/// Academic term, encoded the way the schedule-of-classes API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Term {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Term {
    pub fn code(self) -> u8 {
        match self {
            Term::Winter => 0,
            Term::Spring => 1,
            Term::Summer => 7,
            Term::Fall => 9,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Term {
    type Err = anyhow::Error;

    /// Accepts API codes ("0", "1", "7", "9") or names ("fall").
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "0" | "winter" => Ok(Term::Winter),
            "1" | "spring" => Ok(Term::Spring),
            "7" | "summer" => Ok(Term::Summer),
            "9" | "fall" => Ok(Term::Fall),
            other => bail!(
                "invalid term '{other}': must be 0 (Winter), 1 (Spring), 7 (Summer), or 9 (Fall)"
            ),
        }
    }
}

/// One catalog snapshot: year + term + campus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRequest {
    pub year: i32,
    pub term: Term,
    /// NB, NK or CM
    pub campus: String,
}

impl CatalogRequest {
    pub fn new(year: i32, term: Term, campus: impl Into<String>) -> Self {
        Self {
            year,
            term,
            campus: campus.into().to_uppercase(),
        }
    }

    pub fn url(&self, base: &str) -> String {
        format!(
            "{}/courses.json?year={}&term={}&campus={}",
            base.trim_end_matches('/'),
            self.year,
            self.term,
            self.campus
        )
    }

    /// File-name friendly key for caching a fetched snapshot.
    pub fn cache_key(&self) -> String {
        format!("{}-{}-{}", self.year, self.term, self.campus)
    }
}
