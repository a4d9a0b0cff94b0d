//! Catalog data model shared by the matcher, the conflict detector and the
//! ingest layer.
//!
//! Every field defaults to empty so partially populated provider records
//! deserialize cleanly and score as empty strings.

use serde::{Deserialize, Serialize};

/// Meeting mode the provider uses for asynchronous online sections.
pub const ONLINE_ASYNC_MODE: &str = "ONLINE INSTRUCTION(INTERNET)";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoreCode {
    pub code: String,
    pub description: String,
}

/// One meeting of a section, in display form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeetingTime {
    /// Full weekday name ("Monday"), empty for async online meetings.
    pub day: String,
    /// "H:MM AM|PM"
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub building: String,
    pub room: String,
    pub mode: String,
    pub campus: String,
}

impl MeetingTime {
    pub fn is_online_async(&self) -> bool {
        self.day.trim().is_empty() && self.mode.eq_ignore_ascii_case(ONLINE_ASYNC_MODE)
    }

    /// "Monday 10:20 AM-11:40 AM @ HLL 114" style summary.
    pub fn summary(&self) -> String {
        if self.is_online_async() {
            return format!("{} (no meeting time)", self.mode);
        }
        let day = if self.day.is_empty() { "TBA" } else { &self.day };
        let start = self.start_time.as_deref().unwrap_or("N/A");
        let end = self.end_time.as_deref().unwrap_or("N/A");
        let mut s = format!("{day} {start}-{end}");
        if !self.building.is_empty() {
            s.push_str(&format!(" @ {} {}", self.building, self.room));
        }
        if !self.campus.is_empty() {
            s.push_str(&format!(" [{}]", self.campus));
        }
        s
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Section {
    pub number: String,
    /// Registration index, unique within a term.
    pub index: String,
    pub instructors: Vec<String>,
    pub status: String,
    pub comments: String,
    pub meeting_times: Vec<MeetingTime>,
}

/// One catalog course. `course_string` identifies it within a corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseRecord {
    pub course_string: String,
    pub subject: String,
    pub course_number: String,
    pub title: String,
    pub description: String,
    pub subject_description: String,

    pub credits: String,
    pub credits_description: String,
    pub school: String,
    pub campus_locations: Vec<String>,
    pub prerequisites: String,
    pub core_codes: Vec<CoreCode>,
    pub sections: Vec<Section>,
}

impl CourseRecord {
    pub fn new(course_string: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            course_string: course_string.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>, number: impl Into<String>) -> Self {
        self.subject = subject.into();
        self.course_number = number.into();
        self
    }

    pub fn with_subject_description(mut self, desc: impl Into<String>) -> Self {
        self.subject_description = desc.into();
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Look up a section by registration index, falling back to section number.
    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.index == key)
            .or_else(|| self.sections.iter().find(|s| s.number == key))
    }
}
