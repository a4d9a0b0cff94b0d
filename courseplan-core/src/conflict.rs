//! Weekly meeting intervals and overlap detection.
//!
//! An interval only takes part in conflict checks when it has a weekday and
//! both endpoints parse into a proper `[start, end)` range within one day.
//! Async online meetings and anything with a missing or garbled time are
//! ignored on both sides of the check.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::catalog::{MeetingTime, ONLINE_ASYNC_MODE};
use crate::lookup::weekday_from_code;
use crate::time::{MINUTES_PER_DAY, parse_display_time};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingInterval {
    pub day: Option<Weekday>,
    pub start_minutes: Option<u16>,
    pub end_minutes: Option<u16>,
    pub mode: String,
}

/// A checkable interval: day plus a half-open minute range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub day: Weekday,
    pub start: u16,
    pub end: u16,
}

impl Span {
    pub fn overlaps(&self, other: &Span) -> bool {
        self.day == other.day && self.start < other.end && self.end > other.start
    }
}

impl MeetingInterval {
    pub fn new(day: Weekday, start: &str, end: &str, mode: impl Into<String>) -> Self {
        Self {
            day: Some(day),
            start_minutes: parse_display_time(start),
            end_minutes: parse_display_time(end),
            mode: mode.into(),
        }
    }

    pub fn from_meeting(m: &MeetingTime) -> Self {
        Self {
            day: weekday_from_code(&m.day),
            start_minutes: m.start_time.as_deref().and_then(parse_display_time),
            end_minutes: m.end_time.as_deref().and_then(parse_display_time),
            mode: m.mode.clone(),
        }
    }

    pub fn is_online_async(&self) -> bool {
        self.day.is_none() && self.mode.eq_ignore_ascii_case(ONLINE_ASYNC_MODE)
    }

    /// The interval as a checkable span, or `None` when it must be ignored.
    /// A single bad endpoint excludes the whole interval.
    pub fn span(&self) -> Option<Span> {
        let day = self.day?;
        let start = self.start_minutes?;
        let end = self.end_minutes?;
        (start < end && end <= MINUTES_PER_DAY).then_some(Span { day, start, end })
    }
}

pub fn intervals_of(meetings: &[MeetingTime]) -> Vec<MeetingInterval> {
    meetings.iter().map(MeetingInterval::from_meeting).collect()
}

/// One overlapping pair found by [`find_conflicts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    /// Index into the scheduled sets.
    pub scheduled_index: usize,
    pub candidate: Span,
    pub existing: Span,
}

fn spans(intervals: &[MeetingInterval]) -> Vec<Span> {
    intervals.iter().filter_map(MeetingInterval::span).collect()
}

/// True when any candidate interval overlaps any scheduled interval on the
/// same day. Stops at the first overlap.
pub fn has_conflict<'a, S>(candidate: &[MeetingInterval], scheduled: S) -> bool
where
    S: IntoIterator<Item = &'a [MeetingInterval]>,
{
    let candidate = spans(candidate);
    if candidate.is_empty() {
        return false;
    }

    scheduled.into_iter().any(|set| {
        set.iter()
            .filter_map(MeetingInterval::span)
            .any(|e| candidate.iter().any(|c| c.overlaps(&e)))
    })
}

/// Every overlapping (candidate, existing) pair across all scheduled sets.
pub fn find_conflicts<'a, S>(candidate: &[MeetingInterval], scheduled: S) -> Vec<Conflict>
where
    S: IntoIterator<Item = &'a [MeetingInterval]>,
{
    let candidate = spans(candidate);
    let mut out = Vec::new();
    if candidate.is_empty() {
        return out;
    }

    for (scheduled_index, set) in scheduled.into_iter().enumerate() {
        for existing in spans(set) {
            for c in candidate.iter().filter(|c| c.overlaps(&existing)) {
                out.push(Conflict {
                    scheduled_index,
                    candidate: *c,
                    existing,
                });
            }
        }
    }
    out
}
