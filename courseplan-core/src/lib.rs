//! courseplan-core: catalog model, course search and schedule conflict checks
//!
//! Everything here is pure and synchronous. Callers hand in full snapshots
//! (course lists, meeting sets) and get plain values back.

pub mod catalog;
pub mod conflict;
pub mod lookup;
pub mod matcher;
pub mod query;
pub mod schedule;
pub mod time;

pub use catalog::{CoreCode, CourseRecord, MeetingTime, ONLINE_ASYNC_MODE, Section};
pub use conflict::{Conflict, MeetingInterval, Span, find_conflicts, has_conflict, intervals_of};
pub use lookup::{campus_name, resolve_subject, weekday_from_code, weekday_name};
pub use matcher::{
    ScoredMatch, Tier, dedupe, expand_sections, match_courses, score_courses, search,
    search_courses,
};
pub use query::{ParsedQuery, classify};
pub use schedule::{DEFAULT_CALENDAR, Schedule, ScheduleError, ScheduledSelection};
pub use time::{military_to_display, minutes_to_display, parse_display_time};
