//! The user's working schedule: committed sections, the collision toggle and
//! named calendars saved from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::catalog::{CourseRecord, Section};
use crate::conflict::{MeetingInterval, find_conflicts, intervals_of};

pub const DEFAULT_CALENDAR: &str = "default";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("{0} is already in the schedule")]
    AlreadyScheduled(String),

    #[error("{id} conflicts with {with} (enable collisions to add it anyway)")]
    Conflict { id: String, with: String },

    #[error("{0} is not in the schedule")]
    NotScheduled(String),

    #[error("section {section} not found for {course}")]
    UnknownSection { course: String, section: String },

    #[error("no saved calendar named '{0}'")]
    UnknownCalendar(String),

    #[error("a calendar named '{0}' already exists")]
    CalendarExists(String),
}

/// A course committed to one section. Immutable once added; changing the
/// section means removing and adding again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSelection {
    pub course: CourseRecord,
    pub section: Section,
    pub intervals: Vec<MeetingInterval>,
}

impl ScheduledSelection {
    pub fn new(mut course: CourseRecord, section: Section) -> Self {
        let intervals = intervals_of(&section.meeting_times);
        // The chosen section is carried separately; drop the rest.
        course.sections.clear();
        Self {
            course,
            section,
            intervals,
        }
    }

    /// Pick `section_key` (index or number) out of `course`.
    pub fn from_course(course: &CourseRecord, section_key: &str) -> Result<Self, ScheduleError> {
        let section = course
            .section(section_key)
            .cloned()
            .ok_or_else(|| ScheduleError::UnknownSection {
                course: course.course_string.clone(),
                section: section_key.to_string(),
            })?;
        Ok(Self::new(course.clone(), section))
    }

    pub fn id(&self) -> &str {
        &self.course.course_string
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub selections: Vec<ScheduledSelection>,
    #[serde(default)]
    pub allow_collisions: bool,
    #[serde(default)]
    pub saved: BTreeMap<String, Vec<ScheduledSelection>>,
    #[serde(default = "default_calendar")]
    pub current: String,
}

fn default_calendar() -> String {
    DEFAULT_CALENDAR.to_string()
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            selections: Vec::new(),
            allow_collisions: false,
            saved: BTreeMap::new(),
            current: default_calendar(),
        }
    }
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selections.iter().any(|s| s.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&ScheduledSelection> {
        self.selections.iter().find(|s| s.id() == id)
    }

    pub fn set_allow_collisions(&mut self, allow: bool) {
        self.allow_collisions = allow;
    }

    /// Ids of scheduled selections that overlap `candidate`. Always empty
    /// when collisions are allowed.
    pub fn conflicts_with(&self, candidate: &[MeetingInterval]) -> Vec<&str> {
        if self.allow_collisions {
            return Vec::new();
        }
        let sets = self.selections.iter().map(|s| s.intervals.as_slice());
        let mut ids: Vec<&str> = find_conflicts(candidate, sets)
            .into_iter()
            .map(|c| self.selections[c.scheduled_index].id())
            .collect();
        ids.dedup();
        ids
    }

    pub fn add(&mut self, selection: ScheduledSelection) -> Result<(), ScheduleError> {
        let id = selection.id().to_string();
        if self.contains(&id) {
            return Err(ScheduleError::AlreadyScheduled(id));
        }
        if let Some(with) = self.conflicts_with(&selection.intervals).first() {
            return Err(ScheduleError::Conflict {
                id,
                with: with.to_string(),
            });
        }
        debug!(id = %id, section = %selection.section.index, "scheduled");
        self.selections.push(selection);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<ScheduledSelection, ScheduleError> {
        let pos = self
            .selections
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| ScheduleError::NotScheduled(id.to_string()))?;
        Ok(self.selections.remove(pos))
    }

    pub fn calendar_names(&self) -> Vec<&str> {
        self.saved.keys().map(String::as_str).collect()
    }

    /// Snapshot the current selections under `name`, which becomes current.
    pub fn save_calendar(&mut self, name: &str) {
        self.saved.insert(name.to_string(), self.selections.clone());
        self.current = name.to_string();
    }

    pub fn load_calendar(&mut self, name: &str) -> Result<(), ScheduleError> {
        let saved = self
            .saved
            .get(name)
            .ok_or_else(|| ScheduleError::UnknownCalendar(name.to_string()))?;
        self.selections = saved.clone();
        self.current = name.to_string();
        Ok(())
    }

    /// Deleting the current calendar also clears the working schedule.
    pub fn delete_calendar(&mut self, name: &str) -> Result<(), ScheduleError> {
        if self.saved.remove(name).is_none() {
            return Err(ScheduleError::UnknownCalendar(name.to_string()));
        }
        if self.current == name {
            self.selections.clear();
            self.current = default_calendar();
        }
        Ok(())
    }

    pub fn rename_calendar(&mut self, old: &str, new: &str) -> Result<(), ScheduleError> {
        if old == new {
            return Ok(());
        }
        if self.saved.contains_key(new) {
            return Err(ScheduleError::CalendarExists(new.to_string()));
        }
        let data = self
            .saved
            .remove(old)
            .ok_or_else(|| ScheduleError::UnknownCalendar(old.to_string()))?;
        self.saved.insert(new.to_string(), data);
        if self.current == old {
            self.current = new.to_string();
        }
        Ok(())
    }
}
