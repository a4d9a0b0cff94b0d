//! Schedule-of-classes (SOC) JSON → `CourseRecord`.
//!
//! The provider's payload is a JSON array of courses. Every field is treated
//! as optional; a course that still fails to deserialize is skipped with a
//! warning rather than failing the whole batch.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use courseplan_core::{
    CoreCode, CourseRecord, MeetingTime, ONLINE_ASYNC_MODE, Section, campus_name,
    military_to_display, weekday_from_code, weekday_name,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCourse {
    pub course_string: Option<String>,
    pub title: Option<String>,
    pub expanded_title: Option<String>,
    pub subject: Option<String>,
    pub subject_description: Option<String>,
    pub course_number: Option<String>,
    pub course_description: Option<String>,
    pub credits: Option<Value>,
    pub credits_object: Option<RawDescribed>,
    pub school: Option<RawDescribed>,
    pub campus_locations: Vec<RawDescribed>,
    pub pre_req_notes: Option<String>,
    pub core_codes: Vec<RawCoreCode>,
    pub sections: Vec<RawSection>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawDescribed {
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCoreCode {
    pub core_code: Option<String>,
    pub core_code_description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawInstructor {
    Name(String),
    Object { name: Option<String> },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawComments {
    Text(String),
    List(Vec<RawDescribed>),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSection {
    pub number: Option<String>,
    pub index: Option<String>,
    pub instructors: Vec<RawInstructor>,
    pub open_status: Option<bool>,
    pub open_status_text: Option<String>,
    pub comments_text: Option<String>,
    pub comments: Option<RawComments>,
    pub meeting_times: Vec<Option<RawMeeting>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMeeting {
    pub meeting_day: Option<String>,
    pub start_time_military: Option<String>,
    pub end_time_military: Option<String>,
    pub building_code: Option<String>,
    pub room_number: Option<String>,
    pub meeting_mode_desc: Option<String>,
    pub campus_location: Option<String>,
}

fn text(v: Option<String>) -> String {
    v.unwrap_or_default().trim().to_string()
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn credits_text(v: Option<Value>) -> String {
    match v {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

pub fn normalize_meeting(raw: RawMeeting) -> MeetingTime {
    let mode = text(raw.meeting_mode_desc);
    let day_code = text(raw.meeting_day);
    let start = text(raw.start_time_military);
    let end = text(raw.end_time_military);

    // Only online meetings with no day and no times are asynchronous.
    let unscheduled = day_code.is_empty() && start.is_empty() && end.is_empty();
    if unscheduled && mode.eq_ignore_ascii_case(ONLINE_ASYNC_MODE) {
        let campus = text(raw.campus_location);
        return MeetingTime {
            mode,
            campus: if campus.is_empty() {
                "Online".to_string()
            } else {
                campus_name(&campus)
            },
            ..MeetingTime::default()
        };
    }

    let day = weekday_from_code(&day_code)
        .map(|d| weekday_name(d).to_string())
        .unwrap_or(day_code);

    MeetingTime {
        day,
        start_time: military_to_display(&start),
        end_time: military_to_display(&end),
        building: text(raw.building_code),
        room: text(raw.room_number),
        mode,
        campus: campus_name(&text(raw.campus_location)),
    }
}

pub fn normalize_section(raw: RawSection) -> Section {
    let status = non_empty(raw.open_status_text).unwrap_or_else(|| {
        if raw.open_status.unwrap_or(false) {
            "OPEN".to_string()
        } else {
            "CLOSED".to_string()
        }
    });

    let comments = non_empty(raw.comments_text).unwrap_or_else(|| match raw.comments {
        Some(RawComments::Text(s)) => s,
        Some(RawComments::List(items)) => items
            .into_iter()
            .filter_map(|c| non_empty(c.description))
            .collect::<Vec<_>>()
            .join(", "),
        None => String::new(),
    });

    Section {
        number: text(raw.number),
        index: text(raw.index),
        instructors: raw
            .instructors
            .into_iter()
            .map(|i| match i {
                RawInstructor::Name(name) => name,
                RawInstructor::Object { name } => {
                    non_empty(name).unwrap_or_else(|| "TBA".to_string())
                }
            })
            .collect(),
        status,
        comments,
        meeting_times: raw.meeting_times.into_iter().flatten().map(normalize_meeting).collect(),
    }
}

pub fn normalize_course(raw: RawCourse) -> CourseRecord {
    let subject = text(raw.subject);
    let course_number = text(raw.course_number);
    let course_string =
        non_empty(raw.course_string).unwrap_or_else(|| format!("{subject}:{course_number}"));

    CourseRecord {
        course_string,
        title: text(raw.title),
        description: non_empty(raw.course_description)
            .or_else(|| non_empty(raw.expanded_title))
            .unwrap_or_default(),
        subject_description: text(raw.subject_description),
        credits: credits_text(raw.credits),
        credits_description: raw.credits_object.and_then(|c| c.description).unwrap_or_default(),
        school: raw.school.and_then(|s| s.description).unwrap_or_default(),
        campus_locations: raw
            .campus_locations
            .into_iter()
            .filter_map(|l| non_empty(l.description))
            .collect(),
        prerequisites: text(raw.pre_req_notes),
        core_codes: raw
            .core_codes
            .into_iter()
            .map(|c| CoreCode {
                code: text(c.core_code),
                description: text(c.core_code_description),
            })
            .collect(),
        sections: raw.sections.into_iter().map(normalize_section).collect(),
        subject,
        course_number,
    }
}

/// Parse a full SOC `courses.json` payload.
pub fn parse_catalog_json(text: &str) -> Result<Vec<CourseRecord>> {
    let items: Vec<Value> =
        serde_json::from_str(text).context("catalog payload is not a JSON array")?;
    let total = items.len();

    let mut out = Vec::with_capacity(total);
    for (i, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<RawCourse>(item) {
            Ok(raw) => out.push(normalize_course(raw)),
            Err(e) => warn!(position = i, error = %e, "skipping malformed course"),
        }
    }

    debug!(total, parsed = out.len(), "parsed catalog");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use courseplan_core::{MeetingInterval, has_conflict, intervals_of};

    const SAMPLE: &str = r#"[
      {
        "courseString": "01:198:111",
        "title": "INTRO COMPUTER SCI",
        "subject": "198",
        "subjectDescription": "Computer Science",
        "courseNumber": "111",
        "courseDescription": null,
        "expandedTitle": "INTRODUCTION TO COMPUTER SCIENCE",
        "credits": 4.0,
        "creditsObject": {"description": "4.0 credits"},
        "school": {"description": "School of Arts and Sciences"},
        "campusLocations": [{"description": "Busch"}],
        "coreCodes": [{"coreCode": "QQ", "coreCodeDescription": "Quantitative"}],
        "sections": [
          {
            "number": "01",
            "index": "09214",
            "instructors": [{"name": "CENTENO, ANA"}],
            "openStatus": true,
            "comments": [{"description": "Honors"}, {"description": "Busch only"}],
            "meetingTimes": [
              {"meetingDay": "M", "startTimeMilitary": "1020", "endTimeMilitary": "1140",
               "buildingCode": "HLL", "roomNumber": "114", "meetingModeDesc": "LEC",
               "campusLocation": "BUS"},
              {"meetingDay": "H", "startTimeMilitary": "1020", "endTimeMilitary": "1140",
               "meetingModeDesc": "LEC", "campusLocation": "LIV"},
              null
            ]
          },
          {
            "number": "90",
            "index": "09299",
            "instructors": ["TBA"],
            "openStatus": false,
            "meetingTimes": [
              {"meetingDay": "", "meetingModeDesc": "ONLINE INSTRUCTION(INTERNET)",
               "campusLocation": "ONL"}
            ]
          }
        ]
      },
      {"subject": "640", "courseNumber": "151", "title": "CALC I"},
      "not a course"
    ]"#;

    #[test]
    fn test_parse_sample() {
        let courses = parse_catalog_json(SAMPLE).unwrap();
        assert_eq!(courses.len(), 2);

        let c = &courses[0];
        assert_eq!(c.course_string, "01:198:111");
        assert_eq!(c.description, "INTRODUCTION TO COMPUTER SCIENCE");
        assert_eq!(c.credits, "4.0");
        assert_eq!(c.school, "School of Arts and Sciences");
        assert_eq!(c.core_codes[0].code, "QQ");

        let s = &c.sections[0];
        assert_eq!(s.status, "OPEN");
        assert_eq!(s.comments, "Honors, Busch only");
        assert_eq!(s.instructors, vec!["CENTENO, ANA"]);
        assert_eq!(s.meeting_times.len(), 2);

        let m = &s.meeting_times[0];
        assert_eq!(m.day, "Monday");
        assert_eq!(m.start_time.as_deref(), Some("10:20 AM"));
        assert_eq!(m.end_time.as_deref(), Some("11:40 AM"));
        assert_eq!(m.campus, "Busch");
        assert_eq!(s.meeting_times[1].day, "Thursday");
        assert_eq!(s.meeting_times[1].campus, "Livingston");
    }

    #[test]
    fn test_online_section_has_no_times() {
        let courses = parse_catalog_json(SAMPLE).unwrap();
        let online = &courses[0].sections[1];
        assert_eq!(online.status, "CLOSED");
        assert_eq!(online.instructors, vec!["TBA"]);
        let m = &online.meeting_times[0];
        assert!(m.is_online_async());
        assert_eq!(m.start_time, None);
        assert_eq!(m.campus, "Online");
    }

    #[test]
    fn test_scheduled_online_meeting_keeps_day_and_times() {
        let m = normalize_meeting(RawMeeting {
            meeting_day: Some("M".to_string()),
            start_time_military: Some("1020".to_string()),
            end_time_military: Some("1140".to_string()),
            meeting_mode_desc: Some(ONLINE_ASYNC_MODE.to_string()),
            campus_location: Some("ONL".to_string()),
            ..RawMeeting::default()
        });
        assert_eq!(m.day, "Monday");
        assert_eq!(m.start_time.as_deref(), Some("10:20 AM"));
        assert_eq!(m.end_time.as_deref(), Some("11:40 AM"));
        assert_eq!(m.mode, ONLINE_ASYNC_MODE);
        assert!(!m.is_online_async());

        let online = intervals_of(std::slice::from_ref(&m));
        let lecture = [MeetingInterval::new(Weekday::Mon, "10:00 AM", "11:00 AM", "LEC")];
        assert!(has_conflict(&online, [lecture.as_slice()]));
    }

    #[test]
    fn test_missing_course_string_is_derived() {
        let courses = parse_catalog_json(SAMPLE).unwrap();
        assert_eq!(courses[1].course_string, "640:151");
        assert!(courses[1].sections.is_empty());
    }

    #[test]
    fn test_not_an_array() {
        assert!(parse_catalog_json(r#"{"error": "nope"}"#).is_err());
    }
}
