use anyhow::{Context, Result, bail};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use clap::Subcommand;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

use courseplan_core::time::minutes_to_time;
use courseplan_core::{MeetingInterval, Schedule};

use crate::config::Config;
use crate::state::{read_schedule, write_schedule};

#[derive(Subcommand, Debug)]
pub enum CalendarCommand {
    /// Save the working schedule under a name (it becomes current)
    Save { name: String },

    /// Replace the working schedule with a saved calendar
    Load { name: String },

    Delete { name: String },

    Rename { old: String, new: String },

    List,

    /// Write the working schedule as weekly recurring events (.ics)
    ExportIcs {
        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,

        /// First day of classes (default: calendar.semester_start)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day of classes (default: calendar.semester_end)
        #[arg(long)]
        end: Option<NaiveDate>,
    },
}

pub fn run(cmd: CalendarCommand, cfg: &Config) -> Result<()> {
    match cmd {
        CalendarCommand::Save { name } => update(|s| {
            s.save_calendar(&name);
            println!("Saved {} course(s) as '{name}'", s.selections.len());
            Ok(())
        }),
        CalendarCommand::Load { name } => update(|s| {
            s.load_calendar(&name)?;
            println!("Loaded '{name}' ({} course(s))", s.selections.len());
            Ok(())
        }),
        CalendarCommand::Delete { name } => update(|s| {
            s.delete_calendar(&name)?;
            println!("Deleted '{name}'");
            Ok(())
        }),
        CalendarCommand::Rename { old, new } => update(|s| {
            s.rename_calendar(&old, &new)?;
            println!("Renamed '{old}' to '{new}'");
            Ok(())
        }),
        CalendarCommand::List => list(),
        CalendarCommand::ExportIcs { out, start, end } => export_ics(out, start, end, cfg),
    }
}

/// Read, mutate and write back the stored schedule.
fn update(f: impl FnOnce(&mut Schedule) -> Result<()>) -> Result<()> {
    let mut schedule = read_schedule()?;
    f(&mut schedule)?;
    write_schedule(&schedule)
}

fn list() -> Result<()> {
    let schedule = read_schedule()?;
    let names = schedule.calendar_names();
    if names.is_empty() {
        println!("No saved calendars");
    }
    for name in names {
        let marker = if name == schedule.current { "*" } else { " " };
        let count = schedule.saved.get(name).map_or(0, Vec::len);
        println!("{marker} {name} ({count} course(s))");
    }
    Ok(())
}

fn export_ics(
    out: Option<PathBuf>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    cfg: &Config,
) -> Result<()> {
    let Some(start) = start.or(cfg.calendar.semester_start) else {
        bail!("no semester start: pass --start or set calendar.semester_start in config.toml");
    };
    let Some(end) = end.or(cfg.calendar.semester_end) else {
        bail!("no semester end: pass --end or set calendar.semester_end in config.toml");
    };
    if end < start {
        bail!("semester end {end} is before start {start}");
    }

    let tz = cfg.timezone()?;
    let schedule = read_schedule()?;
    let events = schedule_to_events(&schedule, tz, start, end);
    let ics = events_to_ics(&events);

    match out {
        Some(path) => {
            fs::write(&path, ics).with_context(|| format!("write {}", path.display()))?;
            println!("Wrote {} event(s) to {}", events.len(), path.display());
        }
        None => print!("{ics}"),
    }
    Ok(())
}

/// One weekly-recurring class meeting.
pub struct CalendarEvent {
    pub uid: String,
    pub start_utc: DateTime<Utc>,
    pub end_utc: DateTime<Utc>,
    pub until_utc: DateTime<Utc>,
    pub summary: String,
    pub location: String,
    pub description: String,
}

fn local_to_utc(tz: Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Expand every schedulable meeting into a weekly event starting on its
/// first weekday on/after `start` and repeating through `end`.
pub fn schedule_to_events(
    schedule: &Schedule,
    tz: Tz,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<CalendarEvent> {
    let mut events = Vec::new();
    let until_utc = local_to_utc(tz, end, NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default());

    for sel in &schedule.selections {
        for (i, meeting) in sel.section.meeting_times.iter().enumerate() {
            let Some(span) = MeetingInterval::from_meeting(meeting).span() else {
                continue;
            };

            let offset = (7 + span.day.num_days_from_monday() as i64
                - start.weekday().num_days_from_monday() as i64)
                % 7;
            let first = start + Duration::days(offset);
            if first > end {
                continue;
            }

            let (Some(t0), Some(t1)) = (minutes_to_time(span.start), minutes_to_time(span.end))
            else {
                continue;
            };
            let (Some(start_utc), Some(end_utc), Some(until_utc)) = (
                local_to_utc(tz, first, t0),
                local_to_utc(tz, first, t1),
                until_utc,
            ) else {
                warn!(id = %sel.id(), "meeting falls in a timezone gap, skipped");
                continue;
            };

            let location = [meeting.building.as_str(), meeting.room.as_str()]
                .iter()
                .filter(|s| !s.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(" ");

            events.push(CalendarEvent {
                uid: format!("{}-{}-{}", sel.id(), sel.section.index, i),
                start_utc,
                end_utc,
                until_utc,
                summary: format!("{} {}", sel.id(), sel.course.title),
                location,
                description: format!(
                    "Section {} (index {})\nInstructors: {}\nMode: {}\nCampus: {}",
                    sel.section.number,
                    sel.section.index,
                    sel.section.instructors.join("; "),
                    meeting.mode,
                    meeting.campus
                ),
            });
        }
    }

    events
}

/// Minimal ICS calendar; times are UTC, lines CRLF-terminated.
pub fn events_to_ics(events: &[CalendarEvent]) -> String {
    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");
    let mut s = String::new();
    s.push_str("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//courseplan//EN\r\n");

    for e in events {
        s.push_str("BEGIN:VEVENT\r\n");
        s.push_str(&format!("UID:{}@courseplan\r\n", escape_ics(&e.uid)));
        s.push_str(&format!("DTSTAMP:{stamp}\r\n"));
        s.push_str(&format!("DTSTART:{}\r\n", e.start_utc.format("%Y%m%dT%H%M%SZ")));
        s.push_str(&format!("DTEND:{}\r\n", e.end_utc.format("%Y%m%dT%H%M%SZ")));
        s.push_str(&format!(
            "RRULE:FREQ=WEEKLY;UNTIL={}\r\n",
            e.until_utc.format("%Y%m%dT%H%M%SZ")
        ));
        s.push_str(&format!("SUMMARY:{}\r\n", escape_ics(&e.summary)));
        if !e.location.is_empty() {
            s.push_str(&format!("LOCATION:{}\r\n", escape_ics(&e.location)));
        }
        s.push_str(&format!("DESCRIPTION:{}\r\n", escape_ics(&e.description)));
        s.push_str("END:VEVENT\r\n");
    }

    s.push_str("END:VCALENDAR\r\n");
    s
}

fn escape_ics(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(',', "\\,")
        .replace(';', "\\;")
}
