use anyhow::Result;
use clap::{Subcommand, ValueEnum};

use courseplan_core::{
    Schedule, ScheduledSelection, Span, find_conflicts, minutes_to_display, weekday_name,
};

use crate::catalog::{CatalogArgs, load_catalog, select_section};
use crate::config::Config;
use crate::state::{read_schedule, write_schedule};

#[derive(Subcommand, Debug)]
pub enum ScheduleCommand {
    /// Commit a course to one section
    Add {
        /// Course string or "CS 111" style code
        course: String,

        /// Registration index (or section number)
        #[arg(long)]
        section: String,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Drop a scheduled course
    Remove { id: String },

    /// Show the working schedule
    List,

    /// Report what a section would collide with, without adding it
    Check {
        course: String,

        #[arg(long)]
        section: String,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Allow or forbid overlapping sections
    Collisions {
        #[arg(value_enum)]
        state: Toggle,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    On,
    Off,
}

pub async fn run(cmd: ScheduleCommand, cfg: &Config) -> Result<()> {
    match cmd {
        ScheduleCommand::Add {
            course,
            section,
            catalog,
        } => add(&course, &section, &catalog, cfg).await,
        ScheduleCommand::Remove { id } => remove(&id),
        ScheduleCommand::List => list(),
        ScheduleCommand::Check {
            course,
            section,
            catalog,
        } => check(&course, &section, &catalog, cfg).await,
        ScheduleCommand::Collisions { state } => collisions(state),
    }
}

async fn selection_for(
    key: &str,
    section: &str,
    args: &CatalogArgs,
    cfg: &Config,
) -> Result<ScheduledSelection> {
    let courses = load_catalog(args, cfg).await?;
    select_section(&courses, key, section)
}

async fn add(key: &str, section: &str, args: &CatalogArgs, cfg: &Config) -> Result<()> {
    let selection = selection_for(key, section, args, cfg).await?;
    let mut schedule = read_schedule()?;

    let id = selection.id().to_string();
    let index = selection.section.index.clone();
    schedule.add(selection)?;
    write_schedule(&schedule)?;

    println!("Added {id} (index {index})");
    Ok(())
}

fn remove(id: &str) -> Result<()> {
    let mut schedule = read_schedule()?;
    let removed = schedule.remove(id)?;
    write_schedule(&schedule)?;
    println!("Removed {} {}", removed.id(), removed.course.title);
    Ok(())
}

fn list() -> Result<()> {
    let schedule = read_schedule()?;
    print!("{}", render_schedule(&schedule));
    Ok(())
}

async fn check(key: &str, section: &str, args: &CatalogArgs, cfg: &Config) -> Result<()> {
    let candidate = selection_for(key, section, args, cfg).await?;
    let schedule = read_schedule()?;

    let sets = schedule.selections.iter().map(|s| s.intervals.as_slice());
    let conflicts = find_conflicts(&candidate.intervals, sets);

    if conflicts.is_empty() {
        println!("{} (index {}) fits the schedule", candidate.id(), candidate.section.index);
        return Ok(());
    }

    for c in &conflicts {
        let other = &schedule.selections[c.scheduled_index];
        println!(
            "{} {} overlaps {} {}",
            candidate.id(),
            span_label(&c.candidate),
            other.id(),
            span_label(&c.existing)
        );
    }
    if schedule.allow_collisions {
        println!("(collisions are on; it can still be added)");
    }
    Ok(())
}

fn collisions(state: Toggle) -> Result<()> {
    let mut schedule = read_schedule()?;
    schedule.set_allow_collisions(state == Toggle::On);
    write_schedule(&schedule)?;
    println!(
        "Collisions {}",
        if schedule.allow_collisions { "allowed" } else { "blocked" }
    );
    Ok(())
}

fn span_label(s: &Span) -> String {
    format!(
        "{} {}-{}",
        weekday_name(s.day),
        minutes_to_display(s.start),
        minutes_to_display(s.end)
    )
}

pub fn render_schedule(schedule: &Schedule) -> String {
    let mut out = format!(
        "Calendar: {} | collisions {}\n",
        schedule.current,
        if schedule.allow_collisions { "on" } else { "off" }
    );
    if schedule.selections.is_empty() {
        out.push_str("(empty)\n");
        return out;
    }
    for sel in &schedule.selections {
        out.push_str(&format!(
            "{}  {}  section {} (index {})\n",
            sel.id(),
            sel.course.title,
            sel.section.number,
            sel.section.index
        ));
        for m in &sel.section.meeting_times {
            out.push_str(&format!("    {}\n", m.summary()));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use courseplan_core::{CourseRecord, MeetingTime, Section};

    #[test]
    fn test_span_label() {
        let s = Span {
            day: Weekday::Wed,
            start: 10 * 60 + 20,
            end: 11 * 60 + 40,
        };
        assert_eq!(span_label(&s), "Wednesday 10:20 AM-11:40 AM");
    }

    #[test]
    fn test_render_schedule() {
        let mut schedule = Schedule::new();
        assert!(render_schedule(&schedule).contains("(empty)"));

        let course = CourseRecord::new("01:198:111", "INTRO COMPUTER SCI").with_section(Section {
            number: "01".to_string(),
            index: "09214".to_string(),
            meeting_times: vec![MeetingTime {
                day: "Monday".to_string(),
                start_time: Some("10:20 AM".to_string()),
                end_time: Some("11:40 AM".to_string()),
                ..MeetingTime::default()
            }],
            ..Section::default()
        });
        schedule
            .add(ScheduledSelection::from_course(&course, "09214").unwrap())
            .unwrap();

        let out = render_schedule(&schedule);
        assert!(out.starts_with("Calendar: default | collisions off"));
        assert!(out.contains("01:198:111  INTRO COMPUTER SCI  section 01 (index 09214)"));
        assert!(out.contains("Monday 10:20 AM-11:40 AM"));
    }
}
