//! Time-of-day utilities: 12-hour display strings, military times, minutes.

use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

static DISPLAY_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([0-9]{1,2}):([0-9]{2})\s*(AM|PM)$").expect("display time pattern is valid")
});

/// Parse "H:MM AM|PM" into minutes since midnight.
///
/// Returns `None` for anything that is not a real 12-hour clock time
/// ("N/A", "", "13:00 PM", "9:75 AM").
pub fn parse_display_time(s: &str) -> Option<u16> {
    let caps = DISPLAY_TIME.captures(s.trim())?;
    let mut hours: u16 = caps[1].parse().ok()?;
    let minutes: u16 = caps[2].parse().ok()?;
    if !(1..=12).contains(&hours) || minutes >= 60 {
        return None;
    }

    let pm = caps[3].eq_ignore_ascii_case("PM");
    if pm && hours != 12 {
        hours += 12;
    } else if !pm && hours == 12 {
        hours = 0;
    }

    Some(hours * 60 + minutes)
}

/// Convert a military "HHMM" time ("0940", "1720") to "9:40 AM" / "5:20 PM".
pub fn military_to_display(military: &str) -> Option<String> {
    let military = military.trim();
    if military.is_empty() || !military.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let padded = format!("{military:0>4}");
    let t = NaiveTime::parse_from_str(&padded, "%H%M").ok()?;
    Some(t.format("%-I:%M %p").to_string())
}

/// Render minutes since midnight as "H:MM AM|PM".
pub fn minutes_to_display(minutes: u16) -> String {
    let minutes = u32::from(minutes % MINUTES_PER_DAY);
    match NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0) {
        Some(t) => t.format("%-I:%M %p").to_string(),
        None => "N/A".to_string(),
    }
}

/// Minutes since midnight as a `NaiveTime` (for calendar export).
pub fn minutes_to_time(minutes: u16) -> Option<NaiveTime> {
    let minutes = u32::from(minutes);
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}
