use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use courseplan_core::Schedule;

/// `$COURSEPLAN_HOME`, or `~/.courseplan`.
pub fn courseplan_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("COURSEPLAN_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".courseplan"))
}

pub fn ensure_courseplan_home() -> Result<PathBuf> {
    let dir = courseplan_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn schedule_path() -> Result<PathBuf> {
    Ok(ensure_courseplan_home()?.join("schedule.json"))
}

pub fn catalog_cache_path(key: &str) -> Result<PathBuf> {
    let dir = ensure_courseplan_home()?.join("catalog");
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir.join(format!("{key}.json")))
}

pub fn read_schedule() -> Result<Schedule> {
    read_schedule_from(&schedule_path()?)
}

pub fn write_schedule(schedule: &Schedule) -> Result<()> {
    write_schedule_to(&schedule_path()?, schedule)
}

pub fn read_schedule_from(path: &Path) -> Result<Schedule> {
    if !path.exists() {
        return Ok(Schedule::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn write_schedule_to(path: &Path, schedule: &Schedule) -> Result<()> {
    let json = serde_json::to_string_pretty(schedule).context("serialize schedule")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
