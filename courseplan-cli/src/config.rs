use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use courseplan_ingest::{CatalogRequest, DEFAULT_BASE_URL, Term};

use crate::state::ensure_courseplan_home;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogSection,
    pub search: SearchSection,
    pub calendar: CalendarSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    pub base_url: String,
    pub year: i32,
    /// Term code (0, 1, 7, 9) or name ("fall")
    pub term: String,
    /// NB, NK or CM
    pub campus: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSection {
    pub timezone: String,
    pub semester_start: Option<NaiveDate>,
    pub semester_end: Option<NaiveDate>,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            year: 2026,
            term: "9".to_string(),
            campus: "NB".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for SearchSection {
    fn default() -> Self {
        Self { limit: 20 }
    }
}

impl Default for CalendarSection {
    fn default() -> Self {
        Self {
            timezone: "America/New_York".to_string(),
            semester_start: None,
            semester_end: None,
        }
    }
}

impl Config {
    /// Catalog snapshot to use, with any command-line overrides applied.
    pub fn catalog_request(
        &self,
        year: Option<i32>,
        term: Option<&str>,
        campus: Option<&str>,
    ) -> Result<CatalogRequest> {
        let term: Term = term.unwrap_or(&self.catalog.term).parse()?;
        Ok(CatalogRequest::new(
            year.unwrap_or(self.catalog.year),
            term,
            campus.unwrap_or(&self.catalog.campus),
        ))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.timeout_secs.max(1))
    }

    pub fn timezone(&self) -> Result<Tz> {
        let name = &self.calendar.timezone;
        name.parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("invalid calendar.timezone '{name}': {e}"))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_courseplan_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).context("parse config.toml")
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    println!("# {}", config_path()?.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [catalog]
            campus = "NK"

            [calendar]
            semester_start = "2026-09-02"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.catalog.campus, "NK");
        assert_eq!(cfg.catalog.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.search.limit, 20);
        assert_eq!(cfg.calendar.semester_start, NaiveDate::from_ymd_opt(2026, 9, 2));
        assert_eq!(cfg.calendar.semester_end, None);
    }

    #[test]
    fn test_catalog_request_overrides() {
        let cfg = Config::default();
        let req = cfg.catalog_request(Some(2027), Some("spring"), None).unwrap();
        assert_eq!(req.cache_key(), "2027-1-NB");
        assert!(cfg.catalog_request(None, Some("5"), None).is_err());
    }

    #[test]
    fn test_default_round_trips_through_toml() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back, Config::default());
        assert!(Config::default().timezone().is_ok());
    }
}
