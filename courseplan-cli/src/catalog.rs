use anyhow::{Context, Result, bail};
use clap::Args;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use courseplan_core::{
    CourseRecord, ScheduleError, ScheduledSelection, Section, Tier, expand_sections, search,
};
use courseplan_ingest::{build_client, fetch_catalog_text, parse_catalog_json};

use crate::config::Config;
use crate::state::catalog_cache_path;

/// Where the course catalog comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogArgs {
    /// SOC `courses.json` file to read instead of the cache / network
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    #[arg(long)]
    pub year: Option<i32>,

    /// 0 (Winter), 1 (Spring), 7 (Summer), 9 (Fall), or the term name
    #[arg(long)]
    pub term: Option<String>,

    /// NB, NK or CM
    #[arg(long)]
    pub campus: Option<String>,

    /// Ignore the cached snapshot and download again
    #[arg(long, default_value_t = false)]
    pub refresh: bool,
}

/// Resolve the catalog: explicit file, then cached snapshot, then network
/// (cached afterwards).
pub async fn load_catalog(args: &CatalogArgs, cfg: &Config) -> Result<Vec<CourseRecord>> {
    if let Some(path) = &args.catalog {
        let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        return parse_catalog_json(&text).with_context(|| format!("parsing {}", path.display()));
    }

    let req = cfg.catalog_request(args.year, args.term.as_deref(), args.campus.as_deref())?;
    let cache = catalog_cache_path(&req.cache_key())?;

    if cache.exists() && !args.refresh {
        debug!(path = %cache.display(), "using cached catalog");
        let text = fs::read_to_string(&cache).with_context(|| format!("read {}", cache.display()))?;
        return parse_catalog_json(&text).with_context(|| format!("parsing {}", cache.display()));
    }

    let client = build_client(cfg.timeout())?;
    let text = fetch_catalog_text(&client, &cfg.catalog.base_url, &req).await?;
    let courses = parse_catalog_json(&text)?;

    fs::write(&cache, &text).with_context(|| format!("write {}", cache.display()))?;
    info!(count = courses.len(), path = %cache.display(), "catalog cached");
    Ok(courses)
}

/// The single course a user means by `key` ("01:198:111", "CS 111").
pub fn find_course<'a>(courses: &'a [CourseRecord], key: &str) -> Result<&'a CourseRecord> {
    let hits = search(courses, key);
    match hits.iter().find(|m| m.tier == Tier::Exact) {
        Some(m) => Ok(m.course),
        None if hits.is_empty() => bail!("no course matches '{key}'"),
        None => {
            let close: Vec<&str> = hits
                .iter()
                .take(5)
                .map(|m| m.course.course_string.as_str())
                .collect();
            bail!("'{key}' is not an exact course; closest: {}", close.join(", "))
        }
    }
}

/// Every section of `course` across all catalog records sharing its course string.
pub fn sections_of<'a>(course: &CourseRecord, courses: &'a [CourseRecord]) -> Vec<&'a Section> {
    let mut seen = HashSet::new();
    expand_sections(&[course], courses)
        .into_iter()
        .flat_map(|c| c.sections.iter())
        .filter(|s| seen.insert(s.index.as_str()))
        .collect()
}

/// Commit `key` to a section found anywhere in its merged section list,
/// by registration index first, then section number.
pub fn select_section(
    courses: &[CourseRecord],
    key: &str,
    section_key: &str,
) -> Result<ScheduledSelection> {
    let course = find_course(courses, key)?;
    let sections = sections_of(course, courses);
    let section = sections
        .iter()
        .find(|s| s.index == section_key)
        .or_else(|| sections.iter().find(|s| s.number == section_key))
        .ok_or_else(|| ScheduleError::UnknownSection {
            course: course.course_string.clone(),
            section: section_key.to_string(),
        })?;
    Ok(ScheduledSelection::new(course.clone(), (*section).clone()))
}

pub async fn search_cmd(
    query: &str,
    args: &CatalogArgs,
    cfg: &Config,
    limit: Option<usize>,
    scores: bool,
) -> Result<()> {
    let courses = load_catalog(args, cfg).await?;
    let hits = search(&courses, query);
    let limit = limit.unwrap_or(cfg.search.limit);

    if hits.is_empty() {
        println!("No courses match '{}'", query.trim());
        return Ok(());
    }

    println!("{} match(es) for '{}'\n", hits.len(), query.trim());
    for m in hits.iter().take(limit) {
        let c = m.course;
        if scores {
            println!("[{:?} {:>3}] {}  {}", m.tier, m.score, c.course_string, c.title);
        } else {
            println!("{}  {}", c.course_string, c.title);
        }
    }
    if hits.len() > limit {
        println!("\n... {} more (use --limit)", hits.len() - limit);
    }
    Ok(())
}

pub async fn sections_cmd(key: &str, args: &CatalogArgs, cfg: &Config) -> Result<()> {
    let courses = load_catalog(args, cfg).await?;
    let course = find_course(&courses, key)?;

    println!("{}  {}", course.course_string, course.title);
    if !course.credits.is_empty() {
        println!("Credits: {}", course.credits);
    }
    if !course.prerequisites.is_empty() {
        println!("Prerequisites: {}", course.prerequisites);
    }
    println!();

    let sections = sections_of(course, &courses);
    if sections.is_empty() {
        println!("No sections listed");
    }
    for s in sections {
        let instructors = if s.instructors.is_empty() {
            "TBA".to_string()
        } else {
            s.instructors.join("; ")
        };
        println!("Section {} (index {}) [{}] {}", s.number, s.index, s.status, instructors);
        for m in &s.meeting_times {
            println!("    {}", m.summary());
        }
        if !s.comments.is_empty() {
            println!("    note: {}", s.comments);
        }
    }
    Ok(())
}
