use std::num::NonZeroUsize;
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use common::Source;

use crate::cli::{GenerateArgs, InspectArgs};
use crate::error::{GenError, Result};

pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Validated settings of one `generate` run.
#[derive(Clone, Debug)]
pub struct GenerateConfig {
    pub out: PathBuf,
    pub end_day: NaiveDate,
    pub days: u32,
    /// Events per day, split across `sources`.
    pub total_events: u64,
    pub events_per_file: u64,
    pub seed: u64,
    /// Canonical order, no duplicates.
    pub sources: Vec<Source>,
    pub jobs: usize,
    pub dry_run: bool,
}

impl GenerateConfig {
    /// Defaults matching the CLI, for one day of all sources.
    pub fn new(out: impl Into<PathBuf>, end_day: NaiveDate) -> Self {
        GenerateConfig {
            out: out.into(),
            end_day,
            days: 1,
            total_events: 60_000,
            events_per_file: 60_000,
            seed: 42,
            sources: Source::ALL.to_vec(),
            jobs: default_jobs(),
            dry_run: false,
        }
    }

    /// Validates `args`, reporting every problem at once.
    pub fn from_args(args: &GenerateArgs) -> Result<Self> {
        let mut problems = Vec::new();

        let end_day = match args.day.as_deref() {
            Some(raw) => parse_day(raw)
                .map_err(|err| problems.push(err.to_string()))
                .ok(),
            None => Some(Utc::now().date_naive()),
        };

        let sources = resolve_sources(&args.sources)
            .map_err(|err| problems.push(err.to_string()))
            .ok();

        if args.days == 0 {
            problems.push("--days must be at least 1".to_string());
        }
        if args.events_per_file == 0 {
            problems.push("--events-per-file must be at least 1".to_string());
        }
        if args.jobs == Some(0) {
            problems.push("--jobs must be at least 1".to_string());
        }
        if args.out.exists() && !args.out.is_dir() {
            problems.push(format!(
                "output root `{}` exists but is not a directory",
                args.out.display()
            ));
        }

        match (end_day, sources) {
            (Some(end_day), Some(sources)) if problems.is_empty() => Ok(GenerateConfig {
                out: args.out.clone(),
                end_day,
                days: args.days,
                total_events: args.total_events,
                events_per_file: args.events_per_file,
                seed: args.seed,
                sources,
                jobs: args.jobs.unwrap_or_else(default_jobs),
                dry_run: args.dry_run,
            }),
            _ => Err(GenError::InvalidConfig(problems)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct InspectConfig {
    pub root: PathBuf,
    pub validate: bool,
    pub json: bool,
}

impl InspectConfig {
    pub fn from_args(args: &InspectArgs) -> Result<Self> {
        if !args.out.is_dir() {
            return Err(GenError::InvalidConfig(vec![format!(
                "`{}` is not a directory",
                args.out.display()
            )]));
        }
        Ok(InspectConfig {
            root: args.out.clone(),
            validate: args.validate,
            json: args.json,
        })
    }
}

pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

pub fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DAY_FORMAT)
        .map_err(|_| GenError::InvalidDay(raw.to_string()))
}

/// Parses source names into canonical order. No names selects every source.
pub fn resolve_sources(names: &[String]) -> Result<Vec<Source>> {
    if names.iter().all(|name| name.trim().is_empty()) {
        return Ok(Source::ALL.to_vec());
    }
    let mut sources = names
        .iter()
        .filter(|name| !name.trim().is_empty())
        .map(|name| name.parse::<Source>())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    sources.sort();
    sources.dedup();
    Ok(sources)
}
