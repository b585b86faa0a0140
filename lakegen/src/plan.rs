use chrono::{Days, NaiveDate};
use common::Source;

use crate::config::GenerateConfig;

/// Work for one `(day, source)` partition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionPlan {
    pub day: NaiveDate,
    pub source: Source,
    /// Event count of each part file, in file order.
    pub files: Vec<u64>,
}

impl PartitionPlan {
    pub fn events(&self) -> u64 {
        self.files.iter().sum()
    }
}

/// `days` consecutive days ending at `end`, newest first.
pub fn days_back(end: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..u64::from(days))
        .map_while(|offset| end.checked_sub_days(Days::new(offset)))
        .collect()
}

/// Splits a daily total evenly; the first `total % n` sources get one more.
pub fn split_events(total: u64, sources: &[Source]) -> Vec<(Source, u64)> {
    let n = sources.len() as u64;
    if n == 0 {
        return Vec::new();
    }
    let per_source = total / n;
    let remainder = total - per_source * n;
    sources
        .iter()
        .enumerate()
        .map(|(idx, source)| {
            let extra = u64::from((idx as u64) < remainder);
            (*source, per_source + extra)
        })
        .collect()
}

/// Sizes of the part files holding `events`; always at least one file.
pub fn file_sizes(events: u64, events_per_file: u64) -> Vec<u64> {
    let per_file = events_per_file.max(1);
    let n_files = events.div_ceil(per_file).max(1);
    let mut remaining = events;
    (0..n_files)
        .map(|_| {
            let count = per_file.min(remaining);
            remaining -= count;
            count
        })
        .collect()
}

/// Every partition of a run, by day (newest first) then source order.
pub fn plan(config: &GenerateConfig) -> Vec<PartitionPlan> {
    days_back(config.end_day, config.days)
        .into_iter()
        .flat_map(|day| {
            split_events(config.total_events, &config.sources)
                .into_iter()
                .map(move |(source, events)| PartitionPlan {
                    day,
                    source,
                    files: file_sizes(events, config.events_per_file),
                })
        })
        .collect()
}
