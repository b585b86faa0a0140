use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use common::Source;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::config::GenerateConfig;
use crate::error::{GenError, Result};
use crate::generator::RecordGenerator;
use crate::plan::{self, PartitionPlan};
use crate::storage::{FilesystemStorage, PartitionPaths, Storage};

/// Outcome of one generated partition.
#[derive(Clone, Debug)]
pub struct PartitionReport {
    pub day: NaiveDate,
    pub source: Source,
    pub events: u64,
    /// Empty on a dry run.
    pub files: Vec<PathBuf>,
}

#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    /// In plan order: day (newest first), then source.
    pub partitions: Vec<PartitionReport>,
}

impl RunSummary {
    pub fn total_events(&self) -> u64 {
        self.partitions.iter().map(|p| p.events).sum()
    }

    pub fn files_written(&self) -> usize {
        self.partitions.iter().map(|p| p.files.len()).sum()
    }

    pub fn events_on(&self, day: NaiveDate) -> u64 {
        self.partitions
            .iter()
            .filter(|p| p.day == day)
            .map(|p| p.events)
            .sum()
    }
}

/// Generates every planned partition into the filesystem under `config.out`.
pub async fn generate(config: &GenerateConfig) -> Result<RunSummary> {
    let storage = Arc::new(FilesystemStorage::new(&config.out));
    generate_with(storage, config).await
}

/// Like [`generate`], over any storage. On the first failed partition the
/// remaining tasks are aborted before the error is returned.
pub async fn generate_with(
    storage: Arc<dyn Storage>,
    config: &GenerateConfig,
) -> Result<RunSummary> {
    let plans = plan::plan(config);
    let root = storage.paths().root().to_path_buf();

    if config.dry_run {
        return Ok(dry_run(&plans, storage.paths()));
    }

    storage.create_root().await?;
    info!(
        "generating {} partition(s) under {} with {} job(s), seed {}",
        plans.len(),
        root.display(),
        config.jobs,
        config.seed
    );

    let semaphore = Arc::new(Semaphore::new(config.jobs.max(1)));
    let mut tasks = JoinSet::new();
    for (order, partition) in plans.into_iter().enumerate() {
        let storage = storage.clone();
        let semaphore = semaphore.clone();
        let seed = config.seed;
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let report = write_partition(storage.as_ref(), seed, partition).await?;
            Ok::<_, GenError>((order, report))
        });
    }

    let mut finished = Vec::with_capacity(tasks.len());
    while let Some(task) = tasks.join_next().await {
        // The first `?` handles task join errors, the second handles write errors.
        // Returning early drops `tasks`, which aborts whatever is still running.
        finished.push(task??);
    }
    finished.sort_by_key(|(order, _)| *order);
    let summary = RunSummary {
        partitions: finished.into_iter().map(|(_, report)| report).collect(),
    };

    for day in plan::days_back(config.end_day, config.days) {
        info!(
            "Generated {} events for {} under {}",
            summary.events_on(day),
            day,
            root.display()
        );
    }
    Ok(summary)
}

async fn write_partition(
    storage: &dyn Storage,
    seed: u64,
    partition: PartitionPlan,
) -> Result<PartitionReport> {
    let PartitionPlan { day, source, files } = partition;
    let dir = storage.create_partition(day, source).await?;
    debug!("writing {} part file(s) into {}", files.len(), dir.display());

    let mut generator = RecordGenerator::for_partition(seed, day, source)?;
    let mut report = PartitionReport {
        day,
        source,
        events: 0,
        files: Vec::with_capacity(files.len()),
    };
    for (index, count) in files.into_iter().enumerate() {
        let mut records = (0..count).map(|_| generator.record(day, source));
        let written = storage.write_part(day, source, index, &mut records).await?;
        info!("Wrote {} events -> {}", written.events, written.path.display());
        report.events += written.events;
        report.files.push(written.path);
    }
    Ok(report)
}

fn dry_run(plans: &[PartitionPlan], paths: &PartitionPaths) -> RunSummary {
    let partitions = plans
        .iter()
        .map(|partition| {
            info!(
                "[dry-run] {} event(s) in {} file(s) -> {}",
                partition.events(),
                partition.files.len(),
                paths.partition_path(partition.day, partition.source).display()
            );
            PartitionReport {
                day: partition.day,
                source: partition.source,
                events: partition.events(),
                files: Vec::new(),
            }
        })
        .collect();
    RunSummary { partitions }
}
