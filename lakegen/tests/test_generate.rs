use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use common::{EventRecord, Source};
use lakegen::GenError;
use lakegen::config::GenerateConfig;
use lakegen::run;
use lakegen::storage::{PartLines, PartitionPaths, PartitionRef, Storage, WrittenPart};
use serde_json::Value;
use tempfile::tempdir;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn small_config(out: &Path) -> GenerateConfig {
    let mut config = GenerateConfig::new(out, ymd(2025, 3, 2));
    config.days = 2;
    config.total_events = 103;
    config.events_per_file = 10;
    config.jobs = 4;
    config
}

fn read_json_lines(path: &Path) -> Vec<Value> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_generate_writes_partitioned_layout() {
    let tmp_dir = tempdir().unwrap();
    let root = tmp_dir.path().join("data/raw");
    let config = small_config(&root);

    let summary = run::generate(&config).await.unwrap();

    assert_eq!(summary.partitions.len(), 10);
    assert_eq!(summary.total_events(), 206);
    assert_eq!(summary.events_on(ymd(2025, 3, 2)), 103);
    assert_eq!(summary.events_on(ymd(2025, 3, 1)), 103);

    // 103 over five sources is 21, 21, 21, 20, 20: 3 + 3 + 3 + 2 + 2 files a day
    assert_eq!(summary.files_written(), 26);

    let payments = root.join("day=2025-03-01/source=payments");
    let mut names: Vec<_> = fs::read_dir(&payments)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec!["part-00000.json", "part-00001.json", "part-00002.json"]
    );
    assert_eq!(read_json_lines(&payments.join("part-00002.json")).len(), 1);

    let erp = read_json_lines(&root.join("day=2025-03-02/source=erp/part-00001.json"));
    assert_eq!(erp.len(), 10);
    for record in erp {
        assert_eq!(record["source_system"], "erp");
        assert_eq!(record["event_type"], "gl_posting");
        assert_eq!(record["currency"], "USD");
        assert!(record["timestamp"].as_str().unwrap().starts_with("2025-03-02T"));
        assert!(record["amount"].is_f64());
    }
}

#[tokio::test]
async fn test_output_does_not_depend_on_job_count() {
    let serial_dir = tempdir().unwrap();
    let parallel_dir = tempdir().unwrap();

    let mut serial = small_config(serial_dir.path());
    serial.jobs = 1;
    let mut parallel = small_config(parallel_dir.path());
    parallel.jobs = 8;

    let a = run::generate(&serial).await.unwrap();
    let b = run::generate(&parallel).await.unwrap();
    assert_eq!(a.files_written(), b.files_written());

    for report in &a.partitions {
        for file in &report.files {
            let relative = file.strip_prefix(serial_dir.path()).unwrap();
            assert_eq!(
                fs::read(file).unwrap(),
                fs::read(parallel_dir.path().join(relative)).unwrap(),
                "{} differs",
                relative.display()
            );
        }
    }
}

#[tokio::test]
async fn test_seed_changes_output() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();

    let mut config = small_config(first.path());
    config.days = 1;
    run::generate(&config).await.unwrap();
    config.out = second.path().to_path_buf();
    config.seed = 7;
    run::generate(&config).await.unwrap();

    let part = "day=2025-03-02/source=crm/part-00000.json";
    assert_ne!(
        fs::read(first.path().join(part)).unwrap(),
        fs::read(second.path().join(part)).unwrap()
    );
}

#[tokio::test]
async fn test_event_ids_are_unique() {
    let tmp_dir = tempdir().unwrap();
    let mut config = GenerateConfig::new(tmp_dir.path(), ymd(2025, 4, 30));
    config.total_events = 5_000;

    let summary = run::generate(&config).await.unwrap();

    let mut ids = HashSet::new();
    for report in &summary.partitions {
        for file in &report.files {
            for record in read_json_lines(file) {
                assert!(ids.insert(record["event_id"].as_str().unwrap().to_string()));
            }
        }
    }
    assert_eq!(ids.len(), 5_000);
}

#[tokio::test]
async fn test_zero_events_still_writes_one_file_per_partition() {
    let tmp_dir = tempdir().unwrap();
    let mut config = GenerateConfig::new(tmp_dir.path(), ymd(2025, 1, 1));
    config.total_events = 3;
    config.sources = vec![Source::Billing, Source::Crm, Source::Erp, Source::Support];

    let summary = run::generate(&config).await.unwrap();

    assert_eq!(summary.files_written(), 4);
    let support = tmp_dir
        .path()
        .join("day=2025-01-01/source=support/part-00000.json");
    assert_eq!(fs::read(support).unwrap(), b"");
    assert!(!tmp_dir.path().join("day=2025-01-01/source=payments").exists());
}

#[tokio::test]
async fn test_rerun_overwrites_parts() {
    let tmp_dir = tempdir().unwrap();
    let mut config = small_config(tmp_dir.path());
    config.days = 1;

    run::generate(&config).await.unwrap();
    let part = tmp_dir.path().join("day=2025-03-02/source=billing/part-00000.json");
    let before = fs::read(&part).unwrap();

    run::generate(&config).await.unwrap();
    assert_eq!(fs::read(&part).unwrap(), before);
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let tmp_dir = tempdir().unwrap();
    let root = tmp_dir.path().join("never");
    let mut config = small_config(&root);
    config.dry_run = true;

    let summary = run::generate(&config).await.unwrap();

    assert_eq!(summary.total_events(), 206);
    assert_eq!(summary.files_written(), 0);
    assert!(!root.exists());
}

/// Writes nothing, refuses every partition of `failing` and counts how many
/// partitions were started.
struct FailingStorage {
    paths: PartitionPaths,
    failing: Source,
    started: AtomicUsize,
}

#[async_trait::async_trait]
impl Storage for FailingStorage {
    fn paths(&self) -> &PartitionPaths {
        &self.paths
    }

    async fn create_root(&self) -> lakegen::Result<()> {
        Ok(())
    }

    async fn create_partition(&self, day: NaiveDate, source: Source) -> lakegen::Result<PathBuf> {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        let path = self.paths.partition_path(day, source);
        if source == self.failing {
            return Err(GenError::io(path, io::Error::other("disk full")));
        }
        Ok(path)
    }

    async fn write_part(
        &self,
        day: NaiveDate,
        source: Source,
        index: usize,
        records: &mut (dyn Iterator<Item = EventRecord> + Send),
    ) -> lakegen::Result<WrittenPart> {
        tokio::task::yield_now().await;
        Ok(WrittenPart {
            path: self.paths.part_path(day, source, index),
            events: records.count() as u64,
        })
    }

    async fn list_partitions(&self) -> lakegen::Result<Vec<PartitionRef>> {
        Ok(vec![])
    }

    async fn list_parts(&self, _partition: &PartitionRef) -> lakegen::Result<Vec<PathBuf>> {
        Ok(vec![])
    }

    async fn open_part(&self, path: &Path) -> lakegen::Result<PartLines> {
        Err(GenError::io(path, io::ErrorKind::NotFound.into()))
    }
}

#[tokio::test]
async fn test_failed_partition_stops_remaining_work() {
    let storage = Arc::new(FailingStorage {
        paths: PartitionPaths::new("/nonexistent/raw"),
        failing: Source::Payments,
        started: AtomicUsize::new(0),
    });
    let mut config = GenerateConfig::new("/nonexistent/raw", ymd(2025, 5, 10));
    config.days = 10;
    config.total_events = 50;
    config.jobs = 1;

    // payments of the newest day is the first planned partition of 50
    let err = run::generate_with(storage.clone(), &config)
        .await
        .unwrap_err();
    assert!(matches!(err, GenError::Io { .. }));

    tokio::time::sleep(Duration::from_millis(200)).await;
    let started = storage.started.load(Ordering::SeqCst);
    assert!(started < 10, "{started} partitions started after the failure");
}
