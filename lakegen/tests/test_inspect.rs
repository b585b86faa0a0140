use std::fs;

use chrono::NaiveDate;
use common::Source;
use lakegen::config::GenerateConfig;
use lakegen::inspect::inspect;
use lakegen::run;
use lakegen::storage::FilesystemStorage;
use tempfile::tempdir;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()
}

#[tokio::test]
async fn test_inspect_counts_generated_tree() {
    let tmp_dir = tempdir().unwrap();
    let mut config = GenerateConfig::new(tmp_dir.path(), day());
    config.days = 3;
    config.total_events = 52;
    config.events_per_file = 5;
    run::generate(&config).await.unwrap();

    let storage = FilesystemStorage::new(tmp_dir.path());
    let report = inspect(&storage, true).await.unwrap();

    assert!(report.problems.is_empty(), "{:?}", report.problems);
    assert_eq!(report.partitions.len(), 15);
    assert_eq!(report.total_events(), 156);

    // oldest day first, sources in canonical order
    let first = &report.partitions[0];
    assert_eq!(first.day, NaiveDate::from_ymd_opt(2025, 7, 2).unwrap());
    assert_eq!(first.source, Source::Payments);
    assert_eq!(first.events, 11);
    assert_eq!(first.files, 3);
    assert_eq!(report.partitions[4].source, Source::Support);
    assert_eq!(report.partitions[4].events, 10);
}

#[tokio::test]
async fn test_inspect_reports_malformed_lines() {
    let tmp_dir = tempdir().unwrap();
    let mut config = GenerateConfig::new(tmp_dir.path(), day());
    config.total_events = 10;
    config.sources = vec![Source::Crm];
    run::generate(&config).await.unwrap();

    let part = tmp_dir.path().join("day=2025-07-04/source=crm/part-00000.json");
    let mut content = fs::read_to_string(&part).unwrap();
    content.push_str("{\"event_id\":\"x\",\"event_type\":\"login\",\"source_system\":\"crm\"}\n");
    content.push_str("not json\n");
    fs::write(&part, content).unwrap();

    let storage = FilesystemStorage::new(tmp_dir.path());

    let unchecked = inspect(&storage, false).await.unwrap();
    assert!(unchecked.problems.is_empty());
    assert_eq!(unchecked.total_events(), 12);

    let checked = inspect(&storage, true).await.unwrap();
    let lines: Vec<_> = checked.problems.iter().map(|p| p.line).collect();
    assert_eq!(lines, vec![11, 12]);
    assert!(checked.problems[0].reason.contains("amount"));
    assert_eq!(checked.problems[1].path, part);
}

#[tokio::test]
async fn test_inspect_flags_records_in_the_wrong_partition() {
    let tmp_dir = tempdir().unwrap();
    let mut config = GenerateConfig::new(tmp_dir.path(), day());
    config.total_events = 4;
    config.sources = vec![Source::Erp, Source::Support];
    run::generate(&config).await.unwrap();

    let from = tmp_dir.path().join("day=2025-07-04/source=erp/part-00000.json");
    let to = tmp_dir.path().join("day=2025-07-04/source=support/part-00001.json");
    fs::copy(&from, &to).unwrap();

    let report = inspect(&FilesystemStorage::new(tmp_dir.path()), true)
        .await
        .unwrap();
    assert_eq!(report.problems.len(), 2);
    assert!(report.problems.iter().all(|p| p.path == to));
    assert!(report.problems[0].reason.contains("does not match"));
}

#[tokio::test]
async fn test_inspect_empty_root() {
    let tmp_dir = tempdir().unwrap();
    let report = inspect(&FilesystemStorage::new(tmp_dir.path()), true)
        .await
        .unwrap();
    assert!(report.partitions.is_empty());
    assert_eq!(report.total_files(), 0);
}

#[tokio::test]
async fn test_inspect_survives_non_utf8_lines() {
    let tmp_dir = tempdir().unwrap();
    let mut config = GenerateConfig::new(tmp_dir.path(), day());
    config.total_events = 10;
    config.sources = vec![Source::Crm];
    run::generate(&config).await.unwrap();

    let part = tmp_dir.path().join("day=2025-07-04/source=crm/part-00000.json");
    let mut content = fs::read(&part).unwrap();
    content.extend_from_slice(b"\xff\xfe garbage\n");
    fs::write(&part, content).unwrap();

    let storage = FilesystemStorage::new(tmp_dir.path());

    let unchecked = inspect(&storage, false).await.unwrap();
    assert!(unchecked.problems.is_empty());
    assert_eq!(unchecked.total_events(), 11);

    let checked = inspect(&storage, true).await.unwrap();
    assert_eq!(checked.total_events(), 11);
    assert_eq!(checked.problems.len(), 1);
    assert_eq!(checked.problems[0].line, 11);
    assert_eq!(checked.problems[0].path, part);
    assert!(checked.problems[0].reason.contains("UTF-8"));
}
