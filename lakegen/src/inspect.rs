//! Partition statistics for an existing raw tree.
//!
//! Inspection is a local sanity check of generated output. It reads what is
//! there and reports it; it never rewrites or removes anything.

use std::path::PathBuf;

use chrono::NaiveDate;
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use common::Source;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::storage::{PartitionRef, Storage};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PartitionStats {
    pub day: NaiveDate,
    pub source: Source,
    pub files: usize,
    pub events: u64,
}

/// A line that does not carry what downstream jobs read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RecordProblem {
    pub path: PathBuf,
    /// 1-based.
    pub line: usize,
    pub reason: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct InspectReport {
    pub partitions: Vec<PartitionStats>,
    pub problems: Vec<RecordProblem>,
}

impl InspectReport {
    pub fn total_files(&self) -> usize {
        self.partitions.iter().map(|p| p.files).sum()
    }

    pub fn total_events(&self) -> u64 {
        self.partitions.iter().map(|p| p.events).sum()
    }

    pub fn render(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["day", "source", "files", "events"]);

        self.partitions.iter().for_each(|stats| {
            table.add_row(vec![
                stats.day.to_string(),
                stats.source.to_string(),
                stats.files.to_string(),
                stats.events.to_string(),
            ]);
        });
        table.add_row(vec![
            "total".to_string(),
            String::new(),
            self.total_files().to_string(),
            self.total_events().to_string(),
        ]);
        table
    }
}

pub async fn inspect(storage: &dyn Storage, validate: bool) -> Result<InspectReport> {
    let mut report = InspectReport::default();
    for partition in storage.list_partitions().await? {
        let stats = inspect_partition(storage, &partition, validate, &mut report.problems).await?;
        report.partitions.push(stats);
    }
    Ok(report)
}

async fn inspect_partition(
    storage: &dyn Storage,
    partition: &PartitionRef,
    validate: bool,
    problems: &mut Vec<RecordProblem>,
) -> Result<PartitionStats> {
    let parts = storage.list_parts(partition).await?;
    let mut events = 0u64;
    for path in &parts {
        let mut lines = storage.open_part(path).await?;
        let mut line_no = 0usize;
        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            if !validate {
                continue;
            }
            let checked = match std::str::from_utf8(line) {
                Ok(text) => check_record(text, partition.source),
                Err(err) => Err(format!("not valid UTF-8: {err}")),
            };
            if let Err(reason) = checked {
                problems.push(RecordProblem {
                    path: path.clone(),
                    line: line_no,
                    reason,
                });
            }
        }
        events += line_no as u64;
    }
    Ok(PartitionStats {
        day: partition.day,
        source: partition.source,
        files: parts.len(),
        events,
    })
}

/// Checks the fields every record must carry, and that it sits in the
/// partition of its own source.
pub fn check_record(line: &str, source: Source) -> std::result::Result<(), String> {
    let value: Value = serde_json::from_str(line).map_err(|err| format!("invalid json: {err}"))?;
    let Value::Object(fields) = value else {
        return Err("not a json object".to_string());
    };

    match fields.get("event_id") {
        Some(Value::String(_)) => {}
        _ => return Err("missing string field `event_id`".to_string()),
    }
    match fields.get("event_type") {
        Some(Value::String(_)) => {}
        _ => return Err("missing string field `event_type`".to_string()),
    }
    match fields.get("amount") {
        Some(Value::Number(_)) => {}
        _ => return Err("missing numeric field `amount`".to_string()),
    }
    match fields.get("source_system").and_then(Value::as_str) {
        Some(found) if found == source.as_str() => Ok(()),
        Some(found) => Err(format!(
            "source_system `{found}` does not match partition `{source}`"
        )),
        None => Err("missing string field `source_system`".to_string()),
    }
}
