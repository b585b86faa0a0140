// PartitionPaths maps partitions and part files to paths under the output root.
//
// The layout mirrors the raw zone of the lake, so the tree can be copied
// into the bucket's `raw/` prefix as is:
//
//	<root>
//	└── day=<YYYY-MM-DD>
//	    └── source=<payments|billing|crm|erp|support>
//	        ├── part-00000.json
//	        └── part-00001.json
//
// Part files are staged as `.part-<index>.json.tmp` in the same directory and
// renamed into place once complete. Hidden names are skipped when listing.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use common::Source;

use crate::config::DAY_FORMAT;

const DAY_PREFIX: &str = "day=";
const SOURCE_PREFIX: &str = "source=";
const PART_PREFIX: &str = "part-";
const PART_SUFFIX: &str = ".json";

#[derive(Clone, Debug)]
pub struct PartitionPaths {
    root: PathBuf,
}

impl PartitionPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        PartitionPaths { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the directory of one day,
    /// (e.g. `<root>/day=2025-01-31`).
    pub fn day_path(&self, day: NaiveDate) -> PathBuf {
        self.root.join(day_dir_name(day))
    }

    /// Returns the directory of one partition,
    /// (e.g. `<root>/day=2025-01-31/source=crm`).
    pub fn partition_path(&self, day: NaiveDate, source: Source) -> PathBuf {
        self.day_path(day).join(source_dir_name(source))
    }

    /// Returns the path of a single part file,
    /// (e.g. `<root>/day=2025-01-31/source=crm/part-00000.json`).
    pub fn part_path(&self, day: NaiveDate, source: Source, index: usize) -> PathBuf {
        self.partition_path(day, source).join(part_file_name(index))
    }

    /// Returns the staging path of a part file while it is being written,
    /// (e.g. `<root>/day=2025-01-31/source=crm/.part-00000.json.tmp`).
    pub fn staging_path(&self, day: NaiveDate, source: Source, index: usize) -> PathBuf {
        self.partition_path(day, source)
            .join(format!(".{}.tmp", part_file_name(index)))
    }
}

pub fn day_dir_name(day: NaiveDate) -> String {
    format!("{DAY_PREFIX}{}", day.format(DAY_FORMAT))
}

pub fn source_dir_name(source: Source) -> String {
    format!("{SOURCE_PREFIX}{source}")
}

pub fn part_file_name(index: usize) -> String {
    format!("{PART_PREFIX}{index:05}{PART_SUFFIX}")
}

pub fn parse_day_dir(name: &str) -> Option<NaiveDate> {
    let raw = name.strip_prefix(DAY_PREFIX)?;
    NaiveDate::parse_from_str(raw, DAY_FORMAT).ok()
}

pub fn parse_source_dir(name: &str) -> Option<Source> {
    name.strip_prefix(SOURCE_PREFIX)?.parse().ok()
}

pub fn parse_part_file(name: &str) -> Option<usize> {
    let digits = name.strip_prefix(PART_PREFIX)?.strip_suffix(PART_SUFFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
