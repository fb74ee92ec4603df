//! Status Classifier
//!
//! Groups status-tagged records by their upper-cased status token and writes
//! one file per status plus a `summary.txt`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;
use crate::output::write_bucket;
use crate::record::Record;

/// Key for records without a status token
pub const UNKNOWN_STATUS: &str = "UNKNOWN";
pub const BY_STATUS_DIR: &str = "by-status";
pub const SUMMARY_FILE: &str = "summary.txt";

/// Group key of a record
pub fn status_key(record: &Record) -> String {
    record
        .status
        .as_deref()
        .map(str::to_uppercase)
        .unwrap_or_else(|| UNKNOWN_STATUS.to_string())
}

/// Domains grouped by status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusBuckets {
    buckets: BTreeMap<String, Vec<String>>,
    total: usize,
}

impl StatusBuckets {
    /// Number of records classified
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, status: &str) -> Option<&[String]> {
        self.buckets.get(status).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.buckets
            .iter()
            .map(|(status, domains)| (status.as_str(), domains.as_slice()))
    }

    pub fn summary(&self) -> StatusSummary {
        StatusSummary {
            total: self.total,
            statuses: self
                .iter()
                .map(|(status, domains)| (status.to_string(), domains.len()))
                .collect(),
        }
    }
}

/// Counts reported after a status pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    /// Per-status counts, ascending by status
    pub statuses: Vec<(String, usize)>,
}

impl StatusSummary {
    /// Contents of `summary.txt`
    pub fn render(&self) -> String {
        let mut out = format!("Total special domains: {}\n", self.total);
        for (status, count) in &self.statuses {
            out.push_str(&format!("{}: {}\n", status, count));
        }
        out
    }
}

pub fn classify_by_status(records: &[Record]) -> StatusBuckets {
    let mut buckets: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for record in records {
        buckets
            .entry(status_key(record))
            .or_default()
            .push(record.domain.clone());
    }

    for domains in buckets.values_mut() {
        domains.sort();
    }

    StatusBuckets {
        buckets,
        total: records.len(),
    }
}

/// Write `<STATUS>.txt` files and `summary.txt` into `dir`, creating it if needed
pub fn write_status_report(buckets: &StatusBuckets, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    for (status, domains) in buckets.iter() {
        write_bucket(dir, status, domains)?;
    }

    let summary_path = dir.join(SUMMARY_FILE);
    fs::write(&summary_path, buckets.summary().render())?;
    tracing::debug!(dir = %dir.display(), statuses = buckets.len(), "wrote status report");

    Ok(summary_path)
}
