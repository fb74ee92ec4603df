//! Bucket files
//!
//! Every bucket becomes `<key>.txt` with one domain per line.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Result;

pub const BUCKET_EXTENSION: &str = "txt";

/// File name for a bucket key.
///
/// Path separators, NUL and `%` are percent-encoded, as are the keys `.` and
/// `..`, so every key maps to a distinct file inside the bucket directory.
pub fn bucket_file_name(key: &str) -> String {
    let stem = match key {
        "." => "%2E".to_string(),
        ".." => "%2E%2E".to_string(),
        _ => {
            let mut stem = String::with_capacity(key.len());
            for c in key.chars() {
                if c == '%' || c == '\0' || std::path::is_separator(c) {
                    let mut buf = [0u8; 4];
                    for byte in c.encode_utf8(&mut buf).bytes() {
                        stem.push_str(&format!("%{:02X}", byte));
                    }
                } else {
                    stem.push(c);
                }
            }
            stem
        }
    };
    format!("{}.{}", stem, BUCKET_EXTENSION)
}

/// Write one bucket. `domains` must already be sorted.
pub fn write_bucket(dir: &Path, key: &str, domains: &[String]) -> Result<PathBuf> {
    let path = dir.join(bucket_file_name(key));

    let mut content = String::with_capacity(domains.iter().map(|d| d.len() + 1).sum());
    for domain in domains {
        content.push_str(domain);
        content.push('\n');
    }

    fs::write(&path, content)?;
    tracing::debug!(path = %path.display(), count = domains.len(), "wrote bucket");
    Ok(path)
}

/// Remove `*.txt` files directly under `dir`, except those in `keep`.
/// Subdirectories are left alone.
pub fn clean_bucket_files(dir: &Path, keep: &[&Path]) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let keep: Vec<PathBuf> = keep.iter().filter_map(|p| fs::canonicalize(p).ok()).collect();

    let mut removed = 0;
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            e.into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"))
        })?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(BUCKET_EXTENSION)
        {
            continue;
        }
        if keep.contains(&fs::canonicalize(path)?) {
            tracing::debug!(path = %path.display(), "keeping input list");
            continue;
        }
        fs::remove_file(path)?;
        removed += 1;
    }

    tracing::debug!(dir = %dir.display(), removed, "cleaned stale buckets");
    Ok(removed)
}
