//! Input records
//!
//! One parser for both list shapes: a bare domain per line, or
//! `<domain> <STATUS> [reason...]`. The shape is detected per line.

use std::fs;
use std::path::Path;

use crate::error::Result;

const COMMENT_PREFIX: char = '#';

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub domain: String,
    /// Second token, verbatim (not case-normalized)
    pub status: Option<String>,
}

impl Record {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            status: None,
        }
    }

    pub fn with_status(domain: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            status: Some(status.into()),
        }
    }
}

/// Parse one line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Option<Record> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
        return None;
    }

    let mut tokens = trimmed.split_whitespace();
    let domain = tokens.next()?.to_string();
    let status = tokens.next().map(str::to_string);

    Some(Record { domain, status })
}

pub fn parse_lines<I, S>(lines: I) -> Vec<Record>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| parse_line(line.as_ref()))
        .collect()
}

/// Read a whole list file into memory and parse it
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_lines(content.lines()))
}
