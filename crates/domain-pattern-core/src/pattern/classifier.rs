//! Pattern Classifier
//!
//! Groups domains into buckets keyed by the pattern of their label.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{derive_pattern, label_of, SymbolAlphabet};

/// Domains grouped by label pattern.
///
/// Keys iterate in ascending order; every bucket is non-empty and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternBuckets {
    buckets: BTreeMap<String, Vec<String>>,
}

impl PatternBuckets {
    /// Number of domains across all buckets (duplicates counted)
    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Number of distinct patterns
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, pattern: &str) -> Option<&[String]> {
        self.buckets.get(pattern).map(Vec::as_slice)
    }

    /// Buckets in ascending pattern order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.buckets
            .iter()
            .map(|(pattern, domains)| (pattern.as_str(), domains.as_slice()))
    }

    pub fn summary(&self) -> PatternSummary {
        PatternSummary {
            total: self.total(),
            patterns: self
                .iter()
                .map(|(pattern, domains)| (pattern.to_string(), domains.len()))
                .collect(),
        }
    }
}

/// Counts reported after a pattern pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatternSummary {
    /// Domains processed
    pub total: usize,
    /// Per-pattern counts, ascending by pattern
    pub patterns: Vec<(String, usize)>,
}

/// Pattern classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternClassifier {
    alphabet: SymbolAlphabet,
}

impl PatternClassifier {
    pub fn new(alphabet: SymbolAlphabet) -> Self {
        Self { alphabet }
    }

    pub fn alphabet(&self) -> SymbolAlphabet {
        self.alphabet
    }

    /// Pattern of a full domain name
    pub fn pattern_of(&self, domain: &str) -> String {
        derive_pattern(&label_of(domain), self.alphabet)
    }

    /// Bucket `domains` by pattern, keeping the original spelling of each domain
    pub fn classify<I, S>(&self, domains: I) -> PatternBuckets
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buckets: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for domain in domains {
            let domain = domain.as_ref();
            buckets
                .entry(self.pattern_of(domain))
                .or_default()
                .push(domain.to_string());
        }

        for domains in buckets.values_mut() {
            domains.sort();
        }

        PatternBuckets { buckets }
    }
}
