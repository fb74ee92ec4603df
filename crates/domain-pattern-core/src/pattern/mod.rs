//! # Pattern Module
//!
//! Derives the structural character pattern of a domain label and groups
//! domains by it.
//!
//! The pattern replaces every character with a symbol assigned in order of
//! first appearance, so `google` becomes `ABBACD` and `abab` becomes `ABAB`.
//! Two labels share a pattern exactly when their positions of equal
//! characters coincide.
//!
//! ## Module layout
//!
//! - `alphabet`: symbol sequences and the overflow policy past 'Z'
//! - `classifier`: bucketing of domain lists by pattern
//!
//! ## Example
//!
//! ```rust
//! use domain_pattern_core::pattern::{derive_pattern, label_of, SymbolAlphabet};
//!
//! let label = label_of("Google.com");
//! assert_eq!(label, "google");
//! assert_eq!(derive_pattern(&label, SymbolAlphabet::Literal), "ABBACD");
//! ```

mod alphabet;
mod classifier;

use std::collections::HashMap;

pub use alphabet::SymbolAlphabet;
pub use classifier::{PatternBuckets, PatternClassifier, PatternSummary};

/// Label of a domain: the text before the first '.', lowercase-folded
pub fn label_of(domain: &str) -> String {
    let head = domain.split('.').next().unwrap_or(domain);
    head.to_lowercase()
}

/// Canonical pattern of `label`, one symbol per character
pub fn derive_pattern(label: &str, alphabet: SymbolAlphabet) -> String {
    let mut assigned: HashMap<char, char> = HashMap::new();
    let mut pattern = String::with_capacity(label.len());

    for ch in label.chars() {
        let next_index = assigned.len();
        let symbol = *assigned
            .entry(ch)
            .or_insert_with(|| alphabet.symbol(next_index));
        pattern.push(symbol);
    }

    pattern
}
