//! Symbol Alphabets
//!
//! Ordered symbol sequences handed out to the distinct characters of a label.
//! The n-th distinct character always receives the n-th symbol.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainPatternError, Result};

const SURROGATE_START: u32 = 0xD800;
const SURROGATE_LEN: u32 = 0x800;

/// First code point used by `Alphanumeric` once its 62 base symbols are spent
const EXTENDED_START: u32 = 0xC0;

/// How symbols are assigned to distinct characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolAlphabet {
    /// 'A', 'B', ... by code point increment, continuing past 'Z' into '[', '\\', ']' ...
    #[default]
    Literal,
    /// 'A'..'Z', 'a'..'z', '0'..'9', then U+00C0 upward
    Alphanumeric,
}

impl SymbolAlphabet {
    pub const ALL: [SymbolAlphabet; 2] = [SymbolAlphabet::Literal, SymbolAlphabet::Alphanumeric];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::Alphanumeric => "alphanumeric",
        }
    }

    /// Symbol for the `index`-th distinct character (zero based)
    pub fn symbol(&self, index: usize) -> char {
        match self {
            Self::Literal => code_point_from('A' as u32, index),
            Self::Alphanumeric => match index {
                0..=25 => offset_char(b'A', index),
                26..=51 => offset_char(b'a', index - 26),
                52..=61 => offset_char(b'0', index - 52),
                _ => code_point_from(EXTENDED_START, index - 62),
            },
        }
    }
}

fn offset_char(base: u8, offset: usize) -> char {
    // offset < 26 at every call site
    char::from(base + offset as u8)
}

/// Walk forward from `start` by `offset` valid scalar values, hopping the surrogate gap.
fn code_point_from(start: u32, offset: usize) -> char {
    let mut code = u32::try_from(offset)
        .ok()
        .and_then(|o| start.checked_add(o))
        .unwrap_or(u32::MAX);
    if code >= SURROGATE_START {
        code = code.saturating_add(SURROGATE_LEN);
    }
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}

impl fmt::Display for SymbolAlphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SymbolAlphabet {
    type Err = DomainPatternError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "literal" => Ok(Self::Literal),
            "alphanumeric" => Ok(Self::Alphanumeric),
            _ => Err(DomainPatternError::InvalidValue {
                key: "pattern.alphabet".to_string(),
                value: s.to_string(),
            }),
        }
    }
}
