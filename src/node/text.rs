//! Text leaf values
//!
//! A text leaf holds either a string or a number; numbers are kept as
//! numbers so `evaluate(5)` hands back `5`, not `"5"`.

use std::fmt;

use compact_str::CompactString;

use crate::attr::format_num;

// =============================================================================
// TextValue
// =============================================================================

/// Content of a text leaf
#[derive(Debug, Clone, PartialEq)]
pub enum TextValue {
    Str(CompactString),
    Num(f64),
}

impl TextValue {
    /// Create a string text value
    pub fn new(content: impl Into<CompactString>) -> Self {
        Self::Str(content.into())
    }

    /// Check if the rendered content is empty
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Str(s) => s.is_empty(),
            Self::Num(_) => false,
        }
    }

    /// Content as it appears on screen
    pub fn to_content(&self) -> CompactString {
        match self {
            Self::Str(s) => s.clone(),
            Self::Num(n) => format_num(*n).into(),
        }
    }
}

impl fmt::Display for TextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Num(n) => f.write_str(&format_num(*n)),
        }
    }
}

impl From<&str> for TextValue {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for TextValue {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl From<f64> for TextValue {
    fn from(n: f64) -> Self {
        Self::Num(n)
    }
}

impl From<i64> for TextValue {
    fn from(n: i64) -> Self {
        Self::Num(n as f64)
    }
}

impl From<u32> for TextValue {
    fn from(n: u32) -> Self {
        Self::Num(n as f64)
    }
}
