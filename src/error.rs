//! Error types for auction-vdom.
//!
//! Malformed virtual trees are rejected here instead of producing
//! undefined rendered output.

use thiserror::Error;

/// Errors that can occur while evaluating or reconciling a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VdomError {
    /// Component resolution or element nesting went deeper than the guard allows.
    ///
    /// Usually a component that (directly or indirectly) returns itself.
    #[error("tree depth limit exceeded: more than {limit} levels")]
    DepthExceeded {
        /// Configured depth limit
        limit: usize,
    },

    /// Element declared with an empty tag name
    #[error("element tag must not be empty")]
    EmptyTag,

    /// Element tag contains characters that are not valid in a tag name
    #[error("invalid element tag: {0:?}")]
    InvalidTag(String),

    /// `children` and `key` are structural, not properties
    #[error("reserved property name used as prop: {0:?}")]
    ReservedProp(String),

    /// `sync` was asked to reconcile roots of different kinds or tags
    #[error("root tag mismatch: expected <{expected}>, found <{found}>")]
    RootMismatch {
        /// Tag of the plain root (`#text` for text)
        expected: String,
        /// Tag of the rendered root
        found: String,
    },
}

/// Result type alias for VDOM operations.
pub type VdomResult<T> = Result<T, VdomError>;

impl VdomError {
    /// Create a depth error for the given limit.
    pub fn depth(limit: usize) -> Self {
        Self::DepthExceeded { limit }
    }

    /// Create an invalid tag error.
    pub fn invalid_tag(tag: impl Into<String>) -> Self {
        Self::InvalidTag(tag.into())
    }

    /// Create a root mismatch error.
    pub fn root_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::RootMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VdomError::depth(64);
        assert_eq!(err.to_string(), "tree depth limit exceeded: more than 64 levels");

        let err = VdomError::invalid_tag("1div");
        assert_eq!(err.to_string(), "invalid element tag: \"1div\"");

        let err = VdomError::ReservedProp("key".to_string());
        assert_eq!(err.to_string(), "reserved property name used as prop: \"key\"");
    }

    #[test]
    fn test_error_is_send_sync() {
        static_assertions::assert_impl_all!(VdomError: Send, Sync);
    }
}
