//! Storefront error types.

use thiserror::Error;

use crate::error::VdomError;

/// Failures reported by the lots API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request did not reach the server
    #[error("Connection error")]
    Connection,

    /// No route for the requested path
    #[error("Unknown address: {0}")]
    UnknownAddress(String),

    /// The server refused a mutation
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Failures reported by the price stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// Channel name is not of the form `price-<id>`
    #[error("unknown channel: {0}")]
    UnknownChannel(String),

    /// Ticking needs a non-zero period
    #[error("price stream interval must be non-zero")]
    ZeroInterval,
}

/// Any failure surfaced by the storefront runtime.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Vdom(#[from] VdomError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    /// A runtime setting is out of range
    #[error("invalid storefront config: {0}")]
    InvalidConfig(&'static str),
}

/// Result type alias for storefront operations.
pub type AppResult<T> = Result<T, AppError>;
