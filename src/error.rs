//! Crate-wide error taxonomy.
//!
//! Only conditions that a caller can meaningfully react to get a variant
//! here. Handler faults are not an `Error`: a panicking handler is caught
//! by the dispatcher and surfaced as a 500 response, never propagated.

use thiserror::Error;

/// Errors produced by the mockd runtime core.
#[derive(Debug, Error)]
pub enum Error {
    /// A route pattern failed to parse at registration time.
    ///
    /// This is fatal to startup: a malformed pattern is a programming
    /// error in the script, not a runtime condition.
    #[error("invalid route pattern `{pattern}`: duplicate parameter `:{name}`")]
    InvalidPattern {
        /// The pattern as passed to registration.
        pattern: String,
        /// The parameter name that appeared more than once.
        name: String,
    },

    /// `Request::json()` was called on a body that is not valid JSON.
    #[error("request body is not valid JSON: {0}")]
    BodyParse(#[from] serde_json::Error),

    /// `KvStore::incr` was called on a key holding a non-numeric value.
    #[error("store value for `{key}` is not a number")]
    TypeMismatch {
        /// The key whose value could not be incremented.
        key: String,
    },

    /// A string could not be parsed as an absolute URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
