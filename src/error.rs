//! Error types for the fieldmatch library.
//!
//! All fallible operations return [`FieldMatchError`] through the crate-wide
//! [`Result`] alias. Matching itself never fails: malformed field content is
//! recovered by the decoder and cancellation yields an incomplete
//! [`MatchRecorder`](crate::search::MatchRecorder) instead of an error. The
//! errors below can only occur while terms or configuration are being built.
//!
//! # Examples
//!
//! ```
//! use fieldmatch::error::{FieldMatchError, Result};
//! use fieldmatch::query::QueryTerm;
//!
//! fn build() -> Result<QueryTerm> {
//!     QueryTerm::new(7, "")
//! }
//!
//! match build() {
//!     Err(FieldMatchError::EmptyTermText { id }) => assert_eq!(id, 7),
//!     _ => unreachable!(),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for fieldmatch operations.
#[derive(Error, Debug)]
pub enum FieldMatchError {
    /// A query term was constructed with empty text.
    #[error("Term {id} has empty text")]
    EmptyTermText {
        /// Identifier of the rejected term.
        id: u32,
    },

    /// Two terms in one term set share the same identifier.
    #[error("Duplicate term id: {0}")]
    DuplicateTermId(u32),

    /// A configuration value is out of range or inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The batch thread pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// I/O errors while reading configuration files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with FieldMatchError.
pub type Result<T> = std::result::Result<T, FieldMatchError>;

impl FieldMatchError {
    /// Create a new empty term text error.
    pub fn empty_term(id: u32) -> Self {
        FieldMatchError::EmptyTermText { id }
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        FieldMatchError::InvalidConfig(msg.into())
    }

    /// Create a new thread pool error.
    pub fn thread_pool<S: Into<String>>(msg: S) -> Self {
        FieldMatchError::ThreadPool(msg.into())
    }
}
