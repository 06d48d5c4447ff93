//! # fieldmatch
//!
//! The field-matching core of a document search pipeline: given the raw
//! content of one field of a candidate document and the terms of a query, it
//! determines which terms occur in the field, where, and how often.
//!
//! ## Features
//!
//! - Lazy UTF-8/ASCII decoding with replacement of malformed input
//! - Exact, normalized (case and diacritic folded) and tokenized matching
//! - Single- and multi-valued fields
//! - Per-term minimum field size
//! - Presence-only early exit and cooperative cancellation
//! - Parallel batch evaluation over a shared, immutable term set
//!
//! ## Example
//!
//! ```
//! use fieldmatch::prelude::*;
//!
//! let terms = QueryTermSet::new(vec![QueryTerm::new(1, "shoe")?])?;
//! let view = FieldView::from_strs(["red shoe", "shoe"]);
//!
//! let recorder = Dispatcher::new(Searcher::exact()).evaluate(&view, &terms);
//! assert_eq!(recorder.matched_value_indexes(1), vec![1]);
//! # Ok::<(), fieldmatch::error::FieldMatchError>(())
//! ```

pub mod analysis;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod field;
pub mod query;
pub mod search;

pub mod prelude {
    pub use crate::analysis::decoder::Encoding;
    pub use crate::config::{FieldMatchConfig, SearcherSettings};
    pub use crate::dispatch::{BatchEvaluator, CancelFlag, Cancellation, Dispatcher};
    pub use crate::error::FieldMatchError;
    pub use crate::field::{FieldValue, FieldView};
    pub use crate::query::{MatchMode, QueryTerm, QueryTermSet};
    pub use crate::search::{
        ExactScope, FieldSearcher, MatchRecord, MatchRecorder, Searcher,
    };
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
