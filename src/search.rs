//! Searchers and the match evidence they produce.
//!
//! # Core Types
//!
//! - [`FieldSearcher`] - the matching capability
//! - [`Searcher`] - the closed set of variants a field is configured with
//! - [`ExactSearcher`], [`NormalizedSearcher`], [`TokenizedSearcher`]
//! - [`MatchRecord`] / [`MatchRecorder`] - per-term match evidence

pub mod exact;
pub mod normalized;
pub mod record;
pub mod recorder;
pub mod searcher;
pub mod tokenized;

mod scan;

pub use exact::ExactSearcher;
pub use normalized::NormalizedSearcher;
pub use record::MatchRecord;
pub use recorder::{MatchRecorder, TermMatches};
pub use searcher::{ExactScope, FieldSearcher, Searcher};
pub use tokenized::TokenizedSearcher;
