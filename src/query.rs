//! Query terms and the term registry shared across a query's evaluation.

pub mod term;
pub mod term_set;

pub use term::{MatchMode, QueryTerm};
pub use term_set::QueryTermSet;
