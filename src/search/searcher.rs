//! The matching capability shared by all searcher variants.
//!
//! A field is configured with one [`Searcher`]: a closed set of variants
//! behind the [`FieldSearcher`] trait. The variant is chosen once per field,
//! so the per-value hot path dispatches on a plain enum.
//!
//! # Examples
//!
//! ```
//! use fieldmatch::field::FieldView;
//! use fieldmatch::query::{QueryTerm, QueryTermSet};
//! use fieldmatch::search::{FieldSearcher, MatchRecorder, Searcher};
//!
//! let terms = QueryTermSet::new(vec![QueryTerm::new(1, "shoe")?])?;
//! let view = FieldView::from_strs(["red shoe rack"]);
//!
//! let mut recorder = MatchRecorder::new();
//! Searcher::tokenized().match_field(&view, &terms, &mut recorder);
//!
//! assert_eq!(recorder.count(1), 1);
//! assert_eq!(recorder.records(1)[0].byte_offset, 4);
//! # Ok::<(), fieldmatch::error::FieldMatchError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::field::{FieldValue, FieldView};
use crate::query::{MatchMode, QueryTerm, QueryTermSet};
use crate::search::exact::ExactSearcher;
use crate::search::normalized::NormalizedSearcher;
use crate::search::recorder::MatchRecorder;
use crate::search::tokenized::TokenizedSearcher;

/// How much of a value an exact or normalized term must cover.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExactScope {
    /// The whole value must equal the term.
    #[default]
    WholeValue,
    /// The value must start with the term. Individual terms can ask for
    /// this under `WholeValue` with [`QueryTerm::with_prefix`].
    Prefix,
    /// Every non-overlapping occurrence of the term anywhere in the value.
    Substring,
}

/// Trait for strategies that match query terms against field values.
///
/// Implementations write records into the caller's recorder and never
/// mutate the terms or the field content.
pub trait FieldSearcher: Send + Sync {
    /// Match `terms` against one value, in the order given.
    ///
    /// Each term's minimum field size is checked before the value is scanned
    /// for it. Returns the number of records added; records the recorder
    /// already holds are not added again.
    fn match_terms(
        &self,
        value: FieldValue<'_>,
        terms: &[&QueryTerm],
        recorder: &mut MatchRecorder,
    ) -> usize;

    /// Match a single term against one value.
    fn match_term(
        &self,
        value: FieldValue<'_>,
        term: &QueryTerm,
        recorder: &mut MatchRecorder,
    ) -> usize {
        self.match_terms(value, &[term], recorder)
    }

    /// Match every term of `terms` against every value of `view`.
    fn match_field(
        &self,
        view: &FieldView<'_>,
        terms: &QueryTermSet,
        recorder: &mut MatchRecorder,
    ) -> usize {
        let terms: Vec<&QueryTerm> = terms.iter().collect();
        view.values()
            .map(|value| self.match_terms(value, &terms, recorder))
            .sum()
    }

    /// Get the name of this searcher (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// The searcher configured for a field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Searcher {
    /// Case-sensitive codepoint comparison.
    Exact(ExactSearcher),
    /// Comparison on the case and diacritic folded projection.
    Normalized(NormalizedSearcher),
    /// Whole-token comparison.
    Tokenized(TokenizedSearcher),
}

impl Searcher {
    /// Exact whole-value searcher.
    pub fn exact() -> Self {
        Searcher::Exact(ExactSearcher::new())
    }

    /// Normalized whole-value searcher.
    pub fn normalized() -> Self {
        Searcher::Normalized(NormalizedSearcher::new())
    }

    /// Tokenized searcher without folding.
    pub fn tokenized() -> Self {
        Searcher::Tokenized(TokenizedSearcher::new())
    }

    /// Default searcher for a match mode.
    pub fn for_mode(mode: MatchMode) -> Self {
        match mode {
            MatchMode::Exact => Self::exact(),
            MatchMode::Normalized => Self::normalized(),
            MatchMode::Tokenized => Self::tokenized(),
        }
    }

    /// The match mode this searcher implements.
    pub fn mode(&self) -> MatchMode {
        match self {
            Searcher::Exact(_) => MatchMode::Exact,
            Searcher::Normalized(_) => MatchMode::Normalized,
            Searcher::Tokenized(_) => MatchMode::Tokenized,
        }
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::exact()
    }
}

impl FieldSearcher for Searcher {
    fn match_terms(
        &self,
        value: FieldValue<'_>,
        terms: &[&QueryTerm],
        recorder: &mut MatchRecorder,
    ) -> usize {
        match self {
            Searcher::Exact(s) => s.match_terms(value, terms, recorder),
            Searcher::Normalized(s) => s.match_terms(value, terms, recorder),
            Searcher::Tokenized(s) => s.match_terms(value, terms, recorder),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Searcher::Exact(s) => s.name(),
            Searcher::Normalized(s) => s.name(),
            Searcher::Tokenized(s) => s.name(),
        }
    }
}

impl From<ExactSearcher> for Searcher {
    fn from(searcher: ExactSearcher) -> Self {
        Searcher::Exact(searcher)
    }
}

impl From<NormalizedSearcher> for Searcher {
    fn from(searcher: NormalizedSearcher) -> Self {
        Searcher::Normalized(searcher)
    }
}

impl From<TokenizedSearcher> for Searcher {
    fn from(searcher: TokenizedSearcher) -> Self {
        Searcher::Tokenized(searcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(pairs: &[(u32, &str)]) -> QueryTermSet {
        QueryTermSet::new(
            pairs
                .iter()
                .map(|&(id, text)| QueryTerm::new(id, text).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_for_mode() {
        for mode in [MatchMode::Exact, MatchMode::Normalized, MatchMode::Tokenized] {
            assert_eq!(Searcher::for_mode(mode).mode(), mode);
        }
        assert_eq!(Searcher::default().name(), "exact");
        assert_eq!(Searcher::normalized().name(), "normalized");
        assert_eq!(Searcher::tokenized().name(), "tokenized");
    }

    #[test]
    fn test_match_field_exact_whole_value() {
        let terms = terms(&[(1, "shoe")]);
        let view = FieldView::from_strs(["red shoe", "shoe"]);
        let mut recorder = MatchRecorder::new();

        let written = Searcher::exact().match_field(&view, &terms, &mut recorder);

        assert_eq!(written, 1);
        assert_eq!(recorder.matched_value_indexes(1), vec![1]);
    }

    #[test]
    fn test_normalized_vs_exact() {
        let set = QueryTermSet::new(vec![
            QueryTerm::new(1, "café")
                .unwrap()
                .with_mode(MatchMode::Normalized),
        ])
        .unwrap();
        let view = FieldView::from_strs(["Cafe"]);

        let mut normalized = MatchRecorder::new();
        Searcher::normalized().match_field(&view, &set, &mut normalized);
        assert_eq!(normalized.count(1), 1);

        let mut exact = MatchRecorder::new();
        Searcher::exact().match_field(&view, &set, &mut exact);
        assert_eq!(exact.count(1), 0);
    }

    #[test]
    fn test_conversions() {
        let searcher: Searcher = ExactSearcher::new().with_scope(ExactScope::Substring).into();
        assert_eq!(searcher.mode(), MatchMode::Exact);

        let searcher: Searcher = TokenizedSearcher::new().with_folding(true).into();
        assert_eq!(searcher.mode(), MatchMode::Tokenized);
    }
}
