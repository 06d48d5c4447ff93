//! Whole-token matching.

use crate::field::FieldValue;
use crate::query::QueryTerm;
use crate::search::recorder::MatchRecorder;
use crate::search::scan::{Folded, Identity, scan_tokens};
use crate::search::searcher::FieldSearcher;

/// Searcher that segments values into word tokens and matches terms against
/// whole tokens only.
///
/// A term matches a token when their codepoints are equal, or, with folding
/// enabled, when their folded projections are equal. Every matching token
/// occurrence yields one record; terms containing separator characters
/// never match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenizedSearcher {
    fold: bool,
}

impl TokenizedSearcher {
    /// Create a tokenized searcher comparing tokens exactly.
    pub fn new() -> Self {
        TokenizedSearcher::default()
    }

    /// Enable or disable case and diacritic folding of tokens.
    pub fn with_folding(mut self, fold: bool) -> Self {
        self.fold = fold;
        self
    }

    /// Whether tokens are folded before comparison.
    pub fn folds(&self) -> bool {
        self.fold
    }
}

impl FieldSearcher for TokenizedSearcher {
    fn match_terms(
        &self,
        value: FieldValue<'_>,
        terms: &[&QueryTerm],
        recorder: &mut MatchRecorder,
    ) -> usize {
        if self.fold {
            scan_tokens(&Folded, value, terms, recorder)
        } else {
            scan_tokens(&Identity, value, terms, recorder)
        }
    }

    fn name(&self) -> &'static str {
        "tokenized"
    }
}
