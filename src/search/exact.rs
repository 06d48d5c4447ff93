//! Case-sensitive codepoint matching.
//!
//! Suited to identifier and tag fields where the stored value must equal a
//! query token. No tokenization is applied; depending on the
//! [`ExactScope`] the term must cover the whole value, a prefix of it, or any
//! contiguous run of its codepoints.

use crate::field::FieldValue;
use crate::query::QueryTerm;
use crate::search::recorder::MatchRecorder;
use crate::search::scan::{Identity, scan_value};
use crate::search::searcher::{ExactScope, FieldSearcher};

/// Searcher comparing decoded codepoints without normalization.
///
/// # Examples
///
/// ```
/// use fieldmatch::analysis::decoder::Encoding;
/// use fieldmatch::field::FieldValue;
/// use fieldmatch::query::QueryTerm;
/// use fieldmatch::search::{ExactScope, ExactSearcher, FieldSearcher, MatchRecorder};
///
/// let term = QueryTerm::new(1, "an")?;
/// let value = FieldValue::new(0, b"banana", Encoding::Ascii);
/// let mut recorder = MatchRecorder::new();
///
/// let searcher = ExactSearcher::new().with_scope(ExactScope::Substring);
/// assert_eq!(searcher.match_term(value, &term, &mut recorder), 2);
///
/// let offsets: Vec<usize> = recorder.records(1).iter().map(|r| r.byte_offset).collect();
/// assert_eq!(offsets, vec![1, 3]);
/// # Ok::<(), fieldmatch::error::FieldMatchError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExactSearcher {
    scope: ExactScope,
}

impl ExactSearcher {
    /// Create a whole-value exact searcher.
    pub fn new() -> Self {
        ExactSearcher::default()
    }

    /// Set the match scope.
    pub fn with_scope(mut self, scope: ExactScope) -> Self {
        self.scope = scope;
        self
    }

    /// The configured match scope.
    pub fn scope(&self) -> ExactScope {
        self.scope
    }
}

impl FieldSearcher for ExactSearcher {
    fn match_terms(
        &self,
        value: FieldValue<'_>,
        terms: &[&QueryTerm],
        recorder: &mut MatchRecorder,
    ) -> usize {
        scan_value(&Identity, self.scope, value, terms, recorder)
    }

    fn name(&self) -> &'static str {
        "exact"
    }
}
