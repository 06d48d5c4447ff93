//! Case and diacritic insensitive matching.

use crate::field::FieldValue;
use crate::query::QueryTerm;
use crate::search::recorder::MatchRecorder;
use crate::search::scan::{Folded, scan_value};
use crate::search::searcher::{ExactScope, FieldSearcher};

/// Searcher comparing the folded projection of field content with the folded
/// term text.
///
/// Folding happens codepoint by codepoint during the scan; the value is never
/// copied. Record offsets and lengths always refer to the field bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NormalizedSearcher {
    scope: ExactScope,
}

impl NormalizedSearcher {
    /// Create a whole-value normalized searcher.
    pub fn new() -> Self {
        NormalizedSearcher::default()
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

impl FieldSearcher for NormalizedSearcher {
    fn match_terms(
        &self,
        value: FieldValue<'_>,
        terms: &[&QueryTerm],
        recorder: &mut MatchRecorder,
    ) -> usize {
        scan_value(&Folded, self.scope, value, terms, recorder)
    }

    fn name(&self) -> &'static str {
        "normalized"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::decoder::Encoding;

    fn value(text: &str) -> FieldValue<'_> {
        FieldValue::new(0, text.as_bytes(), Encoding::Utf8)
    }

    fn term(id: u32, text: &str) -> QueryTerm {
        QueryTerm::new(id, text).unwrap()
    }

    #[test]
    fn test_case_and_diacritics_ignored() {
        let searcher = NormalizedSearcher::new();
        let cafe = term(1, "café");

        for text in ["Cafe", "CAFÉ", "café", "Cafe\u{0301}"] {
            let mut recorder = MatchRecorder::new();
            assert_eq!(searcher.match_term(value(text), &cafe, &mut recorder), 1, "{text}");
            let record = recorder.records(1)[0];
            assert_eq!(record.byte_offset, 0);
            assert_eq!(record.byte_length, text.len());
        }

        let mut recorder = MatchRecorder::new();
        assert_eq!(searcher.match_term(value("cafes"), &cafe, &mut recorder), 0);
    }

    #[test]
    fn test_substring_offsets_refer_to_field_bytes() {
        let searcher = NormalizedSearcher::new().with_scope(ExactScope::Substring);
        let text = "Über ÉCOLE und Ecole";
        let mut recorder = MatchRecorder::new();

        searcher.match_term(value(text), &term(7, "école"), &mut recorder);

        let records = recorder.records(7);
        assert_eq!(records.len(), 2);
        assert_eq!(&text[records[0].byte_range()], "ÉCOLE");
        assert_eq!(&text[records[1].byte_range()], "Ecole");
        assert_eq!(records[0].codepoint_length, 5);
    }

    #[test]
    fn test_expanding_fold() {
        let searcher = NormalizedSearcher::new().with_scope(ExactScope::Substring);
        let mut recorder = MatchRecorder::new();

        searcher.match_terms(
            value("Straße"),
            &[&term(1, "strasse"), &term(2, "stras")],
            &mut recorder,
        );

        assert_eq!(recorder.count(1), 1);
        assert_eq!(recorder.records(1)[0].codepoint_length, 6);
        assert_eq!(recorder.count(2), 0);
    }

    #[test]
    fn test_term_of_only_marks_never_matches() {
        let searcher = NormalizedSearcher::new().with_scope(ExactScope::Substring);
        let mut recorder = MatchRecorder::new();

        assert_eq!(
            searcher.match_term(value("e\u{0301}"), &term(1, "\u{0301}"), &mut recorder),
            0
        );
    }
}
