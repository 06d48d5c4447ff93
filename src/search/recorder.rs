//! Per-term accumulation of match records for one field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::search::record::MatchRecord;

/// Matches of a single term across all values of a field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermMatches {
    count: usize,
    records: Vec<MatchRecord>,
}

impl TermMatches {
    /// Number of matches recorded.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Records ordered by value index, then byte offset.
    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    /// Whether no match was recorded.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Distinct value indexes with at least one match, ascending.
    pub fn value_indexes(&self) -> Vec<usize> {
        let mut indexes: Vec<usize> = self.records.iter().map(|r| r.value_index).collect();
        indexes.dedup();
        indexes
    }

    /// Insert `record` at its sorted position; returns false for a
    /// duplicate.
    fn insert(&mut self, record: MatchRecord) -> bool {
        if self.records.last().is_none_or(|last| *last < record) {
            self.records.push(record);
        } else {
            match self.records.binary_search(&record) {
                Ok(_) => return false,
                Err(index) => self.records.insert(index, record),
            }
        }
        self.count += 1;
        true
    }
}

/// Match evidence for one field, keyed by term id.
///
/// A recorder is created empty by each dispatch and handed to the caller
/// when the field has been scanned. Consumers read counts for ranking and
/// byte offsets for snippets; [`is_complete`](Self::is_complete) must be
/// checked first, since a cancelled dispatch returns the partial evidence
/// gathered so far.
///
/// # Examples
///
/// ```
/// use fieldmatch::search::{MatchRecord, MatchRecorder};
///
/// let mut recorder = MatchRecorder::new();
/// recorder.record(MatchRecord::new(1, 0, 0, 1, 1));
/// recorder.record(MatchRecord::new(1, 2, 0, 1, 1));
///
/// assert_eq!(recorder.count(1), 2);
/// assert_eq!(recorder.matched_value_indexes(1), vec![0, 2]);
/// assert!(recorder.is_complete());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecorder {
    terms: BTreeMap<u32, TermMatches>,
    complete: bool,
    values_scanned: usize,
}

impl Default for MatchRecorder {
    fn default() -> Self {
        MatchRecorder {
            terms: BTreeMap::new(),
            complete: true,
            values_scanned: 0,
        }
    }
}

impl MatchRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record for its term.
    ///
    /// Records arriving in scan order are appended; anything else is placed
    /// at its sorted position. A record identical to one already held is
    /// dropped, so feeding the same field through a recorder twice leaves it
    /// unchanged. Returns whether the record was added.
    pub fn record(&mut self, record: MatchRecord) -> bool {
        self.terms.entry(record.term_id).or_default().insert(record)
    }

    /// Number of matches for `term_id`.
    pub fn count(&self, term_id: u32) -> usize {
        self.terms.get(&term_id).map_or(0, TermMatches::count)
    }

    /// Records for `term_id`, ordered by value index then byte offset.
    pub fn records(&self, term_id: u32) -> &[MatchRecord] {
        self.terms
            .get(&term_id)
            .map_or(&[][..], |matches| matches.records())
    }

    /// All matches of `term_id`, if it matched.
    pub fn term(&self, term_id: u32) -> Option<&TermMatches> {
        self.terms.get(&term_id)
    }

    /// Whether `term_id` matched at least once.
    pub fn has_match(&self, term_id: u32) -> bool {
        self.count(term_id) > 0
    }

    /// Ids of matching terms, ascending.
    pub fn matched_terms(&self) -> impl Iterator<Item = u32> + '_ {
        self.terms.keys().copied()
    }

    /// Per-term matches, by ascending term id.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &TermMatches)> {
        self.terms.iter().map(|(&id, matches)| (id, matches))
    }

    /// Every record, by term id, then value index, then byte offset.
    pub fn all_records(&self) -> impl Iterator<Item = &MatchRecord> {
        self.terms.values().flat_map(|m| m.records.iter())
    }

    /// Total number of matches across all terms.
    pub fn total_count(&self) -> usize {
        self.terms.values().map(TermMatches::count).sum()
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Value indexes matched by `term_id`, ascending and distinct.
    pub fn matched_value_indexes(&self, term_id: u32) -> Vec<usize> {
        self.terms
            .get(&term_id)
            .map(TermMatches::value_indexes)
            .unwrap_or_default()
    }

    /// Value indexes matched by any term, ascending and distinct.
    ///
    /// This is the element filter summary generation applies to array
    /// fields when only matching elements should be shown.
    pub fn matched_elements(&self) -> Vec<usize> {
        let mut indexes: Vec<usize> = self.all_records().map(|r| r.value_index).collect();
        indexes.sort_unstable();
        indexes.dedup();
        indexes
    }

    /// Whether every value of the field was considered.
    ///
    /// False when the dispatch was cancelled between values; counts are then
    /// lower bounds and must not be used for ranking as if final.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Number of values the dispatcher scanned.
    pub fn values_scanned(&self) -> usize {
        self.values_scanned
    }

    pub(crate) fn mark_incomplete(&mut self) {
        self.complete = false;
    }

    pub(crate) fn note_value_scanned(&mut self) {
        self.values_scanned += 1;
    }
}
