//! Field-level dispatch of searchers over multi-valued fields.
//!
//! The [`Dispatcher`] is the entry point of the matching core: it walks the
//! values of a [`FieldView`], hands each one to the configured searcher and
//! returns the filled [`MatchRecorder`]. It owns two optimizations that do
//! not change which terms match:
//!
//! - presence-only terms stop being scanned once they have matched;
//! - a [`Cancellation`] hook is polled between values so stale work can be
//!   abandoned, yielding a recorder marked incomplete.
//!
//! # Examples
//!
//! ```
//! use fieldmatch::dispatch::Dispatcher;
//! use fieldmatch::field::FieldView;
//! use fieldmatch::query::{QueryTerm, QueryTermSet};
//! use fieldmatch::search::Searcher;
//!
//! let terms = QueryTermSet::new(vec![QueryTerm::new(1, "a")?])?;
//! let view = FieldView::from_strs(["a", "b", "a"]);
//!
//! let recorder = Dispatcher::new(Searcher::exact()).evaluate(&view, &terms);
//! assert_eq!(recorder.count(1), 2);
//! assert_eq!(recorder.matched_value_indexes(1), vec![0, 2]);
//! # Ok::<(), fieldmatch::error::FieldMatchError>(())
//! ```

pub mod batch;
pub mod cancel;

pub use batch::BatchEvaluator;
pub use cancel::{CancelFlag, Cancellation, Deadline, NeverCancel};

use ahash::AHashSet;
use log::{debug, trace};

use crate::field::{FieldValue, FieldView};
use crate::query::{MatchMode, QueryTerm, QueryTermSet};
use crate::search::{
    ExactSearcher, FieldSearcher, MatchRecorder, NormalizedSearcher, Searcher, TokenizedSearcher,
};

/// Searchers used when each term picks its own matching mode.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModeSearchers {
    /// Searcher for [`MatchMode::Exact`] terms.
    pub exact: ExactSearcher,
    /// Searcher for [`MatchMode::Normalized`] terms.
    pub normalized: NormalizedSearcher,
    /// Searcher for [`MatchMode::Tokenized`] terms.
    pub tokenized: TokenizedSearcher,
}

/// How the dispatcher chooses a searcher for a term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchStrategy {
    /// Every term is matched by the field's searcher.
    Field(Searcher),
    /// Each term is matched by the searcher for its own mode.
    TermMode(ModeSearchers),
}

impl Default for DispatchStrategy {
    fn default() -> Self {
        DispatchStrategy::Field(Searcher::default())
    }
}

/// Evaluates query terms against fields.
#[derive(Clone, Debug, Default)]
pub struct Dispatcher {
    strategy: DispatchStrategy,
    presence_only: AHashSet<u32>,
    all_presence_only: bool,
}

impl Dispatcher {
    /// Dispatcher matching every term with `searcher`.
    pub fn new(searcher: impl Into<Searcher>) -> Self {
        Dispatcher::with_strategy(DispatchStrategy::Field(searcher.into()))
    }

    /// Dispatcher routing each term to the searcher for its mode.
    pub fn by_term_mode() -> Self {
        Dispatcher::with_strategy(DispatchStrategy::TermMode(ModeSearchers::default()))
    }

    /// Dispatcher with an explicit strategy.
    pub fn with_strategy(strategy: DispatchStrategy) -> Self {
        Dispatcher {
            strategy,
            presence_only: AHashSet::new(),
            all_presence_only: false,
        }
    }

    /// Register terms whose consumers only need to know whether they match.
    pub fn with_presence_only<I>(mut self, term_ids: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        self.presence_only.extend(term_ids);
        self
    }

    /// Treat every term as presence-only.
    pub fn with_all_presence_only(mut self, all: bool) -> Self {
        self.all_presence_only = all;
        self
    }

    /// The configured strategy.
    pub fn strategy(&self) -> &DispatchStrategy {
        &self.strategy
    }

    /// Whether scanning of `term_id` may stop after its first match.
    pub fn is_presence_only(&self, term_id: u32) -> bool {
        self.all_presence_only || self.presence_only.contains(&term_id)
    }

    /// Match `terms` against every value of `view`.
    pub fn evaluate(&self, view: &FieldView<'_>, terms: &QueryTermSet) -> MatchRecorder {
        self.evaluate_with_cancel(view, terms, &NeverCancel)
    }

    /// Match `terms` against `view`, polling `cancel` before each value.
    ///
    /// When cancellation is observed the values scanned so far are kept and
    /// the returned recorder reports `is_complete() == false`.
    pub fn evaluate_with_cancel<C>(
        &self,
        view: &FieldView<'_>,
        terms: &QueryTermSet,
        cancel: &C,
    ) -> MatchRecorder
    where
        C: Cancellation + ?Sized,
    {
        let mut recorder = MatchRecorder::new();
        let mut active: Vec<&QueryTerm> = terms.iter().collect();
        let mut routed = RoutedTerms::default();

        for value in view.values() {
            if cancel.is_cancelled() {
                debug!(
                    "Cancelled after {} of {} values",
                    value.index(),
                    view.len()
                );
                recorder.mark_incomplete();
                break;
            }
            if active.is_empty() {
                trace!("All terms settled at value {}", value.index());
                break;
            }

            self.match_value(value, &active, &mut routed, &mut recorder);
            recorder.note_value_scanned();

            if self.all_presence_only || !self.presence_only.is_empty() {
                active.retain(|t| !(self.is_presence_only(t.id()) && recorder.has_match(t.id())));
            }
        }

        trace!(
            "Evaluated {} values against {} terms: {} matches",
            recorder.values_scanned(),
            terms.len(),
            recorder.total_count()
        );
        recorder
    }

    fn match_value<'t>(
        &self,
        value: FieldValue<'_>,
        active: &[&'t QueryTerm],
        routed: &mut RoutedTerms<'t>,
        recorder: &mut MatchRecorder,
    ) -> usize {
        match &self.strategy {
            DispatchStrategy::Field(searcher) => searcher.match_terms(value, active, recorder),
            DispatchStrategy::TermMode(searchers) => {
                routed.route(active);
                searchers.exact.match_terms(value, &routed.exact, recorder)
                    + searchers
                        .normalized
                        .match_terms(value, &routed.normalized, recorder)
                    + searchers
                        .tokenized
                        .match_terms(value, &routed.tokenized, recorder)
            }
        }
    }
}

/// Active terms split by their match mode, reused across values.
#[derive(Default)]
struct RoutedTerms<'t> {
    exact: Vec<&'t QueryTerm>,
    normalized: Vec<&'t QueryTerm>,
    tokenized: Vec<&'t QueryTerm>,
}

impl<'t> RoutedTerms<'t> {
    fn route(&mut self, terms: &[&'t QueryTerm]) {
        self.exact.clear();
        self.normalized.clear();
        self.tokenized.clear();
        for &term in terms {
            match term.mode() {
                MatchMode::Exact => self.exact.push(term),
                MatchMode::Normalized => self.normalized.push(term),
                MatchMode::Tokenized => self.tokenized.push(term),
            }
        }
    }
}
