//! Parallel evaluation of many fields against one query.
//!
//! Work is partitioned by field: every view gets its own recorder on a pool
//! worker, and the term set is shared read-only by all of them.

use std::sync::Arc;

use log::{debug, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::dispatch::Dispatcher;
use crate::dispatch::cancel::Cancellation;
use crate::error::{FieldMatchError, Result};
use crate::field::FieldView;
use crate::query::QueryTermSet;
use crate::search::MatchRecorder;

/// Runs a [`Dispatcher`] over batches of field views on a thread pool.
///
/// # Examples
///
/// ```
/// use fieldmatch::dispatch::{BatchEvaluator, Dispatcher, NeverCancel};
/// use fieldmatch::field::FieldView;
/// use fieldmatch::query::{QueryTerm, QueryTermSet};
/// use fieldmatch::search::Searcher;
///
/// let terms = QueryTermSet::new(vec![QueryTerm::new(1, "shoe")?])?;
/// let views = vec![
///     FieldView::from_strs(["shoe"]),
///     FieldView::from_strs(["boot"]),
/// ];
///
/// let batch = BatchEvaluator::new(Dispatcher::new(Searcher::exact()), Some(2))?;
/// let results = batch.evaluate(&views, &terms, &NeverCancel);
///
/// assert_eq!(results[0].count(1), 1);
/// assert_eq!(results[1].count(1), 0);
/// # Ok::<(), fieldmatch::error::FieldMatchError>(())
/// ```
#[derive(Debug)]
pub struct BatchEvaluator {
    dispatcher: Dispatcher,
    thread_pool: Arc<ThreadPool>,
}

impl BatchEvaluator {
    /// Create an evaluator with `thread_pool_size` workers, or one per CPU
    /// core when `None`.
    pub fn new(dispatcher: Dispatcher, thread_pool_size: Option<usize>) -> Result<Self> {
        let num_threads = thread_pool_size.unwrap_or_else(num_cpus::get);
        if num_threads == 0 {
            return Err(FieldMatchError::invalid_config(
                "thread pool size must be positive",
            ));
        }

        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("fieldmatch-{i}"))
            .build()
            .map_err(|e| FieldMatchError::thread_pool(format!("Failed to create thread pool: {e}")))?;
        debug!("Created batch evaluator with {num_threads} threads");

        Ok(BatchEvaluator {
            dispatcher,
            thread_pool: Arc::new(thread_pool),
        })
    }

    /// The dispatcher applied to every view.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Number of worker threads.
    pub fn num_threads(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    /// Evaluate every view in parallel; results keep the order of `views`.
    ///
    /// `cancel` is shared by all workers. Views whose evaluation observed
    /// cancellation come back incomplete.
    pub fn evaluate<C>(
        &self,
        views: &[FieldView<'_>],
        terms: &QueryTermSet,
        cancel: &C,
    ) -> Vec<MatchRecorder>
    where
        C: Cancellation + Sync + ?Sized,
    {
        let dispatcher = &self.dispatcher;
        let results: Vec<MatchRecorder> = self.thread_pool.install(|| {
            views
                .par_iter()
                .map(|view| dispatcher.evaluate_with_cancel(view, terms, cancel))
                .collect()
        });

        let incomplete = results.iter().filter(|r| !r.is_complete()).count();
        if incomplete > 0 {
            warn!(
                "{incomplete} of {} fields were cancelled before completion",
                results.len()
            );
        }
        results
    }
}
