//! The per-query term registry.

use std::sync::Arc;

use ahash::AHashMap;
use log::debug;

use crate::error::{FieldMatchError, Result};
use crate::query::term::QueryTerm;

/// Ordered, id-unique collection of query terms.
///
/// The set is immutable and reference counted: cloning it hands another
/// worker the same terms without copying them. Terms keep the order they
/// were registered in, which is the order searchers evaluate them.
///
/// # Examples
///
/// ```
/// use fieldmatch::query::{QueryTerm, QueryTermSet};
///
/// let terms = QueryTermSet::new(vec![
///     QueryTerm::new(1, "red")?,
///     QueryTerm::new(2, "shoe")?,
/// ])?;
///
/// assert_eq!(terms.len(), 2);
/// assert_eq!(terms.get(2).map(|t| t.text_string()), Some("shoe".to_string()));
/// # Ok::<(), fieldmatch::error::FieldMatchError>(())
/// ```
#[derive(Clone, Debug)]
pub struct QueryTermSet {
    inner: Arc<TermSetInner>,
}

#[derive(Debug)]
struct TermSetInner {
    terms: Vec<QueryTerm>,
    by_id: AHashMap<u32, usize>,
}

impl QueryTermSet {
    /// Build a term set, rejecting duplicate ids.
    pub fn new(terms: Vec<QueryTerm>) -> Result<Self> {
        let mut by_id = AHashMap::with_capacity(terms.len());
        for (index, term) in terms.iter().enumerate() {
            if by_id.insert(term.id(), index).is_some() {
                return Err(FieldMatchError::DuplicateTermId(term.id()));
            }
        }
        debug!("Registered {} query terms", terms.len());

        Ok(QueryTermSet {
            inner: Arc::new(TermSetInner { terms, by_id }),
        })
    }

    /// A set with no terms.
    pub fn empty() -> Self {
        QueryTermSet {
            inner: Arc::new(TermSetInner {
                terms: Vec::new(),
                by_id: AHashMap::new(),
            }),
        }
    }

    /// Parse a JSON array of terms, e.g.
    /// `[{"id": 1, "text": "shoe", "mode": "exact", "min_field_size": 0}]`.
    pub fn from_json(json: &str) -> Result<Self> {
        let terms: Vec<QueryTerm> = serde_json::from_str(json)?;
        Self::new(terms)
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.inner.terms.len()
    }

    /// Whether the set has no terms.
    pub fn is_empty(&self) -> bool {
        self.inner.terms.is_empty()
    }

    /// Look up a term by id.
    pub fn get(&self, id: u32) -> Option<&QueryTerm> {
        self.inner
            .by_id
            .get(&id)
            .map(|&index| &self.inner.terms[index])
    }

    /// Whether a term with `id` is registered.
    pub fn contains(&self, id: u32) -> bool {
        self.inner.by_id.contains_key(&id)
    }

    /// Terms in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, QueryTerm> {
        self.inner.terms.iter()
    }

    /// Terms as a slice in registration order.
    pub fn as_slice(&self) -> &[QueryTerm] {
        &self.inner.terms
    }

    /// Whether any term needs the codepoint length of a value.
    pub fn has_size_thresholds(&self) -> bool {
        self.iter().any(|t| t.min_field_size() > 0)
    }
}

impl<'a> IntoIterator for &'a QueryTermSet {
    type Item = &'a QueryTerm;
    type IntoIter = std::slice::Iter<'a, QueryTerm>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
