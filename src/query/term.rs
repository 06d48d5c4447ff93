//! Query terms as handed over by the query parser.

use serde::{Deserialize, Serialize};

use crate::analysis::decoder::{CodepointDecoder, Encoding};
use crate::analysis::fold::fold_chars;
use crate::error::{FieldMatchError, Result};

/// Matching discipline requested for a term, and the searcher kind chosen for
/// a field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Codepoint-for-codepoint equality.
    #[default]
    Exact,
    /// Equality after case and diacritic folding.
    Normalized,
    /// Equality against whole word tokens.
    Tokenized,
}

/// A single resolved query term.
///
/// Terms are immutable once built and are shared read-only between every
/// field evaluated for a query. The folded projection of the text is computed
/// once here so normalized searchers only fold field content.
///
/// # Examples
///
/// ```
/// use fieldmatch::query::{MatchMode, QueryTerm};
///
/// let term = QueryTerm::new(1, "Café")?
///     .with_mode(MatchMode::Normalized)
///     .with_min_field_size(2);
///
/// assert_eq!(term.len(), 4);
/// assert_eq!(term.folded(), &['c', 'a', 'f', 'e']);
/// assert!(term.skips(1));
/// # Ok::<(), fieldmatch::error::FieldMatchError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TermRepr", into = "TermRepr")]
pub struct QueryTerm {
    id: u32,
    text: Vec<char>,
    folded: Vec<char>,
    min_field_size: usize,
    mode: MatchMode,
    prefix: bool,
}

impl QueryTerm {
    /// Create an exact term with no minimum field size.
    pub fn new<S: AsRef<str>>(id: u32, text: S) -> Result<Self> {
        Self::from_chars(id, text.as_ref().chars().collect())
    }

    /// Create a term from raw bytes, decoded the same way field content is.
    pub fn from_bytes(id: u32, bytes: &[u8], encoding: Encoding) -> Result<Self> {
        Self::from_chars(
            id,
            CodepointDecoder::new(bytes, encoding)
                .map(|c| c.codepoint)
                .collect(),
        )
    }

    /// Create a term from a codepoint sequence.
    pub fn from_chars(id: u32, text: Vec<char>) -> Result<Self> {
        if text.is_empty() {
            return Err(FieldMatchError::empty_term(id));
        }
        let folded = fold_chars(text.iter().copied());
        Ok(QueryTerm {
            id,
            text,
            folded,
            min_field_size: 0,
            mode: MatchMode::default(),
            prefix: false,
        })
    }

    /// Set the minimum field size (in codepoints) below which this term is
    /// not searched.
    pub fn with_min_field_size(mut self, min_field_size: usize) -> Self {
        self.min_field_size = min_field_size;
        self
    }

    /// Set the matching mode.
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Mark the term as a prefix term: it also matches values (or, for
    /// tokenized matching, tokens) that merely start with its text.
    pub fn with_prefix(mut self, prefix: bool) -> Self {
        self.prefix = prefix;
        self
    }

    /// Unique term identifier.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// The term text as codepoints.
    pub fn text(&self) -> &[char] {
        &self.text
    }

    /// The case and diacritic folded text.
    ///
    /// May be empty when the text consists only of combining marks; such a
    /// term never matches under folding.
    pub fn folded(&self) -> &[char] {
        &self.folded
    }

    /// The term text as a `String`.
    pub fn text_string(&self) -> String {
        self.text.iter().collect()
    }

    /// Minimum field size in codepoints.
    pub fn min_field_size(&self) -> usize {
        self.min_field_size
    }

    /// Matching mode.
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Whether this is a prefix term.
    pub fn is_prefix(&self) -> bool {
        self.prefix
    }

    /// Number of codepoints in the term text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Always false; empty terms cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether a value of `field_size` codepoints is too short for this term.
    pub fn skips(&self, field_size: usize) -> bool {
        field_size < self.min_field_size
    }
}

/// Serialized form of a [`QueryTerm`].
#[derive(Clone, Debug, Serialize, Deserialize)]
struct TermRepr {
    id: u32,
    text: String,
    #[serde(default)]
    min_field_size: usize,
    #[serde(default)]
    mode: MatchMode,
    #[serde(default)]
    prefix: bool,
}

impl TryFrom<TermRepr> for QueryTerm {
    type Error = FieldMatchError;

    fn try_from(repr: TermRepr) -> Result<Self> {
        Ok(QueryTerm::new(repr.id, &repr.text)?
            .with_min_field_size(repr.min_field_size)
            .with_mode(repr.mode)
            .with_prefix(repr.prefix))
    }
}

impl From<QueryTerm> for TermRepr {
    fn from(term: QueryTerm) -> Self {
        TermRepr {
            text: term.text_string(),
            id: term.id,
            min_field_size: term.min_field_size,
            mode: term.mode,
            prefix: term.prefix,
        }
    }
}
