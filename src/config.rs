//! Configuration for field matching.
//!
//! Schema and query setup decide which searcher each field uses and which
//! terms only need presence; this module carries those decisions into the
//! core. Settings round-trip through JSON so they can be shipped alongside
//! the rest of a deployment's configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::dispatch::{BatchEvaluator, DispatchStrategy, Dispatcher, ModeSearchers};
use crate::error::{FieldMatchError, Result};
use crate::query::MatchMode;
use crate::search::{ExactScope, ExactSearcher, NormalizedSearcher, Searcher, TokenizedSearcher};

/// Settings for one searcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearcherSettings {
    /// Searcher variant.
    pub kind: MatchMode,

    /// Scope of exact and normalized matching.
    pub scope: ExactScope,

    /// Whether the tokenized searcher folds tokens.
    pub fold_tokens: bool,
}

impl Default for SearcherSettings {
    fn default() -> Self {
        Self {
            kind: MatchMode::Exact,
            scope: ExactScope::WholeValue,
            fold_tokens: false,
        }
    }
}

impl SearcherSettings {
    /// Settings for a searcher of `kind` with default options.
    pub fn new(kind: MatchMode) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    /// Set the exact/normalized match scope.
    pub fn with_scope(mut self, scope: ExactScope) -> Self {
        self.scope = scope;
        self
    }

    /// Set whether tokens are folded.
    pub fn with_fold_tokens(mut self, fold: bool) -> Self {
        self.fold_tokens = fold;
        self
    }

    /// Build the searcher these settings describe.
    pub fn build(&self) -> Searcher {
        match self.kind {
            MatchMode::Exact => ExactSearcher::new().with_scope(self.scope).into(),
            MatchMode::Normalized => NormalizedSearcher::new().with_scope(self.scope).into(),
            MatchMode::Tokenized => TokenizedSearcher::new()
                .with_folding(self.fold_tokens)
                .into(),
        }
    }
}

/// Field matching configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMatchConfig {
    /// Searcher for fields without an entry in `fields`.
    /// If None, each term is matched by the searcher for its own mode.
    pub default_searcher: Option<SearcherSettings>,

    /// Per-field searcher settings.
    pub fields: BTreeMap<String, SearcherSettings>,

    /// Scope used by exact and normalized searchers under term-mode routing.
    pub term_mode_scope: ExactScope,

    /// Whether term-mode routing folds tokens.
    pub term_mode_fold_tokens: bool,

    /// Terms whose consumers only need presence.
    pub presence_only_terms: Vec<u32>,

    /// Thread pool size for batch evaluation.
    /// If None, uses the number of CPU cores.
    pub thread_pool_size: Option<usize>,
}

impl FieldMatchConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: FieldMatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        debug!(
            "Loaded field match config from {} ({} fields)",
            path.display(),
            config.fields.len()
        );
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.thread_pool_size == Some(0) {
            return Err(FieldMatchError::invalid_config(
                "thread_pool_size must be positive",
            ));
        }
        if let Some(name) = self.fields.keys().find(|name| name.is_empty()) {
            return Err(FieldMatchError::invalid_config(format!(
                "field name must not be empty (got {name:?})"
            )));
        }
        Ok(())
    }

    /// Set the default searcher.
    pub fn with_default_searcher(mut self, settings: SearcherSettings) -> Self {
        self.default_searcher = Some(settings);
        self
    }

    /// Configure the searcher for `field`.
    pub fn with_field<S: Into<String>>(mut self, field: S, settings: SearcherSettings) -> Self {
        self.fields.insert(field.into(), settings);
        self
    }

    /// Register presence-only terms.
    pub fn with_presence_only<I: IntoIterator<Item = u32>>(mut self, term_ids: I) -> Self {
        self.presence_only_terms.extend(term_ids);
        self
    }

    /// Set the batch thread pool size.
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    /// Searcher settings in effect for `field`, if any.
    pub fn settings_for(&self, field: &str) -> Option<SearcherSettings> {
        self.fields.get(field).copied().or(self.default_searcher)
    }

    /// Build the dispatcher for `field`.
    pub fn dispatcher_for(&self, field: &str) -> Dispatcher {
        let strategy = match self.settings_for(field) {
            Some(settings) => DispatchStrategy::Field(settings.build()),
            None => DispatchStrategy::TermMode(ModeSearchers {
                exact: ExactSearcher::new().with_scope(self.term_mode_scope),
                normalized: NormalizedSearcher::new().with_scope(self.term_mode_scope),
                tokenized: TokenizedSearcher::new().with_folding(self.term_mode_fold_tokens),
            }),
        };
        Dispatcher::with_strategy(strategy)
            .with_presence_only(self.presence_only_terms.iter().copied())
    }

    /// Build a batch evaluator for `field`.
    pub fn batch_evaluator_for(&self, field: &str) -> Result<BatchEvaluator> {
        self.validate()?;
        BatchEvaluator::new(self.dispatcher_for(field), self.thread_pool_size)
    }
}
