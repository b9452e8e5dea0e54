//! Survey registry
//!
//! Maps survey identifiers to strategies. Identifiers are trimmed and
//! lower-cased before lookup, so `" GAMA "` and `"gama"` resolve to the same
//! strategy. An identifier that resolves to nothing is a fatal configuration
//! error.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::{Result, SelectionError};
use crate::pipeline::runner::SelectionRun;
use crate::pipeline::traits::SelectionStrategy;
use crate::surveys::{builtin_surveys, SurveyDefinition};

/// Identifier → strategy table.
#[derive(Clone, Default)]
pub struct SurveyRegistry {
    strategies: FxHashMap<String, Arc<dyn SelectionStrategy>>,
}

impl std::fmt::Debug for SurveyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurveyRegistry")
            .field("identifiers", &self.identifiers())
            .finish()
    }
}

/// Canonical lookup key for a survey identifier.
pub fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

impl SurveyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in survey and its aliases.
    pub fn with_builtin_surveys() -> Self {
        let mut registry = Self::new();
        for definition in builtin_surveys() {
            let _registered = registry.register_definition(definition);
            debug_assert!(_registered.is_ok(), "built-in survey failed to register: {_registered:?}");
        }
        registry
    }

    /// Register `strategy` under `identifier`.
    pub fn register(&mut self, identifier: &str, strategy: Arc<dyn SelectionStrategy>) -> Result<()> {
        let key = normalize_identifier(identifier);
        if key.is_empty() {
            return Err(SelectionError::invalid_config("survey identifier must not be empty"));
        }
        if self.strategies.contains_key(&key) {
            return Err(SelectionError::duplicate_survey(identifier));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(identifier = %key, survey = strategy.name(), "registered survey");

        self.strategies.insert(key, strategy);
        Ok(())
    }

    /// Validate `definition` and register it under its name and aliases.
    ///
    /// Nothing is registered unless every identifier is non-empty, distinct
    /// from the others after normalization, and not already taken.
    pub fn register_definition(&mut self, definition: SurveyDefinition) -> Result<()> {
        definition.validate()?;

        let mut seen = FxHashSet::default();
        let mut keys = Vec::with_capacity(1 + definition.aliases.len());
        for identifier in std::iter::once(&definition.name).chain(&definition.aliases) {
            let key = normalize_identifier(identifier);
            if key.is_empty() {
                return Err(SelectionError::invalid_config(format!(
                    "survey '{}' has an empty identifier",
                    definition.name
                )));
            }
            if !seen.insert(key.clone()) || self.strategies.contains_key(&key) {
                return Err(SelectionError::duplicate_survey(identifier.as_str()));
            }
            keys.push(key);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(survey = %definition.name, identifiers = keys.len(), "registered survey");

        let strategy: Arc<dyn SelectionStrategy> = Arc::new(definition);
        for key in keys {
            self.strategies.insert(key, Arc::clone(&strategy));
        }
        Ok(())
    }

    /// Resolve `identifier`.
    ///
    /// Fails with [`SelectionError::UnknownSurvey`] carrying the identifier
    /// exactly as given.
    pub fn lookup(&self, identifier: &str) -> Result<Arc<dyn SelectionStrategy>> {
        self.strategies
            .get(&normalize_identifier(identifier))
            .cloned()
            .ok_or_else(|| SelectionError::unknown_survey(identifier))
    }

    /// Bind the survey for a run and compute its range.
    pub fn activate(&self, identifier: &str) -> Result<SelectionRun> {
        SelectionRun::activate(self, identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.strategies
            .contains_key(&normalize_identifier(identifier))
    }

    /// Registered identifiers (aliases included), sorted.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
