//! Selection run: freezes one strategy and its range, then evaluates candidates.
//!
//! A [`SelectionRun`] is created once, before any candidate work: activation
//! resolves the survey (failing fast on unknown identifiers), the range query
//! runs exactly once, and both are read-only for the rest of the run. Batch
//! evaluation fans candidates out over a Rayon pool; each unit of work is one
//! candidate's full stage chain.

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{RuntimeConfig, SelectionConfig};
use crate::errors::Result;
use crate::geometry::FieldOfViewRange;
use crate::registry::SurveyRegistry;
use crate::types::{ModelRecord, Position};

use super::dispatcher::StageDispatcher;
use super::observer::{NoopObserver, SelectionObserver, SelectionStats};
use super::stage::Verdict;
use super::traits::{ObservableModel, SelectionStrategy};

// ---------------------------------------------------------------------------
// Conditional tracing support
// ---------------------------------------------------------------------------

/// Enter a tracing span for a run phase (when the `tracing` feature is
/// enabled). When disabled, this is a no-op and the compiler eliminates it.
macro_rules! trace_phase {
    ($name:expr, $survey:expr) => {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("selection", phase = $name, survey = $survey).entered();
    };
}

// ============================================================================
// Candidate
// ============================================================================

/// One light-cone candidate as streamed by the tiling collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate<M> {
    pub position: Position,
    pub model: M,
}

impl<M: ModelRecord> Candidate<M> {
    pub fn new(position: Position, model: M) -> Self {
        Self { position, model }
    }
}

/// Verdicts for a batch, in input order, plus aggregated counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub verdicts: Vec<Verdict>,
    pub stats: SelectionStats,
}

impl BatchOutcome {
    /// Indices of accepted candidates, ascending.
    pub fn accepted_indices(&self) -> Vec<usize> {
        self.verdicts
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_accepted())
            .map(|(i, _)| i)
            .collect()
    }
}

// ============================================================================
// SelectionRun
// ============================================================================

/// The active survey binding and its frozen range.
#[derive(Clone)]
pub struct SelectionRun {
    strategy: Arc<dyn SelectionStrategy>,
    range: FieldOfViewRange,
    runtime: RuntimeConfig,
}

impl std::fmt::Debug for SelectionRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionRun")
            .field("survey", &self.strategy.name())
            .field("range", &self.range)
            .field("runtime", &self.runtime)
            .finish()
    }
}

impl SelectionRun {
    /// Bind `strategy` and run its range query once.
    pub fn new(strategy: Arc<dyn SelectionStrategy>) -> Self {
        let range = StageDispatcher::new(strategy.as_ref()).compute_range();

        #[cfg(feature = "tracing")]
        tracing::info!(
            survey = strategy.name(),
            dc_min = range.distance.min,
            dc_max = range.distance.max,
            ra_lower = range.ra.lower,
            ra_upper = range.ra.upper,
            dec_min = range.dec.min,
            dec_max = range.dec.max,
            "survey activated"
        );

        Self {
            strategy,
            range,
            runtime: RuntimeConfig::default(),
        }
    }

    /// Resolve `identifier` in `registry` and bind it.
    ///
    /// Fails with [`SelectionError::UnknownSurvey`](crate::SelectionError::UnknownSurvey)
    /// before anything else happens.
    pub fn activate(registry: &SurveyRegistry, identifier: &str) -> Result<Self> {
        let strategy = registry.lookup(identifier)?;
        Ok(Self::new(strategy))
    }

    /// Build the registry described by `config` and activate its survey.
    pub fn from_config(config: &SelectionConfig) -> Result<Self> {
        config.validate()?;
        let registry = config.build_registry()?;
        Ok(Self::activate(&registry, &config.survey)?.with_runtime(config.runtime.clone()))
    }

    /// Builder method: set thread limits for batch evaluation
    pub fn with_runtime(mut self, runtime: RuntimeConfig) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn strategy(&self) -> &dyn SelectionStrategy {
        self.strategy.as_ref()
    }

    pub fn survey_name(&self) -> &str {
        self.strategy.name()
    }

    /// The range computed at activation, for the tiling collaborator.
    pub fn range(&self) -> &FieldOfViewRange {
        &self.range
    }

    pub fn runtime(&self) -> &RuntimeConfig {
        &self.runtime
    }

    pub fn dispatcher(&self) -> StageDispatcher<'_, dyn SelectionStrategy> {
        StageDispatcher::new(self.strategy.as_ref())
    }

    /// Evaluate one candidate.
    pub fn evaluate<O>(&self, position: &Position, model: &dyn ModelRecord, observables: &O) -> Verdict
    where
        O: ObservableModel + ?Sized,
    {
        self.dispatcher()
            .evaluate(position, model, observables, &mut NoopObserver)
    }

    /// Evaluate one candidate, reporting stage outcomes to `observer`.
    pub fn evaluate_observed<O, Obs>(
        &self,
        position: &Position,
        model: &dyn ModelRecord,
        observables: &O,
        observer: &mut Obs,
    ) -> Verdict
    where
        O: ObservableModel + ?Sized,
        Obs: SelectionObserver,
    {
        self.dispatcher()
            .evaluate(position, model, observables, observer)
    }

    /// Evaluate a batch in parallel. Verdicts keep input order.
    pub fn evaluate_batch<M, O>(&self, candidates: &[Candidate<M>], observables: &O) -> Result<BatchOutcome>
    where
        M: ModelRecord,
        O: ObservableModel + ?Sized,
    {
        trace_phase!("evaluate_batch", self.survey_name());

        let dispatcher = self.dispatcher();
        let verdicts: Vec<Verdict> = self.runtime.scoped(|| {
            candidates
                .par_iter()
                .map(|c| dispatcher.evaluate(&c.position, &c.model, observables, &mut NoopObserver))
                .collect()
        })?;
        let stats: SelectionStats = verdicts.iter().copied().collect();

        #[cfg(feature = "tracing")]
        tracing::info!(
            survey = self.survey_name(),
            evaluated = stats.evaluated,
            accepted = stats.accepted,
            rejected = stats.total_rejected(),
            "batch evaluated"
        );

        Ok(BatchOutcome { verdicts, stats })
    }

    /// Evaluate a batch and return the accepted candidates.
    pub fn select<'c, M, O>(&self, candidates: &'c [Candidate<M>], observables: &O) -> Result<Vec<&'c Candidate<M>>>
    where
        M: ModelRecord,
        O: ObservableModel + ?Sized,
    {
        let outcome = self.evaluate_batch(candidates, observables)?;
        Ok(candidates
            .iter()
            .zip(outcome.verdicts)
            .filter(|(_, v)| v.is_accepted())
            .map(|(c, _)| c)
            .collect())
    }
}
