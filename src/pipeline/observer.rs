//! Observation hooks for stage evaluation.
//!
//! The dispatcher reports every stage outcome and every final verdict to a
//! [`SelectionObserver`]. [`NoopObserver`] compiles away;
//! [`SelectionStats`] counts rejections per stage and merges across threads.

use serde::{Deserialize, Serialize};

use super::stage::{SelectionStage, Verdict};

/// Receives stage outcomes during candidate evaluation.
pub trait SelectionObserver {
    /// Called after each per-candidate stage with its outcome.
    fn on_stage(&mut self, _stage: SelectionStage, _kept: bool) {}

    /// Called once per candidate with the final verdict.
    fn on_verdict(&mut self, _verdict: Verdict) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SelectionObserver for NoopObserver {}

/// Per-stage rejection counts for a set of evaluated candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionStats {
    /// Candidates evaluated
    pub evaluated: u64,
    /// Candidates accepted by every stage
    pub accepted: u64,
    /// Rejections indexed by [`SelectionStage::index`]
    pub rejected: [u64; 5],
    /// Calls made to the observable collaborator
    pub observables_computed: u64,
}

impl SelectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one verdict.
    pub fn record(&mut self, verdict: Verdict) {
        self.evaluated += 1;
        match verdict {
            Verdict::Accepted => self.accepted += 1,
            Verdict::Rejected(stage) => self.rejected[stage.index()] += 1,
        }
        // Observables exist for anything that reached the final stage.
        if matches!(
            verdict,
            Verdict::Accepted | Verdict::Rejected(SelectionStage::ObservedFilter)
        ) {
            self.observables_computed += 1;
        }
    }

    /// Rejections at `stage`.
    pub fn rejected_at(&self, stage: SelectionStage) -> u64 {
        self.rejected[stage.index()]
    }

    /// Total rejections across all stages.
    pub fn total_rejected(&self) -> u64 {
        self.rejected.iter().sum()
    }

    /// Combine counts from two disjoint candidate sets.
    pub fn merge(mut self, other: SelectionStats) -> Self {
        self.evaluated += other.evaluated;
        self.accepted += other.accepted;
        for (mine, theirs) in self.rejected.iter_mut().zip(other.rejected) {
            *mine += theirs;
        }
        self.observables_computed += other.observables_computed;
        self
    }

    /// Fraction of evaluated candidates accepted (0 when nothing was evaluated).
    pub fn acceptance_rate(&self) -> f64 {
        if self.evaluated == 0 {
            0.0
        } else {
            self.accepted as f64 / self.evaluated as f64
        }
    }
}

impl SelectionObserver for SelectionStats {
    fn on_verdict(&mut self, verdict: Verdict) {
        self.record(verdict);
    }
}

impl FromIterator<Verdict> for SelectionStats {
    fn from_iter<I: IntoIterator<Item = Verdict>>(iter: I) -> Self {
        let mut stats = SelectionStats::new();
        for verdict in iter {
            stats.record(verdict);
        }
        stats
    }
}
