//! Selection stages and their typed requests/responses.
//!
//! Every stage takes exactly the inputs its contract needs. A
//! [`StageRequest`] variant carries those inputs and nothing else, so a
//! position filter request cannot carry observed-sky data and an observed
//! filter request cannot be issued without it.

use serde::{Deserialize, Serialize};

use crate::geometry::FieldOfViewRange;
use crate::types::{ModelRecord, ObservedProperties, Position};

// ============================================================================
// SelectionStage
// ============================================================================

/// The five ordered selection stages.
///
/// Cost and information requirement grow with the ordinal; `Ord` follows
/// evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStage {
    /// Bounding range in depth/RA/Dec, computed once per run.
    RangeQuery,
    /// Irregular footprint inside the bounding range.
    PositionFilter,
    /// Model-only cuts (e.g. minimum stellar mass).
    ModelFilter,
    /// Cheap joint proxy cut with a tolerance margin.
    PositionModelFilter,
    /// Authoritative cut on computed observables.
    ObservedFilter,
}

impl SelectionStage {
    /// All stages in evaluation order.
    pub const ALL: [SelectionStage; 5] = [
        SelectionStage::RangeQuery,
        SelectionStage::PositionFilter,
        SelectionStage::ModelFilter,
        SelectionStage::PositionModelFilter,
        SelectionStage::ObservedFilter,
    ];

    /// The per-candidate stages in evaluation order.
    pub const PER_CANDIDATE: [SelectionStage; 4] = [
        SelectionStage::PositionFilter,
        SelectionStage::ModelFilter,
        SelectionStage::PositionModelFilter,
        SelectionStage::ObservedFilter,
    ];

    /// Zero-based ordinal in evaluation order.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The stage evaluated after this one, if any.
    pub fn next(self) -> Option<SelectionStage> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// `true` for the stage that needs the observable collaborator's output.
    pub fn requires_observables(self) -> bool {
        matches!(self, SelectionStage::ObservedFilter)
    }

    /// Returns the user-facing name used in JSON and log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RangeQuery => "range_query",
            Self::PositionFilter => "position_filter",
            Self::ModelFilter => "model_filter",
            Self::PositionModelFilter => "position_model_filter",
            Self::ObservedFilter => "observed_filter",
        }
    }
}

impl std::fmt::Display for SelectionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Requests and responses
// ============================================================================

/// A stage invocation with exactly the inputs that stage consumes.
#[derive(Clone, Copy)]
pub enum StageRequest<'a> {
    RangeQuery,
    PositionFilter(&'a Position),
    ModelFilter(&'a dyn ModelRecord),
    PositionModelFilter(&'a Position, &'a dyn ModelRecord),
    ObservedFilter(&'a ObservedProperties),
}

impl StageRequest<'_> {
    /// The stage this request targets.
    pub fn stage(&self) -> SelectionStage {
        match self {
            Self::RangeQuery => SelectionStage::RangeQuery,
            Self::PositionFilter(_) => SelectionStage::PositionFilter,
            Self::ModelFilter(_) => SelectionStage::ModelFilter,
            Self::PositionModelFilter(..) => SelectionStage::PositionModelFilter,
            Self::ObservedFilter(_) => SelectionStage::ObservedFilter,
        }
    }
}

impl std::fmt::Debug for StageRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RangeQuery => f.write_str("RangeQuery"),
            Self::PositionFilter(p) => f.debug_tuple("PositionFilter").field(p).finish(),
            Self::ModelFilter(m) => f
                .debug_struct("ModelFilter")
                .field("stellar_mass", &m.stellar_mass())
                .finish(),
            Self::PositionModelFilter(p, m) => f
                .debug_struct("PositionModelFilter")
                .field("position", p)
                .field("absolute_magnitude", &m.absolute_magnitude())
                .finish(),
            Self::ObservedFilter(o) => f.debug_tuple("ObservedFilter").field(o).finish(),
        }
    }
}

/// Result of a stage invocation.
///
/// The range query answers with a range; every other stage answers with a
/// keep/reject flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageResponse {
    Range(FieldOfViewRange),
    Filter(bool),
}

impl StageResponse {
    pub fn as_range(&self) -> Option<&FieldOfViewRange> {
        match self {
            Self::Range(range) => Some(range),
            Self::Filter(_) => None,
        }
    }

    pub fn as_filter(&self) -> Option<bool> {
        match self {
            Self::Filter(keep) => Some(*keep),
            Self::Range(_) => None,
        }
    }
}

// ============================================================================
// Verdict
// ============================================================================

/// Final keep/reject decision for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "verdict", content = "stage")]
pub enum Verdict {
    Accepted,
    /// Rejected at the given stage; later stages were not consulted.
    Rejected(SelectionStage),
}

impl Verdict {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    /// The rejecting stage, if any.
    pub fn rejected_at(&self) -> Option<SelectionStage> {
        match self {
            Verdict::Accepted => None,
            Verdict::Rejected(stage) => Some(*stage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GalaxyRecord;

    #[test]
    fn test_stage_order() {
        let mut sorted = SelectionStage::ALL;
        sorted.sort();
        assert_eq!(sorted, SelectionStage::ALL);
        assert!(SelectionStage::PositionFilter < SelectionStage::ObservedFilter);
        assert_eq!(
            SelectionStage::RangeQuery.next(),
            Some(SelectionStage::PositionFilter)
        );
        assert_eq!(SelectionStage::ObservedFilter.next(), None);
        assert_eq!(&SelectionStage::ALL[1..], &SelectionStage::PER_CANDIDATE[..]);
    }

    #[test]
    fn test_stage_names() {
        for stage in SelectionStage::ALL {
            let json = serde_json::to_value(stage).unwrap();
            assert_eq!(json, stage.as_str());
        }
        assert_eq!(
            SelectionStage::PositionModelFilter.to_string(),
            "position_model_filter"
        );
    }

    #[test]
    fn test_only_observed_filter_requires_observables() {
        let needing: Vec<_> = SelectionStage::ALL
            .into_iter()
            .filter(|s| s.requires_observables())
            .collect();
        assert_eq!(needing, vec![SelectionStage::ObservedFilter]);
    }

    #[test]
    fn test_request_stage_mapping() {
        let p = Position::new(10.0, 20.0, 30.0);
        let g = GalaxyRecord::new(1, 1e9, -19.0);
        let o = ObservedProperties::new(18.0, 0.1);

        assert_eq!(StageRequest::RangeQuery.stage(), SelectionStage::RangeQuery);
        assert_eq!(
            StageRequest::PositionFilter(&p).stage(),
            SelectionStage::PositionFilter
        );
        assert_eq!(StageRequest::ModelFilter(&g).stage(), SelectionStage::ModelFilter);
        assert_eq!(
            StageRequest::PositionModelFilter(&p, &g).stage(),
            SelectionStage::PositionModelFilter
        );
        assert_eq!(
            StageRequest::ObservedFilter(&o).stage(),
            SelectionStage::ObservedFilter
        );
        assert!(format!("{:?}", StageRequest::ModelFilter(&g)).contains("stellar_mass"));
    }

    #[test]
    fn test_response_accessors() {
        assert_eq!(StageResponse::Filter(true).as_filter(), Some(true));
        assert!(StageResponse::Filter(false).as_range().is_none());
    }

    #[test]
    fn test_verdict_json() {
        let v = Verdict::Rejected(SelectionStage::PositionFilter);
        let value = serde_json::to_value(v).unwrap();
        assert_eq!(value["verdict"], "rejected");
        assert_eq!(value["stage"], "position_filter");
        assert_eq!(v.rejected_at(), Some(SelectionStage::PositionFilter));
        assert!(Verdict::Accepted.is_accepted());
    }
}
