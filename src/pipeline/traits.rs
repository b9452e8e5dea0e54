//! Stage trait definitions for the selection protocol.
//!
//! [`SelectionStrategy`] is the seam where surveys plug in: one
//! implementation per survey, one method per stage. [`ObservableModel`] is the
//! seam to the downstream collaborator that turns a position and model record
//! into observables.

use crate::geometry::FieldOfViewRange;
use crate::types::{ModelRecord, ObservedProperties, Position};

// ============================================================================
// SelectionStrategy
// ============================================================================

/// Survey-specific selection logic for all five stages.
///
/// # Contract
///
/// - **Pure**: every method is a function of its arguments and of immutable
///   strategy data. No interior mutability, no I/O. This is what lets the
///   runner evaluate candidates on many threads without locks.
/// - **Range first**: [`field_of_view`](Self::field_of_view) has no default
///   and must return the tightest known bounding range. Any position outside
///   it must be rejected by [`accept_position`](Self::accept_position).
/// - **Narrowing**: each later stage only sees candidates the earlier ones
///   kept; a rejection is final.
/// - **Proxy safety**: [`accept_position_and_model`](Self::accept_position_and_model)
///   must never reject a candidate that
///   [`accept_observed`](Self::accept_observed) would keep for the
///   observables the collaborator reports.
///
/// Stages a survey does not restrict keep the default body, which always
/// accepts.
pub trait SelectionStrategy: Send + Sync {
    /// Canonical survey name.
    fn name(&self) -> &str;

    /// Bounding range in depth, right ascension and declination.
    fn field_of_view(&self) -> FieldOfViewRange;

    /// Footprint cut on position alone.
    fn accept_position(&self, _position: &Position) -> bool {
        true
    }

    /// Cut on model properties alone.
    fn accept_model(&self, _model: &dyn ModelRecord) -> bool {
        true
    }

    /// Conservative joint proxy cut.
    fn accept_position_and_model(&self, _position: &Position, _model: &dyn ModelRecord) -> bool {
        true
    }

    /// Authoritative cut on computed observables.
    fn accept_observed(&self, _observed: &ObservedProperties) -> bool {
        true
    }
}

// ============================================================================
// ObservableModel
// ============================================================================

/// Downstream collaborator computing observables for a surviving candidate.
///
/// Only called for candidates that pass every stage up to and including the
/// position/model proxy cut.
pub trait ObservableModel: Send + Sync {
    fn observe(&self, position: &Position, model: &dyn ModelRecord) -> ObservedProperties;
}

impl<F> ObservableModel for F
where
    F: Fn(&Position, &dyn ModelRecord) -> ObservedProperties + Send + Sync,
{
    #[inline]
    fn observe(&self, position: &Position, model: &dyn ModelRecord) -> ObservedProperties {
        self(position, model)
    }
}
