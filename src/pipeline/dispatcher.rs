//! Stage dispatcher: invokes a strategy stage by stage.
//!
//! The dispatcher borrows one strategy and exposes one method per stage, each
//! taking only that stage's inputs. [`StageDispatcher::evaluate`] chains the
//! per-candidate stages in order and stops at the first rejection; the
//! observable collaborator is called only once the proxy cut has passed.

use crate::geometry::FieldOfViewRange;
use crate::types::{ModelRecord, ObservedProperties, Position};

use super::observer::SelectionObserver;
use super::stage::{SelectionStage, StageRequest, StageResponse, Verdict};
use super::traits::{ObservableModel, SelectionStrategy};

/// Stage-by-stage access to a borrowed strategy.
#[derive(Debug)]
pub struct StageDispatcher<'s, S: ?Sized> {
    strategy: &'s S,
}

impl<S: ?Sized> Clone for StageDispatcher<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for StageDispatcher<'_, S> {}

impl<'s, S: SelectionStrategy + ?Sized> StageDispatcher<'s, S> {
    pub fn new(strategy: &'s S) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &'s S {
        self.strategy
    }

    /// Stage 1. Call once per run and keep the result.
    pub fn compute_range(&self) -> FieldOfViewRange {
        self.strategy.field_of_view()
    }

    /// Stage 2.
    #[inline]
    pub fn filter_by_position(&self, position: &Position) -> bool {
        self.strategy.accept_position(position)
    }

    /// Stage 3.
    #[inline]
    pub fn filter_by_model(&self, model: &dyn ModelRecord) -> bool {
        self.strategy.accept_model(model)
    }

    /// Stage 4.
    #[inline]
    pub fn filter_by_position_and_model(&self, position: &Position, model: &dyn ModelRecord) -> bool {
        self.strategy.accept_position_and_model(position, model)
    }

    /// Stage 5.
    #[inline]
    pub fn filter_by_observed(&self, observed: &ObservedProperties) -> bool {
        self.strategy.accept_observed(observed)
    }

    /// Route a typed request to its stage.
    pub fn dispatch(&self, request: StageRequest<'_>) -> StageResponse {
        match request {
            StageRequest::RangeQuery => StageResponse::Range(self.compute_range()),
            StageRequest::PositionFilter(position) => {
                StageResponse::Filter(self.filter_by_position(position))
            }
            StageRequest::ModelFilter(model) => StageResponse::Filter(self.filter_by_model(model)),
            StageRequest::PositionModelFilter(position, model) => {
                StageResponse::Filter(self.filter_by_position_and_model(position, model))
            }
            StageRequest::ObservedFilter(observed) => {
                StageResponse::Filter(self.filter_by_observed(observed))
            }
        }
    }

    /// Run stages 2–5 for one candidate, short-circuiting on the first rejection.
    pub fn evaluate<O, Obs>(
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
        let verdict = self.evaluate_inner(position, model, observables, observer);
        observer.on_verdict(verdict);
        verdict
    }

    fn evaluate_inner<O, Obs>(
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
        let mut check = |stage: SelectionStage, kept: bool| {
            observer.on_stage(stage, kept);
            kept
        };

        if !check(SelectionStage::PositionFilter, self.filter_by_position(position)) {
            return Verdict::Rejected(SelectionStage::PositionFilter);
        }
        if !check(SelectionStage::ModelFilter, self.filter_by_model(model)) {
            return Verdict::Rejected(SelectionStage::ModelFilter);
        }
        if !check(
            SelectionStage::PositionModelFilter,
            self.filter_by_position_and_model(position, model),
        ) {
            return Verdict::Rejected(SelectionStage::PositionModelFilter);
        }

        let observed = observables.observe(position, model);
        let kept = self.filter_by_observed(&observed);
        observer.on_stage(SelectionStage::ObservedFilter, kept);
        if kept {
            Verdict::Accepted
        } else {
            Verdict::Rejected(SelectionStage::ObservedFilter)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Interval, RaInterval};
    use crate::pipeline::observer::{NoopObserver, SelectionStats};
    use crate::types::GalaxyRecord;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Toy survey: dc <= 100, ra < 180, mass >= 1e9, proxy <= 20, observed <= 19.
    struct Toy;

    impl SelectionStrategy for Toy {
        fn name(&self) -> &str {
            "toy"
        }

        fn field_of_view(&self) -> FieldOfViewRange {
            FieldOfViewRange::new(
                Interval::new(0.0, 100.0),
                RaInterval::new(0.0, 180.0),
                Interval::new(-90.0, 90.0),
            )
        }

        fn accept_position(&self, position: &Position) -> bool {
            self.field_of_view().contains(position)
        }

        fn accept_model(&self, model: &dyn ModelRecord) -> bool {
            model.stellar_mass() >= 1e9
        }

        fn accept_position_and_model(&self, position: &Position, model: &dyn ModelRecord) -> bool {
            model.absolute_magnitude() + position.proxy_distance_modulus() <= 20.0
        }

        fn accept_observed(&self, observed: &ObservedProperties) -> bool {
            observed.apparent_magnitude <= 19.0
        }
    }

    /// Collaborator that records how often it is called.
    struct Counting {
        calls: AtomicUsize,
        magnitude: f64,
    }

    impl Counting {
        fn new(magnitude: f64) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                magnitude,
            }
        }
    }

    impl ObservableModel for Counting {
        fn observe(&self, _position: &Position, _model: &dyn ModelRecord) -> ObservedProperties {
            self.calls.fetch_add(1, Ordering::Relaxed);
            ObservedProperties::new(self.magnitude, 0.01)
        }
    }

    #[test]
    fn test_dispatch_routes_by_request() {
        let d = StageDispatcher::new(&Toy);
        let p = Position::new(50.0, 10.0, 0.0);
        let g = GalaxyRecord::new(1, 1e10, -20.0);

        let range = d.dispatch(StageRequest::RangeQuery);
        assert_eq!(range.as_range(), Some(&Toy.field_of_view()));
        assert_eq!(d.dispatch(StageRequest::PositionFilter(&p)).as_filter(), Some(true));
        assert_eq!(d.dispatch(StageRequest::ModelFilter(&g)).as_filter(), Some(true));
    }

    #[test]
    fn test_compute_range_idempotent() {
        let d = StageDispatcher::new(&Toy);
        assert!(d.compute_range().bit_identical(&d.compute_range()));
    }

    #[test]
    fn test_evaluate_short_circuits_on_position() {
        let d = StageDispatcher::new(&Toy);
        let obs = Counting::new(10.0);
        let p = Position::new(50.0, 270.0, 0.0);
        let g = GalaxyRecord::new(1, 1e10, -20.0);

        let v = d.evaluate(&p, &g, &obs, &mut NoopObserver);
        assert_eq!(v, Verdict::Rejected(SelectionStage::PositionFilter));
        assert_eq!(obs.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_evaluate_model_rejection() {
        let d = StageDispatcher::new(&Toy);
        let obs = Counting::new(10.0);
        let p = Position::new(50.0, 10.0, 0.0);
        let g = GalaxyRecord::new(1, 1e8, -20.0);

        assert_eq!(
            d.evaluate(&p, &g, &obs, &mut NoopObserver),
            Verdict::Rejected(SelectionStage::ModelFilter)
        );
        assert_eq!(obs.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_evaluate_proxy_rejection_skips_observables() {
        let d = StageDispatcher::new(&Toy);
        let obs = Counting::new(10.0);
        // proxy = -10 + 5*log10(100) + 25 = 25 > 20
        let p = Position::new(100.0, 10.0, 0.0);
        let g = GalaxyRecord::new(1, 1e10, -10.0);

        assert_eq!(
            d.evaluate(&p, &g, &obs, &mut NoopObserver),
            Verdict::Rejected(SelectionStage::PositionModelFilter)
        );
        assert_eq!(obs.calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_evaluate_observed_decides() {
        let d = StageDispatcher::new(&Toy);
        let p = Position::new(10.0, 10.0, 0.0);
        let g = GalaxyRecord::new(1, 1e10, -20.0);

        let bright = Counting::new(18.0);
        assert_eq!(d.evaluate(&p, &g, &bright, &mut NoopObserver), Verdict::Accepted);
        assert_eq!(bright.calls.load(Ordering::Relaxed), 1);

        let faint = Counting::new(19.5);
        assert_eq!(
            d.evaluate(&p, &g, &faint, &mut NoopObserver),
            Verdict::Rejected(SelectionStage::ObservedFilter)
        );
    }

    #[test]
    fn test_observer_sees_stages_in_order() {
        #[derive(Default)]
        struct Trace(Vec<(SelectionStage, bool)>);

        impl SelectionObserver for Trace {
            fn on_stage(&mut self, stage: SelectionStage, kept: bool) {
                self.0.push((stage, kept));
            }
        }

        let d = StageDispatcher::new(&Toy);
        let p = Position::new(10.0, 10.0, 0.0);
        let g = GalaxyRecord::new(1, 1e10, -20.0);
        let mut trace = Trace::default();
        d.evaluate(&p, &g, &Counting::new(18.0), &mut trace);

        let stages: Vec<_> = trace.0.iter().map(|(s, _)| *s).collect();
        assert_eq!(stages, SelectionStage::PER_CANDIDATE.to_vec());
        assert!(trace.0.iter().all(|(_, kept)| *kept));
    }

    #[test]
    fn test_stats_observer() {
        let d = StageDispatcher::new(&Toy);
        let g = GalaxyRecord::new(1, 1e10, -20.0);
        let obs = Counting::new(18.0);
        let mut stats = SelectionStats::new();

        d.evaluate(&Position::new(10.0, 10.0, 0.0), &g, &obs, &mut stats);
        d.evaluate(&Position::new(10.0, 200.0, 0.0), &g, &obs, &mut stats);

        assert_eq!(stats.evaluated, 2);
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.rejected_at(SelectionStage::PositionFilter), 1);
    }

    #[test]
    fn test_evaluate_agrees_with_dispatch() {
        let d = StageDispatcher::new(&Toy);
        let obs = Counting::new(18.0);
        let cases = [
            (Position::new(10.0, 10.0, 0.0), GalaxyRecord::new(1, 1e10, -20.0)),
            (Position::new(10.0, 270.0, 0.0), GalaxyRecord::new(2, 1e10, -20.0)),
            (Position::new(10.0, 10.0, 0.0), GalaxyRecord::new(3, 1e8, -20.0)),
            (Position::new(100.0, 10.0, 0.0), GalaxyRecord::new(4, 1e10, -10.0)),
        ];

        for (p, g) in &cases {
            let filters = [
                d.dispatch(StageRequest::PositionFilter(p)),
                d.dispatch(StageRequest::ModelFilter(g)),
                d.dispatch(StageRequest::PositionModelFilter(p, g)),
            ];
            let first_rejection = SelectionStage::PER_CANDIDATE
                .iter()
                .zip(filters)
                .find(|(_, response)| *response == StageResponse::Filter(false))
                .map(|(stage, _)| *stage);

            let verdict = d.evaluate(p, g, &obs, &mut NoopObserver);
            match first_rejection {
                Some(stage) => assert_eq!(verdict, Verdict::Rejected(stage)),
                None => assert_eq!(verdict, Verdict::Accepted),
            }
        }
    }

    #[test]
    fn test_dyn_strategy_dispatch() {
        let boxed: Box<dyn SelectionStrategy> = Box::new(Toy);
        let d = StageDispatcher::new(boxed.as_ref());
        assert_eq!(d.strategy().name(), "toy");
        assert!(d.filter_by_position(&Position::new(1.0, 1.0, 1.0)));
    }
}
