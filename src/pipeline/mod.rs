//! Staged selection protocol.
//!
//! ## Submodules
//!
//! - [`stage`] — Stage enumeration, typed requests/responses, verdicts
//! - [`traits`] — Strategy and observable-collaborator traits
//! - [`dispatcher`] — Per-stage invocation and short-circuit evaluation
//! - [`observer`] — Stage hooks and rejection statistics
//! - [`runner`] — Frozen survey binding and parallel batch evaluation

pub mod dispatcher;
pub mod observer;
pub mod runner;
pub mod stage;
pub mod traits;

pub use dispatcher::StageDispatcher;
pub use observer::{NoopObserver, SelectionObserver, SelectionStats};
pub use runner::{BatchOutcome, Candidate, SelectionRun};
pub use stage::{SelectionStage, StageRequest, StageResponse, Verdict};
pub use traits::{ObservableModel, SelectionStrategy};
