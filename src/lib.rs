//! # survey_select
//!
//! Survey selection for light-cone mock galaxy catalogs.
//!
//! A survey is a [`SelectionStrategy`] evaluated in five ordered stages:
//!
//! 1. **Range query** — the depth/RA/Dec box the tiling step must cover
//! 2. **Position filter** — the survey footprint inside that box
//! 3. **Model filter** — cuts on model properties such as stellar mass
//! 4. **Position/model filter** — a cheap, padded magnitude proxy
//! 5. **Observed filter** — the true magnitude and redshift limits
//!
//! Later stages only ever see what earlier ones kept, and the observable
//! collaborator runs only for candidates that reach stage 5.
//!
//! ## Features
//!
//! - **Data-driven surveys**: GAMA, DEVILS and WAVES ship as
//!   [`SurveyDefinition`] values; custom surveys load from JSON
//! - **Wrap-aware geometry**: RA intervals may cross 0°/360°
//! - **Parallel**: batches are evaluated on a Rayon pool with no locking
//! - **Tracing**: activation and batch summaries are logged when the
//!   `tracing` feature is enabled

pub mod config;
pub mod errors;
pub mod geometry;
pub mod pipeline;
pub mod registry;
pub mod surveys;
pub mod types;

// Re-export commonly used types
pub use config::{RuntimeConfig, SelectionConfig};
pub use errors::{ErrorCode, Result, SelectionError};
pub use geometry::{FieldOfViewRange, Footprint, Interval, RaInterval, SkyRect};
pub use types::{GalaxyRecord, ModelRecord, ObservedProperties, Position};

// Re-export main functionality
pub use pipeline::{
    BatchOutcome, Candidate, NoopObserver, ObservableModel, SelectionObserver, SelectionRun,
    SelectionStage, SelectionStats, SelectionStrategy, StageDispatcher, StageRequest,
    StageResponse, Verdict,
};
pub use registry::SurveyRegistry;
pub use surveys::SurveyDefinition;
