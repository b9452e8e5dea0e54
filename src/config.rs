//! Run configuration.
//!
//! A [`SelectionConfig`] names the active survey, optionally adds custom
//! survey definitions, and sets thread limits for batch evaluation.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "v": 1,
//!   "survey": "waves-wide-south",
//!   "runtime": { "max_threads": 8 },
//!   "surveys": []
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SelectionError};
use crate::registry::SurveyRegistry;
use crate::surveys::SurveyDefinition;

/// Current configuration schema version.
pub const CONFIG_VERSION: u32 = 1;

fn default_version() -> u32 {
    CONFIG_VERSION
}

/// Top-level selection configuration (v1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionConfig {
    /// Schema version (currently `1`).
    #[serde(default = "default_version")]
    pub v: u32,

    /// Identifier of the survey to activate (case-insensitive, trimmed).
    pub survey: String,

    /// Thread limits for batch evaluation.
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Extra survey definitions registered alongside the built-in ones.
    #[serde(default)]
    pub surveys: Vec<SurveyDefinition>,
}

impl SelectionConfig {
    /// Config selecting `survey` with default runtime settings.
    pub fn new(survey: impl Into<String>) -> Self {
        Self {
            v: CONFIG_VERSION,
            survey: survey.into(),
            runtime: RuntimeConfig::default(),
            surveys: Vec::new(),
        }
    }

    /// Parse a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builder method: add a custom survey definition
    pub fn with_survey(mut self, definition: SurveyDefinition) -> Self {
        self.surveys.push(definition);
        self
    }

    /// Builder method: set runtime limits
    pub fn with_runtime(mut self, runtime: RuntimeConfig) -> Self {
        self.runtime = runtime;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.v != CONFIG_VERSION {
            return Err(SelectionError::invalid_config(format!(
                "unsupported config version {}, expected {}",
                self.v, CONFIG_VERSION
            )));
        }

        if self.survey.trim().is_empty() {
            return Err(SelectionError::invalid_config("survey must not be empty"));
        }

        self.runtime.validate()?;

        for definition in &self.surveys {
            definition.validate()?;
        }

        Ok(())
    }

    /// Built-in surveys plus the custom definitions from this config.
    pub fn build_registry(&self) -> Result<SurveyRegistry> {
        let mut registry = SurveyRegistry::with_builtin_surveys();
        for definition in &self.surveys {
            registry.register_definition(definition.clone())?;
        }
        Ok(registry)
    }
}

/// Thread limits for parallel candidate evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Maximum number of Rayon threads.
    /// `None` uses Rayon's default (all logical cores).
    #[serde(default)]
    pub max_threads: Option<usize>,

    /// Disable parallelism entirely (equivalent to `max_threads: 1`).
    /// When `true`, overrides `max_threads`.
    #[serde(default)]
    pub single_thread: bool,
}

impl RuntimeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_threads == Some(0) {
            return Err(SelectionError::invalid_config("max_threads must be > 0"));
        }
        Ok(())
    }

    /// Resolve the effective thread count.
    ///
    /// - `single_thread == true` → `Some(1)`
    /// - `max_threads == Some(n)` → `Some(n)`
    /// - otherwise → `None` (use Rayon default)
    pub fn effective_threads(&self) -> Option<usize> {
        if self.single_thread {
            Some(1)
        } else {
            self.max_threads
        }
    }

    /// Build a scoped Rayon thread pool matching this config.
    ///
    /// Returns `None` when no thread limit is set (use global pool).
    pub fn build_thread_pool(&self) -> Result<Option<rayon::ThreadPool>> {
        self.effective_threads()
            .map(|n| {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SelectionError::invalid_config(e.to_string()))
            })
            .transpose()
    }

    /// Execute `f` within a scoped Rayon thread pool matching this config.
    ///
    /// If no thread limit is set, `f` runs directly (using the global pool).
    pub fn scoped<R: Send>(&self, f: impl FnOnce() -> R + Send) -> Result<R> {
        Ok(match self.build_thread_pool()? {
            Some(pool) => pool.install(f),
            None => f(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{FieldOfViewRange, Interval, RaInterval, SkyRect};

    #[test]
    fn test_deserialize_minimal_config() {
        let config = SelectionConfig::from_json(r#"{ "survey": "gama" }"#).unwrap();
        assert_eq!(config.v, 1);
        assert_eq!(config.survey, "gama");
        assert_eq!(config.runtime, RuntimeConfig::default());
        assert!(config.surveys.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = SelectionConfig::from_json(r#"{ "survey": "gama", "sruvey": 1 }"#).unwrap_err();
        assert!(err.to_string().contains("Serialization"));
    }

    #[test]
    fn test_validate_rejects_empty_survey() {
        assert!(SelectionConfig::new("   ").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_version() {
        let mut config = SelectionConfig::new("gama");
        config.v = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_threads() {
        let config = SelectionConfig::new("gama").with_runtime(RuntimeConfig {
            max_threads: Some(0),
            single_thread: false,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_effective_threads() {
        let rt = RuntimeConfig {
            max_threads: Some(4),
            single_thread: true,
        };
        assert_eq!(rt.effective_threads(), Some(1));
        assert_eq!(RuntimeConfig::default().effective_threads(), None);
    }

    #[test]
    fn test_scoped_runs_in_pool() {
        let rt = RuntimeConfig {
            max_threads: Some(2),
            single_thread: false,
        };
        let n = rt.scoped(rayon::current_num_threads).unwrap();
        assert_eq!(n, 2);
    }

    #[test]
    fn test_custom_survey_registered() {
        let custom = SurveyDefinition::new(
            "pencil",
            FieldOfViewRange::new(
                Interval::new(0.0, 500.0),
                RaInterval::new(350.0, 10.0),
                Interval::new(-5.0, 5.0),
            ),
        )
        .with_footprint(vec![SkyRect::from_bounds(355.0, 5.0, -2.0, 2.0)])
        .with_magnitude_limit(22.0, 1.0);

        let config = SelectionConfig::new("Pencil").with_survey(custom);
        assert!(config.validate().is_ok());
        let registry = config.build_registry().unwrap();
        assert!(registry.contains("pencil"));
        assert!(registry.contains("gama"));
    }

    #[test]
    fn test_custom_survey_from_json() {
        let json = r#"{
            "survey": "strip",
            "surveys": [{
                "name": "strip",
                "range": {
                    "distance": { "min": 0.0, "max": 1000.0 },
                    "ra": { "lower": 300.0, "upper": 60.0 },
                    "dec": { "min": -10.0, "max": 10.0 }
                },
                "footprint": [
                    { "ra": { "lower": 300.0, "upper": 60.0 }, "dec": { "min": -10.0, "max": 10.0 } }
                ],
                "magnitude_limit": 21.0
            }]
        }"#;
        let config = SelectionConfig::from_json(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.surveys[0].proxy_margin, crate::surveys::DEFAULT_PROXY_MARGIN);
    }
}
