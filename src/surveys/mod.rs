//! Survey definitions
//!
//! Every survey is a [`SurveyDefinition`]: bounding range, rectangle
//! footprint, minimum stellar mass, and magnitude/redshift limits with a
//! proxy tolerance margin. One [`SelectionStrategy`] implementation serves
//! them all, so adding a survey means adding data, not control flow.
//!
//! Built-in surveys:
//! - GAMA: three equatorial/southern fields, r < 19.8
//! - DEVILS: three deep fields, Y < 21.2
//! - WAVES-Wide-North / WAVES-Wide-South: z < 0.2 wide strips, Z < 21.1
//! - WAVES-Deep: three deep fields across the 0h meridian, Z < 21.25, z < 0.8

pub mod devils;
pub mod gama;
pub mod waves;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SelectionError};
use crate::geometry::{FieldOfViewRange, Footprint, Interval, SkyRect};
use crate::pipeline::traits::SelectionStrategy;
use crate::types::{ModelRecord, ObservedProperties, Position};

/// Default slack (mag) added to the true limit for the position/model proxy cut.
pub const DEFAULT_PROXY_MARGIN: f64 = 1.0;

fn default_proxy_margin() -> f64 {
    DEFAULT_PROXY_MARGIN
}

/// Declarative description of one survey's selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SurveyDefinition {
    /// Canonical name (registered case-insensitively)
    pub name: String,
    /// Additional identifiers resolving to this survey
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Bounding range returned by the range query
    pub range: FieldOfViewRange,
    /// Union of rectangles; empty means the whole range
    #[serde(default)]
    pub footprint: Footprint,
    /// Minimum total stellar mass (inclusive)
    #[serde(default)]
    pub min_stellar_mass: Option<f64>,
    /// Faintest apparent magnitude kept (inclusive)
    #[serde(default)]
    pub magnitude_limit: Option<f64>,
    /// Slack added to `magnitude_limit` for the proxy cut
    #[serde(default = "default_proxy_margin")]
    pub proxy_margin: f64,
    /// Highest observed redshift kept (inclusive)
    #[serde(default)]
    pub max_redshift: Option<f64>,
}

impl SurveyDefinition {
    /// Definition with only a bounding range; every other cut accepts.
    pub fn new(name: impl Into<String>, range: FieldOfViewRange) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            range,
            footprint: Footprint::unrestricted(),
            min_stellar_mass: None,
            magnitude_limit: None,
            proxy_margin: DEFAULT_PROXY_MARGIN,
            max_redshift: None,
        }
    }

    /// Builder method: set footprint rectangles
    pub fn with_footprint(mut self, rects: Vec<SkyRect>) -> Self {
        self.footprint = Footprint::new(rects);
        self
    }

    /// Builder method: set minimum stellar mass
    pub fn with_min_stellar_mass(mut self, mass: f64) -> Self {
        self.min_stellar_mass = Some(mass);
        self
    }

    /// Builder method: set magnitude limit and proxy margin
    pub fn with_magnitude_limit(mut self, limit: f64, proxy_margin: f64) -> Self {
        self.magnitude_limit = Some(limit);
        self.proxy_margin = proxy_margin;
        self
    }

    /// Builder method: set maximum observed redshift
    pub fn with_max_redshift(mut self, z: f64) -> Self {
        self.max_redshift = Some(z);
        self
    }

    /// Builder method: add alternative identifiers
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    /// Limit applied by the proxy cut: true limit plus margin.
    pub fn proxy_magnitude_limit(&self) -> Option<f64> {
        self.magnitude_limit.map(|limit| limit + self.proxy_margin)
    }

    /// Check the definition against the selection template.
    pub fn validate(&self) -> Result<()> {
        let fail = |message: String| Err(SelectionError::invalid_strategy(&self.name, message));

        if self.name.trim().is_empty() {
            return Err(SelectionError::invalid_strategy("", "name must not be empty"));
        }

        let distance = &self.range.distance;
        if !distance.is_well_formed() || distance.min < 0.0 {
            return fail(format!(
                "distance interval [{}, {}] must be finite, ordered and non-negative",
                distance.min, distance.max
            ));
        }
        if !self.range.ra.is_well_formed() {
            return fail(format!(
                "ra interval ({}, {}) must lie in [0, 360]",
                self.range.ra.lower, self.range.ra.upper
            ));
        }
        if !is_valid_dec(&self.range.dec) {
            return fail(format!(
                "dec interval [{}, {}] must be ordered and inside [-90, 90]",
                self.range.dec.min, self.range.dec.max
            ));
        }

        for (i, rect) in self.footprint.rects().iter().enumerate() {
            if !rect.ra.is_well_formed() || !is_valid_dec(&rect.dec) {
                return fail(format!("footprint rectangle {i} is malformed"));
            }
            if !self.range.contains_rect(rect) {
                return fail(format!("footprint rectangle {i} extends outside the range"));
            }
        }

        if !self.proxy_margin.is_finite() || self.proxy_margin < 0.0 {
            return fail(format!(
                "proxy_margin must be finite and >= 0, got {}",
                self.proxy_margin
            ));
        }
        if let Some(limit) = self.magnitude_limit {
            if !limit.is_finite() {
                return fail(format!("magnitude_limit must be finite, got {limit}"));
            }
        }
        if let Some(mass) = self.min_stellar_mass {
            if !mass.is_finite() || mass < 0.0 {
                return fail(format!("min_stellar_mass must be finite and >= 0, got {mass}"));
            }
        }
        if let Some(z) = self.max_redshift {
            if !z.is_finite() || z < 0.0 {
                return fail(format!("max_redshift must be finite and >= 0, got {z}"));
            }
        }

        Ok(())
    }
}

fn is_valid_dec(dec: &Interval) -> bool {
    dec.is_well_formed() && Interval::new(-90.0, 90.0).contains_interval(dec)
}

impl SelectionStrategy for SurveyDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn field_of_view(&self) -> FieldOfViewRange {
        self.range
    }

    fn accept_position(&self, position: &Position) -> bool {
        self.range.contains(position) && self.footprint.contains(position.ra, position.dec)
    }

    fn accept_model(&self, model: &dyn ModelRecord) -> bool {
        self.min_stellar_mass
            .map_or(true, |min| model.stellar_mass() >= min)
    }

    /// Rejects only when the proxy magnitude is definitely fainter than the
    /// padded limit; a NaN proxy is left for the observed cut to decide.
    fn accept_position_and_model(&self, position: &Position, model: &dyn ModelRecord) -> bool {
        match self.proxy_magnitude_limit() {
            Some(limit) => {
                let proxy = model.absolute_magnitude() + position.proxy_distance_modulus();
                proxy <= limit || proxy.is_nan()
            }
            None => true,
        }
    }

    fn accept_observed(&self, observed: &ObservedProperties) -> bool {
        let magnitude_ok = self
            .magnitude_limit
            .map_or(true, |limit| observed.apparent_magnitude <= limit);
        let redshift_ok = self
            .max_redshift
            .map_or(true, |z| observed.redshift <= z);
        magnitude_ok && redshift_ok
    }
}

/// All built-in survey definitions.
pub fn builtin_surveys() -> Vec<SurveyDefinition> {
    vec![
        gama::gama(),
        devils::devils(),
        waves::waves_wide_north(),
        waves::waves_wide_south(),
        waves::waves_deep(),
    ]
}
