//! Sky geometry: depth/declination intervals, wrap-aware right-ascension
//! intervals, rectangular footprints and per-survey field-of-view ranges.
//!
//! All bounds are closed. Right ascension is expected in `[0, 360)` degrees;
//! values are not normalized, so callers that produce `ra < 0` or
//! `ra >= 360` get whatever the raw comparison gives.

use serde::{Deserialize, Serialize};

use crate::types::Position;

/// Full circle in degrees.
pub const FULL_CIRCLE_DEG: f64 = 360.0;

// ============================================================================
// Interval
// ============================================================================

/// Closed interval `[min, max]` on a non-periodic axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// `true` if `other` lies entirely inside this interval.
    pub fn contains_interval(&self, other: &Interval) -> bool {
        other.min >= self.min && other.max <= self.max
    }

    /// Both bounds finite and ordered.
    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

// ============================================================================
// RaInterval
// ============================================================================

/// Closed right-ascension interval in degrees.
///
/// `lower > upper` denotes the wedge that crosses 0°/360°: `(330, 30)` covers
/// `[330, 360) ∪ [0, 30]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaInterval {
    pub lower: f64,
    pub upper: f64,
}

impl RaInterval {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// The whole circle.
    pub const fn full() -> Self {
        Self::new(0.0, FULL_CIRCLE_DEG)
    }

    /// `true` when the interval crosses 0°/360°.
    #[inline]
    pub fn wraps(&self) -> bool {
        self.lower > self.upper
    }

    #[inline]
    pub fn contains(&self, ra: f64) -> bool {
        if self.wraps() {
            ra >= self.lower || ra <= self.upper
        } else {
            ra >= self.lower && ra <= self.upper
        }
    }

    /// Angular width in degrees.
    pub fn width(&self) -> f64 {
        if self.wraps() {
            FULL_CIRCLE_DEG - self.lower + self.upper
        } else {
            self.upper - self.lower
        }
    }

    /// Split into at most two non-wrapping segments.
    fn segments(&self) -> [Option<Interval>; 2] {
        if self.wraps() {
            [
                Some(Interval::new(self.lower, FULL_CIRCLE_DEG)),
                Some(Interval::new(0.0, self.upper)),
            ]
        } else {
            [Some(Interval::new(self.lower, self.upper)), None]
        }
    }

    /// `true` if every right ascension in `other` is also in `self`.
    pub fn contains_interval(&self, other: &RaInterval) -> bool {
        let outer = self.segments();
        other.segments().iter().flatten().all(|inner| {
            outer
                .iter()
                .flatten()
                .any(|segment| segment.contains_interval(inner))
        })
    }

    /// Both bounds finite and inside `[0, 360]`.
    pub fn is_well_formed(&self) -> bool {
        let circle = Interval::new(0.0, FULL_CIRCLE_DEG);
        self.lower.is_finite()
            && self.upper.is_finite()
            && circle.contains(self.lower)
            && circle.contains(self.upper)
    }
}

// ============================================================================
// Footprint
// ============================================================================

/// Axis-aligned RA/Dec rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyRect {
    pub ra: RaInterval,
    pub dec: Interval,
}

impl SkyRect {
    pub const fn new(ra: RaInterval, dec: Interval) -> Self {
        Self { ra, dec }
    }

    /// Shorthand: `SkyRect::from_bounds(ra_lo, ra_hi, dec_lo, dec_hi)`.
    pub const fn from_bounds(ra_lower: f64, ra_upper: f64, dec_min: f64, dec_max: f64) -> Self {
        Self::new(
            RaInterval::new(ra_lower, ra_upper),
            Interval::new(dec_min, dec_max),
        )
    }

    #[inline]
    pub fn contains(&self, ra: f64, dec: f64) -> bool {
        self.dec.contains(dec) && self.ra.contains(ra)
    }
}

/// Union of sky rectangles.
///
/// An empty footprint places no angular restriction beyond the survey range,
/// so [`Footprint::contains`] returns `true` for it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Footprint {
    rects: Vec<SkyRect>,
}

impl Footprint {
    pub fn new(rects: Vec<SkyRect>) -> Self {
        Self { rects }
    }

    /// Footprint with no rectangles (unrestricted).
    pub fn unrestricted() -> Self {
        Self::default()
    }

    pub fn rects(&self) -> &[SkyRect] {
        &self.rects
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Point-in-footprint test shared by every survey.
    pub fn contains(&self, ra: f64, dec: f64) -> bool {
        self.rects.is_empty() || self.rects.iter().any(|r| r.contains(ra, dec))
    }
}

// ============================================================================
// FieldOfViewRange
// ============================================================================

/// Bounding box of a survey in depth, right ascension and declination.
///
/// Produced once by the range query and read-only afterwards. Anything outside
/// it is rejected by every later stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldOfViewRange {
    /// Comoving distance interval
    pub distance: Interval,
    /// Right-ascension interval (may wrap)
    pub ra: RaInterval,
    /// Declination interval
    pub dec: Interval,
}

impl FieldOfViewRange {
    pub const fn new(distance: Interval, ra: RaInterval, dec: Interval) -> Self {
        Self { distance, ra, dec }
    }

    /// `true` if the position lies inside the range on all three axes.
    pub fn contains(&self, position: &Position) -> bool {
        self.distance.contains(position.comoving_distance)
            && self.ra.contains(position.ra)
            && self.dec.contains(position.dec)
    }

    /// `true` if the rectangle lies entirely inside the angular part of the range.
    pub fn contains_rect(&self, rect: &SkyRect) -> bool {
        self.ra.contains_interval(&rect.ra) && self.dec.contains_interval(&rect.dec)
    }

    /// Bit-level equality, treating `-0.0` and `0.0` as different.
    pub fn bit_identical(&self, other: &FieldOfViewRange) -> bool {
        let bits = |r: &FieldOfViewRange| {
            [
                r.distance.min.to_bits(),
                r.distance.max.to_bits(),
                r.ra.lower.to_bits(),
                r.ra.upper.to_bits(),
                r.dec.min.to_bits(),
                r.dec.max.to_bits(),
            ]
        };
        bits(self) == bits(other)
    }
}
