//! DEVILS (Deep Extragalactic VIsible Legacy Survey)
//!
//! Deep fields D02 (XMM-LSS), D03 (ECDFS) and D10 (COSMOS), Y < 21.2.

use crate::geometry::{FieldOfViewRange, Interval, RaInterval, SkyRect};

use super::SurveyDefinition;

pub const NAME: &str = "DEVILS";

pub const DISTANCE: Interval = Interval::new(0.0, 6700.0);
pub const RA: RaInterval = RaInterval::new(34.0, 150.7);
pub const DEC: Interval = Interval::new(-28.54, 2.79);

pub const D02: SkyRect = SkyRect::from_bounds(34.0, 37.05, -5.2, -4.2);
pub const D03: SkyRect = SkyRect::from_bounds(52.26, 53.81, -28.54, -27.44);
pub const D10: SkyRect = SkyRect::from_bounds(149.38, 150.7, 1.65, 2.79);

pub const MIN_STELLAR_MASS: f64 = 1e6;
pub const Y_BAND_LIMIT: f64 = 21.2;
pub const PROXY_MARGIN: f64 = 1.0;

pub fn devils() -> SurveyDefinition {
    SurveyDefinition::new(NAME, FieldOfViewRange::new(DISTANCE, RA, DEC))
        .with_footprint(vec![D02, D03, D10])
        .with_min_stellar_mass(MIN_STELLAR_MASS)
        .with_magnitude_limit(Y_BAND_LIMIT, PROXY_MARGIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::traits::SelectionStrategy;
    use crate::types::Position;

    #[test]
    fn test_cosmos_field() {
        let s = devils();
        assert!(s.accept_position(&Position::new(3000.0, 150.0, 2.2)));
        assert!(!s.accept_position(&Position::new(3000.0, 100.0, 0.0)));
    }

    #[test]
    fn test_depth_limit() {
        let s = devils();
        assert!(!s.accept_position(&Position::new(6700.1, 150.0, 2.2)));
    }
}
