//! GAMA (Galaxy And Mass Assembly)
//!
//! Three fields: G09 and G15 on the equator, G23 in the south. r-band
//! limited at 19.8.

use crate::geometry::{FieldOfViewRange, Interval, RaInterval, SkyRect};

use super::SurveyDefinition;

pub const NAME: &str = "GAMA";

/// Comoving depth (cMpc/h)
pub const DISTANCE: Interval = Interval::new(0.0, 2450.0);
pub const RA: RaInterval = RaInterval::new(129.0, 351.0);
pub const DEC: Interval = Interval::new(-35.0, 3.0);

pub const G09: SkyRect = SkyRect::from_bounds(129.0, 141.0, -2.0, 3.0);
pub const G15: SkyRect = SkyRect::from_bounds(211.5, 223.5, -2.0, 3.0);
pub const G23: SkyRect = SkyRect::from_bounds(339.0, 351.0, -35.0, -30.0);

pub const MIN_STELLAR_MASS: f64 = 1e8;
pub const R_BAND_LIMIT: f64 = 19.8;
pub const PROXY_MARGIN: f64 = 1.0;

pub fn gama() -> SurveyDefinition {
    SurveyDefinition::new(NAME, FieldOfViewRange::new(DISTANCE, RA, DEC))
        .with_footprint(vec![G09, G15, G23])
        .with_min_stellar_mass(MIN_STELLAR_MASS)
        .with_magnitude_limit(R_BAND_LIMIT, PROXY_MARGIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::traits::SelectionStrategy;
    use crate::types::{GalaxyRecord, Position};

    #[test]
    fn test_fields() {
        let s = gama();
        assert!(s.accept_position(&Position::new(500.0, 135.0, 0.0)));
        assert!(s.accept_position(&Position::new(500.0, 215.0, 2.5)));
        assert!(s.accept_position(&Position::new(500.0, 340.0, -34.0)));
    }

    #[test]
    fn test_gap_between_fields_rejected() {
        let s = gama();
        let p = Position::new(1000.0, 180.0, 0.0);
        assert!(s.field_of_view().contains(&p));
        assert!(!s.accept_position(&p));
    }

    #[test]
    fn test_mass_threshold_inclusive() {
        let s = gama();
        assert!(s.accept_model(&GalaxyRecord::new(0, 1e8, -18.0)));
        assert!(!s.accept_model(&GalaxyRecord::new(0, 5e7, -18.0)));
    }

    #[test]
    fn test_proxy_limit() {
        assert_eq!(gama().proxy_magnitude_limit(), Some(20.8));
    }
}
