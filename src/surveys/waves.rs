//! WAVES (Wide Area VISTA Extragalactic Survey)
//!
//! Two z < 0.2 wide strips and a deeper z < 0.8 component. The southern
//! strip and the deep fields straddle RA 0h, so their ranges wrap.

use crate::geometry::{FieldOfViewRange, Interval, RaInterval, SkyRect};

use super::SurveyDefinition;

pub const WIDE_NORTH: &str = "WAVES-Wide-North";
pub const WIDE_SOUTH: &str = "WAVES-Wide-South";
pub const DEEP: &str = "WAVES-Deep";

/// Z-band limit for both wide strips.
pub const WIDE_Z_BAND_LIMIT: f64 = 21.1;
pub const WIDE_MAX_REDSHIFT: f64 = 0.2;
/// Comoving depth of the wide strips, padded past z = 0.2 for peculiar velocities.
pub const WIDE_DISTANCE: Interval = Interval::new(0.0, 700.0);

pub const DEEP_Z_BAND_LIMIT: f64 = 21.25;
pub const DEEP_MAX_REDSHIFT: f64 = 0.8;
pub const DEEP_DISTANCE: Interval = Interval::new(0.0, 2700.0);

pub const MIN_STELLAR_MASS: f64 = 1e6;
pub const PROXY_MARGIN: f64 = 1.0;

pub fn waves_wide_north() -> SurveyDefinition {
    let ra = RaInterval::new(157.25, 225.0);
    let dec = Interval::new(-3.95, 3.95);
    SurveyDefinition::new(WIDE_NORTH, FieldOfViewRange::new(WIDE_DISTANCE, ra, dec))
        .with_aliases(["waves-wide_n", "waves-north"])
        .with_footprint(vec![SkyRect::new(ra, dec)])
        .with_min_stellar_mass(MIN_STELLAR_MASS)
        .with_magnitude_limit(WIDE_Z_BAND_LIMIT, PROXY_MARGIN)
        .with_max_redshift(WIDE_MAX_REDSHIFT)
}

pub fn waves_wide_south() -> SurveyDefinition {
    let ra = RaInterval::new(330.0, 51.6);
    let dec = Interval::new(-35.6, -27.0);
    SurveyDefinition::new(WIDE_SOUTH, FieldOfViewRange::new(WIDE_DISTANCE, ra, dec))
        .with_aliases(["waves-wide_s", "waves-south"])
        .with_footprint(vec![SkyRect::new(ra, dec)])
        .with_min_stellar_mass(MIN_STELLAR_MASS)
        .with_magnitude_limit(WIDE_Z_BAND_LIMIT, PROXY_MARGIN)
        .with_max_redshift(WIDE_MAX_REDSHIFT)
}

pub fn waves_deep() -> SurveyDefinition {
    SurveyDefinition::new(
        DEEP,
        FieldOfViewRange::new(
            DEEP_DISTANCE,
            RaInterval::new(339.0, 54.5),
            Interval::new(-35.0, -3.5),
        ),
    )
    .with_aliases(["waves-ddf"])
    .with_footprint(vec![
        SkyRect::from_bounds(339.0, 351.0, -35.0, -30.0),
        SkyRect::from_bounds(34.0, 37.0, -6.0, -3.5),
        SkyRect::from_bounds(51.5, 54.5, -29.5, -26.5),
    ])
    .with_min_stellar_mass(MIN_STELLAR_MASS)
    .with_magnitude_limit(DEEP_Z_BAND_LIMIT, PROXY_MARGIN)
    .with_max_redshift(DEEP_MAX_REDSHIFT)
}
