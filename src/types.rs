//! Core record types exchanged with the light-cone collaborators.
//!
//! Records are produced upstream (tiling, galaxy-formation model, observable
//! computation), read by the selection stages and then discarded. Nothing in
//! this module is mutated after construction.

use serde::{Deserialize, Serialize};

// ============================================================================
// Position
// ============================================================================

/// Sky position and depth of one candidate, as placed by the tiling collaborator.
///
/// Units follow the survey definitions: comoving distance in the same units as
/// the survey's distance interval (cMpc/h for the built-in surveys), right
/// ascension in degrees `[0, 360)`, declination in degrees `[-90, 90]`.
///
/// Non-finite values are carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Comoving distance to the observer
    pub comoving_distance: f64,
    /// Right ascension (deg)
    pub ra: f64,
    /// Declination (deg)
    pub dec: f64,
}

impl Position {
    pub fn new(comoving_distance: f64, ra: f64, dec: f64) -> Self {
        Self {
            comoving_distance,
            ra,
            dec,
        }
    }

    /// Distance modulus computed with the comoving distance standing in for
    /// the luminosity distance.
    ///
    /// `d_L = (1 + z) d_C >= d_C`, so this is a lower bound on the true
    /// distance modulus. Distances are read as Mpc; for values in Mpc/h with
    /// `h <= 1` the bound only gets looser.
    pub fn proxy_distance_modulus(&self) -> f64 {
        5.0 * self.comoving_distance.log10() + 25.0
    }
}

// ============================================================================
// Model records
// ============================================================================

/// Read access to the galaxy-formation model properties used by selection cuts.
///
/// The selection core never interprets a model beyond these named fields.
/// `absolute_magnitude` comes from the external mass-to-magnitude conversion
/// and must be no fainter than the magnitude the observable collaborator
/// eventually reports once the distance modulus is removed.
pub trait ModelRecord: Send + Sync {
    /// Total stellar mass (Msun/h)
    fn stellar_mass(&self) -> f64;

    /// Rest-frame absolute magnitude in the survey selection band
    fn absolute_magnitude(&self) -> f64;
}

/// Plain model record for callers that do not carry their own property type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GalaxyRecord {
    /// Model-assigned galaxy identifier
    pub id: u64,
    /// Stellar mass of disk and bulge combined (Msun/h)
    pub stellar_mass: f64,
    /// Absolute magnitude estimate in the selection band
    pub absolute_magnitude: f64,
}

impl GalaxyRecord {
    pub fn new(id: u64, stellar_mass: f64, absolute_magnitude: f64) -> Self {
        Self {
            id,
            stellar_mass,
            absolute_magnitude,
        }
    }
}

impl ModelRecord for GalaxyRecord {
    #[inline]
    fn stellar_mass(&self) -> f64 {
        self.stellar_mass
    }

    #[inline]
    fn absolute_magnitude(&self) -> f64 {
        self.absolute_magnitude
    }
}

// ============================================================================
// Observed properties
// ============================================================================

/// Observables computed by the downstream collaborator for candidates that
/// survive the position/model proxy cut.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservedProperties {
    /// Apparent magnitude in the survey selection band
    pub apparent_magnitude: f64,
    /// Observed redshift (cosmological plus peculiar velocity)
    pub redshift: f64,
}

impl ObservedProperties {
    pub fn new(apparent_magnitude: f64, redshift: f64) -> Self {
        Self {
            apparent_magnitude,
            redshift,
        }
    }
}
