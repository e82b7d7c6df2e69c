#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Tree species coefficient profile types.
//!
//! A [`SpeciesProfile`] carries the placeholder growth and benefit
//! coefficients used by the benefit model. Profiles are defined as TOML
//! files embedded in `street_trees_species` and serialized unchanged to
//! API clients.

use serde::{Deserialize, Serialize};

/// Growth and benefit coefficients for a single tree species.
///
/// All coefficients are demo scalars, not calibrated values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesProfile {
    /// Unique species identifier (e.g., `"red_maple"`).
    pub species_id: String,
    /// Common name (e.g., "Red Maple").
    pub common: String,
    /// Latin binomial (e.g., "Acer rubrum").
    pub latin: String,
    /// Trunk diameter growth in inches per year.
    pub dbh_growth_in_per_year: f64,
    /// Canopy radius in meters per inch of DBH.
    pub canopy_k_m_per_in: f64,
    /// Annual carbon sequestration in kg per inch of DBH.
    pub carbon_kg_per_in_dbh: f64,
    /// Annual stormwater interception in liters per square meter of canopy.
    pub stormwater_l_per_m2_canopy: f64,
    /// Annual pollution removal in grams per square meter of canopy.
    pub pollution_g_per_m2_canopy: f64,
}

impl SpeciesProfile {
    /// Returns the species identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.species_id
    }

    /// Returns the five model coefficients in definition order: growth,
    /// canopy, carbon, stormwater, pollution.
    #[must_use]
    pub const fn coefficients(&self) -> [f64; 5] {
        [
            self.dbh_growth_in_per_year,
            self.canopy_k_m_per_in,
            self.carbon_kg_per_in_dbh,
            self.stormwater_l_per_m2_canopy,
            self.pollution_g_per_m2_canopy,
        ]
    }
}
