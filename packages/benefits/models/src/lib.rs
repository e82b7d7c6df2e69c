#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canopy and annual benefit snapshot types.

use serde::{Deserialize, Serialize};

/// Canopy size and annual benefits for one tree at one diameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenefitSnapshot {
    /// Canopy radius in meters.
    pub canopy_radius_m: f64,
    /// Canopy area in square meters.
    pub canopy_area_m2: f64,
    /// Carbon sequestration in kg/year.
    pub carbon_kg_per_year: f64,
    /// Stormwater interception in liters/year.
    pub stormwater_l_per_year: f64,
    /// Pollution removal in grams/year.
    pub pollution_g_per_year: f64,
}
