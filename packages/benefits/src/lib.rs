#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Canopy geometry and annual environmental benefit model.
//!
//! Pure functions turning a species profile and trunk diameter (DBH, in
//! inches) into canopy size and annual carbon, stormwater, and pollution
//! estimates. Diameter growth is linear in years. Coefficients come from
//! [`SpeciesProfile`] and are placeholders, so only the shape of these
//! models is meaningful.

use std::f64::consts::PI;

pub use street_trees_benefits_models::BenefitSnapshot;
use street_trees_species_models::SpeciesProfile;

/// Smallest canopy radius in meters, so saplings never have a zero-area
/// canopy.
pub const MIN_CANOPY_RADIUS_M: f64 = 0.5;

/// Canopy radius in meters for a tree of the given DBH.
///
/// Negative diameters are treated as zero.
#[must_use]
pub fn canopy_radius(species: &SpeciesProfile, dbh_in: f64) -> f64 {
    (species.canopy_k_m_per_in * dbh_in.max(0.0)).max(MIN_CANOPY_RADIUS_M)
}

/// Area of a circular canopy with the given radius.
#[must_use]
pub fn canopy_area(radius_m: f64) -> f64 {
    PI * radius_m * radius_m
}

/// Computes annual benefits for a tree of the given species and DBH.
///
/// Carbon scales with diameter; stormwater and pollution scale with
/// canopy area. Negative diameters are clamped to zero, so this never
/// fails for finite input.
#[must_use]
pub fn annual_benefits(species: &SpeciesProfile, dbh_in: f64) -> BenefitSnapshot {
    let dbh = dbh_in.max(0.0);
    let radius = canopy_radius(species, dbh);
    let area = canopy_area(radius);

    BenefitSnapshot {
        canopy_radius_m: radius,
        canopy_area_m2: area,
        carbon_kg_per_year: species.carbon_kg_per_in_dbh * dbh,
        stormwater_l_per_year: species.stormwater_l_per_m2_canopy * area,
        pollution_g_per_year: species.pollution_g_per_m2_canopy * area,
    }
}

/// DBH after `years` of linear growth at the species' growth rate.
#[must_use]
pub fn grown_dbh(species: &SpeciesProfile, dbh_in: f64, years: u32) -> f64 {
    species
        .dbh_growth_in_per_year
        .mul_add(f64::from(years), dbh_in)
}

/// Projects annual benefits `years` into the future.
///
/// Grows the diameter linearly and evaluates [`annual_benefits`] at the
/// grown diameter. A zero-year projection equals the current benefits.
#[must_use]
pub fn project_tree(species: &SpeciesProfile, dbh_in: f64, years: u32) -> BenefitSnapshot {
    annual_benefits(species, grown_dbh(species, dbh_in, years))
}
