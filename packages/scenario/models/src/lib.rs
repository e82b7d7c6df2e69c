#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Planted-tree, projection, and request payload types for scenarios.
//!
//! These are the typed values the scenario store accepts and returns.
//! Loosely-typed JSON payloads are converted into [`NewTree`] and
//! [`TreeUpdate`] by the [`payload`] module before anything is mutated.

pub mod payload;

use serde::{Deserialize, Serialize};
use street_trees_benefits_models::BenefitSnapshot;

/// A tree planted in the scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantedTree {
    /// Unique identifier assigned at creation (e.g., `"planted_1767225600000_1"`).
    pub id: String,
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Species identifier, always present in the species catalog.
    pub species_id: String,
    /// Trunk diameter at breast height in inches.
    pub dbh_in: f64,
    /// Year the tree is (or was) planted.
    pub planting_year: i32,
    /// Current annual benefits, recomputed on every species/diameter change.
    pub benefits: BenefitSnapshot,
}

/// Validated fields for a tree about to be added.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTree {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Species identifier (existence checked by the store).
    pub species_id: String,
    /// Trunk diameter in inches, non-negative.
    pub dbh_in: f64,
    /// Planting year.
    pub planting_year: i32,
}

/// Validated partial update. `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeUpdate {
    /// New longitude.
    pub lon: Option<f64>,
    /// New latitude.
    pub lat: Option<f64>,
    /// New species identifier.
    pub species_id: Option<String>,
    /// New trunk diameter in inches.
    pub dbh_in: Option<f64>,
    /// New planting year.
    pub planting_year: Option<i32>,
}

impl TreeUpdate {
    /// Returns `true` if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lon.is_none()
            && self.lat.is_none()
            && self.species_id.is_none()
            && self.dbh_in.is_none()
            && self.planting_year.is_none()
    }
}

/// Supported projection horizons, in years.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "i64")]
pub enum Horizon {
    /// Five years out.
    Five = 5,
    /// Ten years out.
    #[default]
    Ten = 10,
    /// Fifteen years out.
    Fifteen = 15,
    /// Twenty years out.
    Twenty = 20,
}

impl Horizon {
    /// Returns the number of years this horizon spans.
    #[must_use]
    pub const fn years(self) -> u32 {
        self as u32
    }

    /// Creates a horizon from a year count.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not one of 5, 10, 15, or 20.
    pub const fn from_years(value: i64) -> Result<Self, InvalidHorizonError> {
        match value {
            5 => Ok(Self::Five),
            10 => Ok(Self::Ten),
            15 => Ok(Self::Fifteen),
            20 => Ok(Self::Twenty),
            _ => Err(InvalidHorizonError { value }),
        }
    }

    /// Returns all supported horizons in ascending order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Five, Self::Ten, Self::Fifteen, Self::Twenty]
    }
}

impl From<Horizon> for u32 {
    fn from(horizon: Horizon) -> Self {
        horizon.years()
    }
}

impl TryFrom<i64> for Horizon {
    type Error = InvalidHorizonError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_years(value)
    }
}

/// Error returned when a year count is not a supported [`Horizon`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidHorizonError {
    /// The rejected year count.
    pub value: i64,
}

impl std::fmt::Display for InvalidHorizonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid horizon {}: expected one of 5, 10, 15, 20",
            self.value
        )
    }
}

impl std::error::Error for InvalidHorizonError {}

/// Scenario-wide sums of the additive benefit fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioTotals {
    /// Total carbon sequestration in kg/year.
    pub carbon_kg_per_year: f64,
    /// Total stormwater interception in liters/year.
    pub stormwater_l_per_year: f64,
    /// Total pollution removal in grams/year.
    pub pollution_g_per_year: f64,
    /// Total canopy area in square meters.
    pub canopy_area_m2: f64,
}

impl ScenarioTotals {
    /// Adds one tree's benefits to the running totals.
    pub fn add(&mut self, benefits: &BenefitSnapshot) {
        self.carbon_kg_per_year += benefits.carbon_kg_per_year;
        self.stormwater_l_per_year += benefits.stormwater_l_per_year;
        self.pollution_g_per_year += benefits.pollution_g_per_year;
        self.canopy_area_m2 += benefits.canopy_area_m2;
    }
}

/// One tree's projected benefits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeProjection {
    /// Planted tree identifier.
    pub id: String,
    /// Benefits at the projection horizon.
    pub projection: BenefitSnapshot,
}

/// Per-tree and aggregate benefits at a horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProjection {
    /// Horizon in years.
    pub horizon_years: Horizon,
    /// Sum over `per_tree`, accumulated in `per_tree` order.
    pub total: ScenarioTotals,
    /// Projection for each tree in the scenario.
    pub per_tree: Vec<TreeProjection>,
}
