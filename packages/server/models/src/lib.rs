#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the street trees server.
//!
//! Field names are `snake_case` on the wire, except the bounding-box query
//! parameters, which keep the `minLat`-style names the map client sends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use street_trees_census_models::{BoundingBox, CensusQuery};
use street_trees_scenario_models::PlantedTree;
use street_trees_species_models::SpeciesProfile;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Error body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable description.
    pub error: String,
}

/// Response from the species endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesListResponse {
    /// All species in catalog order.
    pub species: Vec<SpeciesProfile>,
}

/// Response from the scenario snapshot endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResponse {
    /// Scenario identifier.
    pub scenario_id: String,
    /// When the scenario was created.
    pub created_at: DateTime<Utc>,
    /// Planted trees in insertion order.
    pub planted_trees: Vec<PlantedTree>,
}

/// Response from the add and update endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeResponse {
    /// Always `true`.
    pub ok: bool,
    /// The stored record after the operation.
    pub tree: PlantedTree,
}

/// Response from the delete endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    /// Always `true`.
    pub ok: bool,
}

/// Response from the census-tree removal endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovedCensusTreeResponse {
    /// Always `true`.
    pub ok: bool,
    /// The census tree that is now hidden.
    pub removed_tree_id: String,
}

/// Query parameters for the projection endpoint.
///
/// `horizon` is kept as text so a non-integer value is reported as an
/// invalid argument rather than a generic query error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectionQueryParams {
    /// Years ahead; one of 5, 10, 15, 20. Defaults to 10.
    pub horizon: Option<String>,
}

/// Query parameters for the existing-trees endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingTreesQueryParams {
    /// Southern latitude boundary.
    pub min_lat: Option<f64>,
    /// Northern latitude boundary.
    pub max_lat: Option<f64>,
    /// Western longitude boundary.
    pub min_lon: Option<f64>,
    /// Eastern longitude boundary.
    pub max_lon: Option<f64>,
    /// Maximum rows to return.
    pub limit: Option<u32>,
}

impl From<&ExistingTreesQueryParams> for CensusQuery {
    fn from(p: &ExistingTreesQueryParams) -> Self {
        let default = BoundingBox::default();
        let bbox = BoundingBox::new(
            p.min_lon.unwrap_or(default.west),
            p.min_lat.unwrap_or(default.south),
            p.max_lon.unwrap_or(default.east),
            p.max_lat.unwrap_or(default.north),
        );
        Self::new(bbox, p.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use street_trees_census_models::{DEFAULT_LIMIT, MAX_LIMIT};

    #[test]
    fn missing_bbox_edges_fall_back_to_default_area() {
        let query = CensusQuery::from(&ExistingTreesQueryParams {
            min_lat: Some(40.0),
            ..ExistingTreesQueryParams::default()
        });
        let default = BoundingBox::default();
        assert!((query.bbox.south - 40.0).abs() < f64::EPSILON);
        assert!((query.bbox.north - default.north).abs() < f64::EPSILON);
        assert!((query.bbox.west - default.west).abs() < f64::EPSILON);
        assert_eq!(query.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn limit_is_capped() {
        let query = CensusQuery::from(&ExistingTreesQueryParams {
            limit: Some(u32::MAX),
            ..ExistingTreesQueryParams::default()
        });
        assert_eq!(query.limit, MAX_LIMIT);
    }
}
