#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory planting scenario store and benefit projection aggregator.
//!
//! A [`ScenarioStore`] owns the planted trees of one scenario and keeps
//! each tree's benefit snapshot consistent with its species and diameter.
//! Projections re-run the benefit model at a future horizon without
//! touching the stored snapshots. The store is memory-resident and
//! non-durable; callers construct and own it explicitly.

pub mod projection;
pub mod store;

pub use store::ScenarioStore;

use street_trees_scenario_models::InvalidHorizonError;
use street_trees_scenario_models::payload::FieldError;
use street_trees_species::CatalogError;
use thiserror::Error;

/// Errors that can occur during scenario operations.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// No planted tree with the given identifier exists.
    #[error("Tree not found: {id}")]
    NotFound {
        /// The identifier that was looked up.
        id: String,
    },

    /// The species identifier is not in the catalog.
    #[error("Unknown species_id: {species_id}")]
    InvalidSpecies {
        /// The rejected species identifier.
        species_id: String,
    },

    /// A value converted but is not allowed (horizon, coordinates, etc.).
    #[error("{message}")]
    InvalidArgument {
        /// Name of the offending field or parameter.
        field: String,
        /// Description of what went wrong.
        message: String,
    },

    /// A required field is missing or has the wrong type.
    #[error("{message}")]
    ValidationFailure {
        /// Name of the offending field.
        field: String,
        /// Description of what went wrong.
        message: String,
    },

    /// The species catalog itself is unusable.
    #[error(transparent)]
    Catalog(CatalogError),
}

impl From<FieldError> for ScenarioError {
    fn from(e: FieldError) -> Self {
        let field = e.field().to_string();
        let message = e.to_string();
        match e {
            FieldError::Missing { .. } | FieldError::NotConvertible { .. } => {
                Self::ValidationFailure { field, message }
            }
            FieldError::OutOfRange { .. } => Self::InvalidArgument { field, message },
        }
    }
}

impl From<InvalidHorizonError> for ScenarioError {
    fn from(e: InvalidHorizonError) -> Self {
        Self::InvalidArgument {
            field: "horizon".to_string(),
            message: e.to_string(),
        }
    }
}

impl From<CatalogError> for ScenarioError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound { species_id } => Self::InvalidSpecies { species_id },
            other @ (CatalogError::Parse { .. } | CatalogError::Invalid { .. }) => {
                Self::Catalog(other)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_map_to_error_kinds() {
        let missing: ScenarioError = FieldError::Missing { field: "lon" }.into();
        assert!(matches!(missing, ScenarioError::ValidationFailure { ref field, .. } if field == "lon"));

        let range: ScenarioError = FieldError::OutOfRange {
            field: "dbh_in",
            message: "must be non-negative".to_string(),
        }
        .into();
        assert!(matches!(range, ScenarioError::InvalidArgument { ref field, .. } if field == "dbh_in"));
        assert_eq!(range.to_string(), "field `dbh_in` must be non-negative");
        assert_eq!(missing.to_string(), "missing required field `lon`");
    }

    #[test]
    fn only_unknown_species_is_a_client_error() {
        let unknown: ScenarioError = CatalogError::NotFound {
            species_id: "baobab".to_string(),
        }
        .into();
        assert!(matches!(unknown, ScenarioError::InvalidSpecies { ref species_id } if species_id == "baobab"));

        let broken: ScenarioError = CatalogError::Parse {
            name: "ginkgo".to_string(),
            message: "expected a table".to_string(),
        }
        .into();
        assert!(matches!(broken, ScenarioError::Catalog(CatalogError::Parse { .. })));
    }

    #[test]
    fn invalid_horizon_maps_to_invalid_argument() {
        let err: ScenarioError = InvalidHorizonError { value: 7 }.into();
        assert!(matches!(err, ScenarioError::InvalidArgument { ref field, .. } if field == "horizon"));
        assert!(err.to_string().contains('7'));
    }
}
