#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Read-only catalog of tree species coefficients.
//!
//! The catalog is built once at startup from the embedded species
//! registry and shared (typically behind an `Arc`) by the scenario store
//! and the HTTP layer. It has no mutation operations.

pub mod registry;

use std::collections::BTreeMap;

use street_trees_species_models::SpeciesProfile;
use thiserror::Error;

/// Errors that can occur while building or querying the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No species with the given identifier exists.
    #[error("Species not found: {species_id}")]
    NotFound {
        /// The identifier that was looked up.
        species_id: String,
    },

    /// An embedded species definition could not be parsed.
    #[error("Failed to parse species '{name}': {message}")]
    Parse {
        /// Registry name of the offending definition.
        name: String,
        /// Parser error message.
        message: String,
    },

    /// A species definition is structurally valid but unusable.
    #[error("Invalid species '{species_id}': {message}")]
    Invalid {
        /// The offending species identifier.
        species_id: String,
        /// Description of what went wrong.
        message: String,
    },
}

/// Immutable species lookup table.
#[derive(Debug, Clone)]
pub struct SpeciesCatalog {
    profiles: Vec<SpeciesProfile>,
    by_id: BTreeMap<String, usize>,
}

impl SpeciesCatalog {
    /// Builds the catalog from the embedded species registry.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if an embedded definition fails to parse
    /// or validate.
    pub fn embedded() -> Result<Self, CatalogError> {
        let catalog = Self::from_profiles(registry::parse_all()?)?;
        log::info!("Loaded {} species into catalog", catalog.len());
        Ok(catalog)
    }

    /// Builds a catalog from explicit profiles, preserving their order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] if an identifier is empty or
    /// duplicated, or a coefficient is not a positive finite number.
    pub fn from_profiles(profiles: Vec<SpeciesProfile>) -> Result<Self, CatalogError> {
        let mut by_id = BTreeMap::new();

        for (idx, profile) in profiles.iter().enumerate() {
            if profile.species_id.is_empty() {
                return Err(CatalogError::Invalid {
                    species_id: String::new(),
                    message: "empty species_id".to_string(),
                });
            }
            if profile
                .coefficients()
                .iter()
                .any(|v| !v.is_finite() || *v <= 0.0)
            {
                return Err(CatalogError::Invalid {
                    species_id: profile.species_id.clone(),
                    message: "coefficients must be positive".to_string(),
                });
            }
            if by_id.insert(profile.species_id.clone(), idx).is_some() {
                return Err(CatalogError::Invalid {
                    species_id: profile.species_id.clone(),
                    message: "duplicate species_id".to_string(),
                });
            }
        }

        Ok(Self { profiles, by_id })
    }

    /// Looks up a species by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the identifier is absent.
    pub fn lookup(&self, species_id: &str) -> Result<&SpeciesProfile, CatalogError> {
        self.by_id
            .get(species_id)
            .map(|&idx| &self.profiles[idx])
            .ok_or_else(|| CatalogError::NotFound {
                species_id: species_id.to_string(),
            })
    }

    /// Returns `true` if the identifier resolves to a species.
    #[must_use]
    pub fn contains(&self, species_id: &str) -> bool {
        self.by_id.contains_key(species_id)
    }

    /// Returns all species in catalog-definition order.
    #[must_use]
    pub fn list_all(&self) -> &[SpeciesProfile] {
        &self.profiles
    }

    /// Returns the number of species in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Returns `true` if the catalog has no species.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
