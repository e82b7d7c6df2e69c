//! Compile-time registry of species profiles.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a species requires creating a TOML file in `species/` and adding
//! a corresponding entry here. Registry order is catalog order.

use street_trees_species_models::SpeciesProfile;

use crate::CatalogError;

/// Number of registered species. Enforced by a test.
#[cfg(test)]
const EXPECTED_SPECIES_COUNT: usize = 3;

/// Embedded TOML species definitions.
const SPECIES_TOMLS: &[(&str, &str)] = &[
    ("red_maple", include_str!("../species/red_maple.toml")),
    ("london_plane", include_str!("../species/london_plane.toml")),
    ("ginkgo", include_str!("../species/ginkgo.toml")),
];

/// Parses every embedded species definition, in registry order.
///
/// # Errors
///
/// Returns [`CatalogError::Parse`] if an embedded TOML file is malformed.
pub fn parse_all() -> Result<Vec<SpeciesProfile>, CatalogError> {
    SPECIES_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str).map_err(|e| CatalogError::Parse {
                name: (*name).to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}
