#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bounding-box query and upstream row types for the street tree census.
//!
//! [`CensusTree`] mirrors the subset of NYC 2015 Street Tree Census columns
//! the map popup needs. Socrata returns most values as strings, but rows
//! are decoded leniently so an odd numeric or boolean cell does not reject
//! the whole response.

use serde::{Deserialize, Deserializer, Serialize};

/// Default number of census rows requested.
pub const DEFAULT_LIMIT: u32 = 2000;

/// Upper bound on census rows per request.
pub const MAX_LIMIT: u32 = 50_000;

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Roughly 700m around the Gowanus canal in Brooklyn.
    #[must_use]
    pub const fn gowanus() -> Self {
        const CENTER_LAT: f64 = 40.676;
        const CENTER_LON: f64 = -73.991;
        const DLAT: f64 = 0.0063;
        const DLON: f64 = 0.0083;

        Self::new(
            CENTER_LON - DLON,
            CENTER_LAT - DLAT,
            CENTER_LON + DLON,
            CENTER_LAT + DLAT,
        )
    }

    /// Checks that every edge is finite and the box is not inverted.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending edge.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("minLon", self.west),
            ("minLat", self.south),
            ("maxLon", self.east),
            ("maxLat", self.north),
        ] {
            if !value.is_finite() {
                return Err(format!("{name} must be finite"));
            }
        }
        if self.south > self.north {
            return Err("minLat must not exceed maxLat".to_string());
        }
        if self.west > self.east {
            return Err("minLon must not exceed maxLon".to_string());
        }
        Ok(())
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::gowanus()
    }
}

/// A bounding-box request against the tree census.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CensusQuery {
    /// Area to search.
    pub bbox: BoundingBox,
    /// Maximum rows to return, already capped at [`MAX_LIMIT`].
    pub limit: u32,
}

impl CensusQuery {
    /// Creates a query, defaulting the limit to [`DEFAULT_LIMIT`] and
    /// capping it at [`MAX_LIMIT`].
    #[must_use]
    pub fn new(bbox: BoundingBox, limit: Option<u32>) -> Self {
        Self {
            bbox,
            limit: limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT),
        }
    }
}

impl Default for CensusQuery {
    fn default() -> Self {
        Self::new(BoundingBox::default(), None)
    }
}

/// A street tree row from the census dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CensusTree {
    /// Census tree identifier.
    #[serde(default, deserialize_with = "lenient_string")]
    pub tree_id: Option<String>,
    /// Common species name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub spc_common: Option<String>,
    /// Latin species name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub spc_latin: Option<String>,
    /// Perceived health (`Good`, `Fair`, `Poor`).
    #[serde(default, deserialize_with = "lenient_string")]
    pub health: Option<String>,
    /// `Alive`, `Stump`, or `Dead`.
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    /// Trunk diameter in inches.
    #[serde(default, deserialize_with = "lenient_string")]
    pub tree_dbh: Option<String>,
    /// Signs of stewardship.
    #[serde(default, deserialize_with = "lenient_string")]
    pub steward: Option<String>,
    /// Curb location.
    #[serde(default, deserialize_with = "lenient_string")]
    pub curb_loc: Option<String>,
    /// Five-digit zip code.
    #[serde(default, deserialize_with = "lenient_string")]
    pub zipcode: Option<String>,
    /// Borough name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub boroname: Option<String>,
    /// Neighborhood tabulation area code.
    #[serde(default, deserialize_with = "lenient_string")]
    pub nta: Option<String>,
    /// Latitude as text.
    #[serde(default, deserialize_with = "lenient_string")]
    pub latitude: Option<String>,
    /// Longitude as text.
    #[serde(default, deserialize_with = "lenient_string")]
    pub longitude: Option<String>,
    /// Survey date.
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
}

impl CensusTree {
    /// Parses the row's coordinates as `(lon, lat)`. Returns `None` if
    /// either is missing, unparseable, or not finite.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.latitude.as_deref()?.trim().parse::<f64>().ok()?;
        let lon = self.longitude.as_deref()?.trim().parse::<f64>().ok()?;
        (lat.is_finite() && lon.is_finite()).then_some((lon, lat))
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}
