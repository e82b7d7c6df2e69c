//! Socrata SODA client for the NYC 2015 Street Tree Census.
//!
//! The bounding box is sent as a `$where` clause built only from finite
//! `f64` values, and every parameter goes through
//! [`reqwest::RequestBuilder::query`] so URL encoding is handled by the
//! client.

use std::time::Duration;

use async_trait::async_trait;
use street_trees_census_models::{CensusQuery, CensusTree};

use crate::{CensusError, CensusSource, retry};

/// NYC Open Data 2015 Street Tree Census resource.
pub const DEFAULT_ENDPOINT: &str = "https://data.cityofnewyork.us/resource/uvpi-gqnh.json";

/// Identifier reported by [`SocrataTreeCensus::id`] and tagged on features.
pub const SOURCE_ID: &str = "nyc_tree_census_2015";

/// Columns requested from the dataset.
const SELECT_COLUMNS: &[&str] = &[
    "tree_id",
    "spc_common",
    "spc_latin",
    "health",
    "status",
    "tree_dbh",
    "steward",
    "curb_loc",
    "zipcode",
    "boroname",
    "nta",
    "latitude",
    "longitude",
    "created_at",
];

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Tree census backed by a Socrata dataset.
#[derive(Debug, Clone)]
pub struct SocrataTreeCensus {
    client: reqwest::Client,
    endpoint: String,
}

impl SocrataTreeCensus {
    /// Creates a client for the given resource URL.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Returns the resource URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for SocrataTreeCensus {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

/// Builds the SoQL query parameters for a bounding-box request.
///
/// # Errors
///
/// Returns [`CensusError::InvalidArgument`] if the bounding box is not
/// finite or is inverted.
pub fn build_params(query: &CensusQuery) -> Result<Vec<(&'static str, String)>, CensusError> {
    let bbox = query.bbox;
    bbox.validate()
        .map_err(|message| CensusError::InvalidArgument {
            field: "bbox".to_string(),
            message,
        })?;

    Ok(vec![
        ("$select", SELECT_COLUMNS.join(",")),
        (
            "$where",
            format!(
                "latitude between {} and {} and longitude between {} and {}",
                bbox.south, bbox.north, bbox.west, bbox.east
            ),
        ),
        ("$limit", query.limit.to_string()),
    ])
}

#[async_trait]
impl CensusSource for SocrataTreeCensus {
    fn id(&self) -> &str {
        SOURCE_ID
    }

    async fn fetch_trees(&self, query: &CensusQuery) -> Result<Vec<CensusTree>, CensusError> {
        let params = build_params(query)?;

        log::info!(
            "Fetching census trees: bbox={:?}, limit={}",
            query.bbox,
            query.limit
        );

        let body = retry::send_json(|| {
            self.client
                .get(&self.endpoint)
                .header(reqwest::header::ACCEPT, "application/json")
                .timeout(REQUEST_TIMEOUT)
                .query(&params)
        })
        .await?;

        let rows: Vec<CensusTree> = serde_json::from_value(body)?;
        log::info!("Received {} census rows", rows.len());
        Ok(rows)
    }
}
