#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Street tree census client, retry helpers, and `GeoJSON` conversion.
//!
//! Existing trees come from the NYC Open Data 2015 Street Tree Census
//! (a Socrata dataset). The [`CensusSource`] trait abstracts the upstream
//! so the HTTP layer can be exercised without network access. Rows with
//! unusable coordinates, and trees the user has hidden from the scenario
//! view, are filtered out before anything downstream sees them.

pub mod features;
pub mod retry;
pub mod socrata;

use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use street_trees_census_models::{CensusQuery, CensusTree};

/// Errors that can occur while querying the census.
#[derive(Debug, thiserror::Error)]
pub enum CensusError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The upstream answered with a non-success status.
    #[error("Upstream returned HTTP {status}: {body}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The query itself is unusable.
    #[error("Invalid {field}: {message}")]
    InvalidArgument {
        /// Name of the offending parameter.
        field: String,
        /// Description of what went wrong.
        message: String,
    },
}

/// A provider of existing street trees within a bounding box.
#[async_trait]
pub trait CensusSource: Send + Sync {
    /// Returns a unique identifier for this source (e.g., `"nyc_tree_census_2015"`).
    fn id(&self) -> &str;

    /// Fetches raw census rows inside the query's bounding box.
    ///
    /// # Errors
    ///
    /// Returns [`CensusError`] if the query is invalid or the upstream
    /// request fails.
    async fn fetch_trees(&self, query: &CensusQuery) -> Result<Vec<CensusTree>, CensusError>;
}

/// Census trees the user has removed from the scenario view.
///
/// Memory-resident; hiding the same id twice is a no-op.
#[derive(Debug, Default)]
pub struct HiddenTrees {
    ids: Mutex<BTreeSet<String>>,
}

impl HiddenTrees {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeSet<String>> {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hides a census tree. Returns `true` if it was not already hidden.
    pub fn hide(&self, tree_id: &str) -> bool {
        let inserted = self.lock().insert(tree_id.to_string());
        if inserted {
            log::debug!("Hid census tree {tree_id}");
        }
        inserted
    }

    /// Returns `true` if the tree has been hidden.
    #[must_use]
    pub fn is_hidden(&self, tree_id: &str) -> bool {
        self.lock().contains(tree_id)
    }

    /// Returns the number of hidden trees.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no tree has been hidden.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
