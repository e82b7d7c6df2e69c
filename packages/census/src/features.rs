//! Conversion of census rows into a `GeoJSON` `FeatureCollection`.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use street_trees_census_models::CensusTree;

use crate::HiddenTrees;

/// Converts census rows to point features, dropping rows without usable
/// coordinates and rows the user has hidden.
#[must_use]
pub fn to_feature_collection(
    source_id: &str,
    rows: Vec<CensusTree>,
    hidden: &HiddenTrees,
) -> FeatureCollection {
    let total = rows.len();
    let features: Vec<Feature> = rows
        .into_iter()
        .filter(|row| {
            row.tree_id
                .as_deref()
                .is_none_or(|id| !hidden.is_hidden(id))
        })
        .filter_map(|row| {
            let (lon, lat) = row.coordinates()?;
            Some(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![lon, lat]))),
                id: None,
                properties: Some(properties(source_id, row)),
                foreign_members: None,
            })
        })
        .collect();

    log::debug!("Kept {}/{total} census rows as features", features.len());

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn properties(source_id: &str, row: CensusTree) -> JsonObject {
    let mut props = JsonObject::new();
    props.insert("source".to_string(), source_id.into());
    for (key, value) in [
        ("tree_id", row.tree_id),
        ("spc_common", row.spc_common),
        ("spc_latin", row.spc_latin),
        ("health", row.health),
        ("status", row.status),
        ("tree_dbh", row.tree_dbh),
        ("steward", row.steward),
        ("curb_loc", row.curb_loc),
        ("zipcode", row.zipcode),
        ("boroname", row.boroname),
        ("nta", row.nta),
    ] {
        props.insert(key.to_string(), value.into());
    }
    props
}
