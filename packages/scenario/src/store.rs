//! Mutable, memory-resident collection of planted trees.
//!
//! Every operation holds the store's mutex for its full duration, so
//! readers never observe a half-applied update. Identifiers combine the
//! creation time with a per-store sequence number that deletes never
//! rewind, so they are never reused.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use street_trees_benefits::annual_benefits;
use street_trees_scenario_models::payload::TreePayload;
use street_trees_scenario_models::{
    Horizon, NewTree, PlantedTree, ScenarioProjection, TreeUpdate,
};
use street_trees_species::SpeciesCatalog;

use crate::ScenarioError;
use crate::projection::project_trees;

/// Identifier of the scenario a store is created with by default.
pub const DEFAULT_SCENARIO_ID: &str = "default";

#[derive(Debug, Default)]
struct ScenarioState {
    /// sequence -> tree, so iteration follows insertion order
    trees: BTreeMap<u64, PlantedTree>,
    /// tree id -> sequence
    index: BTreeMap<String, u64>,
    next_seq: u64,
}

/// Planted trees of a single scenario.
#[derive(Debug)]
pub struct ScenarioStore {
    scenario_id: String,
    created_at: DateTime<Utc>,
    catalog: Arc<SpeciesCatalog>,
    state: Mutex<ScenarioState>,
}

impl ScenarioStore {
    /// Creates an empty store for the [`DEFAULT_SCENARIO_ID`] scenario.
    #[must_use]
    pub fn new(catalog: Arc<SpeciesCatalog>) -> Self {
        Self::with_id(DEFAULT_SCENARIO_ID, catalog)
    }

    /// Creates an empty store with an explicit scenario identifier.
    #[must_use]
    pub fn with_id(scenario_id: impl Into<String>, catalog: Arc<SpeciesCatalog>) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            created_at: Utc::now(),
            catalog,
            state: Mutex::new(ScenarioState {
                next_seq: 1,
                ..ScenarioState::default()
            }),
        }
    }

    /// Returns the scenario identifier.
    #[must_use]
    pub fn scenario_id(&self) -> &str {
        &self.scenario_id
    }

    /// Returns when this store was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the species catalog trees are validated against.
    #[must_use]
    pub fn catalog(&self) -> &SpeciesCatalog {
        &self.catalog
    }

    fn lock(&self) -> MutexGuard<'_, ScenarioState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a tree and returns the stored record with its initial
    /// benefit snapshot.
    ///
    /// # Errors
    ///
    /// * [`ScenarioError::InvalidSpecies`] if the species is not in the catalog
    /// * [`ScenarioError::InvalidArgument`] if a coordinate is not finite
    pub fn add(&self, new_tree: NewTree) -> Result<PlantedTree, ScenarioError> {
        let species = self.catalog.lookup(&new_tree.species_id)?;
        check_coordinate("lon", new_tree.lon)?;
        check_coordinate("lat", new_tree.lat)?;

        let mut state = self.lock();
        let seq = state.next_seq;
        state.next_seq += 1;

        let tree = PlantedTree {
            id: format!("planted_{}_{seq}", Utc::now().timestamp_millis()),
            lon: new_tree.lon,
            lat: new_tree.lat,
            benefits: annual_benefits(species, new_tree.dbh_in),
            species_id: new_tree.species_id,
            dbh_in: new_tree.dbh_in,
            planting_year: new_tree.planting_year,
        };

        log::debug!(
            "Planted {} ({}, dbh={}in) in scenario {}",
            tree.id,
            tree.species_id,
            tree.dbh_in,
            self.scenario_id
        );

        state.index.insert(tree.id.clone(), seq);
        state.trees.insert(seq, tree.clone());
        drop(state);

        Ok(tree)
    }

    /// Validates a raw JSON payload and adds the resulting tree.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::ValidationFailure`] or
    /// [`ScenarioError::InvalidArgument`] for bad fields, plus the errors
    /// of [`Self::add`].
    pub fn add_payload(&self, payload: &TreePayload) -> Result<PlantedTree, ScenarioError> {
        self.add(NewTree::from_payload(payload)?)
    }

    /// Applies a partial update and recomputes the tree's benefit
    /// snapshot.
    ///
    /// The id is resolved first, then every field is validated before any
    /// is applied, so a failed update leaves the tree unchanged.
    ///
    /// # Errors
    ///
    /// * [`ScenarioError::NotFound`] if no tree has the given id
    /// * [`ScenarioError::InvalidSpecies`] if a new species is not in the catalog
    /// * [`ScenarioError::InvalidArgument`] if a new coordinate is not finite
    pub fn update(&self, id: &str, update: TreeUpdate) -> Result<PlantedTree, ScenarioError> {
        let mut state = self.lock();
        let seq = *state
            .index
            .get(id)
            .ok_or_else(|| ScenarioError::NotFound { id: id.to_string() })?;
        let tree = state
            .trees
            .get_mut(&seq)
            .ok_or_else(|| ScenarioError::NotFound { id: id.to_string() })?;

        let species = self
            .catalog
            .lookup(update.species_id.as_deref().unwrap_or(&tree.species_id))?;
        if let Some(lon) = update.lon {
            check_coordinate("lon", lon)?;
        }
        if let Some(lat) = update.lat {
            check_coordinate("lat", lat)?;
        }

        if let Some(lon) = update.lon {
            tree.lon = lon;
        }
        if let Some(lat) = update.lat {
            tree.lat = lat;
        }
        if let Some(dbh_in) = update.dbh_in {
            tree.dbh_in = dbh_in;
        }
        if let Some(planting_year) = update.planting_year {
            tree.planting_year = planting_year;
        }
        if let Some(species_id) = update.species_id {
            tree.species_id = species_id;
        }

        tree.benefits = annual_benefits(species, tree.dbh_in);
        let updated = tree.clone();
        drop(state);

        log::debug!("Updated {id} in scenario {}", self.scenario_id);

        Ok(updated)
    }

    /// Validates a raw JSON payload and applies it as a partial update.
    ///
    /// An unknown id is reported as [`ScenarioError::NotFound`] even when
    /// the payload is also invalid.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::ValidationFailure`] or
    /// [`ScenarioError::InvalidArgument`] for bad fields, plus the errors
    /// of [`Self::update`].
    pub fn update_payload(
        &self,
        id: &str,
        payload: &TreePayload,
    ) -> Result<PlantedTree, ScenarioError> {
        let update = TreeUpdate::from_payload(payload).map_err(|e| {
            if self.contains(id) {
                ScenarioError::from(e)
            } else {
                ScenarioError::NotFound { id: id.to_string() }
            }
        })?;
        self.update(id, update)
    }

    /// Removes a tree. Removing an absent id is a no-op.
    ///
    /// Returns `true` if a tree was removed.
    pub fn remove(&self, id: &str) -> bool {
        let mut state = self.lock();
        let Some(seq) = state.index.remove(id) else {
            return false;
        };
        state.trees.remove(&seq);
        drop(state);

        log::debug!("Removed {id} from scenario {}", self.scenario_id);
        true
    }

    /// Returns a copy of one tree, if present.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<PlantedTree> {
        let state = self.lock();
        state
            .index
            .get(id)
            .and_then(|seq| state.trees.get(seq))
            .cloned()
    }

    /// Returns `true` if a tree with the given id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.lock().index.contains_key(id)
    }

    /// Returns copies of all trees in insertion order.
    #[must_use]
    pub fn get_all(&self) -> Vec<PlantedTree> {
        self.lock().trees.values().cloned().collect()
    }

    /// Returns the number of trees in the scenario.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().trees.len()
    }

    /// Returns `true` if the scenario has no trees.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().trees.is_empty()
    }

    /// Projects every tree to `horizon` and sums the results. Does not
    /// modify the store.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidSpecies`] if a stored tree's species
    /// no longer resolves.
    pub fn project(&self, horizon: Horizon) -> Result<ScenarioProjection, ScenarioError> {
        let state = self.lock();
        project_trees(&self.catalog, state.trees.values(), horizon)
    }

    /// Projects the scenario to a horizon given as a raw year count.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidArgument`] if `years` is not one of
    /// 5, 10, 15, or 20, plus the errors of [`Self::project`].
    pub fn project_years(&self, years: i64) -> Result<ScenarioProjection, ScenarioError> {
        self.project(Horizon::from_years(years)?)
    }
}

fn check_coordinate(field: &str, value: f64) -> Result<(), ScenarioError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ScenarioError::InvalidArgument {
            field: field.to_string(),
            message: format!("{field} {value} is not a finite number of degrees"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeSet;
    use std::thread;
    use street_trees_benefits::project_tree;

    fn store() -> ScenarioStore {
        ScenarioStore::new(Arc::new(SpeciesCatalog::embedded().unwrap()))
    }

    fn maple(dbh_in: f64) -> NewTree {
        NewTree {
            lon: -73.991,
            lat: 40.676,
            species_id: "red_maple".to_string(),
            dbh_in,
            planting_year: 2026,
        }
    }

    fn payload(value: serde_json::Value) -> TreePayload {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("test payload must be an object"),
        }
    }

    #[test]
    fn added_tree_is_listed_with_current_benefits() {
        let store = store();
        let tree = store.add(maple(2.0)).unwrap();

        let all = store.get_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0], tree);

        let species = store.catalog().lookup("red_maple").unwrap();
        assert_eq!(all[0].benefits, annual_benefits(species, 2.0));
        assert!((all[0].benefits.carbon_kg_per_year - 6.0).abs() < 1e-9);
    }

    #[test]
    fn add_rejects_unknown_species() {
        let store = store();
        let mut tree = maple(2.0);
        tree.species_id = "baobab".to_string();
        let err = store.add(tree).unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidSpecies { ref species_id } if species_id == "baobab"));
        assert!(store.is_empty());
    }

    #[test]
    fn add_rejects_non_finite_coordinates() {
        let store = store();
        let mut tree = maple(2.0);
        tree.lat = f64::NAN;
        assert!(matches!(
            store.add(tree),
            Err(ScenarioError::InvalidArgument { .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn ids_are_unique_and_never_reused() {
        let store = store();
        let first = store.add(maple(1.0)).unwrap();
        let second = store.add(maple(1.0)).unwrap();
        assert!(store.remove(&second.id));
        let third = store.add(maple(1.0)).unwrap();

        let ids: BTreeSet<&str> = [first.id.as_str(), second.id.as_str(), third.id.as_str()]
            .into_iter()
            .collect();
        assert_eq!(ids.len(), 3);
        assert!(first.id.starts_with("planted_"));
    }

    #[test]
    fn get_all_follows_insertion_order() {
        let store = store();
        let ids: Vec<String> = (0..5)
            .map(|i| store.add(maple(f64::from(i))).unwrap().id)
            .collect();
        let listed: Vec<String> = store.get_all().into_iter().map(|t| t.id).collect();
        assert_eq!(listed, ids);
    }

    #[test]
    fn updating_diameter_recomputes_benefits_only() {
        let store = store();
        let tree = store.add(maple(2.0)).unwrap();

        let updated = store
            .update(
                &tree.id,
                TreeUpdate {
                    dbh_in: Some(6.0),
                    ..TreeUpdate::default()
                },
            )
            .unwrap();

        assert!((updated.lon - tree.lon).abs() < f64::EPSILON);
        assert!((updated.lat - tree.lat).abs() < f64::EPSILON);
        assert_eq!(updated.species_id, tree.species_id);
        assert_eq!(updated.planting_year, tree.planting_year);
        assert!(updated.benefits.carbon_kg_per_year > tree.benefits.carbon_kg_per_year);
        assert!(updated.benefits.stormwater_l_per_year > tree.benefits.stormwater_l_per_year);
        assert!(updated.benefits.pollution_g_per_year > tree.benefits.pollution_g_per_year);
        assert_eq!(store.get(&tree.id).unwrap(), updated);
    }

    #[test]
    fn updating_species_recomputes_benefits() {
        let store = store();
        let tree = store.add(maple(4.0)).unwrap();
        let updated = store
            .update(
                &tree.id,
                TreeUpdate {
                    species_id: Some("london_plane".to_string()),
                    ..TreeUpdate::default()
                },
            )
            .unwrap();

        let plane = store.catalog().lookup("london_plane").unwrap();
        assert_eq!(updated.benefits, annual_benefits(plane, 4.0));
    }

    #[test]
    fn failed_update_leaves_tree_untouched() {
        let store = store();
        let tree = store.add(maple(2.0)).unwrap();

        let err = store
            .update(
                &tree.id,
                TreeUpdate {
                    lon: Some(-74.5),
                    dbh_in: Some(9.0),
                    species_id: Some("baobab".to_string()),
                    ..TreeUpdate::default()
                },
            )
            .unwrap_err();

        assert!(matches!(err, ScenarioError::InvalidSpecies { .. }));
        assert_eq!(store.get(&tree.id).unwrap(), tree);
    }

    #[test]
    fn update_of_missing_tree_fails() {
        let store = store();
        let err = store.update("planted_0_99", TreeUpdate::default()).unwrap_err();
        assert!(matches!(err, ScenarioError::NotFound { ref id } if id == "planted_0_99"));
    }

    #[test]
    fn missing_tree_is_reported_before_invalid_fields() {
        let store = store();
        store.add(maple(2.0)).unwrap();

        let err = store
            .update(
                "planted_0_1",
                TreeUpdate {
                    species_id: Some("baobab".to_string()),
                    lat: Some(f64::NAN),
                    ..TreeUpdate::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, ScenarioError::NotFound { ref id } if id == "planted_0_1"));

        for body in [json!({"dbh_in": -1}), json!({"lon": "east"}), json!({"species_id": "baobab"})] {
            let err = store.update_payload("planted_0_1", &payload(body)).unwrap_err();
            assert!(matches!(err, ScenarioError::NotFound { .. }), "got {err:?}");
        }
    }

    #[test]
    fn remove_is_idempotent() {
        let store = store();
        let tree = store.add(maple(2.0)).unwrap();
        let before = store.get_all();

        assert!(!store.remove("planted_0_42"));
        assert_eq!(store.get_all(), before);

        assert!(store.remove(&tree.id));
        assert!(!store.remove(&tree.id));
        assert!(store.is_empty());
    }

    #[test]
    fn payload_operations_validate_before_mutating() {
        let store = store();
        let tree = store
            .add_payload(&payload(json!({"lon": -73.99, "lat": "40.68", "species_id": "ginkgo"})))
            .unwrap();
        assert_eq!(tree.species_id, "ginkgo");
        assert!((tree.dbh_in - 2.0).abs() < f64::EPSILON);

        let err = store
            .add_payload(&payload(json!({"lat": 40.68})))
            .unwrap_err();
        assert!(matches!(err, ScenarioError::ValidationFailure { ref field, .. } if field == "lon"));

        let err = store
            .update_payload(&tree.id, &payload(json!({"dbh_in": -3})))
            .unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidArgument { ref field, .. } if field == "dbh_in"));

        let updated = store
            .update_payload(&tree.id, &payload(json!({"planting_year": "2030"})))
            .unwrap();
        assert_eq!(updated.planting_year, 2030);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn projection_sums_trees_without_mutating_store() {
        let store = store();
        store.add(maple(2.0)).unwrap();
        let mut plane = maple(3.0);
        plane.species_id = "london_plane".to_string();
        store.add(plane).unwrap();
        let before = store.get_all();

        let result = store.project(Horizon::Fifteen).unwrap();
        assert_eq!(store.get_all(), before);
        assert_eq!(result.per_tree.len(), 2);

        let mut carbon = 0.0;
        for tree in &before {
            let species = store.catalog().lookup(&tree.species_id).unwrap();
            carbon += project_tree(species, tree.dbh_in, 15).carbon_kg_per_year;
        }
        assert!((result.total.carbon_kg_per_year - carbon).abs() < f64::EPSILON);
    }

    #[test]
    fn projection_rejects_unsupported_horizons() {
        let store = store();
        store.add(maple(2.0)).unwrap();
        for years in [0, 1, 7, 25] {
            assert!(matches!(
                store.project_years(years),
                Err(ScenarioError::InvalidArgument { .. })
            ));
        }
        let result = store.project_years(10).unwrap();
        assert!((result.total.carbon_kg_per_year - 16.5).abs() < 1e-9);
    }

    #[test]
    fn concurrent_writers_never_expose_stale_benefits() {
        let store = Arc::new(store());

        let writers: Vec<_> = (0..4_u32)
            .map(|writer| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let mut kept = Vec::new();
                    for i in 0..50_u32 {
                        let tree = store.add(maple(f64::from(i))).unwrap();
                        let species_id = if (writer + i) % 2 == 0 {
                            "ginkgo"
                        } else {
                            "london_plane"
                        };
                        store
                            .update(
                                &tree.id,
                                TreeUpdate {
                                    species_id: Some(species_id.to_string()),
                                    dbh_in: Some(f64::from(i) + 0.5),
                                    ..TreeUpdate::default()
                                },
                            )
                            .unwrap();
                        if i % 3 == 0 {
                            assert!(store.remove(&tree.id));
                        } else {
                            kept.push(tree.id);
                        }
                    }
                    kept
                })
            })
            .collect();

        let readers: Vec<_> = (0..2)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..100 {
                        let trees = store.get_all();
                        let ids: BTreeSet<&str> = trees.iter().map(|t| t.id.as_str()).collect();
                        assert_eq!(ids.len(), trees.len());
                        for tree in &trees {
                            let species = store.catalog().lookup(&tree.species_id).unwrap();
                            assert_eq!(tree.benefits, annual_benefits(species, tree.dbh_in));
                        }

                        let projection = store.project(Horizon::Ten).unwrap();
                        let carbon: f64 = projection
                            .per_tree
                            .iter()
                            .map(|t| t.projection.carbon_kg_per_year)
                            .sum();
                        assert!((projection.total.carbon_kg_per_year - carbon).abs() < 1e-6);
                    }
                })
            })
            .collect();

        let mut kept = BTreeSet::new();
        for writer in writers {
            for id in writer.join().unwrap() {
                assert!(kept.insert(id), "duplicate id");
            }
        }
        for reader in readers {
            reader.join().unwrap();
        }

        let remaining: BTreeSet<String> = store.get_all().into_iter().map(|t| t.id).collect();
        assert_eq!(remaining, kept);
        assert_eq!(store.len(), 4 * 33);
    }

    #[test]
    fn stores_are_isolated() {
        let catalog = Arc::new(SpeciesCatalog::embedded().unwrap());
        let a = ScenarioStore::with_id("a", Arc::clone(&catalog));
        let b = ScenarioStore::with_id("b", catalog);
        a.add(maple(2.0)).unwrap();
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
        assert_eq!(b.scenario_id(), "b");
    }
}
