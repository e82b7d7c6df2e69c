//! Scenario-wide benefit projection.
//!
//! Re-runs the benefit model for each tree at a future horizon and sums
//! the additive fields. Totals are accumulated in iteration order, so for
//! the same trees in the same order the result is bit-for-bit repeatable.

use street_trees_benefits::project_tree;
use street_trees_scenario_models::{
    Horizon, PlantedTree, ScenarioProjection, ScenarioTotals, TreeProjection,
};
use street_trees_species::SpeciesCatalog;

use crate::ScenarioError;

/// Projects every tree `horizon` years out and aggregates the results.
///
/// Pure with respect to `trees`: cached snapshots are neither read nor
/// modified.
///
/// # Errors
///
/// Returns [`ScenarioError::InvalidSpecies`] if a tree's species is not in
/// the catalog.
pub fn project_trees<'a, I>(
    catalog: &SpeciesCatalog,
    trees: I,
    horizon: Horizon,
) -> Result<ScenarioProjection, ScenarioError>
where
    I: IntoIterator<Item = &'a PlantedTree>,
{
    let mut total = ScenarioTotals::default();
    let mut per_tree = Vec::new();

    for tree in trees {
        let species = catalog.lookup(&tree.species_id)?;
        let projection = project_tree(species, tree.dbh_in, horizon.years());
        total.add(&projection);
        per_tree.push(TreeProjection {
            id: tree.id.clone(),
            projection,
        });
    }

    Ok(ScenarioProjection {
        horizon_years: horizon,
        total,
        per_tree,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use street_trees_benefits::annual_benefits;

    fn tree(id: &str, species_id: &str, dbh_in: f64, catalog: &SpeciesCatalog) -> PlantedTree {
        PlantedTree {
            id: id.to_string(),
            lon: -73.99,
            lat: 40.676,
            species_id: species_id.to_string(),
            dbh_in,
            planting_year: 2026,
            benefits: annual_benefits(catalog.lookup(species_id).unwrap(), dbh_in),
        }
    }

    #[test]
    fn empty_scenario_projects_to_zero() {
        let catalog = SpeciesCatalog::embedded().unwrap();
        let result = project_trees(&catalog, &Vec::<PlantedTree>::new(), Horizon::Twenty).unwrap();
        assert_eq!(result.total, ScenarioTotals::default());
        assert!(result.per_tree.is_empty());
        assert_eq!(result.horizon_years, Horizon::Twenty);
    }

    #[test]
    fn totals_equal_sum_of_per_tree_projections() {
        let catalog = SpeciesCatalog::embedded().unwrap();
        let trees = vec![
            tree("a", "red_maple", 2.0, &catalog),
            tree("b", "london_plane", 3.5, &catalog),
            tree("c", "ginkgo", 0.0, &catalog),
        ];

        let result = project_trees(&catalog, &trees, Horizon::Ten).unwrap();
        let ids: Vec<&str> = result.per_tree.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);

        let mut expected = ScenarioTotals::default();
        for p in &result.per_tree {
            expected.add(&p.projection);
        }
        assert_eq!(result.total, expected);
    }

    #[test]
    fn red_maple_ten_year_totals() {
        let catalog = SpeciesCatalog::embedded().unwrap();
        let trees = vec![tree("a", "red_maple", 2.0, &catalog)];
        let result = project_trees(&catalog, &trees, Horizon::Ten).unwrap();
        assert!((result.total.carbon_kg_per_year - 16.5).abs() < 1e-9);
        assert!((result.total.canopy_area_m2 - 19.24).abs() < 0.01);
    }

    #[test]
    fn projection_does_not_touch_cached_snapshots() {
        let catalog = SpeciesCatalog::embedded().unwrap();
        let trees = vec![tree("a", "ginkgo", 4.0, &catalog)];
        let before = trees[0].benefits;
        let result = project_trees(&catalog, &trees, Horizon::Twenty).unwrap();
        assert_eq!(trees[0].benefits, before);
        assert!(result.per_tree[0].projection.carbon_kg_per_year > before.carbon_kg_per_year);
    }

    #[test]
    fn unknown_species_is_reported() {
        let catalog = SpeciesCatalog::embedded().unwrap();
        let mut bad = tree("a", "ginkgo", 4.0, &catalog);
        bad.species_id = "baobab".to_string();
        let err = project_trees(&catalog, [&bad], Horizon::Five).unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidSpecies { .. }));
    }
}
