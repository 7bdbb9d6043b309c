use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::warn;

use crate::catalog::Catalog;
use crate::config::AnalysisConfig;
use crate::graph::CollaborationGraph;

/// Sorted, distinct filter vocabularies for the rendering layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FacetIndex {
    pub genres: Vec<String>,
    pub styles: Vec<String>,
    pub clean_roles: Vec<String>,
    /// Custom column → distinct values.
    pub custom: BTreeMap<String, Vec<String>>,
}

impl FacetIndex {
    pub fn build(graph: &CollaborationGraph, catalog: &Catalog, config: &AnalysisConfig) -> Self {
        let mut genres = BTreeSet::new();
        let mut styles = BTreeSet::new();
        let mut roles = BTreeSet::new();

        for node in graph.nodes() {
            genres.extend(node.genres.iter().map(String::as_str));
            styles.extend(node.styles.iter().map(String::as_str));
            roles.extend(node.roles.iter().map(String::as_str));
        }
        for edge in graph.edges() {
            roles.extend(edge.edge.clean_roles.iter().map(String::as_str));
        }

        let custom = custom_columns(catalog, config)
            .into_iter()
            .map(|column| {
                let values: BTreeSet<&str> = catalog
                    .records()
                    .iter()
                    .flat_map(|r| r.extra_values(&column))
                    .collect();
                let values = values.into_iter().map(str::to_string).collect();
                (column, values)
            })
            .collect();

        Self {
            genres: to_sorted_vec(genres),
            styles: to_sorted_vec(styles),
            clean_roles: to_sorted_vec(roles),
            custom,
        }
    }
}

fn to_sorted_vec(set: BTreeSet<&str>) -> Vec<String> {
    set.into_iter().map(str::to_string).collect()
}

/// Columns offered as custom facets: the configured list, or every extra
/// catalog column when none is configured.
pub fn custom_columns(catalog: &Catalog, config: &AnalysisConfig) -> Vec<String> {
    if config.custom_columns.is_empty() {
        return catalog.extra_columns().to_vec();
    }
    for column in &config.custom_columns {
        if !catalog.extra_columns().contains(column) {
            warn!(%column, "configured custom column is not in the catalog");
        }
    }
    config.custom_columns.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRecord;
    use crate::relations::RelationTable;

    fn catalog() -> Catalog {
        Catalog::from_records(vec![
            CatalogRecord::new("X", "One")
                .with_musicians("Pat (Drums [overdubs]); Lee (Bass)")
                .with_genres("Rock, Funk")
                .with_styles("Funk Rock")
                .with_extra("Label", "Warner")
                .with_extra("Country", "US"),
            CatalogRecord::new("Y", "Two")
                .with_musicians("Pat (Drums)")
                .with_genres("Funk")
                .with_extra("Label", "Atlantic, Warner"),
        ])
    }

    fn facets(config: &AnalysisConfig) -> FacetIndex {
        let catalog = catalog();
        let relations = RelationTable::extract(&catalog);
        let graph = CollaborationGraph::build(&catalog, &relations, config);
        FacetIndex::build(&graph, &catalog, config)
    }

    #[test]
    fn vocabularies_are_sorted_and_distinct() {
        let index = facets(&AnalysisConfig::default());
        assert_eq!(index.genres, vec!["Funk", "Rock"]);
        assert_eq!(index.styles, vec!["Funk Rock"]);
        assert_eq!(index.clean_roles, vec!["Bass", "Drums"]);
    }

    #[test]
    fn all_extra_columns_by_default() {
        let index = facets(&AnalysisConfig::default());
        assert_eq!(index.custom.len(), 2);
        assert_eq!(index.custom["Label"], vec!["Atlantic", "Warner"]);
        assert_eq!(index.custom["Country"], vec!["US"]);
    }

    #[test]
    fn configured_columns_restrict_custom_facets() {
        let config = AnalysisConfig {
            custom_columns: vec!["Country".into(), "Missing".into()],
            ..Default::default()
        };
        let index = facets(&config);
        assert_eq!(index.custom.keys().collect::<Vec<_>>(), vec!["Country", "Missing"]);
        assert!(index.custom["Missing"].is_empty());
    }
}
