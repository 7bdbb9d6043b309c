use std::collections::HashMap;
use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use tracing::info;

use crate::catalog::{self, Catalog};
use crate::config::AnalysisConfig;
use crate::error::NetworkError;
use crate::facets::FacetIndex;
use crate::graph::{CollaborationGraph, NetworkData};
use crate::relations::RelationTable;
use crate::stats::{self, CollaborationSummary, MusicianStat};
use crate::visualization::NetworkReport;

/// A catalog together with the relations extracted from it.
struct Loaded {
    catalog: Catalog,
    relations: RelationTable,
}

/// Entry point for one analysis: load a catalog, then ask for any view.
///
/// Relations are extracted once per load; every other view is recomputed
/// from them on demand.
pub struct NetworkModel {
    base_path: PathBuf,
    config: AnalysisConfig,
    loaded: Option<Loaded>,
}

impl NetworkModel {
    pub fn new(base_path: impl Into<PathBuf>, config: AnalysisConfig) -> Self {
        Self {
            base_path: base_path.into(),
            config,
            loaded: None,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    // ── Data loading ────────────────────────────────────────────────────────

    /// Load a catalog CSV relative to the base path.
    ///
    /// Required columns: Artist, Album
    /// Optional columns: Musicians, Genres, Styles
    /// All other columns are kept for custom filtering.
    pub fn load_csv(
        &mut self,
        filename: &str,
        rename: Option<&HashMap<String, String>>,
    ) -> Result<&Catalog, NetworkError> {
        let path = self.base_path.join(filename);
        info!(path = %path.display(), "loading catalog");
        let df = catalog::read_csv_as_strings(&path, rename)?;
        self.load_dataframe(&df)
    }

    pub fn load_dataframe(&mut self, df: &DataFrame) -> Result<&Catalog, NetworkError> {
        let catalog = Catalog::from_dataframe(df)?;
        Ok(self.set_catalog(catalog))
    }

    pub fn set_catalog(&mut self, catalog: Catalog) -> &Catalog {
        let relations = RelationTable::extract(&catalog);
        info!(
            records = catalog.len(),
            relations = relations.len(),
            musicians = relations.unique_musicians(),
            artists = relations.unique_artists(),
            "catalog processed"
        );
        let loaded = self.loaded.insert(Loaded { catalog, relations });
        &loaded.catalog
    }

    fn loaded(&self) -> Result<&Loaded, NetworkError> {
        self.loaded
            .as_ref()
            .ok_or_else(|| NetworkError::NotLoaded("catalog".into()))
    }

    // ── Views ───────────────────────────────────────────────────────────────

    pub fn catalog(&self) -> Result<&Catalog, NetworkError> {
        Ok(&self.loaded()?.catalog)
    }

    pub fn relations(&self) -> Result<&RelationTable, NetworkError> {
        Ok(&self.loaded()?.relations)
    }

    pub fn graph(&self) -> Result<CollaborationGraph, NetworkError> {
        let loaded = self.loaded()?;
        Ok(CollaborationGraph::build(
            &loaded.catalog,
            &loaded.relations,
            &self.config,
        ))
    }

    pub fn facets(&self) -> Result<FacetIndex, NetworkError> {
        let graph = self.graph()?;
        Ok(FacetIndex::build(&graph, self.catalog()?, &self.config))
    }

    /// Node/link lists with filter vocabularies, as consumed by the chart.
    pub fn network(&self) -> Result<NetworkData, NetworkError> {
        let graph = self.graph()?;
        let facets = FacetIndex::build(&graph, self.catalog()?, &self.config);
        Ok(graph.to_network_data(&facets, &self.config.colors))
    }

    pub fn musician_stats(&self) -> Result<Vec<MusicianStat>, NetworkError> {
        let loaded = self.loaded()?;
        Ok(stats::musician_stats(&loaded.catalog, &loaded.relations))
    }

    pub fn session_musicians(&self) -> Result<Vec<MusicianStat>, NetworkError> {
        let all = self.musician_stats()?;
        Ok(stats::session_musicians(&all, &self.config.session))
    }

    /// Musicians whose name contains `query`, capped at the configured limit.
    pub fn search_musicians(&self, query: &str) -> Result<Vec<MusicianStat>, NetworkError> {
        let all = self.musician_stats()?;
        Ok(
            stats::search_musicians(&all, query, self.config.search_results_limit)
                .into_iter()
                .cloned()
                .collect(),
        )
    }

    pub fn summary(&self) -> Result<CollaborationSummary, NetworkError> {
        Ok(CollaborationSummary::from_relations(self.relations()?))
    }

    pub fn report(&self) -> Result<NetworkReport, NetworkError> {
        let loaded = self.loaded()?;
        Ok(NetworkReport::build(
            &loaded.catalog,
            &loaded.relations,
            &self.config,
        ))
    }

    // ── Exports ─────────────────────────────────────────────────────────────

    /// Save the relation table and triples as CSV files in `dir`, using the
    /// configured file names. Returns the written paths.
    pub fn save_csvs(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, NetworkError> {
        use crate::relations::write_csv;

        let relations = self.relations()?;
        let network_path = dir.as_ref().join(&self.config.output.network_csv);
        let triples_path = dir.as_ref().join(&self.config.output.triples_csv);

        write_csv(&mut relations.to_dataframe()?, &network_path)?;
        write_csv(&mut relations.triples()?, &triples_path)?;
        Ok(vec![network_path, triples_path])
    }
}
