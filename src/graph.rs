use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use tracing::debug;

use crate::catalog::{ArtistProfiles, Catalog};
use crate::config::{AnalysisConfig, CategoryColors};
use crate::facets::{self, FacetIndex};
use crate::parser::clean_role_name;
use crate::relations::RelationTable;
use crate::schema::category;

// ── Graph payloads ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Artist,
    Musician,
}

impl NodeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Artist => category::ARTIST,
            Self::Musician => category::MUSICIAN,
        }
    }
}

/// Node payload. `id` doubles as the display name and is unique across
/// both categories.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkNode {
    pub id: String,
    pub category: NodeCategory,
    pub size: f64,
    /// Distinct partners: musicians for an artist, artists for a musician.
    pub degree: usize,
    pub genres: BTreeSet<String>,
    pub styles: BTreeSet<String>,
    /// Distinct clean roles, first-seen order.
    pub roles: Vec<String>,
    /// Artist nodes only: catalog albums, duplicates kept.
    pub albums: Vec<String>,
    /// Musician nodes only: distinct artists, first-seen order.
    pub collaborations: Vec<String>,
}

/// Aggregated payload of every relation between one musician and one artist.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkEdge {
    /// One entry per underlying relation.
    pub roles: Vec<String>,
    pub clean_roles: Vec<String>,
    pub albums: Vec<String>,
    pub multiplicity: usize,
    /// Snapshot of the artist profile taken when the edge was created.
    pub genres: BTreeSet<String>,
    pub styles: BTreeSet<String>,
    /// Custom column → values seen on the contributing records.
    pub custom_data: BTreeMap<String, BTreeSet<String>>,
}

/// Borrowed view of one edge with its endpoint names resolved.
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub edge: &'a NetworkEdge,
}

// ── Collaboration graph ─────────────────────────────────────────────────────

/// Bipartite musician → artist collaboration graph.
///
/// Every main artist in the catalog is an artist node; every credited name
/// that never headlines is a musician node. A name that does both is only
/// an artist node.
pub struct CollaborationGraph {
    graph: DiGraph<NetworkNode, NetworkEdge>,
    /// Map from node name → NodeIndex for fast lookup.
    node_map: HashMap<String, NodeIndex>,
}

/// Append `value` unless already present, keeping first-seen order.
fn push_unique<'a>(list: &mut Vec<&'a str>, value: &'a str) {
    if !list.contains(&value) {
        list.push(value);
    }
}

impl CollaborationGraph {
    /// Build the graph from the relation table and the catalog's artist profiles.
    pub fn build(catalog: &Catalog, relations: &RelationTable, config: &AnalysisConfig) -> Self {
        let profiles = catalog.artist_profiles();
        let custom_columns = facets::custom_columns(catalog, config);

        let clean_roles: Vec<String> = relations.iter().map(|r| clean_role_name(&r.role)).collect();

        // Partner and role lists per name, first-seen order
        let mut artist_musicians: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut artist_roles: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut musician_artists: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut musician_roles: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut musician_order: Vec<&str> = Vec::new();

        for (relation, clean) in relations.iter().zip(&clean_roles) {
            let musician = relation.musician.as_str();
            let artist = relation.main_artist.as_str();

            push_unique(artist_musicians.entry(artist).or_default(), musician);
            push_unique(artist_roles.entry(artist).or_default(), clean);
            if !musician_artists.contains_key(musician) {
                musician_order.push(musician);
            }
            push_unique(musician_artists.entry(musician).or_default(), artist);
            push_unique(musician_roles.entry(musician).or_default(), clean);
        }

        let mut graph = DiGraph::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();

        // Artists first: a headliner is never demoted to a musician node
        for artist in profiles.artists() {
            let profile = profiles.get(artist).cloned().unwrap_or_default();
            let degree = artist_musicians.get(artist).map_or(0, Vec::len);
            let roles = artist_roles
                .get(artist)
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default();

            let idx = graph.add_node(NetworkNode {
                id: artist.to_string(),
                category: NodeCategory::Artist,
                size: config.artist_size.size(degree),
                degree,
                genres: profile.genres,
                styles: profile.styles,
                roles,
                albums: profile.albums,
                collaborations: Vec::new(),
            });
            node_map.insert(artist.to_string(), idx);
        }

        for musician in musician_order {
            if node_map.contains_key(musician) {
                continue;
            }
            let collaborations = musician_artists.get(musician).cloned().unwrap_or_default();
            let (genres, styles) = Self::collaborator_metadata(&profiles, &collaborations);
            let roles = musician_roles
                .get(musician)
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default();

            let idx = graph.add_node(NetworkNode {
                id: musician.to_string(),
                category: NodeCategory::Musician,
                size: config.musician_size.size(collaborations.len()),
                degree: collaborations.len(),
                genres,
                styles,
                roles,
                albums: Vec::new(),
                collaborations: collaborations.iter().map(|s| s.to_string()).collect(),
            });
            node_map.insert(musician.to_string(), idx);
        }

        // Edges: one per unordered pair, appended to in relation order
        let mut edge_map: HashMap<(NodeIndex, NodeIndex), EdgeIndex> = HashMap::new();
        let mut dropped = 0usize;

        for (relation, clean) in relations.iter().zip(&clean_roles) {
            let (Some(&src), Some(&dst)) = (
                node_map.get(&relation.musician),
                node_map.get(&relation.main_artist),
            ) else {
                dropped += 1;
                continue;
            };
            let key = if src <= dst { (src, dst) } else { (dst, src) };

            let edge_idx = *edge_map.entry(key).or_insert_with(|| {
                let profile = profiles.get(&relation.main_artist);
                graph.add_edge(
                    src,
                    dst,
                    NetworkEdge {
                        roles: Vec::new(),
                        clean_roles: Vec::new(),
                        albums: Vec::new(),
                        multiplicity: 0,
                        genres: profile.map(|p| p.genres.clone()).unwrap_or_default(),
                        styles: profile.map(|p| p.styles.clone()).unwrap_or_default(),
                        custom_data: BTreeMap::new(),
                    },
                )
            });

            let edge = &mut graph[edge_idx];
            edge.roles.push(relation.role.clone());
            edge.clean_roles.push(clean.clone());
            edge.albums.push(relation.album.clone());
            edge.multiplicity += 1;

            if let Some(record) = catalog.records().get(relation.record) {
                for column in &custom_columns {
                    let values = edge.custom_data.entry(column.clone()).or_default();
                    values.extend(record.extra_values(column).map(str::to_string));
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            dropped_relations = dropped,
            "collaboration graph built"
        );

        Self { graph, node_map }
    }

    fn collaborator_metadata(
        profiles: &ArtistProfiles,
        artists: &[&str],
    ) -> (BTreeSet<String>, BTreeSet<String>) {
        let mut genres = BTreeSet::new();
        let mut styles = BTreeSet::new();
        for profile in artists.iter().filter_map(|a| profiles.get(a)) {
            genres.extend(profile.genres.iter().cloned());
            styles.extend(profile.styles.iter().cloned());
        }
        (genres, styles)
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    /// Nodes in insertion order: artists, then musicians.
    pub fn nodes(&self) -> impl Iterator<Item = &NetworkNode> {
        self.graph.node_indices().map(move |i| &self.graph[i])
    }

    pub fn node(&self, name: &str) -> Option<&NetworkNode> {
        self.node_map.get(name).map(|&i| &self.graph[i])
    }

    /// Edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> {
        self.graph.edge_references().map(move |e| EdgeView {
            source: self.graph[e.source()].id.as_str(),
            target: self.graph[e.target()].id.as_str(),
            edge: e.weight(),
        })
    }

    /// The edge joining two names, in either direction.
    pub fn edge_between(&self, a: &str, b: &str) -> Option<EdgeView<'_>> {
        let a_idx = *self.node_map.get(a)?;
        let b_idx = *self.node_map.get(b)?;
        let edge_idx = self
            .graph
            .find_edge(a_idx, b_idx)
            .or_else(|| self.graph.find_edge(b_idx, a_idx))?;
        let (src, dst) = self.graph.edge_endpoints(edge_idx)?;
        Some(EdgeView {
            source: self.graph[src].id.as_str(),
            target: self.graph[dst].id.as_str(),
            edge: &self.graph[edge_idx],
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Serializable node/link lists plus filter vocabularies.
    pub fn to_network_data(&self, facets: &FacetIndex, colors: &CategoryColors) -> NetworkData {
        let nodes = self
            .nodes()
            .map(|n| NodeRecord {
                id: n.id.clone(),
                name: n.id.clone(),
                category: n.category,
                symbol_size: n.size,
                value: n.degree,
                genres: n.genres.iter().cloned().collect(),
                styles: n.styles.iter().cloned().collect(),
                roles: n.roles.clone(),
                albums: (n.category == NodeCategory::Artist).then(|| n.albums.clone()),
                collaborations: (n.category == NodeCategory::Musician)
                    .then(|| n.collaborations.clone()),
            })
            .collect();

        let links = self
            .edges()
            .map(|e| LinkRecord {
                source: e.source.to_string(),
                target: e.target.to_string(),
                value: e.edge.multiplicity,
                roles: e.edge.roles.clone(),
                clean_roles: e.edge.clean_roles.clone(),
                albums: e.edge.albums.clone(),
                genres: e.edge.genres.iter().cloned().collect(),
                styles: e.edge.styles.iter().cloned().collect(),
                custom_data: e
                    .edge
                    .custom_data
                    .iter()
                    .map(|(k, v)| (k.clone(), v.iter().cloned().collect()))
                    .collect(),
            })
            .collect();

        let categories = vec![
            CategoryStyle::new(NodeCategory::Musician, &colors.musician),
            CategoryStyle::new(NodeCategory::Artist, &colors.artist),
        ];

        NetworkData {
            nodes,
            links,
            categories,
            genres: facets.genres.clone(),
            styles: facets.styles.clone(),
            clean_roles: facets.clean_roles.clone(),
        }
    }
}

// ── Serializable output ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
    pub category: NodeCategory,
    #[serde(rename = "symbolSize")]
    pub symbol_size: f64,
    pub value: usize,
    pub genres: Vec<String>,
    pub styles: Vec<String>,
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub albums: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaborations: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkRecord {
    pub source: String,
    pub target: String,
    pub value: usize,
    pub roles: Vec<String>,
    pub clean_roles: Vec<String>,
    pub albums: Vec<String>,
    pub genres: Vec<String>,
    pub styles: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_data: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemStyle {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStyle {
    pub name: NodeCategory,
    #[serde(rename = "itemStyle")]
    pub item_style: ItemStyle,
}

impl CategoryStyle {
    fn new(name: NodeCategory, color: &str) -> Self {
        Self {
            name,
            item_style: ItemStyle {
                color: color.to_string(),
            },
        }
    }
}

/// Everything the network chart needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkData {
    pub nodes: Vec<NodeRecord>,
    pub links: Vec<LinkRecord>,
    pub categories: Vec<CategoryStyle>,
    pub genres: Vec<String>,
    pub styles: Vec<String>,
    pub clean_roles: Vec<String>,
}
