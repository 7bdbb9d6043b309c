//! Musician collaboration network engine.
//!
//! Turns a catalog of records (artist, album, free-text musician credits,
//! genres, styles) into a musician → artist collaboration graph, per-musician
//! session statistics and the filter vocabularies of the interactive report.

pub mod catalog;
pub mod config;
pub mod error;
pub mod facets;
pub mod graph;
pub mod model;
pub mod parser;
pub mod relations;
pub mod schema;
pub mod stats;
pub mod visualization;

#[cfg(feature = "python")]
mod python;

pub use catalog::{ArtistProfile, ArtistProfiles, Catalog, CatalogRecord};
pub use config::{AnalysisConfig, SessionPolicy, SymbolSizeScale};
pub use error::NetworkError;
pub use facets::FacetIndex;
pub use graph::{CollaborationGraph, NetworkData, NetworkEdge, NetworkNode, NodeCategory};
pub use model::NetworkModel;
pub use parser::{clean_role_name, parse_entries, parse_musicians, EntryParse};
pub use relations::{Relation, RelationTable, SkippedEntry};
pub use stats::{CollaborationSummary, MusicianCategory, MusicianStat};
pub use visualization::NetworkReport;
