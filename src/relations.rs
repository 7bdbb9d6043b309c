use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use tracing::{debug, trace};

use crate::catalog::Catalog;
use crate::error::NetworkError;
use crate::parser::{self, Credit, EntryParse};
use crate::schema::{relation, triples};

/// One normalized (musician, role, main_artist, album) fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub musician: String,
    pub role: String,
    pub main_artist: String,
    pub album: String,
    /// Index of the catalog record the relation was extracted from.
    pub record: usize,
}

impl Relation {
    fn from_credit(credit: Credit, album: &str, record: usize) -> Self {
        Self {
            musician: credit.musician,
            role: credit.role,
            main_artist: credit.main_artist,
            album: album.to_string(),
            record,
        }
    }
}

/// A musician entry that did not match the expected credit shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub record: usize,
    pub main_artist: String,
    pub entry: String,
}

/// Every relation in the catalog, in catalog → entry → role order.
#[derive(Debug, Clone, Default)]
pub struct RelationTable {
    relations: Vec<Relation>,
    skipped: Vec<SkippedEntry>,
}

impl RelationTable {
    /// Run the musician-field parser over every record.
    pub fn extract(catalog: &Catalog) -> Self {
        let mut relations = Vec::new();
        let mut skipped = Vec::new();

        for (index, record) in catalog.records().iter().enumerate() {
            for parsed in parser::parse_entries(record.musicians_raw.as_deref()) {
                if let EntryParse::Skipped { entry } = &parsed {
                    trace!(record = index, artist = %record.main_artist, %entry, "skipped musician entry");
                    skipped.push(SkippedEntry {
                        record: index,
                        main_artist: record.main_artist.clone(),
                        entry: entry.clone(),
                    });
                    continue;
                }
                relations.extend(
                    parsed
                        .into_credits(&record.main_artist)
                        .into_iter()
                        .map(|credit| Relation::from_credit(credit, &record.album, index)),
                );
            }
        }

        debug!(
            relations = relations.len(),
            skipped = skipped.len(),
            "relations extracted"
        );
        Self { relations, skipped }
    }

    pub fn from_relations(relations: Vec<Relation>) -> Self {
        Self {
            relations,
            skipped: Vec::new(),
        }
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Relation> {
        self.relations.iter()
    }

    pub fn unique_musicians(&self) -> usize {
        self.iter().map(|r| r.musician.as_str()).collect::<HashSet<_>>().len()
    }

    pub fn unique_artists(&self) -> usize {
        self.iter().map(|r| r.main_artist.as_str()).collect::<HashSet<_>>().len()
    }

    /// Columns: musician, role, main_artist, album
    pub fn to_dataframe(&self) -> Result<DataFrame, NetworkError> {
        let musicians: Vec<&str> = self.iter().map(|r| r.musician.as_str()).collect();
        let roles: Vec<&str> = self.iter().map(|r| r.role.as_str()).collect();
        let artists: Vec<&str> = self.iter().map(|r| r.main_artist.as_str()).collect();
        let albums: Vec<&str> = self.iter().map(|r| r.album.as_str()).collect();

        let df = DataFrame::new(vec![
            Column::new(relation::MUSICIAN.into(), &musicians),
            Column::new(relation::ROLE.into(), &roles),
            Column::new(relation::MAIN_ARTIST.into(), &artists),
            Column::new(relation::ALBUM.into(), &albums),
        ])?;
        Ok(df)
    }

    /// Graph triples: (musician, role, main_artist) as subject, predicate, object.
    pub fn triples(&self) -> Result<DataFrame, NetworkError> {
        let subjects: Vec<&str> = self.iter().map(|r| r.musician.as_str()).collect();
        let predicates: Vec<&str> = self.iter().map(|r| r.role.as_str()).collect();
        let objects: Vec<&str> = self.iter().map(|r| r.main_artist.as_str()).collect();

        let df = DataFrame::new(vec![
            Column::new(triples::SUBJECT.into(), &subjects),
            Column::new(triples::PREDICATE.into(), &predicates),
            Column::new(triples::OBJECT.into(), &objects),
        ])?;
        Ok(df)
    }
}

impl<'a> IntoIterator for &'a RelationTable {
    type Item = &'a Relation;
    type IntoIter = std::slice::Iter<'a, Relation>;

    fn into_iter(self) -> Self::IntoIter {
        self.relations.iter()
    }
}

/// Write a DataFrame as CSV with a header row.
pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<(), NetworkError> {
    let mut file = File::create(path.as_ref())?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}
