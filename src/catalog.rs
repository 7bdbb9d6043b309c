use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use polars::prelude::*;
use tracing::{debug, warn};

use crate::error::NetworkError;
use crate::schema::catalog;

/// Split a comma-separated cell into trimmed, non-empty tokens.
pub(crate) fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

// ── Records ─────────────────────────────────────────────────────────────────

/// One row of the catalog: a single album and its credits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogRecord {
    pub main_artist: String,
    pub album: String,
    pub musicians_raw: Option<String>,
    pub genres_raw: Option<String>,
    pub styles_raw: Option<String>,
    /// Any other catalog columns, keyed by column name.
    pub extra: BTreeMap<String, String>,
}

impl CatalogRecord {
    pub fn new(main_artist: impl Into<String>, album: impl Into<String>) -> Self {
        Self {
            main_artist: main_artist.into(),
            album: album.into(),
            ..Default::default()
        }
    }

    pub fn with_musicians(mut self, raw: impl Into<String>) -> Self {
        self.musicians_raw = Some(raw.into());
        self
    }

    pub fn with_genres(mut self, raw: impl Into<String>) -> Self {
        self.genres_raw = Some(raw.into());
        self
    }

    pub fn with_styles(mut self, raw: impl Into<String>) -> Self {
        self.styles_raw = Some(raw.into());
        self
    }

    pub fn with_extra(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(column.into(), value.into());
        self
    }

    /// "Artist - Album", the label used in per-musician record lists.
    pub fn label(&self) -> String {
        format!("{} - {}", self.main_artist, self.album)
    }

    pub fn genres(&self) -> impl Iterator<Item = &str> {
        split_list(self.genres_raw.as_deref())
    }

    pub fn styles(&self) -> impl Iterator<Item = &str> {
        split_list(self.styles_raw.as_deref())
    }

    /// Comma-split values of an extra column; empty when the column is absent.
    pub fn extra_values(&self, column: &str) -> impl Iterator<Item = &str> {
        split_list(self.extra.get(column).map(String::as_str))
    }
}

// ── Catalog ─────────────────────────────────────────────────────────────────

/// The full input table, in row order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<CatalogRecord>,
    extra_columns: Vec<String>,
}

impl Catalog {
    /// Build from records directly. Extra columns are the union of the
    /// records' `extra` keys, sorted.
    pub fn from_records(records: Vec<CatalogRecord>) -> Self {
        let extra_columns: BTreeSet<&String> =
            records.iter().flat_map(|r| r.extra.keys()).collect();
        let extra_columns = extra_columns.into_iter().cloned().collect();
        Self {
            records,
            extra_columns,
        }
    }

    /// Build from a DataFrame.
    ///
    /// Required columns: Artist, Album
    /// Optional columns: Musicians, Genres, Styles (treated as all-null if absent)
    /// Every other column is kept as an extra column.
    /// Rows with a null or blank Artist are dropped.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self, NetworkError> {
        require_columns(df, &catalog::REQUIRED)?;

        let artists = string_column(df, catalog::ARTIST)?
            .ok_or_else(|| NetworkError::MissingColumn(catalog::ARTIST.into()))?;
        let albums = string_column(df, catalog::ALBUM)?
            .ok_or_else(|| NetworkError::MissingColumn(catalog::ALBUM.into()))?;
        let musicians = string_column(df, catalog::MUSICIANS)?;
        let genres = string_column(df, catalog::GENRES)?;
        let styles = string_column(df, catalog::STYLES)?;

        let extra_columns: Vec<String> = df
            .get_column_names_str()
            .iter()
            .filter(|name| !catalog::KNOWN.contains(*name))
            .map(|name| name.to_string())
            .collect();
        let mut extra_series = Vec::with_capacity(extra_columns.len());
        for name in &extra_columns {
            if let Some(values) = string_column(df, name)? {
                extra_series.push((name.clone(), values));
            }
        }

        let optional = |col: &Option<StringChunked>, i: usize| -> Option<String> {
            col.as_ref()
                .and_then(|c| c.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let mut records = Vec::with_capacity(df.height());
        let mut dropped = 0usize;
        for i in 0..df.height() {
            let Some(main_artist) = artists.get(i).map(str::trim).filter(|s| !s.is_empty())
            else {
                dropped += 1;
                continue;
            };

            let extra = extra_series
                .iter()
                .filter_map(|(name, values)| {
                    values.get(i).map(|v| (name.clone(), v.to_string()))
                })
                .collect();

            records.push(CatalogRecord {
                main_artist: main_artist.to_string(),
                album: albums.get(i).unwrap_or("").trim().to_string(),
                musicians_raw: optional(&musicians, i),
                genres_raw: optional(&genres, i),
                styles_raw: optional(&styles, i),
                extra,
            });
        }

        if dropped > 0 {
            warn!(dropped, "catalog rows without an Artist were ignored");
        }
        debug!(
            records = records.len(),
            extra_columns = extra_columns.len(),
            "catalog loaded"
        );

        Ok(Self {
            records,
            extra_columns,
        })
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    /// Fold all records into one profile per distinct main artist.
    pub fn artist_profiles(&self) -> ArtistProfiles {
        let mut profiles = ArtistProfiles::default();
        for record in &self.records {
            let profile = profiles.entry(&record.main_artist);
            profile.genres.extend(record.genres().map(str::to_string));
            profile.styles.extend(record.styles().map(str::to_string));
            profile.albums.push(record.album.clone());
        }
        profiles
    }
}

// ── Artist profiles ─────────────────────────────────────────────────────────

/// Genres, styles and albums of one main artist across the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtistProfile {
    pub genres: BTreeSet<String>,
    pub styles: BTreeSet<String>,
    /// Catalog order, duplicates kept.
    pub albums: Vec<String>,
}

/// Profiles keyed by artist, iterable in first-seen catalog order.
#[derive(Debug, Clone, Default)]
pub struct ArtistProfiles {
    order: Vec<String>,
    by_artist: HashMap<String, ArtistProfile>,
}

impl ArtistProfiles {
    fn entry(&mut self, artist: &str) -> &mut ArtistProfile {
        if !self.by_artist.contains_key(artist) {
            self.order.push(artist.to_string());
        }
        self.by_artist.entry(artist.to_string()).or_default()
    }

    pub fn get(&self, artist: &str) -> Option<&ArtistProfile> {
        self.by_artist.get(artist)
    }

    /// Artist names in the order they first appear in the catalog.
    pub fn artists(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

// ── CSV loading ─────────────────────────────────────────────────────────────

/// Read a CSV file with all columns as String dtype.
/// Trims whitespace from column names and applies an optional rename.
pub fn read_csv_as_strings(
    path: impl AsRef<Path>,
    rename: Option<&HashMap<String, String>>,
) -> Result<DataFrame, NetworkError> {
    let path = path.as_ref().to_path_buf();
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    if let Some(map) = rename {
        let old: Vec<&str> = map.keys().map(|s| s.as_str()).collect();
        let new: Vec<&str> = map.values().map(|s| s.as_str()).collect();
        df = df.lazy().rename(old, new, true).collect()?;
    }

    Ok(df)
}

pub fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), NetworkError> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(NetworkError::MissingColumn(col_name.to_string()));
        }
    }
    Ok(())
}

/// Fetch a column as strings, casting if needed. `None` when the column is absent.
fn string_column(df: &DataFrame, name: &str) -> Result<Option<StringChunked>, NetworkError> {
    match df.column(name) {
        Ok(column) => {
            let cast = column.cast(&DataType::String)?;
            Ok(Some(cast.str()?.clone()))
        }
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        DataFrame::new(vec![
            Column::new("Artist".into(), &["Miles Davis", "Bill Evans", "Miles Davis", ""]),
            Column::new("Album".into(), &["Kind of Blue", "Portrait", "Nefertiti", "Lost"]),
            Column::new(
                "Musicians".into(),
                &[Some("Bill Evans (piano)"), None, Some("  "), None],
            ),
            Column::new(
                "Genres".into(),
                &[Some("Jazz"), Some("Jazz"), Some("Jazz, Fusion"), None],
            ),
            Column::new("Label".into(), &[Some("Columbia"), Some("Riverside"), None, None]),
        ])
        .unwrap()
    }

    #[test]
    fn loads_records_from_dataframe() {
        let catalog = Catalog::from_dataframe(&sample_df()).unwrap();
        assert_eq!(catalog.len(), 3);

        let first = &catalog.records()[0];
        assert_eq!(first.main_artist, "Miles Davis");
        assert_eq!(first.musicians_raw.as_deref(), Some("Bill Evans (piano)"));
        assert_eq!(first.styles_raw, None);
        assert_eq!(first.extra.get("Label").map(String::as_str), Some("Columbia"));

        // blank musicians cell behaves like an absent one
        assert_eq!(catalog.records()[2].musicians_raw, None);
        assert_eq!(catalog.extra_columns(), &["Label".to_string()]);
    }

    #[test]
    fn headliner_names_are_trimmed_like_credits() {
        let df = DataFrame::new(vec![
            Column::new("Artist".into(), &["B ", "A"]),
            Column::new("Album".into(), &[" One", "Two"]),
            Column::new("Musicians".into(), &[None, Some("B (guitar)")]),
        ])
        .unwrap();
        let catalog = Catalog::from_dataframe(&df).unwrap();
        assert_eq!(catalog.records()[0].main_artist, "B");
        assert_eq!(catalog.records()[0].album, "One");

        let credits = crate::parser::parse_musicians(
            catalog.records()[1].musicians_raw.as_deref(),
            &catalog.records()[1].main_artist,
        );
        assert_eq!(credits[0].musician, catalog.records()[0].main_artist);
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let df = DataFrame::new(vec![Column::new("Artist".into(), &["A"])]).unwrap();
        let err = Catalog::from_dataframe(&df).unwrap_err();
        assert!(matches!(err, NetworkError::MissingColumn(c) if c == "Album"));
    }

    #[test]
    fn profiles_union_genres_and_keep_album_order() {
        let catalog = Catalog::from_dataframe(&sample_df()).unwrap();
        let profiles = catalog.artist_profiles();

        let artists: Vec<&str> = profiles.artists().collect();
        assert_eq!(artists, vec!["Miles Davis", "Bill Evans"]);

        let miles = profiles.get("Miles Davis").unwrap();
        assert_eq!(
            miles.genres.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["Fusion", "Jazz"]
        );
        assert!(miles.styles.is_empty());
        assert_eq!(miles.albums, vec!["Kind of Blue", "Nefertiti"]);
        assert!(profiles.get("Nobody").is_none());
    }

    #[test]
    fn split_list_drops_blank_tokens() {
        let tokens: Vec<&str> = split_list(Some(" Rock, ,Pop ,")).collect();
        assert_eq!(tokens, vec!["Rock", "Pop"]);
        assert_eq!(split_list(None).count(), 0);
    }
}
