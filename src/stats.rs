//! Per-musician appearance statistics and session-musician classification.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::catalog::Catalog;
use crate::config::SessionPolicy;
use crate::relations::RelationTable;

/// Where a musician's appearances come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicianCategory {
    /// Only ever credited on other artists' records.
    PureSession,
    /// Both headlines and plays on other records.
    Balanced,
    /// Only credited on their own records.
    PureMainArtist,
    /// No appearances at all.
    Unclassified,
}

impl MusicianCategory {
    pub fn classify(as_main_artist: usize, as_session_musician: usize) -> Self {
        match (as_main_artist > 0, as_session_musician > 0) {
            (false, true) => Self::PureSession,
            (true, true) => Self::Balanced,
            (true, false) => Self::PureMainArtist,
            (false, false) => Self::Unclassified,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MusicianStat {
    pub musician: String,
    pub total_records: usize,
    pub as_main_artist: usize,
    pub as_session_musician: usize,
    pub session_ratio: f64,
    /// "Artist - Album" labels, catalog order, deduplicated.
    pub records: Vec<String>,
    pub category: MusicianCategory,
}

impl MusicianStat {
    pub fn new(musician: impl Into<String>, as_main_artist: usize, as_session_musician: usize) -> Self {
        let total_records = as_main_artist + as_session_musician;
        let session_ratio = if total_records == 0 {
            0.0
        } else {
            as_session_musician as f64 / total_records as f64
        };
        Self {
            musician: musician.into(),
            total_records,
            as_main_artist,
            as_session_musician,
            session_ratio,
            records: Vec::new(),
            category: MusicianCategory::classify(as_main_artist, as_session_musician),
        }
    }

    pub fn is_session_musician(&self, policy: &SessionPolicy) -> bool {
        self.total_records >= policy.min_records && self.session_ratio >= policy.min_ratio
    }
}

/// Statistics for every distinct credited name, ordered by `total_records`
/// descending, ties in order of first credit.
pub fn musician_stats(catalog: &Catalog, relations: &RelationTable) -> Vec<MusicianStat> {
    let mut headlined: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, record) in catalog.records().iter().enumerate() {
        headlined.entry(record.main_artist.as_str()).or_default().push(index);
    }

    let mut order: Vec<&str> = Vec::new();
    let mut session_counts: HashMap<&str, usize> = HashMap::new();
    let mut credited: HashMap<&str, BTreeSet<usize>> = HashMap::new();

    for relation in relations {
        let musician = relation.musician.as_str();
        if !credited.contains_key(musician) {
            order.push(musician);
        }
        credited.entry(musician).or_default().insert(relation.record);
        if relation.main_artist != relation.musician {
            *session_counts.entry(musician).or_default() += 1;
        }
    }

    let mut stats: Vec<MusicianStat> = order
        .into_iter()
        .map(|musician| {
            let own = headlined.get(musician).map(Vec::as_slice).unwrap_or_default();
            let session = session_counts.get(musician).copied().unwrap_or(0);
            let mut stat = MusicianStat::new(musician, own.len(), session);

            let mut indices = credited.remove(musician).unwrap_or_default();
            indices.extend(own.iter().copied());
            let mut seen = BTreeSet::new();
            stat.records = indices
                .into_iter()
                .filter_map(|i| catalog.records().get(i))
                .map(|r| r.label())
                .filter(|label| seen.insert(label.clone()))
                .collect();
            stat
        })
        .collect();

    stats.sort_by(|a, b| b.total_records.cmp(&a.total_records));
    debug!(musicians = stats.len(), "musician statistics computed");
    stats
}

/// Musicians meeting the session policy, highest ratio first.
pub fn session_musicians(stats: &[MusicianStat], policy: &SessionPolicy) -> Vec<MusicianStat> {
    let mut selected: Vec<MusicianStat> = stats
        .iter()
        .filter(|s| s.is_session_musician(policy))
        .cloned()
        .collect();
    selected.sort_by(|a, b| {
        b.session_ratio
            .total_cmp(&a.session_ratio)
            .then(b.total_records.cmp(&a.total_records))
    });
    selected
}

pub fn top_musicians(stats: &[MusicianStat], limit: usize) -> &[MusicianStat] {
    &stats[..limit.min(stats.len())]
}

/// Case-insensitive substring search over musician names.
pub fn search_musicians<'a>(
    stats: &'a [MusicianStat],
    query: &str,
    limit: usize,
) -> Vec<&'a MusicianStat> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    stats
        .iter()
        .filter(|s| s.musician.to_lowercase().contains(&needle))
        .take(limit)
        .collect()
}

// ── Collection summary ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollaborationSummary {
    pub total_connections: usize,
    pub unique_musicians: usize,
    pub unique_artists: usize,
    pub unique_albums: usize,
    pub unique_roles: usize,
    pub most_collaborative_musician: Option<String>,
    pub most_collaborative_artist: Option<String>,
}

impl CollaborationSummary {
    pub fn from_relations(relations: &RelationTable) -> Self {
        let albums: BTreeSet<&str> = relations.iter().map(|r| r.album.as_str()).collect();
        let roles: BTreeSet<&str> = relations.iter().map(|r| r.role.as_str()).collect();

        Self {
            total_connections: relations.len(),
            unique_musicians: relations.unique_musicians(),
            unique_artists: relations.unique_artists(),
            unique_albums: albums.len(),
            unique_roles: roles.len(),
            most_collaborative_musician: most_frequent(relations.iter().map(|r| r.musician.as_str())),
            most_collaborative_artist: most_frequent(relations.iter().map(|r| r.main_artist.as_str())),
        }
    }
}

/// Most frequent value; ties go to the value seen first.
fn most_frequent<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, value) in values.enumerate() {
        counts.entry(value).or_insert((0, position)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (ca, pa)), (_, (cb, pb))| ca.cmp(cb).then(pb.cmp(pa)))
        .map(|(value, _)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRecord;

    fn catalog() -> Catalog {
        Catalog::from_records(vec![
            CatalogRecord::new("Aretha Franklin", "Lady Soul")
                .with_musicians("Tommy Cogbill (bass); Spooner Oldham (piano, organ)"),
            CatalogRecord::new("Wilson Pickett", "The Exciting")
                .with_musicians("Tommy Cogbill (bass, guitar)"),
            CatalogRecord::new("Dusty Springfield", "In Memphis")
                .with_musicians("Tommy Cogbill (bass); Spooner Oldham (organ)"),
            CatalogRecord::new("Spooner Oldham", "Pot Luck")
                .with_musicians("Spooner Oldham (keyboards)"),
        ])
    }

    fn stat<'a>(stats: &'a [MusicianStat], name: &str) -> &'a MusicianStat {
        stats.iter().find(|s| s.musician == name).unwrap()
    }

    #[test]
    fn counts_session_and_headliner_appearances() {
        let catalog = catalog();
        let stats = musician_stats(&catalog, &RelationTable::extract(&catalog));

        let tommy = stat(&stats, "Tommy Cogbill");
        assert_eq!(tommy.as_session_musician, 4);
        assert_eq!(tommy.as_main_artist, 0);
        assert_eq!(tommy.total_records, 4);
        assert_eq!(tommy.session_ratio, 1.0);
        assert_eq!(tommy.category, MusicianCategory::PureSession);
        assert_eq!(
            tommy.records,
            vec![
                "Aretha Franklin - Lady Soul",
                "Wilson Pickett - The Exciting",
                "Dusty Springfield - In Memphis",
            ]
        );

        let spooner = stat(&stats, "Spooner Oldham");
        // self-credit on Pot Luck is not session work
        assert_eq!(spooner.as_session_musician, 3);
        assert_eq!(spooner.as_main_artist, 1);
        assert_eq!(spooner.session_ratio, 0.75);
        assert_eq!(spooner.category, MusicianCategory::Balanced);
        assert_eq!(spooner.records.len(), 3);
        assert_eq!(spooner.records[2], "Spooner Oldham - Pot Luck");
    }

    #[test]
    fn stats_are_ordered_by_total_records() {
        let catalog = catalog();
        let stats = musician_stats(&catalog, &RelationTable::extract(&catalog));
        let names: Vec<&str> = stats.iter().map(|s| s.musician.as_str()).collect();
        assert_eq!(names, vec!["Tommy Cogbill", "Spooner Oldham"]);
    }

    #[test]
    fn zero_records_yield_zero_ratio() {
        let stat = MusicianStat::new("Nobody", 0, 0);
        assert_eq!(stat.session_ratio, 0.0);
        assert_eq!(stat.category, MusicianCategory::Unclassified);
    }

    #[test]
    fn classification_covers_all_combinations() {
        assert_eq!(MusicianCategory::classify(0, 3), MusicianCategory::PureSession);
        assert_eq!(MusicianCategory::classify(2, 3), MusicianCategory::Balanced);
        assert_eq!(MusicianCategory::classify(2, 0), MusicianCategory::PureMainArtist);
    }

    #[test]
    fn session_policy_applies_both_thresholds() {
        let stats = vec![
            MusicianStat::new("one-off", 0, 1),
            MusicianStat::new("regular", 0, 3),
            MusicianStat::new("mostly session", 1, 3),
            MusicianStat::new("headliner", 3, 1),
        ];
        let policy = SessionPolicy::default();
        let names: Vec<String> = session_musicians(&stats, &policy)
            .into_iter()
            .map(|s| s.musician)
            .collect();
        assert_eq!(names, vec!["regular", "mostly session"]);

        let strict = SessionPolicy {
            min_records: 4,
            min_ratio: 0.7,
        };
        assert_eq!(session_musicians(&stats, &strict).len(), 1);
    }

    #[test]
    fn top_and_search_respect_limits() {
        let stats = vec![
            MusicianStat::new("Carol Kaye", 0, 5),
            MusicianStat::new("Hal Blaine", 0, 4),
            MusicianStat::new("Glen Campbell", 2, 2),
        ];
        assert_eq!(top_musicians(&stats, 2).len(), 2);
        assert_eq!(top_musicians(&stats, 10).len(), 3);

        let hits = search_musicians(&stats, "  CA ", 10);
        assert_eq!(hits.len(), 2);
        assert_eq!(search_musicians(&stats, "a", 1).len(), 1);
        assert!(search_musicians(&stats, " ", 10).is_empty());
    }

    #[test]
    fn summary_picks_first_seen_on_ties() {
        let catalog = catalog();
        let summary = CollaborationSummary::from_relations(&RelationTable::extract(&catalog));
        assert_eq!(summary.total_connections, 8);
        assert_eq!(summary.unique_musicians, 2);
        assert_eq!(summary.unique_artists, 4);
        assert_eq!(summary.unique_albums, 4);
        assert_eq!(summary.unique_roles, 5);
        // Tommy and Spooner both have 4 relations; Tommy is credited first
        assert_eq!(summary.most_collaborative_musician.as_deref(), Some("Tommy Cogbill"));
        assert_eq!(summary.most_collaborative_artist.as_deref(), Some("Aretha Franklin"));
    }
}
