//! Parsing of the free-text `Musicians` field.
//!
//! The field is a `;`-separated list of credits shaped like
//! `Name[ (N)] (role1, role2, ...)`, where the optional `(N)` is a
//! numeric disambiguator that becomes part of the musician's name.

use std::sync::LazyLock;

use regex::Regex;

/// `Name`, optional numeric disambiguator, trailing roles group.
static ENTRY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^(]+?)(?:\s*\((\d+)\))?\s*\(([^)]+)\)$").expect("valid entry pattern")
});

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\[.*?\]").expect("valid bracket pattern"));

static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(.*?\)").expect("valid parenthesis pattern"));

/// Outcome of parsing one `;`-separated credit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryParse {
    Parsed { musician: String, roles: Vec<String> },
    /// The entry did not have the expected shape; it contributes nothing.
    Skipped { entry: String },
}

impl EntryParse {
    /// One credit per role, all for `main_artist`. Skipped entries yield none.
    pub fn into_credits(self, main_artist: &str) -> Vec<Credit> {
        match self {
            EntryParse::Parsed { musician, roles } => roles
                .into_iter()
                .map(|role| Credit {
                    musician: musician.clone(),
                    role,
                    main_artist: main_artist.to_string(),
                })
                .collect(),
            EntryParse::Skipped { .. } => Vec::new(),
        }
    }
}

/// One credited (musician, role) pair for a given main artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credit {
    pub musician: String,
    pub role: String,
    pub main_artist: String,
}

/// Parse a single trimmed, non-empty entry.
pub fn parse_entry(entry: &str) -> EntryParse {
    let Some(caps) = ENTRY_PATTERN.captures(entry) else {
        return EntryParse::Skipped {
            entry: entry.to_string(),
        };
    };

    let name = caps[1].trim();
    let musician = match caps.get(2) {
        Some(number) => format!("{name} ({})", number.as_str()),
        None => name.to_string(),
    };
    let roles = caps[3]
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect();

    EntryParse::Parsed { musician, roles }
}

/// Split a raw field on `;` and parse every non-empty entry.
pub fn parse_entries(raw: Option<&str>) -> Vec<EntryParse> {
    raw.unwrap_or("")
        .split(';')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(parse_entry)
        .collect()
}

/// Credits for one record: one per (musician, role), in entry then role order.
/// Malformed entries are dropped.
pub fn parse_musicians(raw: Option<&str>, main_artist: &str) -> Vec<Credit> {
    parse_entries(raw)
        .into_iter()
        .flat_map(|parsed| parsed.into_credits(main_artist))
        .collect()
}

/// Strip `[...]` and `(...)` annotations so equivalent roles group together.
pub fn clean_role_name(role: &str) -> String {
    let without_brackets = BRACKETED.replace_all(role, "");
    let cleaned = PARENTHESIZED.replace_all(&without_brackets, "");
    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credit(musician: &str, role: &str, main_artist: &str) -> Credit {
        Credit {
            musician: musician.into(),
            role: role.into(),
            main_artist: main_artist.into(),
        }
    }

    #[test]
    fn parses_roles_and_disambiguator() {
        let credits = parse_musicians(Some("Art Tatum (piano, vocals); John Doe (2) (bass)"), "X");
        assert_eq!(
            credits,
            vec![
                credit("Art Tatum", "piano", "X"),
                credit("Art Tatum", "vocals", "X"),
                credit("John Doe (2)", "bass", "X"),
            ]
        );
    }

    #[test]
    fn absent_or_blank_field_yields_nothing() {
        assert!(parse_musicians(None, "X").is_empty());
        assert!(parse_musicians(Some(""), "X").is_empty());
        assert!(parse_musicians(Some(" ; ;"), "X").is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let entries = parse_entries(Some("No Roles Here; Paul Chambers (bass)"));
        assert_eq!(
            entries,
            vec![
                EntryParse::Skipped {
                    entry: "No Roles Here".into()
                },
                EntryParse::Parsed {
                    musician: "Paul Chambers".into(),
                    roles: vec!["bass".into()],
                },
            ]
        );

        let credits = parse_musicians(Some("No Roles Here; Paul Chambers (bass)"), "Miles");
        assert_eq!(credits, vec![credit("Paul Chambers", "bass", "Miles")]);
    }

    #[test]
    fn empty_roles_are_dropped() {
        let credits = parse_musicians(Some("Jimmy Cobb (drums, , )"), "Miles");
        assert_eq!(credits, vec![credit("Jimmy Cobb", "drums", "Miles")]);
    }

    #[test]
    fn nested_role_annotations_do_not_match() {
        // the roles group cannot itself contain parentheses
        let entries = parse_entries(Some("Jane Roe (vocals (backing))"));
        assert!(matches!(entries[0], EntryParse::Skipped { .. }));
    }

    #[test]
    fn bracketed_role_annotations_survive_parsing() {
        let credits = parse_musicians(Some("Ann Lee (Vocals [uncredited], Guitar)"), "Band");
        assert_eq!(
            credits,
            vec![
                credit("Ann Lee", "Vocals [uncredited]", "Band"),
                credit("Ann Lee", "Guitar", "Band"),
            ]
        );
    }

    #[test]
    fn cleans_role_annotations() {
        assert_eq!(clean_role_name("Vocals [uncredited]"), "Vocals");
        assert_eq!(clean_role_name("Guitar (solo)"), "Guitar");
        assert_eq!(clean_role_name("  Bass [fretless] (tracks 1-3) "), "Bass");
        assert_eq!(clean_role_name("Drums"), "Drums");
    }
}
