/// Column-name constants for the musician-network tables.
/// Single source of truth for the catalog input and the exported tables.

// ── Catalog columns (input) ─────────────────────────────────────────────────
pub mod catalog {
    pub const ARTIST: &str = "Artist";
    pub const ALBUM: &str = "Album";
    pub const MUSICIANS: &str = "Musicians";
    pub const GENRES: &str = "Genres";
    pub const STYLES: &str = "Styles";

    pub const REQUIRED: [&str; 2] = [ARTIST, ALBUM];

    /// Columns with a fixed meaning; anything else is an extra column.
    pub const KNOWN: [&str; 5] = [ARTIST, ALBUM, MUSICIANS, GENRES, STYLES];
}

// ── Relation table columns ──────────────────────────────────────────────────
pub mod relation {
    pub const MUSICIAN: &str = "musician";
    pub const ROLE: &str = "role";
    pub const MAIN_ARTIST: &str = "main_artist";
    pub const ALBUM: &str = "album";
}

// ── Triples export columns ──────────────────────────────────────────────────
pub mod triples {
    pub const SUBJECT: &str = "subject";
    pub const PREDICATE: &str = "predicate";
    pub const OBJECT: &str = "object";
}

// ── Node categories ─────────────────────────────────────────────────────────
pub mod category {
    pub const ARTIST: &str = "artist";
    pub const MUSICIAN: &str = "musician";
}
