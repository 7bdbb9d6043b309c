use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::NetworkError;

// ── Config ──────────────────────────────────────────────────────────────────

/// Tunables for one analysis run. Every field has a default, so a TOML file
/// only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub session: SessionPolicy,
    pub artist_size: SymbolSizeScale,
    pub musician_size: SymbolSizeScale,
    /// Rows shown in the "top musicians" view
    pub top_musicians_limit: usize,
    /// Rows shown by the musician search box
    pub search_results_limit: usize,
    /// Extra catalog columns exposed as custom facets. Empty = all extra columns.
    pub custom_columns: Vec<String>,
    pub colors: CategoryColors,
    pub output: OutputPaths,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            session: SessionPolicy::default(),
            artist_size: SymbolSizeScale::ARTIST,
            musician_size: SymbolSizeScale::MUSICIAN,
            top_musicians_limit: 20,
            search_results_limit: 10,
            custom_columns: Vec::new(),
            colors: CategoryColors::default(),
            output: OutputPaths::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load a config from a TOML file and validate it.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NetworkError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, NetworkError> {
        let config: AnalysisConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), NetworkError> {
        if !(0.0..=1.0).contains(&self.session.min_ratio) {
            return Err(NetworkError::Config(format!(
                "session.min_ratio must be within [0, 1], got {}",
                self.session.min_ratio
            )));
        }
        for (name, scale) in [
            ("artist_size", &self.artist_size),
            ("musician_size", &self.musician_size),
        ] {
            if ![scale.base, scale.slope, scale.min, scale.max]
                .iter()
                .all(|v| v.is_finite())
            {
                return Err(NetworkError::Config(format!(
                    "{name}: base, slope, min and max must be finite"
                )));
            }
            if scale.slope < 0.0 {
                return Err(NetworkError::Config(format!(
                    "{name}: slope must not be negative, got {}",
                    scale.slope
                )));
            }
            if scale.min > scale.max {
                return Err(NetworkError::Config(format!(
                    "{name}: min ({}) is greater than max ({})",
                    scale.min, scale.max
                )));
            }
        }
        Ok(())
    }
}

// ── Session-musician policy ─────────────────────────────────────────────────

/// Thresholds a musician must meet to count as a session musician.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionPolicy {
    pub min_records: usize,
    pub min_ratio: f64,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            min_records: 2,
            min_ratio: 0.7,
        }
    }
}

// ── Symbol sizing ───────────────────────────────────────────────────────────

/// Linear degree → symbol-size mapping, clamped to `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SymbolSizeScale {
    pub base: f64,
    pub slope: f64,
    pub min: f64,
    pub max: f64,
}

impl SymbolSizeScale {
    pub const ARTIST: SymbolSizeScale = SymbolSizeScale {
        base: 12.0,
        slope: 1.5,
        min: 12.0,
        max: 35.0,
    };

    pub const MUSICIAN: SymbolSizeScale = SymbolSizeScale {
        base: 8.0,
        slope: 2.0,
        min: 8.0,
        max: 25.0,
    };

    pub fn size(&self, degree: usize) -> f64 {
        let raw = self.base + degree as f64 * self.slope;
        // Not f64::clamp: that panics when min > max.
        raw.max(self.min).min(self.max)
    }
}

// ── Presentation ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoryColors {
    pub artist: String,
    pub musician: String,
}

impl Default for CategoryColors {
    fn default() -> Self {
        Self {
            artist: "#1f77b4".to_string(),
            musician: "#ff7f0e".to_string(),
        }
    }
}

/// File names used when intermediate tables are saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputPaths {
    pub network_csv: String,
    pub triples_csv: String,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            network_csv: "musician_network.csv".to_string(),
            triples_csv: "musician_graph_triples.csv".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artist_size_saturates_at_max() {
        let scale = SymbolSizeScale::ARTIST;
        assert_eq!(scale.size(0), 12.0);
        assert_eq!(scale.size(4), 18.0);
        assert_eq!(scale.size(100), 35.0);
    }

    #[test]
    fn musician_size_is_monotonic() {
        let scale = SymbolSizeScale::MUSICIAN;
        let sizes: Vec<f64> = (0..20).map(|d| scale.size(d)).collect();
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(sizes[0], 8.0);
        assert_eq!(sizes[19], 25.0);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = AnalysisConfig::from_toml_str(
            r#"
            custom_columns = ["Label"]

            [session]
            min_records = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.session.min_records, 3);
        assert_eq!(config.session.min_ratio, 0.7);
        assert_eq!(config.artist_size, SymbolSizeScale::ARTIST);
        assert_eq!(config.custom_columns, vec!["Label".to_string()]);
    }

    #[test]
    fn rejects_out_of_range_ratio() {
        let err = AnalysisConfig::from_toml_str("[session]\nmin_ratio = 1.5\n").unwrap_err();
        assert!(matches!(err, NetworkError::Config(_)));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(AnalysisConfig::from_toml_str("colour = \"red\"\n").is_err());
    }

    #[test]
    fn rejects_negative_slope() {
        let err = AnalysisConfig::from_toml_str(
            "[musician_size]\nbase = 25.0\nslope = -2.0\nmin = 8.0\nmax = 25.0\n",
        )
        .unwrap_err();
        assert!(matches!(err, NetworkError::Config(msg) if msg.contains("slope")));
    }

    #[test]
    fn rejects_non_finite_scale() {
        let err = AnalysisConfig::from_toml_str(
            "[artist_size]\nbase = 12.0\nslope = 1.5\nmin = 12.0\nmax = inf\n",
        )
        .unwrap_err();
        assert!(matches!(err, NetworkError::Config(_)));
        assert!(AnalysisConfig::from_toml_str(
            "[artist_size]\nbase = nan\nslope = 1.5\nmin = 12.0\nmax = 35.0\n"
        )
        .is_err());
    }
}
