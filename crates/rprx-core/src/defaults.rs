//! Estimator defaults table
//!
//! Every fallback constant used by the leak estimator and the impact parser
//! lives here. Values are loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/rprx/config/defaults.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! An override file only needs the keys it changes.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::ImpactRange;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/defaults.toml");

/// Fallback values for the estimator and the impact parser
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorDefaults {
    /// Range for a plan with missing or malformed impact
    pub default_impact: ImpactRange,
    /// Number of entries in the top leaks ranking
    pub top_leak_count: usize,
    /// Range for an impact description with nothing recognizable
    pub parse_fallback: ImpactRange,
    pub thousands: ImpactRange,
    pub hundreds: ImpactRange,
    pub single_low_factor: f64,
    pub single_high_factor: f64,
    pub months_per_year: f64,
}

impl Default for EstimatorDefaults {
    fn default() -> Self {
        Self {
            default_impact: ImpactRange::new(500.0, 2000.0),
            top_leak_count: 5,
            parse_fallback: ImpactRange::new(250.0, 1000.0),
            thousands: ImpactRange::new(1000.0, 5000.0),
            hundreds: ImpactRange::new(200.0, 800.0),
            single_low_factor: 0.5,
            single_high_factor: 2.0,
            months_per_year: 12.0,
        }
    }
}

impl EstimatorDefaults {
    /// Load defaults, preferring `override_path`, then the data dir override,
    /// then the embedded table
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let content = match override_path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                read_config(path)?
            }
            None => match default_config_path() {
                Some(path) if path.exists() => read_config(&path)?,
                _ => DEFAULT_CONFIG.to_string(),
            },
        };

        Self::from_toml(&content)
    }

    /// Parse a defaults table, starting from the built-in values
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid defaults TOML: {}", e)))?;

        let mut config = Self::default();

        if let Some(estimator) = raw.estimator {
            if let Some(range) = estimator.default_impact {
                config.default_impact = range.into_range("estimator.default_impact")?;
            }
            if let Some(count) = estimator.top_leak_count {
                config.top_leak_count = count;
            }
        }

        if let Some(parser) = raw.parser {
            if let Some(range) = parser.fallback {
                config.parse_fallback = range.into_range("parser.fallback")?;
            }
            if let Some(range) = parser.thousands {
                config.thousands = range.into_range("parser.thousands")?;
            }
            if let Some(range) = parser.hundreds {
                config.hundreds = range.into_range("parser.hundreds")?;
            }
            if let Some(factor) = parser.single_low_factor {
                config.single_low_factor = positive("parser.single_low_factor", factor)?;
            }
            if let Some(factor) = parser.single_high_factor {
                config.single_high_factor = positive("parser.single_high_factor", factor)?;
            }
            if let Some(months) = parser.months_per_year {
                config.months_per_year = positive("parser.months_per_year", months)?;
            }
        }

        if config.single_low_factor > config.single_high_factor {
            return Err(Error::Config(
                "parser.single_low_factor must not exceed parser.single_high_factor".to_string(),
            ));
        }

        Ok(config)
    }

    /// The embedded table, for callers that never read override files
    pub fn embedded() -> Result<Self> {
        Self::from_toml(DEFAULT_CONFIG)
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("rprx").join("config").join("defaults.toml"))
}

fn read_config(path: &Path) -> Result<String> {
    debug!("Loading estimator defaults from {}", path.display());
    fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))
}

fn positive(key: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::Config(format!("{} must be positive, got {}", key, value)))
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    estimator: Option<RawEstimator>,
    parser: Option<RawParser>,
}

#[derive(Debug, Deserialize)]
struct RawEstimator {
    default_impact: Option<RawRange>,
    top_leak_count: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawParser {
    fallback: Option<RawRange>,
    thousands: Option<RawRange>,
    hundreds: Option<RawRange>,
    single_low_factor: Option<f64>,
    single_high_factor: Option<f64>,
    months_per_year: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawRange {
    low: f64,
    high: f64,
}

impl RawRange {
    fn into_range(self, key: &str) -> Result<ImpactRange> {
        let range = ImpactRange::new(self.low, self.high);
        if range.is_valid() {
            Ok(range)
        } else {
            Err(Error::Config(format!(
                "{} must satisfy 0 <= low <= high, got {{low: {}, high: {}}}",
                key, self.low, self.high
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_matches_builtin() {
        let config = EstimatorDefaults::embedded().unwrap();
        assert_eq!(config, EstimatorDefaults::default());
        assert_eq!(config.default_impact, ImpactRange::new(500.0, 2000.0));
        assert_eq!(config.parse_fallback, ImpactRange::new(250.0, 1000.0));
        assert_eq!(config.top_leak_count, 5);
    }

    #[test]
    fn test_partial_override() {
        let config = EstimatorDefaults::from_toml(
            r#"
            [estimator]
            top_leak_count = 3

            [parser]
            months_per_year = 12.5
            "#,
        )
        .unwrap();

        assert_eq!(config.top_leak_count, 3);
        assert_eq!(config.months_per_year, 12.5);
        assert_eq!(config.default_impact, ImpactRange::new(500.0, 2000.0));
        assert_eq!(config.thousands, ImpactRange::new(1000.0, 5000.0));
    }

    #[test]
    fn test_empty_config_keeps_builtin() {
        let config = EstimatorDefaults::from_toml("").unwrap();
        assert_eq!(config, EstimatorDefaults::default());
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = EstimatorDefaults::from_toml(
            r#"
            [estimator]
            default_impact = { low = 900, high = 100 }
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("estimator.default_impact"));
    }

    #[test]
    fn test_rejects_non_positive_factor() {
        let err = EstimatorDefaults::from_toml(
            r#"
            [parser]
            months_per_year = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rejects_bad_toml() {
        assert!(matches!(
            EstimatorDefaults::from_toml("[estimator"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[estimator]\ndefault_impact = {{ low = 100, high = 300 }}").unwrap();

        let config = EstimatorDefaults::load(Some(file.path())).unwrap();
        assert_eq!(config.default_impact, ImpactRange::new(100.0, 300.0));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            EstimatorDefaults::load(Some(&missing)),
            Err(Error::Config(_))
        ));
    }
}
