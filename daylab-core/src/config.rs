//! Scan configuration loaded from TOML.
//!
//! ```toml
//! [scan]
//! symbol = "^NSEI"
//! years = 2
//! label = "name"        # or "ordinal"
//! as_of = "2024-03-01"  # optional, defaults to today
//! csv = "nsei.csv"      # optional, read from CSV instead of Yahoo
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calendar::{LabelStyle, ObservationWindow, WeekdayAnnotator, WindowCalculator};

pub const DEFAULT_SYMBOL: &str = "^NSEI";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid symbol '{0}'")]
    InvalidSymbol(String),
    #[error("years must be at least 1, got {0}")]
    InvalidYears(u32),
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub scan: ScanSection,
}

/// The `[scan]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanSection {
    pub symbol: String,
    pub years: u32,
    pub label: LabelStyle,
    pub as_of: Option<NaiveDate>,
    pub csv: Option<PathBuf>,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            years: WindowCalculator::DEFAULT_YEARS,
            label: LabelStyle::default(),
            as_of: None,
            csv: None,
        }
    }
}

/// Command-line values that take precedence over the config file.
///
/// `None` leaves the file (or default) value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOverrides {
    pub symbol: Option<String>,
    pub years: Option<u32>,
    pub as_of: Option<NaiveDate>,
    pub label: Option<LabelStyle>,
    pub csv: Option<PathBuf>,
}

impl ScanConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::read_file(path)?.validated()
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Self::parse_toml(content)?.validated()
    }

    /// Config file (or defaults) with `overrides` applied on top, validated
    /// once after the merge.
    pub fn resolve(path: Option<&Path>, overrides: ScanOverrides) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::read_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(overrides)
    }

    /// Replace every field `overrides` sets, then validate the result.
    pub fn apply_overrides(mut self, overrides: ScanOverrides) -> Result<Self, ConfigError> {
        if let Some(symbol) = overrides.symbol {
            self.scan.symbol = symbol;
        }
        if let Some(years) = overrides.years {
            self.scan.years = years;
        }
        if let Some(as_of) = overrides.as_of {
            self.scan.as_of = Some(as_of);
        }
        if let Some(label) = overrides.label {
            self.scan.label = label;
        }
        if let Some(csv) = overrides.csv {
            self.scan.csv = Some(csv);
        }
        self.validated()
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_toml(&content)
    }

    fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let symbol = self.scan.symbol.trim();
        if symbol.is_empty() || symbol.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidSymbol(self.scan.symbol.clone()));
        }
        if self.scan.years == 0 {
            return Err(ConfigError::InvalidYears(self.scan.years));
        }
        Ok(())
    }

    pub fn window_calculator(&self) -> WindowCalculator {
        WindowCalculator::new(self.scan.years)
    }

    /// Window ending at `as_of`, or at today when unset.
    pub fn window(&self) -> ObservationWindow {
        let calculator = self.window_calculator();
        match self.scan.as_of {
            Some(as_of) => calculator.window_ending(as_of),
            None => calculator.window_ending_today(),
        }
    }

    pub fn annotator(&self) -> WeekdayAnnotator {
        WeekdayAnnotator::new(self.scan.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = ScanConfig::from_toml("").unwrap();
        assert_eq!(config, ScanConfig::default());
        assert_eq!(config.scan.symbol, "^NSEI");
        assert_eq!(config.scan.years, 2);
        assert_eq!(config.scan.label, LabelStyle::Name);
    }

    #[test]
    fn full_scan_table_parses() {
        let config = ScanConfig::from_toml(
            r#"
[scan]
symbol = "^GSPC"
years = 3
label = "ordinal"
as_of = "2024-03-01"
csv = "data/gspc.csv"
"#,
        )
        .unwrap();
        assert_eq!(config.scan.symbol, "^GSPC");
        assert_eq!(config.scan.years, 3);
        assert_eq!(config.scan.label, LabelStyle::Ordinal);
        assert_eq!(config.scan.as_of, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(config.scan.csv, Some(PathBuf::from("data/gspc.csv")));
        assert_eq!(config.window_calculator().years(), 3);
        assert_eq!(config.annotator().style(), LabelStyle::Ordinal);
        assert_eq!(
            config.window().start,
            NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()
        );
    }

    #[test]
    fn zero_years_is_rejected() {
        let err = ScanConfig::from_toml("[scan]\nyears = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYears(0)));
    }

    #[test]
    fn blank_symbol_is_rejected() {
        let err = ScanConfig::from_toml("[scan]\nsymbol = \"  \"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSymbol(_)));
    }

    #[test]
    fn unknown_label_is_a_parse_error() {
        let err = ScanConfig::from_toml("[scan]\nlabel = \"dow\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_key_is_a_parse_error() {
        let err = ScanConfig::from_toml("[scan]\ninterval = \"1wk\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    fn file_config() -> ScanConfig {
        ScanConfig::from_toml("[scan]\nsymbol = \"^GSPC\"\nyears = 3\nlabel = \"ordinal\"\n")
            .unwrap()
    }

    #[test]
    fn flags_override_file_values() {
        let config = file_config()
            .apply_overrides(ScanOverrides {
                symbol: Some("^NSEI".into()),
                years: Some(5),
                label: Some(LabelStyle::Name),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(config.scan.symbol, "^NSEI");
        assert_eq!(config.scan.years, 5);
        assert_eq!(config.scan.label, LabelStyle::Name);
    }

    #[test]
    fn unset_flags_keep_file_values() {
        let config = file_config()
            .apply_overrides(ScanOverrides {
                as_of: NaiveDate::from_ymd_opt(2024, 3, 1),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(config.scan.symbol, "^GSPC");
        assert_eq!(config.scan.years, 3);
        assert_eq!(config.scan.label, LabelStyle::Ordinal);
        assert_eq!(config.scan.as_of, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(config.scan.csv, None);
    }

    #[test]
    fn overrides_are_validated_after_merge() {
        let err = file_config()
            .apply_overrides(ScanOverrides {
                years: Some(0),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYears(0)));

        let err = file_config()
            .apply_overrides(ScanOverrides {
                symbol: Some(String::new()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSymbol(_)));
    }

    #[test]
    fn flag_can_repair_an_invalid_file_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("daylab.toml");
        std::fs::write(&path, "[scan]\nyears = 0\n").unwrap();

        assert!(ScanConfig::from_file(&path).is_err());
        let config = ScanConfig::resolve(
            Some(&path),
            ScanOverrides {
                years: Some(2),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(config.scan.years, 2);
    }

    #[test]
    fn resolve_without_file_uses_defaults() {
        let config = ScanConfig::resolve(None, ScanOverrides::default()).unwrap();
        assert_eq!(config, ScanConfig::default());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ScanConfig::from_file(Path::new("/nonexistent/daylab.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
