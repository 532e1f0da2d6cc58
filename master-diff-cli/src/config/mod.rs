//! Run configuration
//!
//! Settings come from a TOML file, with every field optional. Lookup order:
//! an explicit `--config` path, then `<config dir>/master-diff/config.toml`,
//! then built-in defaults. The sheet/key table is compiled in (see [`sheets`]).

pub mod sheets;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::diff::Side;
use crate::diff::header::DEFAULT_HEADER_LOOKAHEAD;

const APP_DIR: &str = "master-diff";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Rows scanned when looking for a sheet's header row
    pub header_lookahead: usize,
    /// File whose row order the output follows
    pub reference: Side,
    pub output: OutputConfig,
    pub report: ReportConfig,
}

/// Presentation of the side-by-side workbook
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Fill A-only, B-only and changed cells
    pub highlight: bool,
    pub freeze_header: bool,
    pub autofilter: bool,
    pub min_column_width: f64,
    pub max_column_width: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Rows listed per section of the Markdown report
    pub detail_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            header_lookahead: DEFAULT_HEADER_LOOKAHEAD,
            reference: Side::B,
            output: OutputConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            highlight: true,
            freeze_header: true,
            autofilter: true,
            min_column_width: 12.0,
            max_column_width: 75.0,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { detail_limit: 10 }
    }
}

impl Config {
    /// Load configuration, falling back to defaults when no file exists
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file does not exist: {}", path.display());
                }
                path.to_path_buf()
            }
            None => match default_path().filter(|p| p.exists()) {
                Some(path) => path,
                None => {
                    log::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.header_lookahead == 0 {
            bail!("header_lookahead must be at least 1");
        }
        if self.output.min_column_width <= 0.0 {
            bail!("output.min_column_width must be positive");
        }
        if self.output.min_column_width > self.output.max_column_width {
            bail!(
                "output.min_column_width ({}) exceeds output.max_column_width ({})",
                self.output.min_column_width,
                self.output.max_column_width
            );
        }
        Ok(())
    }
}

/// `<config dir>/master-diff/config.toml`, if the platform has a config dir
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.header_lookahead, 15);
        assert_eq!(config.reference, Side::B);
        assert!(config.output.highlight);
        assert_eq!(config.report.detail_limit, 10);
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_toml_str(
            r#"
            header_lookahead = 20
            reference = "first"

            [output]
            highlight = false
            max_column_width = 40
            "#,
        )
        .unwrap();

        assert_eq!(config.header_lookahead, 20);
        assert_eq!(config.reference, Side::A);
        assert!(!config.output.highlight);
        assert!(config.output.freeze_header);
        assert_eq!(config.output.max_column_width, 40.0);
        assert_eq!(config.output.min_column_width, 12.0);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(Config::from_toml_str("colour = \"red\"").is_err());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(Config::from_toml_str("header_lookahead = 0").is_err());
        let err = Config::from_toml_str("[output]\nmin_column_width = 80").unwrap_err();
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/master-diff.toml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
