//! Configuration loading for the explorer.
//! Reads explorer.toml from the current directory or the path in the
//! CORD_EXPLORER_CONFIG env var; every field has a default.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::data::filter::YearRange;
use crate::data::loader::DEFAULT_MAX_ROWS;
use crate::data::summary::SummaryOptions;

pub const CONFIG_ENV: &str = "CORD_EXPLORER_CONFIG";
pub const CONFIG_FILE: &str = "explorer.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub years: YearsConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_source")]
    pub source: PathBuf,
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

fn default_source() -> PathBuf { PathBuf::from("metadata.csv") }
fn default_max_rows() -> usize { DEFAULT_MAX_ROWS }

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            max_rows: default_max_rows(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_sample_rows")]
    pub sample_rows: usize,
    #[serde(default = "default_top_journals")]
    pub top_journals: usize,
    #[serde(default = "default_title_cloud_words")]
    pub title_cloud_words: usize,
}

fn default_sample_rows() -> usize { 5 }
fn default_top_journals() -> usize { 10 }
fn default_title_cloud_words() -> usize { 80 }

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sample_rows: default_sample_rows(),
            top_journals: default_top_journals(),
            title_cloud_words: default_title_cloud_words(),
        }
    }
}

/// Slider bounds and the range selected at startup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct YearsConfig {
    #[serde(default = "default_min_year")]
    pub min: i32,
    #[serde(default = "default_max_year")]
    pub max: i32,
    #[serde(default = "default_lo")]
    pub default_lo: i32,
    #[serde(default = "default_hi")]
    pub default_hi: i32,
}

fn default_min_year() -> i32 { 2019 }
fn default_max_year() -> i32 { 2022 }
fn default_lo()       -> i32 { 2020 }
fn default_hi()       -> i32 { 2021 }

impl Default for YearsConfig {
    fn default() -> Self {
        Self {
            min: default_min_year(),
            max: default_max_year(),
            default_lo: default_lo(),
            default_hi: default_hi(),
        }
    }
}

impl Config {
    /// Load from `$CORD_EXPLORER_CONFIG`, else `./explorer.toml`, else defaults.
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }
        log::debug!("no {CONFIG_FILE} found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("in config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).context("parsing TOML")?;
        config.validate()
    }

    /// Reject unusable values and pull the startup range inside the bounds.
    pub fn validate(mut self) -> Result<Self> {
        if self.data.max_rows == 0 {
            bail!("data.max_rows must be at least 1");
        }
        if self.years.min > self.years.max {
            bail!(
                "years.min ({}) is greater than years.max ({})",
                self.years.min,
                self.years.max
            );
        }
        let range = self.default_range();
        self.years.default_lo = range.lo();
        self.years.default_hi = range.hi();
        Ok(self)
    }

    pub fn year_bounds(&self) -> YearRange {
        YearRange::new(self.years.min, self.years.max)
    }

    /// Startup selection, clamped to the slider bounds.
    pub fn default_range(&self) -> YearRange {
        YearRange::new(self.years.default_lo, self.years.default_hi).clamp_to(self.year_bounds())
    }

    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            sample_rows: self.dashboard.sample_rows,
            top_journals: self.dashboard.top_journals,
        }
    }
}
