//! Configuration management for beamfold
//!
//! Settings come from, in increasing priority: built-in defaults, a TOML
//! file, `BEAMFOLD_*` environment variables and command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::layout::{DatasetLayout, DEFAULT_INPUT_NAME};
use crate::models::{SplitRatios, DEFAULT_FOLD_COUNT, DEFAULT_TEST_RATIO, DEFAULT_TRAIN_RATIO};
use crate::splitter::{EmptyInputPolicy, FoldSplitter};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset locations
    pub paths: PathsConfig,

    /// Fold generation settings
    pub folds: FoldsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Dataset locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory containing one subdirectory per dataset
    pub root: PathBuf,

    /// Links file name inside each dataset directory
    pub input_name: String,

    /// Datasets processed by `run` when none are given on the command line
    pub datasets: Vec<String>,
}

/// Fold generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FoldsConfig {
    /// Number of folds per dataset, numbered from 1
    pub count: u32,

    /// Train fraction
    pub train_ratio: f64,

    /// Test fraction; valid takes the remainder
    pub test_ratio: f64,

    /// Fail on inputs without records instead of writing empty splits
    pub reject_empty_input: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            input_name: String::from(DEFAULT_INPUT_NAME),
            datasets: Vec::new(),
        }
    }
}

impl Default for FoldsConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_FOLD_COUNT,
            train_ratio: DEFAULT_TRAIN_RATIO,
            test_ratio: DEFAULT_TEST_RATIO,
            reject_empty_input: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from `path` if given, apply the environment and validate
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override settings from `BEAMFOLD_*` variables
    ///
    /// `lookup` returns the value of a variable, if set.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup("BEAMFOLD_ROOT") {
            self.paths.root = PathBuf::from(root);
        }

        if let Some(name) = lookup("BEAMFOLD_INPUT_NAME") {
            self.paths.input_name = name;
        }

        if let Some(datasets) = lookup("BEAMFOLD_DATASETS") {
            self.paths.datasets = datasets
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(count) = lookup("BEAMFOLD_FOLD_COUNT") {
            self.folds.count = count
                .parse()
                .with_context(|| format!("BEAMFOLD_FOLD_COUNT is not a number: {count}"))?;
        }

        if let Some(level) = lookup("BEAMFOLD_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Some(format) = lookup("BEAMFOLD_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.folds.count == 0 {
            anyhow::bail!("folds.count must be greater than 0");
        }

        if self.paths.input_name.trim().is_empty() {
            anyhow::bail!("paths.input_name must not be empty");
        }

        self.ratios()?;

        if !matches!(
            self.logging.level.as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            anyhow::bail!(
                "logging.level must be one of trace, debug, info, warn, error, got '{}'",
                self.logging.level
            );
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!(
                "logging.format must be 'text' or 'json', got '{}'",
                self.logging.format
            );
        }

        Ok(())
    }

    /// Validated split ratios
    pub fn ratios(&self) -> Result<SplitRatios> {
        SplitRatios::new(self.folds.train_ratio, self.folds.test_ratio)
            .map_err(|err| anyhow::anyhow!("{err}"))
    }

    /// Splitter configured from the fold settings
    pub fn splitter(&self) -> Result<FoldSplitter> {
        let policy = if self.folds.reject_empty_input {
            EmptyInputPolicy::Reject
        } else {
            EmptyInputPolicy::WriteEmpty
        };
        Ok(FoldSplitter::new(self.ratios()?).with_empty_input(policy))
    }

    /// Layout of one dataset under the configured root
    pub fn layout(&self, dataset: &str) -> crate::error::Result<DatasetLayout> {
        DatasetLayout::new(&self.paths.root, dataset, &self.paths.input_name)
    }
}
