//! beamfold - Cross-validation folds for entity alignment benchmarks
//!
//! Turns each dataset's `ent_links` file into reproducible
//! train/test/valid splits, one directory per fold.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`models`] - Folds, splits, ratios and link records
//! - [`layout`] - Input and output paths of a dataset
//! - [`splitter`] - Seeded shuffle and partition of a links file
//! - [`storage`] - Reading links files and atomic split writes
//! - [`verify`] - Checks written folds against their input
//! - [`run`] - Loop over every (dataset, fold) unit
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use beamfold::config::Config;
//! use beamfold::models::Fold;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let layout = config.layout("wdc_wd")?;
//!     let outcome = config.splitter()?.split_unit(&layout, Fold::new(1)?)?;
//!     println!("{}", outcome.sizes);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod models;
pub mod run;
pub mod splitter;
pub mod storage;
pub mod utils;
pub mod verify;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, FoldErrorTrait, Result};
    pub use crate::layout::DatasetLayout;
    pub use crate::models::{Fold, FoldPartition, LinkCollection, LinkRecord, SplitKind, SplitRatios, SplitSizes};
    pub use crate::splitter::{EmptyInputPolicy, FoldSplitter, UnitOutcome};
    pub use crate::verify::{FoldReport, Violation};
}

// Direct re-exports for convenience
pub use models::{Fold, SplitKind, SplitRatios};
