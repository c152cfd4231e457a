//! Unified error handling for the beamfold crate
//!
//! Every fallible operation in the library returns [`Result`]. Errors that
//! belong to a single (dataset, fold) unit carry enough context to be
//! diagnosed without a retry: the dataset name, the fold and the path that
//! failed.
//!
//! # Architecture
//!
//! - [`FoldErrorTrait`] - Common interface used by the orchestration loop
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum
//!
//! # Usage
//!
//! ```rust,ignore
//! use beamfold::error::{Error, FoldErrorTrait};
//!
//! fn handle_error(err: Error) {
//!     if err.is_recoverable() {
//!         eprintln!("Skipping unit: {err}");
//!     } else {
//!         eprintln!("Fatal error: {err}");
//!     }
//! }
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::Fold;
use crate::storage::StorageError;

/// Process exit status for a successful run
pub const EXIT_SUCCESS: u8 = 0;

/// Process exit status for errors without a dedicated code
pub const EXIT_FAILURE: u8 = 1;

/// Process exit status when the input artifact is missing, unreadable or rejected as empty
pub const EXIT_MISSING_INPUT: u8 = 2;

/// Process exit status when an output directory or split file cannot be written
pub const EXIT_OUTPUT_WRITE: u8 = 3;

/// Process exit status when a written fold fails verification
pub const EXIT_VERIFICATION: u8 = 4;

/// Common trait for beamfold error types
pub trait FoldErrorTrait: std::error::Error {
    /// Whether the orchestration loop may move on to the next unit
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// Input artifact missing, unreadable or empty
    Input,
    /// Output directory or file could not be written
    Output,
    /// Written fold does not match its input
    Verification,
    /// Configuration and argument validation errors
    Config,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Short human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Input => "input error",
            Self::Output => "output error",
            Self::Verification => "verification error",
            Self::Config => "configuration error",
            Self::Other => "other error",
        }
    }
}

/// Unified error type for the beamfold crate
#[derive(Error, Debug)]
pub enum Error {
    /// Input artifact is absent or unreadable
    #[error("Missing input for dataset '{dataset}' fold {fold}: {}: {source}", .path.display())]
    MissingInput {
        dataset: String,
        fold: Fold,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Input artifact holds no records and empty inputs are rejected
    #[error("Empty input for dataset '{dataset}' fold {fold}: {}", .path.display())]
    EmptyInput {
        dataset: String,
        fold: Fold,
        path: PathBuf,
    },

    /// Output directory or split file could not be created or written
    #[error("Failed to write output for dataset '{dataset}' fold {fold}: {}: {source}", .path.display())]
    OutputWrite {
        dataset: String,
        fold: Fold,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A written fold violates the partition laws
    #[error("Fold {fold} of dataset '{dataset}' failed verification with {violations} violation(s)")]
    VerificationFailed {
        dataset: String,
        fold: Fold,
        violations: usize,
    },

    /// Fold identifiers start at 1
    #[error("Invalid fold '{0}': folds are positive integers")]
    InvalidFold(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// I/O errors outside of a unit's input/output paths
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FoldErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::MissingInput { .. }
            | Self::EmptyInput { .. }
            | Self::OutputWrite { .. }
            | Self::VerificationFailed { .. } => true,
            Self::InvalidFold(_) | Self::Config(_) => false,
            Self::Io(_) | Self::Json(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingInput { .. } | Self::EmptyInput { .. } => ErrorCategory::Input,
            Self::OutputWrite { .. } => ErrorCategory::Output,
            Self::VerificationFailed { .. } => ErrorCategory::Verification,
            Self::InvalidFold(_) | Self::Config(_) => ErrorCategory::Config,
            Self::Io(_) | Self::Json(_) => ErrorCategory::Other,
        }
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Attach unit context to a storage failure
    ///
    /// Read failures become [`Error::MissingInput`], write failures become
    /// [`Error::OutputWrite`].
    pub fn from_storage(err: StorageError, dataset: &str, fold: Fold) -> Self {
        match err {
            StorageError::Read { path, source } => Self::MissingInput {
                dataset: dataset.to_string(),
                fold,
                path,
                source,
            },
            StorageError::Write { path, source } => Self::OutputWrite {
                dataset: dataset.to_string(),
                fold,
                path,
                source,
            },
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Input => EXIT_MISSING_INPUT,
            ErrorCategory::Output => EXIT_OUTPUT_WRITE,
            ErrorCategory::Verification => EXIT_VERIFICATION,
            ErrorCategory::Config | ErrorCategory::Other => EXIT_FAILURE,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Config(format!("{err:#}"))
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
