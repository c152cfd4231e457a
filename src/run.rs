//! Orchestration over every (dataset, fold) unit
//!
//! Units are independent and run sequentially. A unit that fails with a
//! recoverable error is recorded and the loop moves on; a non-recoverable
//! error, or any error under `fail_fast`, stops the loop.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::error::{ErrorCategory, FoldErrorTrait, Result, EXIT_SUCCESS};
use crate::models::Fold;
use crate::splitter::UnitOutcome;

/// Failed unit
#[derive(Debug, Clone, Serialize)]
pub struct UnitFailure {
    pub dataset: String,
    /// `None` when the dataset failed before any fold was attempted
    pub fold: Option<Fold>,
    pub category: ErrorCategory,
    pub exit_code: u8,
    pub message: String,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub succeeded: Vec<UnitOutcome>,
    pub failed: Vec<UnitFailure>,
    /// Units left unattempted because the loop stopped
    pub stopped_early: bool,
}

impl RunSummary {
    /// Whether every unit succeeded
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Exit status of the first failure, or success
    pub fn exit_code(&self) -> u8 {
        self.failed
            .first()
            .map(|f| f.exit_code)
            .unwrap_or(EXIT_SUCCESS)
    }
}

/// Split every fold of every dataset
pub fn run_all(config: &Config, datasets: &[String], fail_fast: bool) -> Result<RunSummary> {
    let splitter = config.splitter()?;
    let started_at = Utc::now();
    let mut succeeded = Vec::new();
    let mut failed = Vec::new();
    let mut stopped_early = false;

    'datasets: for dataset in datasets {
        let layout = match config.layout(dataset) {
            Ok(layout) => layout,
            Err(err) => {
                tracing::error!(dataset = %dataset, error = %err, "Invalid dataset");
                failed.push(failure(dataset, None, &err));
                if fail_fast || !err.is_recoverable() {
                    stopped_early = true;
                    break 'datasets;
                }
                continue;
            }
        };

        for fold in Fold::range(config.folds.count) {
            match splitter.split_unit(&layout, fold) {
                Ok(outcome) => succeeded.push(outcome),
                Err(err) => {
                    tracing::error!(
                        dataset = %dataset,
                        fold = %fold,
                        category = err.category().label(),
                        error = %err,
                        "Unit failed"
                    );
                    failed.push(failure(dataset, Some(fold), &err));
                    if fail_fast || !err.is_recoverable() {
                        stopped_early = true;
                        break 'datasets;
                    }
                }
            }
        }
    }

    let summary = RunSummary {
        started_at,
        finished_at: Utc::now(),
        succeeded,
        failed,
        stopped_early,
    };

    tracing::info!(
        succeeded = summary.succeeded.len(),
        failed = summary.failed.len(),
        stopped_early = summary.stopped_early,
        elapsed_ms = (summary.finished_at - summary.started_at).num_milliseconds(),
        "Run finished"
    );
    Ok(summary)
}

fn failure(dataset: &str, fold: Option<Fold>, err: &crate::error::Error) -> UnitFailure {
    UnitFailure {
        dataset: dataset.to_string(),
        fold,
        category: err.category(),
        exit_code: err.exit_code(),
        message: err.to_string(),
    }
}
