//! Verification of written folds
//!
//! Re-reads a fold from disk and checks it against the links file it was
//! drawn from:
//!
//! - every split file exists
//! - split sizes follow the configured ratios
//! - train + test + valid equals the input as a multiset
//! - each split is byte-identical to what the fold's seed produces

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::layout::DatasetLayout;
use crate::models::{Fold, LinkCollection, SplitKind, SplitSizes};
use crate::splitter::FoldSplitter;
use crate::storage::{self, StorageError};
use crate::utils::{digest_bytes, digest_records};

/// A broken partition law
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// Split file is absent
    MissingSplit { split: SplitKind, path: PathBuf },

    /// Split holds a different number of records than the size law gives
    SizeMismatch {
        split: SplitKind,
        expected: usize,
        actual: usize,
    },

    /// Input records absent from every split
    MissingRecords { count: usize },

    /// Split records that are not in the input, or appear too often
    UnexpectedRecords { count: usize },

    /// Split content differs from the fold's deterministic output
    NotReproducible { split: SplitKind },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSplit { split, path } => {
                write!(f, "{split} split missing at {}", path.display())
            }
            Self::SizeMismatch {
                split,
                expected,
                actual,
            } => write!(f, "{split} split has {actual} records, expected {expected}"),
            Self::MissingRecords { count } => write!(f, "{count} input record(s) missing"),
            Self::UnexpectedRecords { count } => {
                write!(f, "{count} record(s) not accounted for by the input")
            }
            Self::NotReproducible { split } => {
                write!(f, "{split} split does not match the fold's shuffle")
            }
        }
    }
}

/// State of one split file
#[derive(Debug, Clone, Serialize)]
pub struct SplitReport {
    pub split: SplitKind,
    pub path: PathBuf,
    /// Record count, `None` when the file is absent
    pub records: Option<usize>,
    /// SHA-256 of the file, `None` when the file is absent
    pub digest: Option<String>,
    /// SHA-256 the fold's seed produces
    pub expected_digest: String,
}

/// Verification outcome of one fold
#[derive(Debug, Clone, Serialize)]
pub struct FoldReport {
    pub dataset: String,
    pub fold: Fold,
    pub input_records: usize,
    pub malformed_records: usize,
    pub expected: SplitSizes,
    pub splits: Vec<SplitReport>,
    pub violations: Vec<Violation>,
}

impl FoldReport {
    /// True when no law is broken
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Convert an invalid report into [`Error::VerificationFailed`]
    pub fn into_result(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(Error::VerificationFailed {
                dataset: self.dataset.clone(),
                fold: self.fold,
                violations: self.violations.len(),
            })
        }
    }
}

/// Check one written fold of `layout`
pub fn verify_fold(splitter: &FoldSplitter, layout: &DatasetLayout, fold: Fold) -> Result<FoldReport> {
    let dataset = layout.dataset();
    let input = storage::read_links(&layout.input_path())
        .map_err(|err| Error::from_storage(err, dataset, fold))?;
    let expected = splitter.partition(&input, fold);

    let mut remaining: HashMap<&[u8], i64> = HashMap::new();
    for record in input.records() {
        *remaining.entry(record.content()).or_default() += 1;
    }

    let mut splits = Vec::with_capacity(3);
    let mut violations = Vec::new();
    let mut unexpected = 0usize;

    for kind in SplitKind::all() {
        let path = layout.split_path(fold, kind);
        let expected_records = expected.split(kind);
        let expected_digest = digest_records(expected_records);

        let actual = storage::read_split(&path).map_err(|err| match err {
            StorageError::Read { path, source } | StorageError::Write { path, source } => {
                tracing::error!(path = %path.display(), error = %source, "Failed to read split");
                Error::Io(source)
            }
        })?;

        let Some(bytes) = actual else {
            violations.push(Violation::MissingSplit {
                split: kind,
                path: path.clone(),
            });
            splits.push(SplitReport {
                split: kind,
                path,
                records: None,
                digest: None,
                expected_digest,
            });
            continue;
        };
        let actual = LinkCollection::parse(&bytes);

        if actual.len() != expected_records.len() {
            violations.push(Violation::SizeMismatch {
                split: kind,
                expected: expected_records.len(),
                actual: actual.len(),
            });
        }

        for record in actual.records() {
            match remaining.get_mut(record.content()) {
                Some(count) if *count > 0 => *count -= 1,
                _ => unexpected += 1,
            }
        }

        let digest = digest_bytes(&bytes);
        if digest != expected_digest {
            violations.push(Violation::NotReproducible { split: kind });
        }

        splits.push(SplitReport {
            split: kind,
            path,
            records: Some(actual.len()),
            digest: Some(digest),
            expected_digest,
        });
    }

    let missing: i64 = remaining.values().sum();
    if missing > 0 {
        violations.push(Violation::MissingRecords {
            count: missing as usize,
        });
    }
    if unexpected > 0 {
        violations.push(Violation::UnexpectedRecords { count: unexpected });
    }

    let report = FoldReport {
        dataset: dataset.to_string(),
        fold,
        input_records: input.len(),
        malformed_records: input.malformed_count(),
        expected: expected.sizes(),
        splits,
        violations,
    };

    if report.is_valid() {
        tracing::debug!(dataset = %dataset, fold = %fold, "Fold verified");
    } else {
        for violation in &report.violations {
            tracing::warn!(dataset = %dataset, fold = %fold, "{violation}");
        }
    }
    Ok(report)
}
