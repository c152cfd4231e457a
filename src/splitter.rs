//! Deterministic fold generation
//!
//! A fold is produced by shuffling the link collection with a generator
//! seeded from the fold identifier and cutting the permutation into three
//! contiguous slices:
//!
//! ```text
//! [0, train)            -> train_links
//! [train, train + test) -> test_links
//! [train + test, N)     -> valid_links
//! ```
//!
//! The generator is `ChaCha8Rng::seed_from_u64(fold)`, created per call.
//! The same input and fold always produce byte-identical outputs, on any
//! machine.
//!
//! # Example
//!
//! ```
//! use beamfold::models::{Fold, LinkCollection, SplitRatios};
//! use beamfold::splitter::FoldSplitter;
//!
//! let links = LinkCollection::parse(b"a\t1\nb\t2\nc\t3\n");
//! let splitter = FoldSplitter::new(SplitRatios::default());
//! let partition = splitter.partition(&links, Fold::new(1).unwrap());
//! assert_eq!(partition.sizes().total(), 3);
//! ```

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::layout::DatasetLayout;
use crate::models::{Fold, FoldPartition, LinkCollection, LinkRecord, SplitKind, SplitRatios, SplitSizes};
use crate::storage::{self, SplitWriter};
use crate::utils::format_bytes;

/// How an input without records is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyInputPolicy {
    /// Write three empty split files
    #[default]
    WriteEmpty,
    /// Fail with [`Error::EmptyInput`]
    Reject,
}

/// Shuffles and partitions link collections
#[derive(Debug, Clone, Copy, Default)]
pub struct FoldSplitter {
    ratios: SplitRatios,
    empty_input: EmptyInputPolicy,
}

impl FoldSplitter {
    /// Create a splitter with the given ratios
    pub fn new(ratios: SplitRatios) -> Self {
        Self {
            ratios,
            empty_input: EmptyInputPolicy::default(),
        }
    }

    /// Set the empty input policy
    pub fn with_empty_input(mut self, policy: EmptyInputPolicy) -> Self {
        self.empty_input = policy;
        self
    }

    /// Configured ratios
    pub fn ratios(&self) -> SplitRatios {
        self.ratios
    }

    /// Permutation of `records` for `fold`
    pub fn permutation(&self, records: &[LinkRecord], fold: Fold) -> Vec<LinkRecord> {
        let mut rng = ChaCha8Rng::seed_from_u64(fold.seed());
        let mut order = records.to_vec();
        order.shuffle(&mut rng);
        order
    }

    /// Split `links` into the train/test/valid slices of `fold`
    pub fn partition(&self, links: &LinkCollection, fold: Fold) -> FoldPartition {
        let sizes = self.ratios.sizes(links.len());
        let mut train = self.permutation(links.records(), fold);
        let mut test = train.split_off(sizes.train);
        let valid = test.split_off(sizes.test);

        FoldPartition {
            fold,
            train,
            test,
            valid,
        }
    }

    /// Read the dataset's links file, partition it and write the fold
    pub fn split_unit(&self, layout: &DatasetLayout, fold: Fold) -> Result<UnitOutcome> {
        let dataset = layout.dataset();
        let input = layout.input_path();

        let links = storage::read_links(&input)
            .map_err(|err| Error::from_storage(err, dataset, fold))?;

        if links.is_empty() {
            match self.empty_input {
                EmptyInputPolicy::Reject => {
                    return Err(Error::EmptyInput {
                        dataset: dataset.to_string(),
                        fold,
                        path: input,
                    });
                }
                EmptyInputPolicy::WriteEmpty => {
                    tracing::warn!(
                        dataset = %dataset,
                        fold = %fold,
                        path = %input.display(),
                        "Input has no records, writing empty splits"
                    );
                }
            }
        }

        let partition = self.partition(&links, fold);
        let sizes = partition.sizes();
        let fold_dir = layout.fold_dir(fold);

        let written = SplitWriter::new(&fold_dir)
            .write_fold(&partition)
            .map_err(|err| Error::from_storage(err, dataset, fold))?;

        tracing::info!(
            dataset = %dataset,
            fold = %fold,
            train = sizes.train,
            test = sizes.test,
            valid = sizes.valid,
            bytes = %format_bytes(written.iter().sum()),
            "Fold written"
        );

        Ok(UnitOutcome {
            dataset: dataset.to_string(),
            fold,
            input,
            fold_dir,
            sizes,
        })
    }
}

/// Result of one successful (dataset, fold) unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitOutcome {
    pub dataset: String,
    pub fold: Fold,
    pub input: PathBuf,
    pub fold_dir: PathBuf,
    pub sizes: SplitSizes,
}

impl UnitOutcome {
    /// Paths of the written split files
    pub fn split_paths(&self) -> Vec<PathBuf> {
        SplitKind::all()
            .iter()
            .map(|kind| self.fold_dir.join(kind.file_name()))
            .collect()
    }
}
