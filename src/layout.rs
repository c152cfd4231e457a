//! On-disk layout of a benchmark dataset
//!
//! ```text
//! {root}/{dataset}/ent_links
//! {root}/{dataset}/{fold}/train_links
//! {root}/{dataset}/{fold}/test_links
//! {root}/{dataset}/{fold}/valid_links
//! ```

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::{Fold, SplitKind};

/// Default name of the links file inside a dataset directory
pub const DEFAULT_INPUT_NAME: &str = "ent_links";

/// Resolves input and output paths for one dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    root: PathBuf,
    dataset: String,
    input_name: String,
}

impl DatasetLayout {
    /// Create a layout, rejecting dataset names that escape `root`
    pub fn new(root: impl Into<PathBuf>, dataset: &str, input_name: &str) -> Result<Self> {
        validate_component("dataset name", dataset)?;
        validate_component("input file name", input_name)?;

        Ok(Self {
            root: root.into(),
            dataset: dataset.to_string(),
            input_name: input_name.to_string(),
        })
    }

    /// Dataset name
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Directory holding the dataset
    pub fn dataset_dir(&self) -> PathBuf {
        self.root.join(&self.dataset)
    }

    /// Links file the folds are drawn from
    pub fn input_path(&self) -> PathBuf {
        self.dataset_dir().join(&self.input_name)
    }

    /// Output directory of one fold
    pub fn fold_dir(&self, fold: Fold) -> PathBuf {
        self.dataset_dir().join(fold.to_string())
    }

    /// Output file of one split
    pub fn split_path(&self, fold: Fold, kind: SplitKind) -> PathBuf {
        self.fold_dir(fold).join(kind.file_name())
    }
}

fn validate_component(what: &str, value: &str) -> Result<()> {
    let mut components = Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(Error::config(format!(
            "{what} must be a single path component, got '{value}'"
        ))),
    }
}
