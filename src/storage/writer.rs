//! Atomic writer for the three splits of a fold
//!
//! Every split is written to `.{name}.tmp` next to its final path, flushed
//! and synced. Only when all temporaries exist are they renamed over the
//! final files, so a failure while writing never leaves a half-written
//! split behind. Leftover temporaries are removed on every exit path.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{StorageError, StorageResult};
use crate::models::{FoldPartition, SplitKind};

/// Writes fold partitions into a fold directory
#[derive(Debug, Clone)]
pub struct SplitWriter {
    fold_dir: PathBuf,
}

impl SplitWriter {
    /// Create a writer targeting `fold_dir`
    pub fn new(fold_dir: impl Into<PathBuf>) -> Self {
        Self {
            fold_dir: fold_dir.into(),
        }
    }

    /// Final path of one split
    pub fn split_path(&self, kind: SplitKind) -> PathBuf {
        self.fold_dir.join(kind.file_name())
    }

    fn temp_path(&self, kind: SplitKind) -> PathBuf {
        self.fold_dir.join(format!(".{}.tmp", kind.file_name()))
    }

    /// Write all splits, replacing any previous output
    ///
    /// Returns the number of bytes written per split, in [`SplitKind::all`] order.
    pub fn write_fold(&self, partition: &FoldPartition) -> StorageResult<[u64; 3]> {
        fs::create_dir_all(&self.fold_dir).map_err(|source| StorageError::Write {
            path: self.fold_dir.clone(),
            source,
        })?;

        let mut staged = StagedFiles::default();
        let mut written = [0u64; 3];

        for (slot, kind) in SplitKind::all().into_iter().enumerate() {
            let temp = self.temp_path(kind);
            staged.paths.push(temp.clone());
            written[slot] = write_records(&temp, partition.split(kind))?;
        }

        for kind in SplitKind::all() {
            let temp = self.temp_path(kind);
            let target = self.split_path(kind);
            fs::rename(&temp, &target).map_err(|source| StorageError::Write {
                path: target.clone(),
                source,
            })?;
            staged.paths.retain(|p| p != &temp);
        }

        tracing::debug!(
            fold_dir = %self.fold_dir.display(),
            fold = %partition.fold,
            "Fold splits written"
        );
        Ok(written)
    }
}

fn write_records(path: &Path, records: &[crate::models::LinkRecord]) -> StorageResult<u64> {
    let write_err = |source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    let mut bytes = 0u64;
    for record in records {
        writer.write_all(record.as_bytes()).map_err(write_err)?;
        bytes += record.as_bytes().len() as u64;
    }

    let file = writer
        .into_inner()
        .map_err(|err| write_err(err.into_error()))?;
    file.sync_all().map_err(write_err)?;
    Ok(bytes)
}

/// Temporary files not yet renamed into place
#[derive(Default)]
struct StagedFiles {
    paths: Vec<PathBuf>,
}

impl Drop for StagedFiles {
    fn drop(&mut self) {
        for path in &self.paths {
            if let Err(err) = fs::remove_file(path) {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %err, "Failed to remove temporary split");
                }
            }
        }
    }
}
