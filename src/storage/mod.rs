//! File operations for links files and fold outputs
//!
//! Reading is a single pass over the input artifact. Writing goes through
//! [`SplitWriter`], which stages every split in a temporary file and only
//! renames them into place once all of them were written.

pub mod writer;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::LinkCollection;

pub use writer::SplitWriter;

/// Errors raised by file operations, before unit context is attached
#[derive(Error, Debug)]
pub enum StorageError {
    /// Input could not be opened or read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Output directory or file could not be created, written or renamed
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Read every record of a links file
pub fn read_links(path: &Path) -> StorageResult<LinkCollection> {
    let bytes = fs::read(path).map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let collection = LinkCollection::parse(&bytes);
    tracing::debug!(
        path = %path.display(),
        records = collection.len(),
        "Links file loaded"
    );
    Ok(collection)
}

/// Raw bytes of a written split, or `None` when the file does not exist
pub fn read_split(path: &Path) -> StorageResult<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StorageError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
