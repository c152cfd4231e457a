//! Common utilities and helper functions

use sha2::{Digest, Sha256};

use crate::models::LinkRecord;

/// SHA-256 of the records as they would be written, as lowercase hex
pub fn digest_records(records: &[LinkRecord]) -> String {
    let mut hasher = Sha256::new();
    for record in records {
        hasher.update(record.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// SHA-256 of a file's contents, as lowercase hex
pub fn digest_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Format byte size as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return String::from("0 B");
    }

    let base: f64 = 1024.0;
    let exponent = (bytes as f64).log(base).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);

    let value = bytes as f64 / base.powi(exponent as i32);

    format!("{value:.2} {}", UNITS[exponent])
}
