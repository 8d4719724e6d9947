// error.rs - Failures surfaced by dictionary loading and index snapshots

use thiserror::Error;

/// Lookup itself never fails: out-of-range arguments yield an empty result.
/// Errors only arise when touching the filesystem.
#[derive(Debug, Error)]
pub enum Error {
    /// A dictionary or snapshot file could not be read or written.
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    /// A snapshot file could not be decoded.
    #[error("malformed index snapshot: {0}")]
    Format(#[from] bincode::Error),
}
