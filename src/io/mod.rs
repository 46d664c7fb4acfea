//! Reading batch streams and persisting aggregation results.
//!
//! - [`BatchReader`] streams [`Batch`](crate::Batch) records, one JSON
//!   object per line.
//! - [`write_snapshot`] / [`read_snapshot`] persist [`Aggregates`](crate::Aggregates)
//!   as a binary [`Snapshot`] record.
//! - [`write_curve_csv`] / [`write_matrix_csv`] export results as CSV for
//!   external plotting.

use std::fmt;

pub mod error;

mod batches;
mod csv;
mod snapshot;

pub use batches::BatchReader;
pub use csv::{write_curve_csv, write_matrix_csv};
pub use error::Error;
pub use snapshot::{Snapshot, read_snapshot, write_snapshot};

/// Marker written in place of undefined values in text output.
pub const UNDEFINED_MARKER: &str = "NA";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    BatchStream,
    Snapshot,
    Csv,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::BatchStream => write!(f, "JSON Lines batch"),
            Format::Snapshot => write!(f, "snapshot"),
            Format::Csv => write!(f, "CSV"),
        }
    }
}
