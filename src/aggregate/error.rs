//! Error types for attention aggregation.
//!
//! Every variant describes a malformed input batch or edge. Conditions the
//! aggregator recovers from locally (an element without outgoing reference
//! bonds, an element pair without attention edges) are not errors; they
//! surface as undefined matrix cells instead.

use thiserror::Error;

use crate::model::types::UnknownElementError;

/// Errors that can occur while folding batches into an
/// [`Aggregator`](super::Aggregator).
#[derive(Debug, Error)]
pub enum Error {
    /// An atomic number outside the element vocabulary was encountered.
    ///
    /// The interaction matrix shape depends on the vocabulary, so unknown
    /// elements are never dropped silently.
    #[error(transparent)]
    UnknownElement(#[from] UnknownElementError),

    /// The batch contains interactions or bonds but no atoms.
    #[error("batch is empty: interactions and bonds require at least one atom")]
    EmptyBatch,

    /// A scored interaction references atoms outside the batch.
    #[error("invalid interaction #{index} between atoms {i} and {j}: {detail}")]
    InvalidInteraction {
        /// Position of the interaction in the batch.
        index: usize,
        /// Source atom index.
        i: usize,
        /// Target atom index.
        j: usize,
        /// Description of the problem.
        detail: String,
    },

    /// A reference bond references atoms outside the batch.
    #[error("invalid reference bond #{index} between atoms {i} and {j}: {detail}")]
    InvalidBond {
        /// Position of the bond in the batch.
        index: usize,
        /// Source atom index.
        i: usize,
        /// Target atom index.
        j: usize,
        /// Description of the problem.
        detail: String,
    },

    /// An edge carries a negative or non-finite weight or distance.
    #[error("invalid value on edge #{index}: {detail}")]
    InvalidValue {
        /// Position of the edge in its input sequence.
        index: usize,
        /// Description of the problem.
        detail: String,
    },
}

impl Error {
    /// Creates an [`InvalidInteraction`](Error::InvalidInteraction) error.
    pub fn invalid_interaction(index: usize, i: usize, j: usize, details: impl Into<String>) -> Self {
        Self::InvalidInteraction {
            index,
            i,
            j,
            detail: details.into(),
        }
    }

    /// Creates an [`InvalidBond`](Error::InvalidBond) error.
    pub fn invalid_bond(index: usize, i: usize, j: usize, details: impl Into<String>) -> Self {
        Self::InvalidBond {
            index,
            i,
            j,
            detail: details.into(),
        }
    }

    /// Creates an [`InvalidValue`](Error::InvalidValue) error.
    pub fn invalid_value(index: usize, details: impl Into<String>) -> Self {
        Self::InvalidValue {
            index,
            detail: details.into(),
        }
    }
}
