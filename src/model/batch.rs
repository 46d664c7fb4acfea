use serde::{Deserialize, Serialize};

use super::atom::Atom;

/// Attention score between two atoms of a batch, by atom index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub source: usize,
    pub target: usize,
    pub weight: f64,
}

impl Interaction {
    pub fn new(source: usize, target: usize, weight: f64) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }
}

/// Directed bond between two atoms of a batch, by atom index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BondEdge {
    pub source: usize,
    pub target: usize,
}

impl BondEdge {
    pub fn new(source: usize, target: usize) -> Self {
        Self { source, target }
    }
}

/// One batch of structures as scored by the model.
///
/// Atom indices in `interactions` and `bonds` refer to `atoms`; structures
/// inside a batch share one index space, the way batched graphs are
/// concatenated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub atoms: Vec<Atom>,
    #[serde(default)]
    pub interactions: Vec<Interaction>,
    #[serde(default)]
    pub bonds: Vec<BondEdge>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn interaction_count(&self) -> usize {
        self.interactions.len()
    }

    #[inline]
    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }
}
