//! Resolution of index-based batches into element-level edges.
//!
//! A [`Batch`] refers to atoms by position; aggregation works on element
//! pairs. [`ResolvedBatch`] performs the lookup once, computes interatomic
//! distances from atom positions, and validates every index and value, so a
//! malformed batch is rejected before any of it reaches the running totals.

use std::collections::BTreeMap;

use super::error::Error;
use crate::model::batch::Batch;
use crate::model::edge::{Edge, ReferenceEdge};
use crate::model::types::Element;

/// A batch with all atom indices replaced by elements.
#[derive(Debug, Clone, Default)]
pub struct ResolvedBatch {
    /// Attention edges with elements and distances.
    pub edges: Vec<Edge>,
    /// Reference bond edges with elements.
    pub references: Vec<ReferenceEdge>,
    /// Number of atoms per element in the batch.
    pub atom_counts: BTreeMap<Element, u64>,
}

impl ResolvedBatch {
    /// Resolves a [`Batch`] into element-level edges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyBatch`] if the batch has interactions or bonds
    /// but no atoms, [`Error::InvalidInteraction`] or [`Error::InvalidBond`]
    /// if an index is out of bounds, and [`Error::InvalidValue`] if an
    /// attention weight is negative or not finite.
    pub fn from_batch(batch: &Batch) -> Result<Self, Error> {
        let n_atoms = batch.atoms.len();
        if n_atoms == 0 && (!batch.interactions.is_empty() || !batch.bonds.is_empty()) {
            return Err(Error::EmptyBatch);
        }

        let mut edges = Vec::with_capacity(batch.interactions.len());
        for (index, interaction) in batch.interactions.iter().enumerate() {
            let (i, j) = (interaction.source, interaction.target);
            if i >= n_atoms || j >= n_atoms {
                return Err(Error::invalid_interaction(
                    index,
                    i,
                    j,
                    format!("atom index out of bounds (n_atoms = {})", n_atoms),
                ));
            }

            let (a, b) = (&batch.atoms[i], &batch.atoms[j]);
            let edge = Edge::new(a.element, b.element, interaction.weight, a.distance_to(b));
            validate_edge(index, &edge)?;
            edges.push(edge);
        }

        let mut references = Vec::with_capacity(batch.bonds.len());
        for (index, bond) in batch.bonds.iter().enumerate() {
            let (i, j) = (bond.source, bond.target);
            if i >= n_atoms || j >= n_atoms {
                return Err(Error::invalid_bond(
                    index,
                    i,
                    j,
                    format!("atom index out of bounds (n_atoms = {})", n_atoms),
                ));
            }
            references.push(ReferenceEdge::new(
                batch.atoms[i].element,
                batch.atoms[j].element,
            ));
        }

        let mut atom_counts = BTreeMap::new();
        for atom in &batch.atoms {
            *atom_counts.entry(atom.element).or_insert(0) += 1;
        }

        Ok(Self {
            edges,
            references,
            atom_counts,
        })
    }

    #[inline]
    pub fn atom_total(&self) -> u64 {
        self.atom_counts.values().sum()
    }
}

/// Checks that an edge carries a finite, non-negative weight and distance.
pub fn validate_edge(index: usize, edge: &Edge) -> Result<(), Error> {
    if !edge.weight.is_finite() || edge.weight < 0.0 {
        return Err(Error::invalid_value(
            index,
            format!("attention weight must be finite and >= 0, got {}", edge.weight),
        ));
    }
    if !edge.distance.is_finite() || edge.distance < 0.0 {
        return Err(Error::invalid_value(
            index,
            format!("distance must be finite and >= 0, got {}", edge.distance),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::batch::{BondEdge, Interaction};

    fn make_methane_fragment() -> Batch {
        let mut batch = Batch::new();
        batch.atoms.push(Atom::new(Element::C, [0.0, 0.0, 0.0]));
        batch.atoms.push(Atom::new(Element::H, [1.09, 0.0, 0.0]));
        batch.atoms.push(Atom::new(Element::H, [0.0, 1.09, 0.0]));
        batch.interactions.push(Interaction::new(1, 0, 0.7));
        batch.interactions.push(Interaction::new(0, 2, 0.1));
        batch.interactions.push(Interaction::new(1, 2, 0.2));
        batch.bonds.push(BondEdge::new(0, 1));
        batch.bonds.push(BondEdge::new(1, 0));
        batch
    }

    #[test]
    fn resolves_elements_and_distances() {
        let resolved = ResolvedBatch::from_batch(&make_methane_fragment()).unwrap();

        assert_eq!(resolved.edges.len(), 3);
        assert_eq!(resolved.edges[0].source, Element::H);
        assert_eq!(resolved.edges[0].target, Element::C);
        assert!((resolved.edges[0].distance - 1.09).abs() < 1e-12);
        assert!((resolved.edges[2].distance - 1.09 * 2f64.sqrt()).abs() < 1e-12);

        assert_eq!(
            resolved.references,
            vec![
                ReferenceEdge::new(Element::C, Element::H),
                ReferenceEdge::new(Element::H, Element::C),
            ]
        );
    }

    #[test]
    fn counts_atoms_per_element() {
        let resolved = ResolvedBatch::from_batch(&make_methane_fragment()).unwrap();
        assert_eq!(resolved.atom_counts.get(&Element::C), Some(&1));
        assert_eq!(resolved.atom_counts.get(&Element::H), Some(&2));
        assert_eq!(resolved.atom_total(), 3);
    }

    #[test]
    fn empty_batch_without_edges_is_allowed() {
        let resolved = ResolvedBatch::from_batch(&Batch::new()).unwrap();
        assert!(resolved.edges.is_empty());
        assert_eq!(resolved.atom_total(), 0);
    }

    #[test]
    fn errors_on_edges_without_atoms() {
        let mut batch = Batch::new();
        batch.bonds.push(BondEdge::new(0, 0));
        assert!(matches!(
            ResolvedBatch::from_batch(&batch),
            Err(Error::EmptyBatch)
        ));
    }

    #[test]
    fn errors_on_invalid_interaction_index() {
        let mut batch = make_methane_fragment();
        batch.interactions.push(Interaction::new(0, 99, 0.5));
        assert!(matches!(
            ResolvedBatch::from_batch(&batch),
            Err(Error::InvalidInteraction {
                index: 3,
                i: 0,
                j: 99,
                ..
            })
        ));
    }

    #[test]
    fn errors_on_invalid_bond_index() {
        let mut batch = make_methane_fragment();
        batch.bonds.push(BondEdge::new(7, 0));
        assert!(matches!(
            ResolvedBatch::from_batch(&batch),
            Err(Error::InvalidBond {
                index: 2,
                i: 7,
                j: 0,
                ..
            })
        ));
    }

    #[test]
    fn errors_on_negative_or_nan_weight() {
        let mut batch = make_methane_fragment();
        batch.interactions[1].weight = -0.1;
        assert!(matches!(
            ResolvedBatch::from_batch(&batch),
            Err(Error::InvalidValue { index: 1, .. })
        ));

        batch.interactions[1].weight = f64::NAN;
        assert!(matches!(
            ResolvedBatch::from_batch(&batch),
            Err(Error::InvalidValue { index: 1, .. })
        ));
    }

    #[test]
    fn validate_edge_accepts_zero_weight_and_distance() {
        let edge = Edge::new(Element::O, Element::O, 0.0, 0.0);
        assert!(validate_edge(0, &edge).is_ok());
    }
}
