//! Extraction aggregator: reduces attention edges and reference bonds into
//! element × element matrices.
//!
//! An [`Aggregator`] is explicit, caller-owned state. Batches are folded in
//! one at a time with [`Aggregator::ingest`] (or edge by edge with the
//! `push_*` methods); nothing is normalized until [`Aggregator::finish`],
//! because the matrix shape depends on the final element vocabulary.
//! Partial aggregators built independently can be combined with
//! [`Aggregator::merge`].

mod error;
mod raw;
mod resolve;

pub use error::Error;
pub use raw::RawEdges;
pub use resolve::ResolvedBatch;

use std::collections::{BTreeMap, BTreeSet};

use crate::model::batch::Batch;
use crate::model::edge::{Edge, ReferenceEdge};
use crate::model::matrix::ElementMatrix;
use crate::model::types::{Element, ElementPair};

/// Running sum and count of attention weights for one element pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PairStats {
    sum: f64,
    count: u64,
}

impl PairStats {
    fn add(&mut self, weight: f64) {
        self.sum += weight;
        self.count += 1;
    }

    fn merge(&mut self, other: PairStats) {
        self.sum += other.sum;
        self.count += other.count;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Counts folded in by a single [`Aggregator::ingest`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub atoms: u64,
    pub edges: usize,
    pub references: usize,
}

/// Accumulates attention edges, reference bonds, and atom counts.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    attention: BTreeMap<ElementPair, PairStats>,
    references: BTreeMap<ElementPair, u64>,
    atom_counts: BTreeMap<Element, u64>,
    raw: RawEdges,
    batches: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of batches folded in with [`ingest`](Self::ingest).
    #[inline]
    pub fn batch_count(&self) -> usize {
        self.batches
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.raw.len()
    }

    pub fn reference_count(&self) -> u64 {
        self.references.values().sum()
    }

    /// Adds one attention edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] if the weight or distance is negative
    /// or not finite; the aggregator is left unchanged.
    pub fn push_edge(&mut self, edge: Edge) -> Result<(), Error> {
        resolve::validate_edge(self.raw.len(), &edge)?;
        self.fold_edge(&edge);
        Ok(())
    }

    pub fn push_reference(&mut self, edge: ReferenceEdge) {
        *self.references.entry(edge.pair()).or_insert(0) += 1;
    }

    /// Adds one attention edge given by atomic numbers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownElement`] if either atomic number is outside
    /// the element vocabulary, and [`Error::InvalidValue`] as for
    /// [`push_edge`](Self::push_edge). The aggregator is left unchanged.
    pub fn push_edge_record(
        &mut self,
        source: u8,
        target: u8,
        weight: f64,
        distance: f64,
    ) -> Result<(), Error> {
        self.push_edge(Edge::from_atomic_numbers(source, target, weight, distance)?)
    }

    /// Adds one reference bond given by atomic numbers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownElement`] if either atomic number is outside
    /// the element vocabulary.
    pub fn push_reference_record(&mut self, source: u8, target: u8) -> Result<(), Error> {
        self.push_reference(ReferenceEdge::from_atomic_numbers(source, target)?);
        Ok(())
    }

    /// Adds per-element atom counts; counts for an element already seen are
    /// summed.
    pub fn add_atom_counts<I>(&mut self, counts: I)
    where
        I: IntoIterator<Item = (Element, u64)>,
    {
        for (element, count) in counts {
            *self.atom_counts.entry(element).or_insert(0) += count;
        }
    }

    /// Resolves and folds one batch.
    ///
    /// The whole batch is validated first, so on error nothing from it has
    /// been accumulated.
    ///
    /// # Errors
    ///
    /// See [`ResolvedBatch::from_batch`].
    pub fn ingest(&mut self, batch: &Batch) -> Result<BatchSummary, Error> {
        let resolved = ResolvedBatch::from_batch(batch)?;
        let summary = BatchSummary {
            atoms: resolved.atom_total(),
            edges: resolved.edges.len(),
            references: resolved.references.len(),
        };

        for edge in &resolved.edges {
            self.fold_edge(edge);
        }
        for reference in resolved.references {
            self.push_reference(reference);
        }
        self.add_atom_counts(resolved.atom_counts);
        self.batches += 1;

        log::debug!(
            "batch {}: {} atoms, {} attention edges, {} reference bonds",
            self.batches,
            summary.atoms,
            summary.edges,
            summary.references
        );

        Ok(summary)
    }

    /// Merges a partial aggregate built from other batches.
    ///
    /// Sums and counts are combined, so merging is order-independent except
    /// for the order of raw edges and floating-point summation order.
    pub fn merge(&mut self, mut other: Aggregator) {
        for (pair, stats) in other.attention {
            self.attention.entry(pair).or_default().merge(stats);
        }
        for (pair, count) in other.references {
            *self.references.entry(pair).or_insert(0) += count;
        }
        self.add_atom_counts(other.atom_counts);
        self.raw.append(&mut other.raw);
        self.batches += other.batches;
    }

    /// Sorted union of every element seen in attention or reference edges.
    pub fn element_set(&self) -> BTreeSet<Element> {
        self.attention
            .keys()
            .chain(self.references.keys())
            .flat_map(|pair| [pair.source, pair.target])
            .collect()
    }

    /// Normalizes the accumulated state into the final [`Aggregates`].
    pub fn finish(self) -> Aggregates {
        let element_ids: Vec<Element> = self.element_set().into_iter().collect();

        let mut interaction = ElementMatrix::undefined(element_ids.clone());
        for (pair, stats) in &self.attention {
            if let (Some(i), Some(j)) = (
                interaction.index_of(pair.source),
                interaction.index_of(pair.target),
            ) {
                interaction.set(i, j, stats.mean());
            }
        }

        let bond_probability = bond_probabilities(&self.references);
        let reference_element_ids = bond_probability.elements().to_vec();

        log::info!(
            "aggregated {} batches: {} elements, {} attention edges, {} reference bonds",
            self.batches,
            element_ids.len(),
            self.raw.len(),
            self.reference_count()
        );

        Aggregates {
            element_ids,
            interaction,
            reference_element_ids,
            bond_probability,
            atom_counts: self.atom_counts,
            raw: self.raw,
        }
    }

    fn fold_edge(&mut self, edge: &Edge) {
        self.attention.entry(edge.pair()).or_default().add(edge.weight);
        self.raw.push(edge);
    }
}

/// Row-normalizes reference bond counts into conditional bond probabilities
/// P(target | source).
///
/// Rows of sources with at least one outgoing reference bond are fully
/// defined; rows of elements that only ever appear as targets stay
/// undefined.
fn bond_probabilities(references: &BTreeMap<ElementPair, u64>) -> ElementMatrix {
    let elements: Vec<Element> = references
        .keys()
        .flat_map(|pair| [pair.source, pair.target])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut row_totals: BTreeMap<Element, u64> = BTreeMap::new();
    for (pair, count) in references {
        *row_totals.entry(pair.source).or_insert(0) += count;
    }

    let mut matrix = ElementMatrix::undefined(elements.clone());
    for (i, source) in elements.iter().enumerate() {
        let Some(&total) = row_totals.get(source).filter(|t| **t > 0) else {
            log::debug!("no reference bonds leave {source}; bond probability row is undefined");
            continue;
        };
        for (j, target) in elements.iter().enumerate() {
            let count = references
                .get(&ElementPair::new(*source, *target))
                .copied()
                .unwrap_or(0);
            matrix.set(i, j, Some(count as f64 / total as f64));
        }
    }
    matrix
}

/// Final, immutable result of an aggregation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    /// Sorted element vocabulary; row/column index space of `interaction`.
    pub element_ids: Vec<Element>,
    /// Mean attention per ordered element pair.
    pub interaction: ElementMatrix,
    /// Sorted elements appearing in reference bonds; index space of
    /// `bond_probability`.
    pub reference_element_ids: Vec<Element>,
    /// Conditional bond probability given the source element.
    pub bond_probability: ElementMatrix,
    /// Total atoms per element across all batches.
    pub atom_counts: BTreeMap<Element, u64>,
    /// Unaggregated per-edge arrays.
    pub raw: RawEdges,
}

impl Aggregates {
    pub fn total_atoms(&self) -> u64 {
        self.atom_counts.values().sum()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.raw.len()
    }
}

/// Aggregates edges, reference edges, and per-batch atom counts in one call.
///
/// # Errors
///
/// Returns [`Error::InvalidValue`] for an edge with a negative or
/// non-finite weight or distance.
pub fn aggregate<E, R, C>(
    edges: E,
    reference_edges: R,
    atom_counts_per_batch: C,
) -> Result<Aggregates, Error>
where
    E: IntoIterator<Item = Edge>,
    R: IntoIterator<Item = ReferenceEdge>,
    C: IntoIterator,
    C::Item: IntoIterator<Item = (Element, u64)>,
{
    let mut aggregator = Aggregator::new();
    for edge in edges {
        aggregator.push_edge(edge)?;
    }
    for reference in reference_edges {
        aggregator.push_reference(reference);
    }
    for counts in atom_counts_per_batch {
        aggregator.add_atom_counts(counts);
    }
    Ok(aggregator.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::batch::{BondEdge, Interaction};
    use crate::model::types::UnknownElementError;

    use crate::model::types::Element::{C, F, H, N, O};

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn scenario() -> Aggregates {
        aggregate(
            [
                Edge::new(H, C, 0.2, 1.0),
                Edge::new(H, C, 0.4, 1.2),
                Edge::new(C, H, 0.6, 1.2),
            ],
            [
                ReferenceEdge::new(H, C),
                ReferenceEdge::new(H, C),
                ReferenceEdge::new(H, O),
            ],
            [vec![(H, 2), (C, 1)], vec![(H, 1), (O, 1)]],
        )
        .unwrap()
    }

    fn make_water() -> Batch {
        let mut batch = Batch::new();
        batch.atoms.push(Atom::new(O, [0.0, 0.0, 0.0]));
        batch.atoms.push(Atom::new(H, [0.96, 0.0, 0.0]));
        batch.atoms.push(Atom::new(H, [-0.24, 0.93, 0.0]));
        for (i, j, w) in [(0, 1, 0.3), (0, 2, 0.5), (1, 0, 0.9), (2, 0, 0.7), (1, 2, 0.1)] {
            batch.interactions.push(Interaction::new(i, j, w));
        }
        for (i, j) in [(0, 1), (1, 0), (0, 2), (2, 0)] {
            batch.bonds.push(BondEdge::new(i, j));
        }
        batch
    }

    fn make_hydrogen_fluoride() -> Batch {
        let mut batch = Batch::new();
        batch.atoms.push(Atom::new(H, [0.0, 0.0, 0.0]));
        batch.atoms.push(Atom::new(F, [0.92, 0.0, 0.0]));
        batch.interactions.push(Interaction::new(0, 1, 0.8));
        batch.interactions.push(Interaction::new(1, 0, 0.4));
        batch.bonds.push(BondEdge::new(0, 1));
        batch
    }

    #[test]
    fn scenario_element_set_is_sorted_union() {
        let agg = scenario();
        assert_eq!(agg.element_ids, vec![H, C, O]);
        assert_eq!(agg.interaction.elements(), &[H, C, O]);
        assert_eq!(agg.reference_element_ids, vec![H, C, O]);
    }

    #[test]
    fn scenario_interaction_means() {
        let agg = scenario();
        assert!(approx_eq(agg.interaction.get(H, C).unwrap(), 0.3, 1e-12));
        assert!(approx_eq(agg.interaction.get(C, H).unwrap(), 0.6, 1e-12));
        assert_eq!(agg.interaction.defined_count(), 2);
        assert_eq!(agg.interaction.get(H, H), None);
        assert_eq!(agg.interaction.get(O, H), None);
        assert_eq!(agg.interaction.get(C, O), None);
    }

    #[test]
    fn scenario_bond_probabilities() {
        let agg = scenario();
        let bonds = &agg.bond_probability;
        assert!(approx_eq(bonds.get(H, C).unwrap(), 2.0 / 3.0, 1e-12));
        assert!(approx_eq(bonds.get(H, O).unwrap(), 1.0 / 3.0, 1e-12));
        assert_eq!(bonds.get(H, H), Some(0.0));

        let c = bonds.index_of(C).unwrap();
        let o = bonds.index_of(O).unwrap();
        assert!(!bonds.row_is_defined(c));
        assert!(!bonds.row_is_defined(o));
    }

    #[test]
    fn scenario_atom_counts_are_summed_across_batches() {
        let agg = scenario();
        assert_eq!(agg.atom_counts.get(&H), Some(&3));
        assert_eq!(agg.atom_counts.get(&C), Some(&1));
        assert_eq!(agg.atom_counts.get(&O), Some(&1));
        assert_eq!(agg.total_atoms(), 5);
    }

    #[test]
    fn scenario_keeps_raw_edges() {
        let agg = scenario();
        assert_eq!(agg.edge_count(), 3);
        assert_eq!(agg.raw.attention, vec![0.2, 0.4, 0.6]);
        assert_eq!(agg.raw.distance, vec![1.0, 1.2, 1.2]);
        assert_eq!(agg.raw.pairs[2], ElementPair::new(C, H));
    }

    #[test]
    fn duplicate_edges_count_toward_the_mean() {
        let agg = aggregate(
            [
                Edge::new(N, O, 0.2, 1.0),
                Edge::new(N, O, 0.2, 1.0),
                Edge::new(N, O, 0.8, 1.0),
            ],
            Vec::<ReferenceEdge>::new(),
            Vec::<Vec<(Element, u64)>>::new(),
        )
        .unwrap();
        assert!(approx_eq(agg.interaction.get(N, O).unwrap(), 0.4, 1e-12));
    }

    #[test]
    fn zero_weight_is_a_defined_mean() {
        let agg = aggregate(
            [Edge::new(C, C, 0.0, 1.5)],
            Vec::<ReferenceEdge>::new(),
            Vec::<Vec<(Element, u64)>>::new(),
        )
        .unwrap();
        assert_eq!(agg.interaction.get(C, C), Some(0.0));
    }

    #[test]
    fn bond_probability_rows_sum_to_one() {
        let mut aggregator = Aggregator::new();
        aggregator.ingest(&make_water()).unwrap();
        aggregator.ingest(&make_hydrogen_fluoride()).unwrap();
        let agg = aggregator.finish();

        let bonds = &agg.bond_probability;
        for i in 0..bonds.len() {
            if let Some(sum) = bonds.row_sum(i) {
                assert!(approx_eq(sum, 1.0, 1e-12), "row {} sums to {}", i, sum);
            }
        }
        // F only appears as a bond target.
        let f = bonds.index_of(F).unwrap();
        assert!(!bonds.row_is_defined(f));
    }

    #[test]
    fn ingest_counts_every_atom() {
        let mut aggregator = Aggregator::new();
        let water = aggregator.ingest(&make_water()).unwrap();
        let hf = aggregator.ingest(&make_hydrogen_fluoride()).unwrap();
        assert_eq!(water, BatchSummary { atoms: 3, edges: 5, references: 4 });
        assert_eq!(hf, BatchSummary { atoms: 2, edges: 2, references: 1 });
        assert_eq!(aggregator.batch_count(), 2);

        let agg = aggregator.finish();
        assert_eq!(agg.total_atoms(), 5);
        assert_eq!(agg.atom_counts.get(&H), Some(&3));
        assert_eq!(agg.element_ids, vec![H, O, F]);
    }

    #[test]
    fn ingest_interaction_means_match_hand_computed_values() {
        let mut aggregator = Aggregator::new();
        aggregator.ingest(&make_water()).unwrap();
        let agg = aggregator.finish();

        assert!(approx_eq(agg.interaction.get(O, H).unwrap(), 0.4, 1e-12));
        assert!(approx_eq(agg.interaction.get(H, O).unwrap(), 0.8, 1e-12));
        assert!(approx_eq(agg.interaction.get(H, H).unwrap(), 0.1, 1e-12));
        assert_eq!(agg.interaction.get(O, O), None);
    }

    #[test]
    fn failed_ingest_leaves_state_untouched() {
        let mut aggregator = Aggregator::new();
        aggregator.ingest(&make_water()).unwrap();

        let mut bad = make_hydrogen_fluoride();
        bad.bonds.push(BondEdge::new(0, 5));
        assert!(aggregator.ingest(&bad).is_err());

        assert_eq!(aggregator.batch_count(), 1);
        assert_eq!(aggregator.edge_count(), 5);
        assert!(!aggregator.element_set().contains(&F));
    }

    #[test]
    fn push_edge_rejects_invalid_values() {
        let mut aggregator = Aggregator::new();
        let err = aggregator
            .push_edge(Edge::new(H, C, 0.1, f64::INFINITY))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidValue { index: 0, .. }));
        assert_eq!(aggregator.edge_count(), 0);
    }

    #[test]
    fn records_with_unknown_atomic_numbers_are_rejected() {
        let mut aggregator = Aggregator::new();
        aggregator.push_edge_record(1, 6, 0.5, 1.1).unwrap();
        aggregator.push_reference_record(1, 8).unwrap();

        let err = aggregator.push_edge_record(1, 17, 0.5, 1.1).unwrap_err();
        assert!(matches!(err, Error::UnknownElement(UnknownElementError(17))));
        assert!(matches!(
            aggregator.push_reference_record(35, 6),
            Err(Error::UnknownElement(UnknownElementError(35)))
        ));

        let agg = aggregator.finish();
        assert_eq!(agg.element_ids, vec![H, C, O]);
        assert_eq!(agg.edge_count(), 1);
        assert_eq!(agg.bond_probability.get(H, O), Some(1.0));
    }

    #[test]
    fn batch_order_does_not_change_results() {
        let mut forward = Aggregator::new();
        forward.ingest(&make_water()).unwrap();
        forward.ingest(&make_hydrogen_fluoride()).unwrap();
        let forward = forward.finish();

        let mut backward = Aggregator::new();
        backward.ingest(&make_hydrogen_fluoride()).unwrap();
        backward.ingest(&make_water()).unwrap();
        let backward = backward.finish();

        assert_eq!(forward.element_ids, backward.element_ids);
        assert_eq!(forward.reference_element_ids, backward.reference_element_ids);
        assert_eq!(forward.interaction.defined_mask(), backward.interaction.defined_mask());
        assert_eq!(
            forward.bond_probability.defined_mask(),
            backward.bond_probability.defined_mask()
        );
        for (a, b) in forward
            .interaction
            .to_rows()
            .into_iter()
            .flatten()
            .zip(backward.interaction.to_rows().into_iter().flatten())
        {
            if let (Some(a), Some(b)) = (a, b) {
                assert!(approx_eq(a, b, 1e-12));
            }
        }
        assert_eq!(forward.atom_counts, backward.atom_counts);
    }

    #[test]
    fn merged_partials_equal_sequential_fold() {
        let mut sequential = Aggregator::new();
        sequential.ingest(&make_water()).unwrap();
        sequential.ingest(&make_hydrogen_fluoride()).unwrap();
        let sequential = sequential.finish();

        let mut left = Aggregator::new();
        left.ingest(&make_water()).unwrap();
        let mut right = Aggregator::new();
        right.ingest(&make_hydrogen_fluoride()).unwrap();
        left.merge(right);
        assert_eq!(left.batch_count(), 2);
        let merged = left.finish();

        assert_eq!(merged, sequential);
    }

    #[test]
    fn empty_aggregator_finishes_empty() {
        let agg = Aggregator::new().finish();
        assert!(agg.element_ids.is_empty());
        assert!(agg.interaction.is_empty());
        assert!(agg.bond_probability.is_empty());
        assert_eq!(agg.total_atoms(), 0);
        assert!(agg.raw.is_empty());
    }
}
