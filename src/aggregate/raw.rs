use crate::model::edge::Edge;
use crate::model::types::{Element, ElementPair};

/// Unaggregated per-edge arrays, kept for edge-granularity analyses such as
/// the attention-by-distance curve.
///
/// The three arrays are parallel: position `k` of each describes the same
/// edge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawEdges {
    pub pairs: Vec<ElementPair>,
    pub attention: Vec<f64>,
    pub distance: Vec<f64>,
}

impl RawEdges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, edge: &Edge) {
        self.pairs.push(edge.pair());
        self.attention.push(edge.weight);
        self.distance.push(edge.distance);
    }

    pub fn append(&mut self, other: &mut RawEdges) {
        self.pairs.append(&mut other.pairs);
        self.attention.append(&mut other.attention);
        self.distance.append(&mut other.distance);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Returns `true` if all three arrays have the same length.
    pub fn is_consistent(&self) -> bool {
        self.attention.len() == self.pairs.len() && self.distance.len() == self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Edge> + '_ {
        self.pairs
            .iter()
            .zip(&self.attention)
            .zip(&self.distance)
            .map(|((pair, &weight), &distance)| Edge::new(pair.source, pair.target, weight, distance))
    }

    /// Splits the pairs into a 2×N layout: sources, then targets.
    pub fn element_rows(&self) -> [Vec<Element>; 2] {
        [
            self.pairs.iter().map(|p| p.source).collect(),
            self.pairs.iter().map(|p| p.target).collect(),
        ]
    }
}
