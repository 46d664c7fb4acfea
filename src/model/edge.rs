use serde::{Deserialize, Serialize};

use super::types::{Element, ElementPair, UnknownElementError};

/// One attention-scored, directed atom-pair observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: Element,
    pub target: Element,
    /// Attention weight assigned by the model (non-negative).
    pub weight: f64,
    /// Interatomic distance in Ångströms.
    pub distance: f64,
}

impl Edge {
    pub fn new(source: Element, target: Element, weight: f64, distance: f64) -> Self {
        Self {
            source,
            target,
            weight,
            distance,
        }
    }

    /// Builds an edge from raw atomic numbers, rejecting codes outside the
    /// element vocabulary.
    pub fn from_atomic_numbers(
        source: u8,
        target: u8,
        weight: f64,
        distance: f64,
    ) -> Result<Self, UnknownElementError> {
        Ok(Self::new(
            Element::try_from(source)?,
            Element::try_from(target)?,
            weight,
            distance,
        ))
    }

    #[inline]
    pub fn pair(&self) -> ElementPair {
        ElementPair::new(self.source, self.target)
    }
}

/// One directed atom-pair observation from the (guessed) bond topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceEdge {
    pub source: Element,
    pub target: Element,
}

impl ReferenceEdge {
    pub fn new(source: Element, target: Element) -> Self {
        Self { source, target }
    }

    pub fn from_atomic_numbers(source: u8, target: u8) -> Result<Self, UnknownElementError> {
        Ok(Self::new(Element::try_from(source)?, Element::try_from(target)?))
    }

    #[inline]
    pub fn pair(&self) -> ElementPair {
        ElementPair::new(self.source, self.target)
    }
}
