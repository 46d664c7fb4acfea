use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unsupported atomic number: {0} (expected one of H, C, N, O, F)")]
pub struct UnknownElementError(pub u8);

/// Chemical element of an atom seen by the attention model.
///
/// The vocabulary is closed: only the elements of organic small-molecule
/// datasets are representable, and every other atomic number is rejected
/// at the boundary. Variants are declared in atomic-number order, so the
/// derived [`Ord`] sorts by atomic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Element {
    H = 1,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
}

impl Element {
    /// All supported elements in atomic-number order.
    pub const ALL: [Element; 5] = [Element::H, Element::C, Element::N, Element::O, Element::F];

    #[inline]
    pub fn atomic_number(&self) -> u8 {
        *self as u8
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Element::H => "H",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Element::H => "Hydrogen",
            Element::C => "Carbon",
            Element::N => "Nitrogen",
            Element::O => "Oxygen",
            Element::F => "Fluorine",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "H" => Ok(Element::H),
            "C" => Ok(Element::C),
            "N" => Ok(Element::N),
            "O" => Ok(Element::O),
            "F" => Ok(Element::F),
            _ => Err(ParseElementError(s.to_string())),
        }
    }
}

impl TryFrom<u8> for Element {
    type Error = UnknownElementError;

    fn try_from(z: u8) -> Result<Self, Self::Error> {
        match z {
            1 => Ok(Element::H),
            6 => Ok(Element::C),
            7 => Ok(Element::N),
            8 => Ok(Element::O),
            9 => Ok(Element::F),
            _ => Err(UnknownElementError(z)),
        }
    }
}

impl From<Element> for u8 {
    fn from(element: Element) -> Self {
        element.atomic_number()
    }
}

/// Ordered (directed) pair of elements: the source atom attends to the target atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementPair {
    pub source: Element,
    pub target: Element,
}

impl ElementPair {
    pub fn new(source: Element, target: Element) -> Self {
        Self { source, target }
    }

    /// Returns `true` if this pair is `{a, b}` in either direction.
    #[inline]
    pub fn matches_unordered(&self, a: Element, b: Element) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }

    pub fn reversed(&self) -> Self {
        Self {
            source: self.target,
            target: self.source,
        }
    }
}

impl fmt::Display for ElementPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

impl FromStr for ElementPair {
    type Err = ParseElementError;

    /// Parses `"H-C"` (also accepts `"H,C"` and `"H:C"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(['-', ',', ':']);
        let (Some(a), Some(b), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ParseElementError(s.to_string()));
        };
        Ok(Self::new(a.trim().parse()?, b.trim().parse()?))
    }
}
