use serde::{Deserialize, Serialize};

use super::types::Element;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    #[serde(alias = "z")]
    pub element: Element,
    #[serde(alias = "pos")]
    pub position: [f64; 3],
}

impl Atom {
    pub fn new(element: Element, position: [f64; 3]) -> Self {
        Self { element, position }
    }

    /// Euclidean distance to another atom in the same units as the positions.
    #[inline]
    pub fn distance_to(&self, other: &Atom) -> f64 {
        let dx = self.position[0] - other.position[0];
        let dy = self.position[1] - other.position[1];
        let dz = self.position[2] - other.position[2];
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean_and_symmetric() {
        let a = Atom::new(Element::C, [0.0, 0.0, 0.0]);
        let b = Atom::new(Element::H, [3.0, 4.0, 0.0]);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&a), 5.0);
        assert_eq!(a.distance_to(&a), 0.0);
    }

    #[test]
    fn deserializes_short_field_names() {
        let atom: Atom = serde_json::from_str(r#"{"z": 8, "pos": [1.0, 2.0, 3.0]}"#).unwrap();
        assert_eq!(atom, Atom::new(Element::O, [1.0, 2.0, 3.0]));
    }
}
