use std::collections::BTreeMap;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use super::error::Error;
use crate::aggregate::{Aggregates, RawEdges};
use crate::model::matrix::ElementMatrix;
use crate::model::types::{Element, ElementPair};

/// Persisted form of an aggregation run.
///
/// Undefined matrix cells are stored as `None`. `raw_element_pairs` is a
/// 2×N layout: source elements, then target elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub element_ids: Vec<Element>,
    pub interaction_matrix: Vec<Vec<Option<f64>>>,
    pub reference_element_ids: Vec<Element>,
    pub bond_probability_matrix: Vec<Vec<Option<f64>>>,
    pub atom_counts: BTreeMap<Element, u64>,
    pub raw_element_pairs: [Vec<Element>; 2],
    pub raw_attention: Vec<f64>,
    pub raw_distance: Vec<f64>,
}

impl From<&Aggregates> for Snapshot {
    fn from(agg: &Aggregates) -> Self {
        Self {
            element_ids: agg.element_ids.clone(),
            interaction_matrix: agg.interaction.to_rows(),
            reference_element_ids: agg.reference_element_ids.clone(),
            bond_probability_matrix: agg.bond_probability.to_rows(),
            atom_counts: agg.atom_counts.clone(),
            raw_element_pairs: agg.raw.element_rows(),
            raw_attention: agg.raw.attention.clone(),
            raw_distance: agg.raw.distance.clone(),
        }
    }
}

impl TryFrom<Snapshot> for Aggregates {
    type Error = Error;

    fn try_from(snapshot: Snapshot) -> Result<Self, Self::Error> {
        check_sorted("element_ids", &snapshot.element_ids)?;
        check_sorted("reference_element_ids", &snapshot.reference_element_ids)?;

        let interaction = ElementMatrix::from_rows(
            snapshot.element_ids.clone(),
            snapshot.interaction_matrix,
        )
        .ok_or_else(|| {
            Error::corrupt(format!(
                "interaction_matrix is not {n}×{n}",
                n = snapshot.element_ids.len()
            ))
        })?;

        let bond_probability = ElementMatrix::from_rows(
            snapshot.reference_element_ids.clone(),
            snapshot.bond_probability_matrix,
        )
        .ok_or_else(|| {
            Error::corrupt(format!(
                "bond_probability_matrix is not {n}×{n}",
                n = snapshot.reference_element_ids.len()
            ))
        })?;

        let [sources, targets] = snapshot.raw_element_pairs;
        let n = snapshot.raw_attention.len();
        if sources.len() != n || targets.len() != n || snapshot.raw_distance.len() != n {
            return Err(Error::corrupt(format!(
                "raw arrays differ in length: {} sources, {} targets, {} attention, {} distance",
                sources.len(),
                targets.len(),
                n,
                snapshot.raw_distance.len()
            )));
        }

        let raw = RawEdges {
            pairs: sources
                .into_iter()
                .zip(targets)
                .map(|(s, t)| ElementPair::new(s, t))
                .collect(),
            attention: snapshot.raw_attention,
            distance: snapshot.raw_distance,
        };

        Ok(Aggregates {
            element_ids: snapshot.element_ids,
            interaction,
            reference_element_ids: snapshot.reference_element_ids,
            bond_probability,
            atom_counts: snapshot.atom_counts,
            raw,
        })
    }
}

fn check_sorted(field: &str, elements: &[Element]) -> Result<(), Error> {
    if elements.windows(2).all(|w| w[0] < w[1]) {
        Ok(())
    } else {
        Err(Error::corrupt(format!(
            "{field} is not strictly ascending"
        )))
    }
}

/// Writes `aggregates` as a binary snapshot.
pub fn write_snapshot<W: Write>(aggregates: &Aggregates, mut writer: W) -> Result<(), Error> {
    let snapshot = Snapshot::from(aggregates);
    bincode::serialize_into(&mut writer, &snapshot)?;
    writer.flush()?;
    log::info!(
        "wrote snapshot: {} elements, {} raw edges",
        snapshot.element_ids.len(),
        snapshot.raw_attention.len()
    );
    Ok(())
}

/// Reads a binary snapshot and rebuilds the [`Aggregates`].
///
/// # Errors
///
/// Returns [`Error::Encoding`] if the bytes are not a snapshot, and
/// [`Error::Corrupt`] if the decoded record is internally inconsistent.
pub fn read_snapshot<R: Read>(reader: R) -> Result<Aggregates, Error> {
    let snapshot: Snapshot = bincode::deserialize_from(reader)?;
    Aggregates::try_from(snapshot)
}
