//! Element-pair analysis of graph neural network attention over molecular structures.
//! It folds per-edge attention scores and reference bond topologies into element × element
//! interaction and bond-probability matrices, and smooths attention against interatomic distance.
//!
//! # Features
//!
//! - **Interaction matrix** — Mean attention per ordered element pair, with
//!   explicitly undefined cells for pairs that were never scored
//! - **Bond probabilities** — Reference bonds row-normalized into
//!   P(target element | source element)
//! - **Distance curves** — Centered moving average of attention over
//!   distance-sorted edges of one element pair
//! - **Snapshots** — Binary persistence of every aggregate plus the raw
//!   per-edge arrays for later analysis
//!
//! # Quick Start
//!
//! The main entry point is the [`Aggregator`], which folds [`Batch`]es into
//! [`Aggregates`]:
//!
//! ```
//! use attn_census::{Aggregator, Atom, Batch, BondEdge, Element, Interaction};
//! use attn_census::{AggregateError, smooth};
//!
//! // Water, as scored by the model
//! let mut batch = Batch::new();
//! batch.atoms.push(Atom::new(Element::O, [ 0.000, 0.000, 0.000]));
//! batch.atoms.push(Atom::new(Element::H, [ 0.957, 0.000, 0.000]));
//! batch.atoms.push(Atom::new(Element::H, [-0.240, 0.927, 0.000]));
//!
//! // Attention from each atom to its neighbors
//! batch.interactions.push(Interaction::new(0, 1, 0.30)); // O → H
//! batch.interactions.push(Interaction::new(0, 2, 0.50)); // O → H
//! batch.interactions.push(Interaction::new(1, 0, 0.90)); // H → O
//! batch.interactions.push(Interaction::new(2, 0, 0.70)); // H → O
//!
//! // Guessed bonds, both directions
//! batch.bonds.push(BondEdge::new(0, 1));
//! batch.bonds.push(BondEdge::new(1, 0));
//! batch.bonds.push(BondEdge::new(0, 2));
//! batch.bonds.push(BondEdge::new(2, 0));
//!
//! let mut aggregator = Aggregator::new();
//! aggregator.ingest(&batch)?;
//! let aggregates = aggregator.finish();
//!
//! // Elements are sorted by atomic number
//! assert_eq!(aggregates.element_ids, vec![Element::H, Element::O]);
//!
//! // Mean attention H → O is (0.9 + 0.7) / 2
//! let h_to_o = aggregates.interaction.get(Element::H, Element::O).unwrap();
//! assert!((h_to_o - 0.8).abs() < 1e-12);
//!
//! // H → H was never scored, so the cell is undefined rather than zero
//! assert_eq!(aggregates.interaction.get(Element::H, Element::H), None);
//!
//! // Every hydrogen bond in water goes to oxygen
//! assert_eq!(aggregates.bond_probability.get(Element::H, Element::O), Some(1.0));
//!
//! // Attention by distance for O–H, both orientations
//! let curve = smooth(&aggregates.raw, Element::O, Element::H, 1).unwrap();
//! assert_eq!(curve.len(), 4);
//! # Ok::<(), AggregateError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`aggregate`] — Extraction aggregator and the [`aggregate()`] shortcut
//! - [`smooth`](mod@smooth) — Distance-curve smoother and histograms
//! - [`config`] — TOML analysis settings
//! - [`io`] — Batch streams, binary snapshots, CSV export
//!
//! # Data Types
//!
//! ## Inputs
//!
//! - [`Batch`] — Atoms, scored interactions, and reference bonds by atom index
//! - [`Atom`] — Element and Cartesian coordinates
//! - [`Interaction`] — Attention weight between two atoms
//! - [`BondEdge`] — Directed reference bond between two atoms
//! - [`Edge`] / [`ReferenceEdge`] — Element-level edges
//! - [`Element`] — H, C, N, O, or F
//!
//! ## Outputs
//!
//! - [`Aggregates`] — Element set, matrices, atom counts, raw edges
//! - [`ElementMatrix`] — Square element matrix with `Option<f64>` cells
//! - [`RawEdges`] — Parallel per-edge arrays
//! - [`DistanceCurve`] — Smoothed attention by distance

pub mod aggregate;
pub mod config;
pub mod io;
pub mod smooth;

mod model;

pub use model::atom::Atom;
pub use model::batch::{Batch, BondEdge, Interaction};
pub use model::edge::{Edge, ReferenceEdge};
pub use model::matrix::ElementMatrix;
pub use model::types::{Element, ElementPair, ParseElementError, UnknownElementError};

pub use aggregate::{Aggregates, Aggregator, BatchSummary, RawEdges, aggregate};
pub use config::{AnalysisConfig, CurveSettings, MatrixSettings, load_config};
pub use smooth::{CurvePoint, CurveStatus, DistanceCurve, Histogram, smooth};

pub use aggregate::Error as AggregateError;
pub use smooth::Error as SmoothError;
