//! Core data structures flowing through `attn-census`.
//!
//! - [`types`] – The closed element vocabulary and ordered element pairs.
//! - [`atom`] – Minimal atom representation with element and Cartesian coordinates.
//! - [`batch`] – One model batch: atoms, scored interactions, and reference bonds by index.
//! - [`edge`] – Element-resolved attention edges and reference edges.
//! - [`matrix`] – Element × element matrices with explicit undefined cells.
//!
//! Batches carry raw indices as produced upstream; the [`crate::aggregate`]
//! module resolves them into [`edge::Edge`]s and [`edge::ReferenceEdge`]s
//! and reduces those into [`matrix::ElementMatrix`] aggregates.

pub mod atom;
pub mod batch;
pub mod edge;
pub mod matrix;
pub mod types;
