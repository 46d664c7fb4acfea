//! Attention-versus-distance curves for one element pair.
//!
//! [`smooth`] selects the raw edges of an unordered element pair, sorts them
//! by distance, and denoises the attention weights with a centered moving
//! average. Positions too close to either end for a full window are
//! reported as undefined rather than zero.

mod histogram;

pub use histogram::Histogram;

use thiserror::Error;

use crate::aggregate::RawEdges;
use crate::model::types::{Element, ElementPair};

/// Errors that can occur while building a distance curve.
#[derive(Debug, Error)]
pub enum Error {
    /// The moving-average window must cover at least one sample.
    #[error("moving-average window must be at least 1")]
    InvalidWindow,

    /// The raw edge arrays do not have matching lengths.
    #[error(
        "raw edge arrays have mismatched lengths: {pairs} pairs, {attention} attention weights, {distance} distances"
    )]
    LengthMismatch {
        pairs: usize,
        attention: usize,
        distance: usize,
    },

    /// Histograms need at least one bin.
    #[error("histogram must have at least one bin")]
    InvalidBins,
}

/// One distance-sorted sample with its smoothed attention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub distance: f64,
    /// Smoothed attention, `None` near the boundaries.
    pub attention: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveStatus {
    /// The curve was smoothed; `defined` positions carry a value.
    Smoothed { defined: usize },
    /// Fewer samples than the window matched the pair; every position is
    /// undefined.
    InsufficientData { samples: usize, window: usize },
}

/// Smoothed attention-by-distance curve of one element pair.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceCurve {
    /// The pair as requested; matching is orientation-independent.
    pub pair: ElementPair,
    pub window: usize,
    pub points: Vec<CurvePoint>,
    pub status: CurveStatus,
}

impl DistanceCurve {
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self.status, CurveStatus::InsufficientData { .. })
    }

    pub fn defined_count(&self) -> usize {
        self.points.iter().filter(|p| p.attention.is_some()).count()
    }

    /// Returns `true` if at least one position carries a smoothed value.
    ///
    /// A curve can be [`CurveStatus::Smoothed`] and still have none when
    /// `window <= n < 2 * window - 1`.
    pub fn has_values(&self) -> bool {
        self.points.iter().any(|p| p.attention.is_some())
    }

    /// Equal-width histogram of the matched distances.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBins`] if `bins` is zero.
    pub fn histogram(&self, bins: usize) -> Result<Histogram, Error> {
        let distances: Vec<f64> = self.points.iter().map(|p| p.distance).collect();
        Histogram::from_values(&distances, bins)
    }
}

/// Builds the smoothed attention-by-distance curve for `{a, b}`.
///
/// Edges of both orientations (`a → b` and `b → a`) are included. The
/// matched samples are stably sorted by distance, so samples at equal
/// distance keep their input order. The smoothed value at sorted position
/// `i` is the mean attention of the `window` samples starting at
/// `i - window / 2`; it is defined only for `window - 1 <= i <= n - window`.
/// With `window == 1` every position is defined and equals its own sample.
///
/// # Errors
///
/// Returns [`Error::InvalidWindow`] if `window` is zero and
/// [`Error::LengthMismatch`] if the raw arrays are not parallel.
pub fn smooth(raw: &RawEdges, a: Element, b: Element, window: usize) -> Result<DistanceCurve, Error> {
    if window == 0 {
        return Err(Error::InvalidWindow);
    }
    if !raw.is_consistent() {
        return Err(Error::LengthMismatch {
            pairs: raw.pairs.len(),
            attention: raw.attention.len(),
            distance: raw.distance.len(),
        });
    }

    let mut samples: Vec<(f64, f64)> = raw
        .pairs
        .iter()
        .zip(raw.attention.iter().zip(&raw.distance))
        .filter(|(pair, _)| pair.matches_unordered(a, b))
        .map(|(_, (&attention, &distance))| (attention, distance))
        .collect();
    samples.sort_by(|x, y| x.1.total_cmp(&y.1));

    let n = samples.len();
    let pair = ElementPair::new(a, b);

    if n < window {
        log::warn!(
            "insufficient data for {pair} distance curve: {n} samples, window {window}"
        );
        return Ok(DistanceCurve {
            pair,
            window,
            points: samples
                .iter()
                .map(|&(_, distance)| CurvePoint {
                    distance,
                    attention: None,
                })
                .collect(),
            status: CurveStatus::InsufficientData { samples: n, window },
        });
    }

    let attention: Vec<f64> = samples.iter().map(|s| s.0).collect();
    let means = centered_means(&attention, window);
    let points: Vec<CurvePoint> = samples
        .iter()
        .zip(means)
        .map(|(&(_, distance), attention)| CurvePoint {
            distance,
            attention,
        })
        .collect();
    let defined = points.iter().filter(|p| p.attention.is_some()).count();

    if defined == 0 {
        log::warn!(
            "{pair} distance curve has no smoothed positions: {n} samples leave no full window of {window} on both sides"
        );
    } else {
        log::debug!("{pair} distance curve: {n} samples, {defined} smoothed positions");
    }

    Ok(DistanceCurve {
        pair,
        window,
        points,
        status: CurveStatus::Smoothed { defined },
    })
}

/// Centered moving average with undefined boundaries.
///
/// Position `i` averages `values[i - window/2 .. i - window/2 + window]` and
/// is defined for `window - 1 <= i <= n - window`. Each window is summed
/// directly, so `window == 1` reproduces the input exactly.
fn centered_means(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut out = vec![None; n];
    if window == 0 || n < window {
        return out;
    }

    let half = window / 2;
    for (i, slot) in out.iter_mut().enumerate().take(n - window + 1).skip(window - 1) {
        let start = i - half;
        *slot = Some(values[start..start + window].iter().sum::<f64>() / window as f64);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::edge::Edge;
    use crate::model::types::Element::{C, H, N, O};

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn raw_from(edges: &[Edge]) -> RawEdges {
        let mut raw = RawEdges::new();
        for edge in edges {
            raw.push(edge);
        }
        raw
    }

    fn hc_scenario() -> RawEdges {
        raw_from(&[
            Edge::new(H, C, 0.4, 1.2),
            Edge::new(O, H, 0.9, 0.9),
            Edge::new(H, C, 0.2, 1.0),
            Edge::new(C, H, 0.6, 1.2),
            Edge::new(C, C, 0.5, 1.5),
        ])
    }

    #[test]
    fn filters_both_orientations_and_sorts_stably() {
        let curve = smooth(&hc_scenario(), H, C, 1).unwrap();
        let distances: Vec<f64> = curve.points.iter().map(|p| p.distance).collect();
        let attention: Vec<Option<f64>> = curve.points.iter().map(|p| p.attention).collect();
        assert_eq!(distances, vec![1.0, 1.2, 1.2]);
        // The two samples at 1.2 keep their input order.
        assert_eq!(attention, vec![Some(0.2), Some(0.4), Some(0.6)]);
    }

    #[test]
    fn window_one_defines_every_position_as_itself() {
        let curve = smooth(&hc_scenario(), C, H, 1).unwrap();
        assert_eq!(curve.len(), 3);
        assert_eq!(curve.status, CurveStatus::Smoothed { defined: 3 });
        for (point, expected) in curve.points.iter().zip([0.2, 0.4, 0.6]) {
            assert!(approx_eq(point.attention.unwrap(), expected, 1e-12));
        }
    }

    #[test]
    fn window_two_leaves_one_centered_value() {
        let curve = smooth(&hc_scenario(), H, C, 2).unwrap();
        assert_eq!(curve.len(), 3);
        assert_eq!(curve.points[0].attention, None);
        assert!(approx_eq(curve.points[1].attention.unwrap(), 0.3, 1e-12));
        assert_eq!(curve.points[2].attention, None);
        assert_eq!(curve.defined_count(), 1);
    }

    #[test]
    fn boundary_positions_are_undefined() {
        let edges: Vec<Edge> = (0..10)
            .map(|k| Edge::new(N, O, k as f64, 1.0 + k as f64 * 0.1))
            .collect();
        let curve = smooth(&raw_from(&edges), N, O, 3).unwrap();

        assert_eq!(curve.len(), 10);
        for i in 0..2 {
            assert_eq!(curve.points[i].attention, None);
            assert_eq!(curve.points[9 - i].attention, None);
        }
        // Position i averages i-1, i, i+1.
        for i in 2..=7 {
            assert!(approx_eq(curve.points[i].attention.unwrap(), i as f64, 1e-9));
        }
        assert_eq!(curve.status, CurveStatus::Smoothed { defined: 6 });
    }

    #[test]
    fn window_one_reproduces_sorted_input_exactly() {
        let weights = [0.1, 0.7, 0.2, 0.30000000000000004, 1e-9, 123.456, 0.4];
        let edges: Vec<Edge> = weights
            .iter()
            .enumerate()
            .map(|(k, &w)| Edge::new(O, H, w, 3.0 - k as f64 * 0.25))
            .collect();
        let curve = smooth(&raw_from(&edges), H, O, 1).unwrap();

        // Distances descend with k, so sorting reverses the input.
        let expected: Vec<Option<f64>> = weights.iter().rev().map(|&w| Some(w)).collect();
        let actual: Vec<Option<f64>> = curve.points.iter().map(|p| p.attention).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn window_means_match_direct_sums_over_mixed_magnitudes() {
        let values: Vec<f64> = (0..400)
            .map(|k| if k < 200 { 1000.0 + k as f64 } else { 1e-6 * (k % 7 + 1) as f64 })
            .collect();

        for window in [1, 2, 5, 50] {
            let means = centered_means(&values, window);
            for (i, mean) in means.iter().enumerate() {
                if i + 1 < window || i + window > values.len() {
                    assert_eq!(*mean, None, "window {} position {}", window, i);
                    continue;
                }
                let start = i - window / 2;
                let direct: f64 = values[start..start + window].iter().sum::<f64>() / window as f64;
                assert_eq!(*mean, Some(direct), "window {} position {}", window, i);
            }
        }

        // The tail windows hold only small values and must not inherit error from the large head.
        let tail = centered_means(&values, 50)[350].unwrap();
        let expected: f64 = values[325..375].iter().sum::<f64>() / 50.0;
        assert!((tail - expected).abs() <= expected * 1e-12);
        assert!(tail < 1e-5);
    }

    #[test]
    fn no_full_window_leaves_smoothed_curve_without_values() {
        let edges: Vec<Edge> = (0..5)
            .map(|k| Edge::new(C, C, 0.1 * k as f64, 1.0 + k as f64))
            .collect();
        let curve = smooth(&raw_from(&edges), C, C, 4).unwrap();

        assert_eq!(curve.status, CurveStatus::Smoothed { defined: 0 });
        assert!(!curve.is_insufficient());
        assert!(!curve.has_values());
        assert!(smooth(&hc_scenario(), H, C, 2).unwrap().has_values());
    }

    #[test]
    fn fewer_samples_than_window_is_insufficient() {
        let curve = smooth(&hc_scenario(), H, C, 4).unwrap();
        assert!(curve.is_insufficient());
        assert_eq!(
            curve.status,
            CurveStatus::InsufficientData {
                samples: 3,
                window: 4
            }
        );
        assert_eq!(curve.len(), 3);
        assert!(curve.points.iter().all(|p| p.attention.is_none()));
    }

    #[test]
    fn unmatched_pair_yields_empty_insufficient_curve() {
        let curve = smooth(&hc_scenario(), N, N, 1).unwrap();
        assert!(curve.is_empty());
        assert!(curve.is_insufficient());
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(matches!(
            smooth(&hc_scenario(), H, C, 0),
            Err(Error::InvalidWindow)
        ));
    }

    #[test]
    fn mismatched_arrays_are_rejected() {
        let mut raw = hc_scenario();
        raw.distance.pop();
        assert!(matches!(
            smooth(&raw, H, C, 1),
            Err(Error::LengthMismatch {
                pairs: 5,
                attention: 5,
                distance: 4
            })
        ));
    }

    #[test]
    fn curve_histogram_counts_matched_samples() {
        let curve = smooth(&hc_scenario(), H, C, 1).unwrap();
        let hist = curve.histogram(2).unwrap();
        assert_eq!(hist.counts, vec![1, 2]);
        assert_eq!(hist.total(), 3);
    }
}
