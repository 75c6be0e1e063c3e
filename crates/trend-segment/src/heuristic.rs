//! Divide-and-conquer segmentation
//!
//! Works on the smoothed, rescaled series in three phases. The divide
//! phase recursively bisects the series wherever two linear fits beat
//! one. The conquer phase measures how straight each boundary is and
//! merges away the boundaries that do not bend the series. The final
//! phase accepts a surviving boundary only when the segments around it
//! differ enough in slope, or form a genuine reversal, and only when it
//! keeps its distance from the previously accepted breakpoint.

use std::cmp::Ordering;

use tracing::{debug, instrument};
use trend_core::{math, Result, Segment, Series};

use crate::smoothing::LowPassFilter;
use crate::traits::Segmenter;

/// Tuning parameters for [`DivideConquerSegmenter`]
#[derive(Debug, Clone, PartialEq)]
pub struct DivideConquerParameters {
    /// Bisection rounds in the divide phase
    pub divide_rounds: usize,
    /// Minimum distance of a split from either end of its segment
    pub min_segment_size: usize,
    /// Boundaries straighter than this angle (degrees) are merged away
    pub conquer_cutoff_angle: f64,
    /// Log-slope difference a boundary must exceed to be accepted
    pub slope_difference_threshold: f64,
    /// Angle (degrees) below which an opposite-sign bend is accepted
    pub reversal_angle: f64,
    /// Minimum index distance between accepted breakpoints
    pub min_breakpoint_spacing: usize,
    /// Low-pass cutoff as a fraction of Nyquist
    pub smoothing_cutoff: f64,
    /// Shortest sub-trend this strategy may produce
    pub min_segment_length: usize,
}

impl Default for DivideConquerParameters {
    fn default() -> Self {
        Self {
            divide_rounds: 4,
            min_segment_size: 3,
            conquer_cutoff_angle: 120.0,
            slope_difference_threshold: 2.3,
            reversal_angle: 80.0,
            min_breakpoint_spacing: 4,
            smoothing_cutoff: 0.3,
            min_segment_length: 4,
        }
    }
}

/// Heuristic divide-and-conquer segmenter
///
/// Fast and deterministic; a good fallback when the model-search
/// strategy is too expensive.
#[derive(Debug, Clone, Default)]
pub struct DivideConquerSegmenter {
    params: DivideConquerParameters,
}

impl DivideConquerSegmenter {
    /// Segmenter with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Segmenter with explicit parameters
    pub fn with_params(params: DivideConquerParameters) -> Self {
        Self { params }
    }

    /// Current parameters
    pub fn parameters(&self) -> &DivideConquerParameters {
        &self.params
    }

    /// Recursively bisect wherever two fits beat one
    fn divide(&self, xs: &[f64], ys: &[f64]) -> Vec<Segment> {
        let mut segments = vec![Segment::new(0, xs.len() - 1)];
        for round in 0..self.params.divide_rounds {
            let mut next = Vec::with_capacity(segments.len() * 2);
            let mut split_any = false;
            for &seg in &segments {
                match self.best_split(xs, ys, seg) {
                    Some(center) => {
                        next.push(Segment::new(seg.start, center));
                        next.push(Segment::new(center, seg.end));
                        split_any = true;
                    }
                    None => next.push(seg),
                }
            }
            segments = next;
            if !split_any {
                debug!(round, "divide settled early");
                break;
            }
        }
        segments
    }

    /// Best split index for one segment, or `None` when no split
    /// improves on the single fit
    fn best_split(&self, xs: &[f64], ys: &[f64], seg: Segment) -> Option<usize> {
        let margin = self.params.min_segment_size.max(1);
        if seg.end < seg.start + 2 * margin {
            return None;
        }
        let whole = deviation(xs, ys, seg.start, seg.end);
        let mut best: Option<(usize, f64)> = None;
        for center in (seg.start + margin)..=(seg.end - margin) {
            let split =
                deviation(xs, ys, seg.start, center - 1) + deviation(xs, ys, center, seg.end);
            let current = best.map_or(whole, |(_, d)| d);
            if split < current {
                best = Some((center, split));
            }
        }
        best.map(|(center, _)| center)
    }

    /// Merge away boundaries the series passes straight through
    ///
    /// Each boundary is measured once, on the divide partition, then
    /// candidates are processed from straightest down. A merge changes
    /// the chords next to it, so a candidate is skipped when either
    /// segment of its measured pair has already been absorbed.
    fn conquer(&self, xs: &[f64], ys: &[f64], segments: &[Segment]) -> Vec<Segment> {
        if segments.len() < 2 {
            return segments.to_vec();
        }
        let last = segments[segments.len() - 1].end;

        let mut eligible = Vec::new();
        for pair in segments.windows(2) {
            let measure = straightness(xs, ys, pair[0], pair[1]);
            if measure > self.params.conquer_cutoff_angle {
                eligible.push((measure, pair[0], pair[1]));
            }
        }
        eligible.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        let mut boundaries: Vec<usize> = segments[..segments.len() - 1]
            .iter()
            .map(|s| s.end)
            .collect();
        for (measure, left, right) in eligible {
            let pair_intact = boundaries.contains(&left.end)
                && (left.start == 0 || boundaries.contains(&left.start))
                && (right.end == last || boundaries.contains(&right.end));
            if !pair_intact {
                continue;
            }
            debug!(boundary = left.end, measure, "merging straight boundary");
            boundaries.retain(|&b| b != left.end);
        }

        let mut cuts = Vec::with_capacity(boundaries.len() + 2);
        cuts.push(0);
        cuts.extend(boundaries);
        cuts.push(last);
        cuts.windows(2).map(|w| Segment::new(w[0], w[1])).collect()
    }

    /// Final acceptance over the surviving boundaries, left to right
    fn accept(&self, xs: &[f64], ys: &[f64], segments: &[Segment]) -> Vec<usize> {
        let mut splits: Vec<usize> = Vec::new();
        for pair in segments.windows(2) {
            let (left, right) = (pair[0], pair[1]);
            let from = splits.last().copied().unwrap_or(0);
            if left.end - from < self.params.min_breakpoint_spacing {
                continue;
            }

            let left_slope = chord_slope(xs, ys, left);
            let right_slope = chord_slope(xs, ys, right);
            let difference =
                ((1.0 + left_slope * left_slope).ln() - (1.0 + right_slope * right_slope).ln()).abs();
            let measure = straightness(xs, ys, left, right);
            let reversal =
                left_slope * right_slope < 0.0 && measure < self.params.reversal_angle;

            if difference > self.params.slope_difference_threshold || reversal {
                debug!(boundary = left.end, difference, measure, "accepted breakpoint");
                splits.push(left.end);
            }
        }
        splits
    }
}

impl Segmenter for DivideConquerSegmenter {
    fn algorithm_name(&self) -> &'static str {
        "divide-conquer"
    }

    fn min_segment_length(&self) -> usize {
        self.params.min_segment_length
    }

    #[instrument(skip(self, series), fields(n = series.len()))]
    fn segment(&self, series: &Series) -> Result<Vec<i64>> {
        if series.len() < 2 * self.min_segment_length() {
            debug!(n = series.len(), "series too short to split");
            return Ok(Vec::new());
        }
        if series.max_y() <= 0.0 {
            debug!("series maximum is not positive, nothing to segment");
            return Ok(Vec::new());
        }

        let filter = LowPassFilter::new(self.params.smoothing_cutoff)?;
        let smoothed = filter.apply(&series.rescaled_ys());
        let xs = series.xs_f64();

        let segments = self.divide(&xs, &smoothed);
        let segments = self.conquer(&xs, &smoothed, &segments);
        let splits = self.accept(&xs, &smoothed, &segments);

        Ok(splits.into_iter().map(|i| series.xs()[i]).collect())
    }
}

/// Linear-fit residual over the inclusive index range; unfittable
/// windows count as infinitely bad
fn deviation(xs: &[f64], ys: &[f64], start: usize, end: usize) -> f64 {
    let xw = &xs[start..=end];
    let yw = &ys[start..=end];
    match math::ols_line(xw, yw) {
        Ok(line) => math::rss_about_line(xw, yw, &line),
        Err(_) => f64::INFINITY,
    }
}

/// Straightness of the joint between two segments, in degrees
///
/// 180 means the second chord continues the first exactly; 0 means a
/// full reversal. A degenerate chord counts as straight.
fn straightness(xs: &[f64], ys: &[f64], first: Segment, second: Segment) -> f64 {
    let u = (
        xs[first.end] - xs[first.start],
        ys[first.end] - ys[first.start],
    );
    let v = (
        xs[second.end] - xs[second.start],
        ys[second.end] - ys[second.start],
    );
    let norm = (u.0 * u.0 + u.1 * u.1).sqrt() * (v.0 * v.0 + v.1 * v.1).sqrt();
    if norm == 0.0 {
        return 180.0;
    }
    let cos = ((u.0 * v.0 + u.1 * v.1) / norm).clamp(-1.0, 1.0);
    180.0 - cos.acos().to_degrees()
}

/// Slope of the straight chord across a segment
fn chord_slope(xs: &[f64], ys: &[f64], seg: Segment) -> f64 {
    (ys[seg.end] - ys[seg.start]) / (xs[seg.end] - xs[seg.start])
}
