//! Model-search segmentation
//!
//! Fits segmented regressions for every candidate breakpoint count in
//! parallel, scores each converged model, and keeps the breakpoints of
//! the best one. Leading runs of zeros are trimmed before the search
//! so a series that only comes alive partway through is not modeled
//! across its silent prefix; the trim position itself is reported as a
//! breakpoint.

use std::cmp::Ordering;

use rand::prelude::*;
use rayon::prelude::*;
use tracing::{debug, instrument, warn};

use crate::traits::Segmenter;
use trend_core::{Error, Result, Series};
use trend_piecewise::PiecewiseFit;

/// Spacing between derived per-task seeds, larger than any restart count
const SEED_STRIDE: u64 = 10_007;

/// Tuning parameters for [`ModelSearchSegmenter`]
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSearchParameters {
    /// Largest breakpoint count tried
    pub max_breakpoints: usize,
    /// Independent fits per breakpoint count
    pub fit_repetitions: usize,
    /// Bootstrap restarts inside each fit
    pub n_boot: usize,
    /// Worker threads for the candidate search
    pub max_workers: usize,
    /// Shortest sub-trend this strategy may produce
    pub min_segment_length: usize,
    /// Seed for reproducible searches; `None` draws one per call
    pub seed: Option<u64>,
}

impl Default for ModelSearchParameters {
    fn default() -> Self {
        Self {
            max_breakpoints: 10,
            fit_repetitions: 2,
            n_boot: 500,
            max_workers: 4,
            min_segment_length: 4,
            seed: None,
        }
    }
}

/// One converged candidate model
#[derive(Debug, Clone)]
struct Candidate {
    n_breakpoints: usize,
    score: f64,
    breakpoints: Vec<f64>,
}

/// Statistical model-search segmenter
///
/// The default strategy: slower than the divide-and-conquer heuristic
/// but grounded in an explicit model comparison.
#[derive(Debug, Clone, Default)]
pub struct ModelSearchSegmenter {
    params: ModelSearchParameters,
}

impl ModelSearchSegmenter {
    /// Segmenter with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Segmenter with explicit parameters
    pub fn with_params(params: ModelSearchParameters) -> Self {
        Self { params }
    }

    /// Fix the seed for reproducible searches
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.params.seed = Some(seed);
        self
    }

    /// Current parameters
    pub fn parameters(&self) -> &ModelSearchParameters {
        &self.params
    }

    /// Run every candidate breakpoint count on a worker pool
    fn search(&self, xs: &[f64], ys: &[f64], seed: u64) -> Result<Vec<Candidate>> {
        let ks: Vec<usize> = (1..=self.params.max_breakpoints).collect();
        // Minimum breakpoint separation shrinks with series length: two
        // index steps, expressed as a fraction of the x range
        let min_distance = 2.0 / xs.len() as f64;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.params.max_workers)
            .build()
            .map_err(|e| Error::Execution(format!("Failed to create thread pool: {e}")))?;

        let candidates: Vec<Option<Candidate>> = pool.install(|| {
            ks.into_par_iter()
                .map(|k| self.fit_candidate(xs, ys, k, min_distance, seed))
                .collect()
        });

        Ok(candidates.into_iter().flatten().collect())
    }

    /// Best converged fit among the repetitions for one breakpoint count
    fn fit_candidate(
        &self,
        xs: &[f64],
        ys: &[f64],
        k: usize,
        min_distance: f64,
        seed: u64,
    ) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for rep in 0..self.params.fit_repetitions {
            let task = (k * self.params.fit_repetitions + rep) as u64;
            let fit = PiecewiseFit::new(k)
                .with_resamples(self.params.n_boot)
                .with_min_breakpoint_distance(min_distance)
                .with_seed(seed.wrapping_add(task.wrapping_mul(SEED_STRIDE)));

            let summary = match fit.fit(xs, ys) {
                Ok(summary) => summary,
                Err(e) => {
                    warn!(k, rep, error = %e, "candidate fit failed");
                    continue;
                }
            };
            if !summary.is_converged() {
                debug!(k, rep, "fit did not converge");
                continue;
            }

            let score = summary.bic() * summary.rss();
            if best.as_ref().map_or(true, |b| score < b.score) {
                best = Some(Candidate {
                    n_breakpoints: k,
                    score,
                    breakpoints: summary.breakpoints().to_vec(),
                });
            }
        }
        best
    }

    /// Round estimates onto the series grid, fold in the trim boundary,
    /// and enforce the output contract
    fn finish(&self, series: &Series, trim: usize, estimates: Vec<i64>) -> Vec<i64> {
        let mut breakpoints = estimates;
        if trim > 0 {
            let boundary = series.xs()[trim];
            if !breakpoints.contains(&boundary) {
                breakpoints.push(boundary);
            }
        }
        breakpoints.sort_unstable();
        breakpoints.dedup();
        let last = series.len() - 1;
        breakpoints.retain(|&bp| match series.index_of_x(bp) {
            Some(i) => i > 0 && i < last,
            None => {
                warn!(breakpoint = bp, "estimate does not land on the series grid");
                false
            }
        });
        breakpoints
    }
}

impl Segmenter for ModelSearchSegmenter {
    fn algorithm_name(&self) -> &'static str {
        "model-search"
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

        let trim = leading_zero_trim(series.ys());
        if trim > 0 {
            debug!(trim, "trimmed leading zeros");
        }
        let kept = &series.ys()[trim..];
        if kept.len() < 2 * self.min_segment_length() {
            debug!(n = kept.len(), "too few points left after trimming");
            return Ok(self.finish(series, trim, Vec::new()));
        }

        let xs: Vec<f64> = series.xs()[trim..].iter().map(|&x| x as f64).collect();
        let max = kept.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let ys: Vec<f64> = kept.iter().map(|&y| y * 100.0 / max).collect();

        let seed = self.params.seed.unwrap_or_else(|| thread_rng().gen());
        let candidates = self.search(&xs, &ys, seed)?;

        let best = candidates.into_iter().min_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(Ordering::Equal)
                .then(a.n_breakpoints.cmp(&b.n_breakpoints))
        });

        let Some(best) = best else {
            debug!("no candidate model converged");
            return Ok(self.finish(series, trim, Vec::new()));
        };
        debug!(
            k = best.n_breakpoints,
            score = best.score,
            "selected candidate model"
        );

        let estimates: Vec<i64> = best.breakpoints.iter().map(|&bp| bp.round() as i64).collect();
        Ok(self.finish(series, trim, estimates))
    }
}

/// Index of the first point kept after trimming leading zeros
///
/// Advances while the current point and its successor are both zero, so
/// a single zero directly before the first live value is kept as the
/// takeoff point.
fn leading_zero_trim(ys: &[f64]) -> usize {
    let mut i = 0;
    while i + 1 < ys.len() && ys[i] == 0.0 && ys[i + 1] == 0.0 {
        i += 1;
    }
    i
}
