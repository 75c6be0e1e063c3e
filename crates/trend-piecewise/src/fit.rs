//! Segmented regression fitting with bootstrap restarting
//!
//! The iteration follows Muggeo's linearization: given working
//! breakpoint positions, fit hinge and step columns by least squares,
//! then shift each breakpoint by the ratio of its step coefficient to
//! its slope-change coefficient. Because the iteration is local, it is
//! wrapped in bootstrap restarting (Wood 2001): each restart fits a
//! resampled copy of the data from the best known positions and the
//! result is polished on the original data, keeping whichever fit has
//! the lowest residual.

use nalgebra::DVector;
use rand::prelude::*;
use std::cmp::Ordering;
use tracing::{debug, instrument};

use crate::regression::{design_matrix, residual_sum_of_squares, solve_least_squares};
use crate::types::FitSummary;
use trend_core::{Error, Result};

/// Floor applied to the RSS inside the BIC so an exact fit does not
/// take the log of zero
const RSS_FLOOR: f64 = 1e-8;

/// Slope changes smaller than this cannot anchor a breakpoint update
const MIN_SLOPE_CHANGE: f64 = 1e-8;

/// One accepted Muggeo iteration outcome
#[derive(Debug, Clone)]
struct IterationFit {
    breakpoints: Vec<f64>,
    coefficients: DVector<f64>,
    rss: f64,
    iterations: usize,
}

/// Segmented regression fit for a fixed number of breakpoints
///
/// # Example
///
/// ```
/// use trend_piecewise::PiecewiseFit;
///
/// let xs: Vec<f64> = (0..21).map(|i| i as f64).collect();
/// let ys: Vec<f64> = xs
///     .iter()
///     .map(|&x| if x <= 10.0 { 2.0 * x } else { 20.0 - 1.5 * (x - 10.0) })
///     .collect();
///
/// let summary = PiecewiseFit::new(1).with_seed(42).fit(&xs, &ys)?;
/// assert!(summary.is_converged());
/// assert!((summary.breakpoints()[0] - 10.0).abs() < 0.5);
/// # Ok::<(), trend_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct PiecewiseFit {
    n_breakpoints: usize,
    n_boot: usize,
    max_iterations: usize,
    tolerance: f64,
    min_breakpoint_distance: f64,
    edge_margin: f64,
    seed: Option<u64>,
}

impl PiecewiseFit {
    /// Create a fit for `n_breakpoints` breakpoints with default settings
    ///
    /// # Panics
    ///
    /// Panics if `n_breakpoints` is zero.
    pub fn new(n_breakpoints: usize) -> Self {
        assert!(n_breakpoints > 0, "Number of breakpoints must be positive");
        Self {
            n_breakpoints,
            n_boot: 100,
            max_iterations: 30,
            tolerance: 1e-5,
            min_breakpoint_distance: 0.01,
            edge_margin: 0.02,
            seed: None,
        }
    }

    /// Set the number of bootstrap restarts; zero disables restarting
    pub fn with_resamples(mut self, n_boot: usize) -> Self {
        self.n_boot = n_boot;
        self
    }

    /// Set the iteration cap per restart
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        assert!(max_iterations > 0, "Iteration cap must be positive");
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance on the breakpoint correction
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        assert!(tolerance > 0.0, "Tolerance must be positive");
        self.tolerance = tolerance;
        self
    }

    /// Set the minimum breakpoint separation as a fraction of the x range
    pub fn with_min_breakpoint_distance(mut self, distance: f64) -> Self {
        assert!(
            distance > 0.0 && distance < 1.0,
            "Breakpoint distance must be a fraction in (0, 1)"
        );
        self.min_breakpoint_distance = distance;
        self
    }

    /// Set the margin from either end of the x range, as a fraction,
    /// inside which no breakpoint may sit
    pub fn with_edge_margin(mut self, margin: f64) -> Self {
        assert!(
            margin >= 0.0 && margin < 0.5,
            "Edge margin must be a fraction in [0, 0.5)"
        );
        self.edge_margin = margin;
        self
    }

    /// Set the seed for reproducible restarts
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of breakpoints this fit estimates
    pub fn n_breakpoints(&self) -> usize {
        self.n_breakpoints
    }

    /// Fit the segmented model
    ///
    /// Failure to converge is reported through the summary, not as an
    /// error; errors are reserved for ill-formed input.
    #[instrument(skip(self, xs, ys), fields(n = xs.len(), k = self.n_breakpoints))]
    pub fn fit(&self, xs: &[f64], ys: &[f64]) -> Result<FitSummary> {
        if xs.len() != ys.len() {
            return Err(Error::size_mismatch(xs.len(), ys.len(), "piecewise fit"));
        }
        if xs.is_empty() {
            return Err(Error::empty_input("piecewise fit"));
        }
        if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
            return Err(Error::non_finite("piecewise fit input"));
        }

        // 2k + 2 coefficients need headroom to be identifiable
        if xs.len() < 2 * self.n_breakpoints + 3 {
            debug!(n = xs.len(), "too few points for this breakpoint count");
            return Ok(FitSummary::non_converged(self.n_breakpoints));
        }

        let (x_min, x_max) = min_max(xs);
        if x_max <= x_min {
            return Ok(FitSummary::non_converged(self.n_breakpoints));
        }

        let seed = self.seed.unwrap_or_else(|| thread_rng().gen());
        debug!(seed, "fitting segmented model");

        let start = self.evenly_spaced(x_min, x_max);
        let mut best = self.muggeo(xs, ys, &start);

        for i in 0..self.n_boot {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(i as u64));
            let (boot_xs, boot_ys) = resample_pairs(xs, ys, &mut rng);
            let guesses = best
                .as_ref()
                .map(|fit| fit.breakpoints.clone())
                .unwrap_or_else(|| start.clone());
            let Some(boot) = self.muggeo(&boot_xs, &boot_ys, &guesses) else {
                continue;
            };
            if let Some(refit) = self.muggeo(xs, ys, &boot.breakpoints) {
                if best.as_ref().map_or(true, |b| refit.rss < b.rss) {
                    debug!(restart = i, rss = refit.rss, "restart improved the fit");
                    best = Some(refit);
                }
            }
        }

        match best {
            Some(fit) => Ok(self.summarize(fit, xs.len())),
            None => {
                debug!("no restart converged");
                Ok(FitSummary::non_converged(self.n_breakpoints))
            }
        }
    }

    /// Run the Muggeo iteration from the given starting positions
    ///
    /// Returns `None` when the iteration leaves the valid breakpoint
    /// region, a slope change collapses, the solver fails, or the
    /// correction has not shrunk below tolerance within the cap.
    fn muggeo(&self, xs: &[f64], ys: &[f64], start: &[f64]) -> Option<IterationFit> {
        let (x_min, x_max) = min_max(xs);
        let range = x_max - x_min;
        if range <= 0.0 {
            return None;
        }
        let min_separation = self.min_breakpoint_distance * range;
        let low = x_min + self.edge_margin * range;
        let high = x_max - self.edge_margin * range;

        let mut breakpoints = start.to_vec();
        breakpoints.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        if !placement_valid(&breakpoints, low, high, min_separation) {
            return None;
        }

        for iteration in 1..=self.max_iterations {
            let design = design_matrix(xs, &breakpoints);
            let coefficients = solve_least_squares(&design, ys).ok()?;

            let k = breakpoints.len();
            let mut next = Vec::with_capacity(k);
            let mut max_correction = 0.0f64;
            for j in 0..k {
                let beta = coefficients[2 + j];
                let gamma = coefficients[2 + k + j];
                if beta.abs() < MIN_SLOPE_CHANGE {
                    return None;
                }
                max_correction = max_correction.max(gamma.abs());
                next.push(breakpoints[j] - gamma / beta);
            }
            next.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
            if !placement_valid(&next, low, high, min_separation) {
                return None;
            }
            breakpoints = next;

            if max_correction < self.tolerance {
                // Refit at the final positions for clean estimates
                let design = design_matrix(xs, &breakpoints);
                let coefficients = solve_least_squares(&design, ys).ok()?;
                let rss = residual_sum_of_squares(&design, ys, &coefficients);
                return Some(IterationFit {
                    breakpoints,
                    coefficients,
                    rss,
                    iterations: iteration,
                });
            }
        }
        None
    }

    fn summarize(&self, fit: IterationFit, n: usize) -> FitSummary {
        let k = self.n_breakpoints;
        let alpha = fit.coefficients[0];
        let beta = fit.coefficients[1];
        let slope_changes: Vec<f64> = (0..k).map(|j| fit.coefficients[2 + j]).collect();
        let n_params = (2 * k + 2) as f64;
        let nf = n as f64;
        let bic = nf * (fit.rss.max(RSS_FLOOR) / nf).ln() + n_params * nf.ln();
        FitSummary::converged(
            k,
            fit.breakpoints,
            alpha,
            beta,
            slope_changes,
            fit.rss,
            bic,
            fit.iterations,
        )
    }

    fn evenly_spaced(&self, x_min: f64, x_max: f64) -> Vec<f64> {
        let step = (x_max - x_min) / (self.n_breakpoints + 1) as f64;
        (1..=self.n_breakpoints)
            .map(|j| x_min + j as f64 * step)
            .collect()
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), &v| (lo.min(v), hi.max(v)),
    )
}

/// Breakpoints must be sorted, finite, inside the edge margins, and
/// pairwise separated
fn placement_valid(breakpoints: &[f64], low: f64, high: f64, min_separation: f64) -> bool {
    if breakpoints
        .iter()
        .any(|b| !b.is_finite() || *b < low || *b > high)
    {
        return false;
    }
    breakpoints.windows(2).all(|w| w[1] - w[0] >= min_separation)
}

fn resample_pairs(xs: &[f64], ys: &[f64], rng: &mut StdRng) -> (Vec<f64>, Vec<f64>) {
    let n = xs.len();
    let mut boot_xs = Vec::with_capacity(n);
    let mut boot_ys = Vec::with_capacity(n);
    for _ in 0..n {
        let idx = rng.gen_range(0..n);
        boot_xs.push(xs[idx]);
        boot_ys.push(ys[idx]);
    }
    (boot_xs, boot_ys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn elbow_data(n: usize, knee: f64, rise: f64, fall: f64) -> (Vec<f64>, Vec<f64>) {
        let xs: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let ys = xs
            .iter()
            .map(|&x| {
                if x <= knee {
                    rise * x
                } else {
                    rise * knee + fall * (x - knee)
                }
            })
            .collect();
        (xs, ys)
    }

    #[test]
    fn test_builder() {
        let fit = PiecewiseFit::new(2)
            .with_resamples(50)
            .with_max_iterations(10)
            .with_tolerance(1e-4)
            .with_seed(7);
        assert_eq!(fit.n_breakpoints(), 2);
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn test_zero_breakpoints_panics() {
        let _ = PiecewiseFit::new(0);
    }

    #[test]
    fn test_recovers_single_knee() {
        let (xs, ys) = elbow_data(21, 10.0, 2.0, -1.5);
        let summary = PiecewiseFit::new(1).with_seed(42).fit(&xs, &ys).unwrap();

        assert!(summary.is_converged());
        assert_eq!(summary.breakpoints().len(), 1);
        assert_relative_eq!(summary.breakpoints()[0], 10.0, epsilon = 0.5);
        assert_relative_eq!(summary.beta(), 2.0, epsilon = 0.05);
        assert_relative_eq!(summary.slope_changes()[0], -3.5, epsilon = 0.1);
        assert!(summary.rss() < 1e-6);
        assert!(summary.bic().is_finite());
    }

    #[test]
    fn test_recovers_two_knees() {
        let xs: Vec<f64> = (0..25).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs
            .iter()
            .map(|&x| {
                if x <= 8.0 {
                    2.0 * x
                } else if x <= 16.0 {
                    16.0 - (x - 8.0)
                } else {
                    8.0 + 3.0 * (x - 16.0)
                }
            })
            .collect();
        let summary = PiecewiseFit::new(2).with_seed(11).fit(&xs, &ys).unwrap();

        assert!(summary.is_converged());
        assert_relative_eq!(summary.breakpoints()[0], 8.0, epsilon = 0.5);
        assert_relative_eq!(summary.breakpoints()[1], 16.0, epsilon = 0.5);
        let slopes = summary.segment_slopes();
        assert_relative_eq!(slopes[0], 2.0, epsilon = 0.05);
        assert_relative_eq!(slopes[1], -1.0, epsilon = 0.05);
        assert_relative_eq!(slopes[2], 3.0, epsilon = 0.05);
    }

    #[test]
    fn test_reproducible_with_seed() {
        // Deterministic pseudo-noise keeps restarts meaningful
        let xs: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let base = if x <= 14.0 { x } else { 14.0 - 0.8 * (x - 14.0) };
                base + ((i * 31) % 7) as f64 * 0.1
            })
            .collect();

        let first = PiecewiseFit::new(1).with_seed(99).fit(&xs, &ys).unwrap();
        let second = PiecewiseFit::new(1).with_seed(99).fit(&xs, &ys).unwrap();

        assert_eq!(first.is_converged(), second.is_converged());
        assert_eq!(first.breakpoints(), second.breakpoints());
    }

    #[test]
    fn test_insufficient_points_not_an_error() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.0, 1.0, 2.0, 3.0];
        let summary = PiecewiseFit::new(1).fit(&xs, &ys).unwrap();
        assert!(!summary.is_converged());
        assert!(summary.breakpoints().is_empty());
    }

    #[test]
    fn test_straight_line_does_not_converge() {
        // No kink anywhere: the slope-change guard rejects every restart
        let xs: Vec<f64> = (0..15).map(|i| i as f64).collect();
        let ys: Vec<f64> = xs.iter().map(|&x| 1.5 * x + 2.0).collect();
        let summary = PiecewiseFit::new(1)
            .with_resamples(20)
            .with_seed(7)
            .fit(&xs, &ys)
            .unwrap();
        assert!(!summary.is_converged());
    }

    #[test]
    fn test_mismatched_input_rejected() {
        let result = PiecewiseFit::new(1).fit(&[0.0, 1.0], &[0.0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.0, 1.0, f64::NAN, 3.0, 4.0];
        let result = PiecewiseFit::new(1).fit(&xs, &ys);
        assert!(result.is_err());
    }
}
