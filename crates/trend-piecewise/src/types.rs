//! Fit output types

use std::fmt;

/// Outcome of a segmented regression fit
///
/// A summary is produced whether or not the fit converged; callers
/// check [`is_converged`](FitSummary::is_converged) before trusting
/// the estimates. Non-converged summaries carry infinite `rss` and
/// `bic` so they always lose a score comparison.
#[derive(Debug, Clone)]
pub struct FitSummary {
    n_breakpoints: usize,
    converged: bool,
    breakpoints: Vec<f64>,
    alpha: f64,
    beta: f64,
    slope_changes: Vec<f64>,
    rss: f64,
    bic: f64,
    iterations: usize,
}

impl FitSummary {
    pub(crate) fn converged(
        n_breakpoints: usize,
        breakpoints: Vec<f64>,
        alpha: f64,
        beta: f64,
        slope_changes: Vec<f64>,
        rss: f64,
        bic: f64,
        iterations: usize,
    ) -> Self {
        Self {
            n_breakpoints,
            converged: true,
            breakpoints,
            alpha,
            beta,
            slope_changes,
            rss,
            bic,
            iterations,
        }
    }

    pub(crate) fn non_converged(n_breakpoints: usize) -> Self {
        Self {
            n_breakpoints,
            converged: false,
            breakpoints: Vec::new(),
            alpha: f64::NAN,
            beta: f64::NAN,
            slope_changes: Vec::new(),
            rss: f64::INFINITY,
            bic: f64::INFINITY,
            iterations: 0,
        }
    }

    /// Number of breakpoints the model was asked for
    pub fn n_breakpoints(&self) -> usize {
        self.n_breakpoints
    }

    /// Whether the iteration converged to a valid model
    pub fn is_converged(&self) -> bool {
        self.converged
    }

    /// Estimated breakpoint positions, ascending; empty when not converged
    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    /// Intercept of the first segment
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Slope of the first segment
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Slope change at each breakpoint
    pub fn slope_changes(&self) -> &[f64] {
        &self.slope_changes
    }

    /// Slope of each segment, first to last
    pub fn segment_slopes(&self) -> Vec<f64> {
        if !self.converged {
            return Vec::new();
        }
        let mut slopes = Vec::with_capacity(self.slope_changes.len() + 1);
        let mut slope = self.beta;
        slopes.push(slope);
        for &change in &self.slope_changes {
            slope += change;
            slopes.push(slope);
        }
        slopes
    }

    /// Residual sum of squares of the fitted model
    pub fn rss(&self) -> f64 {
        self.rss
    }

    /// Bayesian information criterion of the fitted model
    pub fn bic(&self) -> f64 {
        self.bic
    }

    /// Iterations the accepted fit took
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

impl fmt::Display for FitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Piecewise fit ({} breakpoints):", self.n_breakpoints)?;
        writeln!(f, "  Converged: {}", self.converged)?;
        writeln!(f, "  Breakpoints: {:?}", self.breakpoints)?;
        writeln!(f, "  RSS: {:.6}", self.rss)?;
        write!(f, "  BIC: {:.6}", self.bic)
    }
}
