//! First-order low-pass smoothing
//!
//! A first-order Butterworth filter discretized with the bilinear
//! transform. The cutoff is pre-warped so the digital response matches
//! the analog prototype at the cutoff frequency, and the filter runs
//! causally from zero initial state, so a short transient at the start
//! of the output is expected.

use trend_core::{Error, Result};

/// Causal first-order low-pass filter
///
/// Coefficients are precomputed at construction; applying the filter
/// is a single forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LowPassFilter {
    b0: f64,
    b1: f64,
    a1: f64,
}

impl LowPassFilter {
    /// Create a filter with the given cutoff as a fraction of the
    /// Nyquist frequency
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 < cutoff < 1`.
    pub fn new(cutoff: f64) -> Result<Self> {
        if !(cutoff > 0.0 && cutoff < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "Cutoff {cutoff} must be a fraction of Nyquist in (0, 1)"
            )));
        }
        // Pre-warp the cutoff, then apply the bilinear transform to
        // 1 / (s + 1)
        let warped = (std::f64::consts::PI * cutoff / 2.0).tan();
        let b0 = warped / (1.0 + warped);
        Ok(Self {
            b0,
            b1: b0,
            a1: (warped - 1.0) / (warped + 1.0),
        })
    }

    /// Filter coefficients `(b0, b1, a1)`
    pub fn coefficients(&self) -> (f64, f64, f64) {
        (self.b0, self.b1, self.a1)
    }

    /// Run the filter over a signal, starting from zero state
    pub fn apply(&self, signal: &[f64]) -> Vec<f64> {
        let mut output = Vec::with_capacity(signal.len());
        let mut prev_input = 0.0;
        let mut prev_output = 0.0;
        for &x in signal {
            let y = self.b0 * x + self.b1 * prev_input - self.a1 * prev_output;
            output.push(y);
            prev_input = x;
            prev_output = y;
        }
        output
    }
}
