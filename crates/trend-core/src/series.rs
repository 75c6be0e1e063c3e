//! Validated time series container

use crate::error::{Error, Result};

/// An annual time series: strictly increasing integer x values paired
/// with finite observation counts
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    xs: Vec<i64>,
    ys: Vec<f64>,
}

impl Series {
    /// Create a series, validating the input
    ///
    /// # Errors
    ///
    /// Returns an error when the vectors differ in length, hold fewer
    /// than two points, contain non-finite values, or the x values are
    /// not strictly increasing.
    pub fn new(xs: Vec<i64>, ys: Vec<f64>) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(Error::size_mismatch(xs.len(), ys.len(), "series"));
        }
        if xs.len() < 2 {
            return Err(Error::InsufficientData {
                expected: 2,
                actual: xs.len(),
            });
        }
        if ys.iter().any(|y| !y.is_finite()) {
            return Err(Error::non_finite("series values"));
        }
        if xs.windows(2).any(|w| w[1] <= w[0]) {
            return Err(Error::InvalidInput(
                "Series x values must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { xs, ys })
    }

    /// Number of points in the series
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Always false: construction requires at least two points
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// X values, strictly increasing
    pub fn xs(&self) -> &[i64] {
        &self.xs
    }

    /// First x value
    pub fn first_x(&self) -> i64 {
        self.xs[0]
    }

    /// Last x value
    pub fn last_x(&self) -> i64 {
        self.xs[self.xs.len() - 1]
    }

    /// Y values
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// X values converted to floats, for fitting
    pub fn xs_f64(&self) -> Vec<f64> {
        self.xs.iter().map(|&x| x as f64).collect()
    }

    /// Position of an x value in the series, if present
    pub fn index_of_x(&self, x: i64) -> Option<usize> {
        self.xs.binary_search(&x).ok()
    }

    /// Largest y value
    pub fn max_y(&self) -> f64 {
        self.ys.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b))
    }

    /// Y values rescaled so the maximum maps to 100
    ///
    /// When the maximum is not positive the values are returned as-is;
    /// there is nothing meaningful to normalize against.
    pub fn rescaled_ys(&self) -> Vec<f64> {
        let max = self.max_y();
        if max > 0.0 {
            self.ys.iter().map(|&y| y * 100.0 / max).collect()
        } else {
            self.ys.clone()
        }
    }
}
