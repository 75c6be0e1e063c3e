//! Small numeric helpers used by the segmenters and the classifier

use crate::error::{Error, Result};
use crate::types::Line;

/// Ordinary least-squares line fit
///
/// # Errors
///
/// Returns an error for mismatched lengths, fewer than two points, or a
/// degenerate x range.
pub fn ols_line(xs: &[f64], ys: &[f64]) -> Result<Line> {
    if xs.len() != ys.len() {
        return Err(Error::size_mismatch(xs.len(), ys.len(), "line fit"));
    }
    if xs.len() < 2 {
        return Err(Error::InsufficientData {
            expected: 2,
            actual: xs.len(),
        });
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        sxx += (x - mean_x) * (x - mean_x);
        sxy += (x - mean_x) * (y - mean_y);
    }

    if sxx == 0.0 {
        return Err(Error::Computation(
            "Degenerate x range in line fit".to_string(),
        ));
    }

    let slope = sxy / sxx;
    Ok(Line::new(slope, mean_y - slope * mean_x))
}

/// Residual sum of squares of `ys` about a fitted line
pub fn rss_about_line(xs: &[f64], ys: &[f64], line: &Line) -> f64 {
    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| {
            let r = y - line.value_at(x);
            r * r
        })
        .sum()
}

/// Median of a sample; `None` when empty
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Theil-Sen slope over an evenly spaced sample
///
/// Median of the pairwise slopes `(y[j] - y[i]) / (j - i)`, so the
/// estimate is per index step and ignores the x scale. `None` for fewer
/// than two points.
pub fn sen_slope(ys: &[f64]) -> Option<f64> {
    if ys.len() < 2 {
        return None;
    }
    let mut slopes = Vec::with_capacity(ys.len() * (ys.len() - 1) / 2);
    for i in 0..ys.len() {
        for j in (i + 1)..ys.len() {
            slopes.push((ys[j] - ys[i]) / (j - i) as f64);
        }
    }
    median(&slopes)
}
