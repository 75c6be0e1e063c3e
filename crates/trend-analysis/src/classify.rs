//! Segment classification
//!
//! Direction comes from the Theil-Sen estimator over the rescaled
//! values: the median pairwise slope shrugs off single-year spikes that
//! would drag a least-squares fit. The reported line is still ordinary
//! least squares over the same range, fitted against the real x values,
//! since that is what callers want to draw.

use trend_core::{math, Error, Line, Result, Segment, Series, Trend, TrendType};

/// Sen-slope magnitude below which a segment counts as flat
///
/// Slopes are in rescaled units (max = 100) per index step, so this
/// threshold is scale independent.
pub const FLAT_SLOPE_THRESHOLD: f64 = 1.0;

/// Classify a robust slope into a direction
pub fn classify_slope(slope: f64) -> TrendType {
    if slope.abs() < FLAT_SLOPE_THRESHOLD {
        TrendType::None
    } else if slope > 0.0 {
        TrendType::Increasing
    } else {
        TrendType::Decreasing
    }
}

/// Robust slope and rendering line for one segment
///
/// `rescaled` must be the rescaled values of the full series; the
/// segment indexes into it.
pub fn fit_segment(series: &Series, rescaled: &[f64], segment: Segment) -> Result<(f64, Line)> {
    let ys = &rescaled[segment.start..=segment.end];
    let slope = math::sen_slope(ys).ok_or(Error::InsufficientData {
        expected: 2,
        actual: ys.len(),
    })?;
    let xs: Vec<f64> = series.xs()[segment.start..=segment.end]
        .iter()
        .map(|&x| x as f64)
        .collect();
    let line = math::ols_line(&xs, ys)?;
    Ok((slope, line))
}

/// Classify one segment of the series
pub fn classify_segment(series: &Series, rescaled: &[f64], segment: Segment) -> Result<Trend> {
    let (slope, line) = fit_segment(series, rescaled, segment)?;
    Ok(Trend::new(
        series.xs()[segment.start],
        series.xs()[segment.end],
        classify_slope(slope),
        slope,
        line,
    ))
}
