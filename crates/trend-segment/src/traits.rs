//! The strategy seam for segmentation algorithms

use trend_core::{Result, Series};

/// A segmentation strategy
///
/// Implementations locate the x values where a series changes
/// direction. Breakpoints are reported as values from the series x
/// grid, strictly interior, unique, and ascending. A series too short
/// to split, or one with nothing to find, yields an empty vector; an
/// empty result is an answer, not a failure.
pub trait Segmenter {
    /// Short name of the algorithm, for logs and diagnostics
    fn algorithm_name(&self) -> &'static str;

    /// Fewest points a sub-trend may span; series shorter than twice
    /// this are never split
    fn min_segment_length(&self) -> usize {
        4
    }

    /// Locate breakpoints in the series
    fn segment(&self, series: &Series) -> Result<Vec<i64>>;
}
