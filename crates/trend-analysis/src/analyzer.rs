//! End-to-end analysis: segment, classify, merge, report

use tracing::{debug, instrument, warn};

use crate::classify::{classify_segment, fit_segment};
use trend_core::{Result, Segment, Series, Trend, TrendResult, TrendType};
use trend_segment::{ModelSearchSegmenter, Segmenter};

/// A maximal run of equally classified segments
#[derive(Debug, Clone, Copy)]
struct Run {
    segment: Segment,
    trend_type: TrendType,
}

/// Orchestrates segmentation and classification of a series
///
/// The segmentation strategy is pluggable; the default is the
/// model-search segmenter.
///
/// # Example
///
/// ```
/// use trend_analysis::TrendAnalyzer;
/// use trend_core::{Series, TrendType};
///
/// let xs: Vec<i64> = (2000..=2010).collect();
/// let ys = vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 40.0, 30.0, 20.0, 10.0, 0.0];
/// let series = Series::new(xs, ys)?;
///
/// let result = TrendAnalyzer::new().analyze(&series)?;
/// assert_eq!(result.sub_trend_count(), 2);
/// assert_eq!(result.sub_trends()[0].trend_type(), TrendType::Increasing);
/// # Ok::<(), trend_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct TrendAnalyzer<S = ModelSearchSegmenter> {
    segmenter: S,
}

impl TrendAnalyzer<ModelSearchSegmenter> {
    /// Analyzer with the default model-search strategy
    pub fn new() -> Self {
        Self {
            segmenter: ModelSearchSegmenter::new(),
        }
    }
}

impl Default for TrendAnalyzer<ModelSearchSegmenter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Segmenter> TrendAnalyzer<S> {
    /// Analyzer with an explicit segmentation strategy
    pub fn with_segmenter(segmenter: S) -> Self {
        Self { segmenter }
    }

    /// The segmentation strategy in use
    pub fn segmenter(&self) -> &S {
        &self.segmenter
    }

    /// Analyze a series end to end
    ///
    /// Segments the series, classifies every segment, merges adjacent
    /// segments that classify the same way, and classifies the series
    /// as a whole. Sub-trends partition the series with shared
    /// endpoints, and each reported breakpoint is the first x value of
    /// the sub-trend it opens.
    ///
    /// The call is synchronous and CPU-bound; the model-search strategy
    /// fans out internally onto its own bounded thread pool. Callers in
    /// an async context should move the call onto a blocking worker.
    #[instrument(skip(self, series), fields(n = series.len(), algorithm = self.segmenter.algorithm_name()))]
    pub fn analyze(&self, series: &Series) -> Result<TrendResult> {
        let breakpoints = self.segmenter.segment(series)?;
        debug!(?breakpoints, "segmentation complete");

        let cuts = self.cut_indices(series, &breakpoints);
        let rescaled = series.rescaled_ys();

        let segments: Vec<Segment> = cuts.windows(2).map(|w| Segment::new(w[0], w[1])).collect();
        let mut classified = Vec::with_capacity(segments.len());
        for &segment in &segments {
            classified.push(classify_segment(series, &rescaled, segment)?);
        }

        let runs = merge_runs(&segments, &classified);

        let mut sub_trends = Vec::with_capacity(runs.len());
        for run in &runs {
            // A merged range spans several segments, so its slope and
            // line are recomputed; its type is the type of the run
            let (slope, line) = fit_segment(series, &rescaled, run.segment)?;
            sub_trends.push(Trend::new(
                series.xs()[run.segment.start],
                series.xs()[run.segment.end],
                run.trend_type,
                slope,
                line,
            ));
        }

        let global_trend = classify_segment(series, &rescaled, Segment::new(0, series.len() - 1))?;

        let reported: Vec<i64> = runs
            .iter()
            .skip(1)
            .map(|run| series.xs()[run.segment.start])
            .collect();
        debug!(
            sub_trends = sub_trends.len(),
            breakpoints = reported.len(),
            "analysis complete"
        );

        Ok(TrendResult::new(reported, global_trend, sub_trends))
    }

    /// Map breakpoint x values onto series indices and close the cut
    /// list with both series ends
    ///
    /// Breakpoints that do not land strictly inside the series are
    /// dropped; the segmenter contract says they should not occur.
    fn cut_indices(&self, series: &Series, breakpoints: &[i64]) -> Vec<usize> {
        let last = series.len() - 1;
        let mut cuts = Vec::with_capacity(breakpoints.len() + 2);
        cuts.push(0);
        for &bp in breakpoints {
            match series.index_of_x(bp) {
                Some(i) if i > 0 && i < last => cuts.push(i),
                Some(_) => warn!(breakpoint = bp, "dropped breakpoint at the series edge"),
                None => warn!(breakpoint = bp, "dropped breakpoint off the series grid"),
            }
        }
        cuts.sort_unstable();
        cuts.dedup();
        cuts.push(last);
        cuts
    }
}

/// Collapse adjacent segments with the same classification into runs
fn merge_runs(segments: &[Segment], classified: &[Trend]) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for (segment, trend) in segments.iter().zip(classified) {
        match runs.last_mut() {
            Some(run) if run.trend_type == trend.trend_type() => {
                run.segment.end = segment.end;
            }
            _ => runs.push(Run {
                segment: *segment,
                trend_type: trend.trend_type(),
            }),
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use trend_core::Line;

    fn trend(trend_type: TrendType) -> Trend {
        Trend::new(0, 1, trend_type, 0.0, Line::new(0.0, 0.0))
    }

    #[test]
    fn test_merge_runs_collapses_equal_neighbors() {
        let segments = [
            Segment::new(0, 3),
            Segment::new(3, 6),
            Segment::new(6, 9),
            Segment::new(9, 12),
        ];
        let classified = [
            trend(TrendType::Increasing),
            trend(TrendType::Increasing),
            trend(TrendType::Decreasing),
            trend(TrendType::Decreasing),
        ];
        let runs = merge_runs(&segments, &classified);

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].segment, Segment::new(0, 6));
        assert_eq!(runs[0].trend_type, TrendType::Increasing);
        assert_eq!(runs[1].segment, Segment::new(6, 12));
        assert_eq!(runs[1].trend_type, TrendType::Decreasing);
    }

    #[test]
    fn test_merge_runs_keeps_alternation() {
        let segments = [Segment::new(0, 2), Segment::new(2, 4), Segment::new(4, 6)];
        let classified = [
            trend(TrendType::None),
            trend(TrendType::Increasing),
            trend(TrendType::None),
        ];
        let runs = merge_runs(&segments, &classified);
        assert_eq!(runs.len(), 3);
    }

    #[test]
    fn test_cut_indices_drops_bad_breakpoints() {
        let series = Series::new(
            (2000..=2009).collect(),
            (0..10).map(|i| i as f64).collect(),
        )
        .unwrap();
        let analyzer = TrendAnalyzer::new();

        // Edge values, off-grid values, and duplicates all disappear
        let cuts = analyzer.cut_indices(&series, &[2000, 2004, 2004, 2042, 2009]);
        assert_eq!(cuts, vec![0, 4, 9]);
    }
}
