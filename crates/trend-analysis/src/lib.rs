//! End-to-end trend segmentation and classification
//!
//! Takes an annual series of observation counts, locates the years
//! where its direction changes, classifies every resulting interval as
//! increasing, decreasing, or flat, and reports the whole thing as a
//! [`TrendResult`](trend_core::TrendResult).
//!
//! The pipeline is: segment (pluggable strategy), classify each
//! segment with a Theil-Sen slope, merge neighbors that classify the
//! same way, and classify the full series for the global verdict.
//!
//! # Example
//!
//! ```
//! use trend_analysis::TrendAnalyzer;
//! use trend_core::Series;
//! use trend_segment::DivideConquerSegmenter;
//!
//! let xs: Vec<i64> = (2000..=2010).collect();
//! let ys = vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 40.0, 30.0, 20.0, 10.0, 0.0];
//! let series = Series::new(xs, ys)?;
//!
//! let analyzer = TrendAnalyzer::with_segmenter(DivideConquerSegmenter::new());
//! let result = analyzer.analyze(&series)?;
//! assert!(result.has_breakpoints());
//! # Ok::<(), trend_core::Error>(())
//! ```

pub mod analyzer;
pub mod classify;

pub use analyzer::TrendAnalyzer;
pub use classify::{classify_slope, FLAT_SLOPE_THRESHOLD};
