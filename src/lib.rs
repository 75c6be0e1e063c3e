//! Trend segmentation and classification for annual time series
//!
//! This crate bundles the workspace members behind a single facade:
//!
//! - [`trend_core`]: shared types, validated series, small math helpers
//! - [`trend_piecewise`]: piecewise-linear regression with bootstrap restarting
//! - [`trend_segment`]: segmentation strategies (divide-and-conquer, model search)
//! - [`trend_analysis`]: classification and the end-to-end analyzer
//!
//! # Example
//!
//! ```rust
//! use trend_engine::analysis::TrendAnalyzer;
//! use trend_engine::core::{Series, TrendType};
//!
//! let xs: Vec<i64> = (2000..2012).collect();
//! let ys: Vec<f64> = xs.iter().map(|x| 3.0 * (x - 2000) as f64 + 10.0).collect();
//! let series = Series::new(xs, ys).unwrap();
//!
//! let analyzer = TrendAnalyzer::default();
//! let result = analyzer.analyze(&series).unwrap();
//!
//! assert_eq!(result.global_trend().trend_type(), TrendType::Increasing);
//! ```

pub use trend_analysis as analysis;
pub use trend_core as core;
pub use trend_piecewise as piecewise;
pub use trend_segment as segment;

// Most callers only need the analyzer and the result types.
pub use trend_analysis::TrendAnalyzer;
pub use trend_core::{Error, Result, Series, Trend, TrendResult, TrendType};
pub use trend_segment::{DivideConquerSegmenter, ModelSearchSegmenter, Segmenter};
