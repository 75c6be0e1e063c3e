//! Core types and numeric helpers for trend analysis
//!
//! This crate holds the vocabulary shared by the segmentation and
//! classification crates: the validated [`Series`] container, the
//! [`Trend`] and [`TrendResult`] output types, the [`Error`] taxonomy,
//! and the small amount of statistics everything else leans on.
//!
//! # Example
//!
//! ```
//! use trend_core::{math, Series};
//!
//! let series = Series::new(vec![2000, 2001, 2002, 2003], vec![1.0, 2.0, 3.0, 4.0])?;
//! let slope = math::sen_slope(series.ys()).unwrap();
//! assert_eq!(slope, 1.0);
//! # Ok::<(), trend_core::Error>(())
//! ```

pub mod error;
pub mod math;
pub mod series;
pub mod types;

pub use error::{Error, Result};
pub use series::Series;
pub use types::{Line, Segment, Trend, TrendResult, TrendType};
