//! Breakpoint detection strategies for annual time series
//!
//! Two interchangeable [`Segmenter`] implementations locate the x
//! values where a series changes direction:
//!
//! - [`ModelSearchSegmenter`] fits segmented regressions for every
//!   candidate breakpoint count and keeps the best-scoring model
//! - [`DivideConquerSegmenter`] recursively bisects the smoothed
//!   series and filters the boundaries geometrically
//!
//! Both report breakpoints on the series x grid, strictly interior,
//! unique, and ascending.
//!
//! # Example
//!
//! ```
//! use trend_core::Series;
//! use trend_segment::{DivideConquerSegmenter, Segmenter};
//!
//! let xs: Vec<i64> = (2000..=2010).collect();
//! let ys = vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 40.0, 30.0, 20.0, 10.0, 0.0];
//! let series = Series::new(xs, ys)?;
//!
//! let splits = DivideConquerSegmenter::new().segment(&series)?;
//! assert_eq!(splits.len(), 1);
//! # Ok::<(), trend_core::Error>(())
//! ```

pub mod heuristic;
pub mod smoothing;
pub mod statistical;
pub mod traits;

pub use heuristic::{DivideConquerParameters, DivideConquerSegmenter};
pub use smoothing::LowPassFilter;
pub use statistical::{ModelSearchParameters, ModelSearchSegmenter};
pub use traits::Segmenter;
