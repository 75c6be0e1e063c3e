//! Segmented linear regression with bootstrap restarting
//!
//! Estimates the positions of a fixed number of breakpoints in a
//! piecewise-linear relationship, using Muggeo's iterative
//! linearization wrapped in bootstrap restarts to avoid local optima.
//! The fit reports convergence through [`FitSummary`] rather than an
//! error, so a model that cannot be identified on the given data is an
//! ordinary outcome.

pub mod fit;
pub mod regression;
pub mod types;

pub use fit::PiecewiseFit;
pub use types::FitSummary;
