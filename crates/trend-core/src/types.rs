//! Core types shared across the trend analysis crates

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a classified trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendType {
    /// No meaningful direction
    None,
    /// Values grow over the interval
    Increasing,
    /// Values shrink over the interval
    Decreasing,
}

impl fmt::Display for TrendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendType::None => write!(f, "No Trend"),
            TrendType::Increasing => write!(f, "Increasing"),
            TrendType::Decreasing => write!(f, "Decreasing"),
        }
    }
}

/// A fitted line in slope-intercept form
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Slope of the line
    pub slope: f64,
    /// Intercept of the line
    pub intercept: f64,
}

impl Line {
    /// Create a new line
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Evaluate the line at `x`
    pub fn value_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y = {:.4}x {:+.4}", self.slope, self.intercept)
    }
}

/// An inclusive index range into a series
///
/// Adjacent segments share their boundary index: the end of one segment
/// is the start of the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// First index of the segment
    pub start: usize,
    /// Last index of the segment (inclusive)
    pub end: usize,
}

impl Segment {
    /// Create a new segment
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of points covered by the segment
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// True when the segment covers a single point
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// A classified interval of a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    start: i64,
    end: i64,
    #[serde(rename = "type")]
    trend_type: TrendType,
    slope: f64,
    line: Line,
}

impl Trend {
    /// Create a new classified trend
    pub fn new(start: i64, end: i64, trend_type: TrendType, slope: f64, line: Line) -> Self {
        Self {
            start,
            end,
            trend_type,
            slope,
            line,
        }
    }

    /// First x value of the interval
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Last x value of the interval
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Classified direction
    pub fn trend_type(&self) -> TrendType {
        self.trend_type
    }

    /// Robust slope estimate the classification is based on
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Least-squares line over the interval, for rendering
    pub fn line(&self) -> Line {
        self.line
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trend {{ {}..{}, type: {}, slope: {:.3} }}",
            self.start, self.end, self.trend_type, self.slope
        )
    }
}

/// Complete result of a trend analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    breakpoints: Vec<i64>,
    global_trend: Trend,
    sub_trends: Vec<Trend>,
}

impl TrendResult {
    /// Create a new analysis result
    pub fn new(breakpoints: Vec<i64>, global_trend: Trend, sub_trends: Vec<Trend>) -> Self {
        Self {
            breakpoints,
            global_trend,
            sub_trends,
        }
    }

    /// X values where the series changes direction, ascending
    pub fn breakpoints(&self) -> &[i64] {
        &self.breakpoints
    }

    /// Classification of the whole series
    pub fn global_trend(&self) -> &Trend {
        &self.global_trend
    }

    /// Classified sub-intervals, in series order
    pub fn sub_trends(&self) -> &[Trend] {
        &self.sub_trends
    }

    /// True when at least one breakpoint was found
    pub fn has_breakpoints(&self) -> bool {
        !self.breakpoints.is_empty()
    }

    /// Number of sub-trends
    pub fn sub_trend_count(&self) -> usize {
        self.sub_trends.len()
    }
}

impl fmt::Display for TrendResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Trend Analysis Result:")?;
        writeln!(f, "  Global: {}", self.global_trend)?;
        writeln!(f, "  Breakpoints: {:?}", self.breakpoints)?;
        writeln!(f, "  Sub-trends: {}", self.sub_trends.len())?;
        for trend in &self.sub_trends {
            writeln!(f, "    {trend}")?;
        }
        Ok(())
    }
}
