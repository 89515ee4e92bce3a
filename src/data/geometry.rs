//! Intervals, rectangles and axis identifiers used by every plot model.

use serde::{Deserialize, Serialize};

use crate::error::PlotError;

/// Raster axes of a spectrogram: X = column (frequency/index), Y = row (time),
/// Z = intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A closed `[min, max]` range on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Default for Interval {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

impl Interval {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Build an interval from two ends in any order.
    pub fn spanning(a: f64, b: f64) -> Self {
        if a <= b {
            Self::new(a, b)
        } else {
            Self::new(b, a)
        }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// `min <= max` with both ends finite. Zero width is valid here.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    /// Whether the two intervals share at least one point.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    /// Validation used for user-supplied configuration: finite, ordered and
    /// strictly positive width.
    pub fn validate(&self, what: &str) -> Result<(), PlotError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(PlotError::config(format!(
                "{what} interval must be finite, got [{}, {}]",
                self.min, self.max
            )));
        }
        if self.max <= self.min {
            return Err(PlotError::config(format!(
                "{what} interval must have positive width, got [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// A view rectangle in plot coordinates.
///
/// `x` is the horizontal extent (left/right), `y` the vertical one
/// (bottom/top).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: Interval,
    pub y: Interval,
}

impl Rect {
    pub const fn new(x: Interval, y: Interval) -> Self {
        Self { x, y }
    }

    pub fn from_edges(left: f64, right: f64, bottom: f64, top: f64) -> Self {
        Self::new(Interval::new(left, right), Interval::new(bottom, top))
    }

    pub fn left(&self) -> f64 {
        self.x.min
    }

    pub fn right(&self) -> f64 {
        self.x.max
    }

    pub fn bottom(&self) -> f64 {
        self.y.min
    }

    pub fn top(&self) -> f64 {
        self.y.max
    }

    pub fn width(&self) -> f64 {
        self.x.width()
    }

    pub fn height(&self) -> f64 {
        self.y.width()
    }
}
