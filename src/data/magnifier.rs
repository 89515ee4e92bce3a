//! Mouse-wheel magnification centred on the cursor.

use crate::data::geometry::{Interval, Rect};

/// Default per-notch wheel factor: one notch in shows 90% of the range.
pub const DEFAULT_WHEEL_FACTOR: f64 = 0.9;

/// Scale `interval` by `factor` while keeping `cursor` at the same relative
/// position.
///
/// The sign of `factor` is ignored; factors of 0 and 1 leave the interval
/// unchanged.
///
/// ```
/// # use liveraster::data::geometry::Interval;
/// # use liveraster::data::magnifier::magnify_about;
/// let i = magnify_about(Interval::new(0.0, 10.0), 2.0, 0.5);
/// assert_eq!(i, Interval::new(1.0, 6.0));
/// ```
pub fn magnify_about(interval: Interval, cursor: f64, factor: f64) -> Interval {
    let factor = factor.abs();
    if factor == 1.0 || factor == 0.0 || !factor.is_finite() {
        return interval;
    }
    let lower = cursor - interval.min;
    let upper = interval.max - cursor;
    Interval::new(cursor - lower * factor, cursor + upper * factor)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Magnifier {
    pub x_enabled: bool,
    pub y_enabled: bool,
    pub wheel_factor: f64,
}

impl Default for Magnifier {
    fn default() -> Self {
        Self {
            x_enabled: true,
            y_enabled: true,
            wheel_factor: DEFAULT_WHEEL_FACTOR,
        }
    }
}

impl Magnifier {
    /// Scale each enabled axis of `view` about `cursor = [x, y]`.
    pub fn rescale(&self, view: Rect, cursor: [f64; 2], factor: f64) -> Rect {
        let mut out = view;
        if self.x_enabled {
            out.x = magnify_about(view.x, cursor[0], factor);
        }
        if self.y_enabled {
            out.y = magnify_about(view.y, cursor[1], factor);
        }
        out
    }

    /// Apply `notches` wheel steps; positive notches zoom in.
    pub fn wheel(&self, view: Rect, cursor: [f64; 2], notches: i32) -> Rect {
        if notches == 0 {
            return view;
        }
        self.rescale(view, cursor, self.wheel_factor.powi(notches))
    }
}
