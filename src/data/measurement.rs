//! Cursor readouts and two-point measurements.
//!
//! [`AxisReadout`] formats one coordinate with its unit (or as wall-clock time
//! on a time axis). [`PositionReadout`] combines the two axes of a plot into
//! the tracker texts shown next to the cursor.

use crate::data::x_formatter::{format_with_unit, EpochUnit, WallClockFormatter};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisReadout {
    pub unit: String,
    pub is_time: bool,
    pub epoch_unit: EpochUnit,
}

impl AxisReadout {
    pub fn new(unit: &str) -> Self {
        Self {
            unit: unit.to_owned(),
            ..Default::default()
        }
    }

    pub fn time(epoch_unit: EpochUnit) -> Self {
        Self {
            unit: String::new(),
            is_time: true,
            epoch_unit,
        }
    }

    /// A coordinate on this axis.
    pub fn value_text(&self, value: f64) -> String {
        if self.is_time {
            WallClockFormatter::for_epoch_unit(self.epoch_unit).precise(value)
        } else {
            format_with_unit(value, &self.unit)
        }
    }

    /// A difference of two coordinates. Time differences are shown in
    /// seconds.
    pub fn delta_text(&self, delta: f64) -> String {
        if self.is_time {
            format_with_unit(self.epoch_unit.to_seconds(delta), "s")
        } else {
            format_with_unit(delta, &self.unit)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionReadout {
    pub x: AxisReadout,
    pub y: AxisReadout,
}

impl PositionReadout {
    pub fn new(x: AxisReadout, y: AxisReadout) -> Self {
        Self { x, y }
    }

    /// Tracker text under the cursor: `"<x>\n<y>"`.
    ///
    /// ```
    /// # use liveraster::data::measurement::{AxisReadout, PositionReadout};
    /// let r = PositionReadout::new(AxisReadout::new("Hz"), AxisReadout::new("dB"));
    /// assert_eq!(r.position_text([50.0, -3.5]), "50 Hz\n-3.5 dB");
    /// ```
    pub fn position_text(&self, point: [f64; 2]) -> String {
        format!(
            "{}\n{}",
            self.x.value_text(point[0]),
            self.y.value_text(point[1])
        )
    }

    /// Tracker text while dragging out a distance: absolute differences on
    /// both axes.
    pub fn distance_text(&self, p1: [f64; 2], p2: [f64; 2]) -> String {
        format!(
            "dX: {}\ndY: {}",
            self.x.delta_text((p2[0] - p1[0]).abs()),
            self.y.delta_text((p2[1] - p1[1]).abs())
        )
    }
}

/// Two-point measurement built up by successive clicks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Measurement {
    pub name: String,
    pub p1: Option<[f64; 2]>,
    pub p2: Option<[f64; 2]>,
}

impl Measurement {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Click handling: the first click sets `p1`, the second `p2` (clicking
    /// `p1` again clears it), a third click starts over.
    pub fn set_point(&mut self, point: [f64; 2]) {
        match (self.p1, self.p2) {
            (None, _) => {
                self.p1 = Some(point);
            }
            (Some(p1), None) => {
                if (p1[0] - point[0]).abs() > f64::EPSILON
                    || (p1[1] - point[1]).abs() > f64::EPSILON
                {
                    self.p2 = Some(point);
                } else {
                    self.p1 = None;
                }
            }
            (Some(_), Some(_)) => {
                self.p1 = Some(point);
                self.p2 = None;
            }
        }
    }

    pub fn get_points(&self) -> (Option<[f64; 2]>, Option<[f64; 2]>) {
        (self.p1, self.p2)
    }

    pub fn clear(&mut self) {
        self.p1 = None;
        self.p2 = None;
    }

    pub fn has_both_points(&self) -> bool {
        self.p1.is_some() && self.p2.is_some()
    }

    /// Distance tracker text once both points are set.
    pub fn distance_text(&self, readout: &PositionReadout) -> Option<String> {
        match (self.p1, self.p2) {
            (Some(a), Some(b)) => Some(readout.distance_text(a, b)),
            _ => None,
        }
    }
}

/// Cursor marker mirrored across several plots (e.g. a spectrum and its
/// waterfall share the frequency axis).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SharedCursor {
    position: Option<[f64; 2]>,
}

impl SharedCursor {
    pub fn set(&mut self, point: [f64; 2]) {
        self.position = Some(point);
    }

    pub fn clear(&mut self) {
        self.position = None;
    }

    pub fn position(&self) -> Option<[f64; 2]> {
        self.position
    }

    pub fn is_valid(&self) -> bool {
        self.position.is_some()
    }
}
