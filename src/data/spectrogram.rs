//! Ring-buffer raster backing a waterfall (spectrogram) display.
//!
//! Frames of `columns` amplitude samples are written into a fixed number of
//! `rows`, overwriting the oldest one. Raster queries map a continuous
//! `(x, y)` coordinate (x = frequency/index, y = time) to one stored sample.
//!
//! Storage is a single contiguous arena of `rows × columns` floats plus a
//! parallel vector of per-row timestamps. `next_index` is the physical row
//! that the next frame will overwrite, which is also the oldest row. Logical
//! row `i` (0 = oldest) lives at physical row `(i + next_index) % rows`.

use log::{debug, warn};

use crate::data::geometry::{Axis, Interval};
use crate::data::transform::ValueTransform;
use crate::data::x_formatter::EpochUnit;
use crate::error::PlotError;

/// Synthetic timestamps for a freshly allocated ring: rows are spread evenly
/// over `[latest_us - span_us, latest_us]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backfill {
    pub latest_us: i64,
    pub span_us: i64,
}

#[derive(Debug, Clone)]
pub struct SpectrogramData {
    samples: Vec<f32>,
    timestamps_us: Vec<i64>,
    next_index: usize,
    rows: usize,
    columns: usize,
    x_interval: Interval,
    y_interval: Interval,
    z_interval: Interval,
    delta_x: f64,
    delta_y: f64,
    transform: ValueTransform,
    time_unit: EpochUnit,
}

impl SpectrogramData {
    /// Allocate a zeroed ring of `rows` frames, each `columns` wide.
    pub fn new(columns: usize, rows: usize) -> Result<Self, PlotError> {
        let mut data = Self {
            samples: Vec::new(),
            timestamps_us: Vec::new(),
            next_index: 0,
            rows: 0,
            columns: 0,
            x_interval: Interval::default(),
            y_interval: Interval::default(),
            z_interval: Interval::default(),
            delta_x: 0.0,
            delta_y: 0.0,
            transform: ValueTransform::Linear,
            time_unit: EpochUnit::Seconds,
        };
        data.set_dimensions(columns, rows, None)?;
        Ok(data)
    }

    /// Reallocate the ring. All history is discarded.
    pub fn set_dimensions(
        &mut self,
        columns: usize,
        rows: usize,
        backfill: Option<Backfill>,
    ) -> Result<(), PlotError> {
        if columns == 0 || rows == 0 {
            return Err(PlotError::config(format!(
                "spectrogram dimensions must be non-zero, got {columns} columns x {rows} rows"
            )));
        }
        if let Some(b) = backfill {
            if b.latest_us < 0 {
                return Err(PlotError::InvalidTimestamp(b.latest_us));
            }
            if b.span_us < 0 {
                return Err(PlotError::config(format!(
                    "backfill span must not be negative, got {} us",
                    b.span_us
                )));
            }
        }

        self.samples = vec![0.0; columns * rows];
        self.timestamps_us = match backfill {
            Some(b) => backfill_timestamps(rows, b),
            None => vec![0; rows],
        };
        self.columns = columns;
        self.rows = rows;
        self.next_index = 0;
        debug!("spectrogram allocated: {columns} columns x {rows} rows");

        self.refresh_time_interval();
        Ok(())
    }

    /// Write one frame into the oldest row and advance the ring.
    ///
    /// A frame whose width differs from the current column count reallocates
    /// the ring first, discarding every stored row.
    pub fn add_frame(&mut self, frame: &[f32], timestamp_us: i64) -> Result<(), PlotError> {
        if timestamp_us < 0 {
            return Err(PlotError::InvalidTimestamp(timestamp_us));
        }
        if frame.is_empty() {
            return Err(PlotError::config("spectrogram frame must not be empty"));
        }
        if frame.len() != self.columns {
            warn!(
                "spectrogram frame width changed from {} to {}; discarding {} rows of history",
                self.columns,
                frame.len(),
                self.rows
            );
            self.set_dimensions(frame.len(), self.rows, None)?;
        }

        let start = self.next_index * self.columns;
        self.samples[start..start + self.columns].copy_from_slice(frame);
        self.timestamps_us[self.next_index] = timestamp_us;

        self.next_index += 1;
        if self.next_index >= self.rows {
            self.next_index = 0;
        }

        self.refresh_time_interval();
        Ok(())
    }

    /// Raster lookup: the (transformed) sample under `(x, y)`.
    ///
    /// Coordinates outside the X/Y intervals clamp to the first/last
    /// column and row.
    pub fn value(&self, x: f64, y: f64) -> f64 {
        let row = axis_index(y, self.y_interval.min, self.delta_y, self.rows);
        let col = axis_index(x, self.x_interval.min, self.delta_x, self.columns);
        let sample = self.samples[self.physical_row(row) * self.columns + col];
        self.transform.apply(sample as f64)
    }

    /// Timestamp of the oldest row.
    pub fn min_time_us(&self) -> i64 {
        self.timestamps_us[self.next_index]
    }

    /// Timestamp of the newest row.
    pub fn max_time_us(&self) -> i64 {
        let newest = if self.next_index == 0 {
            self.rows - 1
        } else {
            self.next_index - 1
        };
        self.timestamps_us[newest]
    }

    /// Minimum and maximum over every stored (untransformed) sample.
    pub fn z_min_max(&self) -> (f64, f64) {
        let (min, max) = self
            .samples
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        (min as f64, max as f64)
    }

    /// Approximate median of every stored (untransformed) sample.
    ///
    /// For an even sample count this is the upper of the two middle values.
    pub fn median(&self) -> f64 {
        let mut scratch = self.samples.clone();
        let mid = scratch.len() / 2;
        let (_, m, _) = scratch.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
        *m as f64
    }

    pub fn interval(&self, axis: Axis) -> Interval {
        match axis {
            Axis::X => self.x_interval,
            Axis::Y => self.y_interval,
            Axis::Z => self.z_interval,
        }
    }

    /// Set the coordinate range of one axis.
    ///
    /// The Y interval is overwritten by the next [`add_frame`](Self::add_frame)
    /// with the stored time extent.
    pub fn set_interval(&mut self, axis: Axis, interval: Interval) -> Result<(), PlotError> {
        let name = match axis {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        interval.validate(name)?;
        match axis {
            Axis::X => self.x_interval = interval,
            Axis::Y => self.y_interval = interval,
            Axis::Z => self.z_interval = interval,
        }
        self.update_deltas();
        Ok(())
    }

    pub fn transform(&self) -> ValueTransform {
        self.transform
    }

    pub fn set_transform(&mut self, transform: ValueTransform) {
        self.transform = transform;
    }

    /// Toggle `10·log10` conversion of returned values.
    pub fn enable_log_conversion(&mut self, enable: bool) {
        self.transform = self.transform.with_log_conversion(enable);
    }

    /// Toggle `20·log10` conversion of returned values.
    pub fn enable_power_log_conversion(&mut self, enable: bool) {
        self.transform = self.transform.with_power_log_conversion(enable);
    }

    pub fn time_unit(&self) -> EpochUnit {
        self.time_unit
    }

    /// Change the unit of the Y (time) axis coordinates.
    pub fn set_time_unit(&mut self, unit: EpochUnit) {
        self.time_unit = unit;
        self.refresh_time_interval();
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Samples of logical row `row` (0 = oldest).
    pub fn frame(&self, row: usize) -> Option<&[f32]> {
        if row >= self.rows {
            return None;
        }
        let start = self.physical_row(row) * self.columns;
        Some(&self.samples[start..start + self.columns])
    }

    /// Timestamp of logical row `row` (0 = oldest).
    pub fn timestamp_us(&self, row: usize) -> Option<i64> {
        if row >= self.rows {
            return None;
        }
        Some(self.timestamps_us[self.physical_row(row)])
    }

    /// Frames with their timestamps, oldest first.
    pub fn frames(&self) -> impl Iterator<Item = (i64, &[f32])> + '_ {
        (0..self.rows).map(move |row| {
            let p = self.physical_row(row);
            let start = p * self.columns;
            (self.timestamps_us[p], &self.samples[start..start + self.columns])
        })
    }

    fn physical_row(&self, logical: usize) -> usize {
        (logical + self.next_index) % self.rows
    }

    /// Track the stored time extent on the Y axis. Equal timestamps give a
    /// zero-width interval, on which every query maps to row 0.
    fn refresh_time_interval(&mut self) {
        self.y_interval = Interval::new(
            self.time_unit.from_micros(self.min_time_us()),
            self.time_unit.from_micros(self.max_time_us()),
        );
        self.update_deltas();
    }

    fn update_deltas(&mut self) {
        if self.columns == 0 || self.rows == 0 {
            return;
        }
        if self.x_interval.is_valid() {
            self.delta_x = self.x_interval.width() / self.columns as f64;
        }
        if self.y_interval.is_valid() {
            self.delta_y = self.y_interval.width() / self.rows as f64;
        }
    }
}

/// Cell index of `coord` on an axis starting at `origin` with cells `delta`
/// wide. A degenerate (zero-width) axis maps everything to cell 0.
fn axis_index(coord: f64, origin: f64, delta: f64, len: usize) -> usize {
    if !(delta > 0.0) || !delta.is_finite() {
        return 0;
    }
    clamp_index((coord - origin) / delta, len)
}

/// `floor(pos)` clamped to `[0, len - 1]`. NaN, negative and infinite
/// positions (from a zero-width interval) land on an edge.
fn clamp_index(pos: f64, len: usize) -> usize {
    if pos.is_nan() || pos <= 0.0 {
        return 0;
    }
    let idx = pos.floor();
    if idx >= (len - 1) as f64 {
        len - 1
    } else {
        idx as usize
    }
}

fn backfill_timestamps(rows: usize, b: Backfill) -> Vec<i64> {
    if rows == 1 {
        return vec![b.latest_us];
    }
    let first = b.latest_us - b.span_us;
    let last_row = (rows - 1) as i128;
    (0..rows)
        .map(|i| first + (b.span_us as i128 * i as i128 / last_row) as i64)
        .collect()
}
