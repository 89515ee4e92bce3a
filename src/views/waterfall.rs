//! Waterfall (spectrogram) view.
//!
//! Frames arriving faster than the line interval are averaged into a single
//! row. The ring is allocated on the first frame, and again whenever the
//! frame width changes, and backfilled with synthetic timestamps so the time
//! axis spans the whole history at once.

use std::sync::mpsc::Receiver;

use log::{debug, info, warn};

use crate::config::WaterfallConfig;
use crate::controllers::{ViewControls, ViewFlags};
use crate::data::geometry::{Axis, Interval};
use crate::data::spectrogram::{Backfill, SpectrogramData};
use crate::data::x_formatter::scale_base_for_bins;
use crate::error::PlotError;
use crate::sink::PlotCommand;
use crate::surface::{PlotAxis, RenderSurface};

/// Running sum of the frames that will make up the next row.
#[derive(Debug, Clone, Default)]
struct LineAccumulator {
    sum: Vec<f64>,
    count: u32,
}

impl LineAccumulator {
    fn add(&mut self, frame: &[f32]) {
        if self.sum.len() != frame.len() {
            self.sum = vec![0.0; frame.len()];
            self.count = 0;
        }
        for (s, &v) in self.sum.iter_mut().zip(frame) {
            *s += v as f64;
        }
        self.count += 1;
    }

    fn take_average(&mut self) -> Vec<f32> {
        let n = self.count.max(1) as f64;
        let avg = self.sum.iter().map(|s| (s / n) as f32).collect();
        self.sum.iter_mut().for_each(|s| *s = 0.0);
        self.count = 0;
        avg
    }

    fn clear(&mut self) {
        self.sum.clear();
        self.count = 0;
    }
}

pub struct WaterfallView {
    config: WaterfallConfig,
    /// Input channel shown when fed multi-channel `Samples`.
    channel: usize,
    rx: Receiver<PlotCommand>,
    controls: ViewControls,
    data: Option<SpectrogramData>,
    accumulator: LineAccumulator,
    z_range: Interval,
    x_range: Interval,
    pending_redraw: bool,
}

impl WaterfallView {
    pub fn new(
        config: WaterfallConfig,
        channel: usize,
        rx: Receiver<PlotCommand>,
    ) -> Result<Self, PlotError> {
        if config.rows == 0 {
            return Err(PlotError::config("waterfall rows must be non-zero"));
        }
        if config.line_interval_us < 0 {
            return Err(PlotError::config(format!(
                "waterfall line interval must not be negative, got {} us",
                config.line_interval_us
            )));
        }
        config.manual_z_range.validate("waterfall z")?;
        config.x_range.validate("waterfall x")?;

        let controls = ViewControls::with_flags(ViewFlags {
            autoscale: config.autoscale,
            ..Default::default()
        });
        Ok(Self {
            z_range: config.manual_z_range,
            x_range: config.x_range,
            config,
            channel,
            rx,
            controls,
            data: None,
            accumulator: LineAccumulator::default(),
            pending_redraw: true,
        })
    }

    pub fn controls(&self) -> ViewControls {
        self.controls.clone()
    }

    /// Drain posted frames, then notify `surface` once if anything changed
    /// and the view is not paused. Returns whether a redraw was requested.
    pub fn update<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let flags = self.controls.snapshot();
        let mut changed = false;

        if let Some(data) = &mut self.data {
            if data.transform() != flags.transform {
                data.set_transform(flags.transform);
                changed = true;
            }
        }

        let commands: Vec<PlotCommand> = self.rx.try_iter().collect();
        if flags.reject_data {
            if !commands.is_empty() {
                debug!("waterfall rejecting {} commands", commands.len());
            }
        } else {
            for cmd in commands {
                changed |= self.apply_command(cmd, &flags);
            }
        }

        if changed && flags.autoscale {
            if let Some(r) = self
                .data
                .as_ref()
                .and_then(|d| self.config.intensity.range(d))
            {
                self.set_z(r);
            }
        }

        self.pending_redraw |= changed;
        if !self.pending_redraw || flags.paused {
            return false;
        }
        self.pending_redraw = false;

        surface.set_axis_interval(PlotAxis::XBottom, self.x_range);
        surface.set_z_range(self.z_range);
        if let Some(data) = &self.data {
            surface.set_axis_interval(PlotAxis::YLeft, data.interval(Axis::Y));
            surface.set_scale_base(scale_base_for_bins(data.columns()));
        }
        surface.request_redraw();
        true
    }

    fn apply_command(&mut self, cmd: PlotCommand, flags: &ViewFlags) -> bool {
        match cmd {
            PlotCommand::Frame {
                samples,
                timestamp_us,
            } => self.push_frame(&samples, timestamp_us, flags),
            PlotCommand::Samples { y, timestamp_us, .. } => match y.get(self.channel) {
                Some(ch) => {
                    let frame: Vec<f32> = ch.iter().map(|&v| v as f32).collect();
                    self.push_frame(&frame, timestamp_us, flags)
                }
                None => {
                    warn!(
                        "{}",
                        PlotError::ChannelOutOfRange {
                            channel: self.channel,
                            available: y.len()
                        }
                    );
                    false
                }
            },
            PlotCommand::ResetHistory => {
                self.data = None;
                self.accumulator.clear();
                true
            }
        }
    }

    /// Accumulate one frame; write a row once the line interval has passed
    /// since the newest stored row. Returns whether a row was written.
    fn push_frame(&mut self, frame: &[f32], timestamp_us: i64, flags: &ViewFlags) -> bool {
        if timestamp_us < 0 || frame.is_empty() {
            warn!(
                "dropping waterfall frame: {} samples at {} us",
                frame.len(),
                timestamp_us
            );
            return false;
        }
        let width_changed = self
            .data
            .as_ref()
            .is_some_and(|d| d.columns() != frame.len());
        if width_changed {
            info!(
                "waterfall frame width changed to {}; history discarded",
                frame.len()
            );
            self.accumulator.clear();
        }
        if self.data.is_none() || width_changed {
            match self.allocate(frame.len(), timestamp_us, flags) {
                Ok(d) => self.data = Some(d),
                Err(e) => {
                    warn!("cannot allocate waterfall: {e}");
                    return false;
                }
            }
        }
        self.accumulator.add(frame);

        let Some(data) = self.data.as_mut() else {
            return false;
        };
        if timestamp_us - data.max_time_us() < self.config.line_interval_us {
            return false;
        }
        let row = self.accumulator.take_average();
        match data.add_frame(&row, timestamp_us) {
            Ok(()) => true,
            Err(e) => {
                warn!("dropping waterfall row: {e}");
                false
            }
        }
    }

    fn allocate(
        &self,
        columns: usize,
        first_us: i64,
        flags: &ViewFlags,
    ) -> Result<SpectrogramData, PlotError> {
        let rows = self.config.rows;
        let interval = self.config.line_interval_us;
        let mut data = SpectrogramData::new(columns, rows)?;
        // synthetic rows one line interval apart, ending just before the
        // first real row
        data.set_dimensions(
            columns,
            rows,
            Some(Backfill {
                latest_us: (first_us - interval).max(0),
                span_us: interval.saturating_mul(rows as i64 - 1),
            }),
        )?;
        data.set_time_unit(self.config.time_unit);
        data.set_interval(Axis::X, self.x_range)?;
        data.set_interval(Axis::Z, self.z_range)?;
        data.set_transform(flags.transform);
        Ok(data)
    }

    fn set_z(&mut self, range: Interval) {
        self.z_range = range;
        if let Some(data) = &mut self.data {
            if let Err(e) = data.set_interval(Axis::Z, range) {
                debug!("z range not applied: {e}");
            }
        }
    }

    /// Frequency (or index) range covered by the columns.
    pub fn set_x_range(&mut self, range: Interval) -> Result<(), PlotError> {
        range.validate("waterfall x")?;
        if let Some(data) = &mut self.data {
            data.set_interval(Axis::X, range)?;
        }
        self.x_range = range;
        self.pending_redraw = true;
        Ok(())
    }

    /// Colour-bar range used while autoscale is off.
    pub fn set_manual_z_range(&mut self, floor: f64, ceiling: f64) -> Result<(), PlotError> {
        let range = Interval::new(floor, ceiling);
        range.validate("waterfall z")?;
        self.config.manual_z_range = range;
        if !self.controls.is_autoscale_enabled() {
            self.set_z(range);
            self.pending_redraw = true;
        }
        Ok(())
    }

    pub fn z_range(&self) -> Interval {
        self.z_range
    }

    pub fn x_range(&self) -> Interval {
        self.x_range
    }

    pub fn data(&self) -> Option<&SpectrogramData> {
        self.data.as_ref()
    }

    /// Raster lookup for the renderer; `None` before the first frame.
    pub fn value(&self, x: f64, y: f64) -> Option<f64> {
        self.data.as_ref().map(|d| d.value(x, y))
    }
}
