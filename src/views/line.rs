//! Line plot view shared by scrolling and framed plots.
//!
//! The view owns its series model, zoom stack, animator and interaction
//! state. Producers feed it through a [`PlotSink`](crate::sink::PlotSink);
//! everything is applied inside [`LineView::update`] on the owning thread.

use std::sync::mpsc::Receiver;
use std::time::Instant;

use log::{debug, info, warn};

use crate::config::PlotConfig;
use crate::controllers::{StrobeAction, StrobeAutoscale, ViewControls, ViewFlags};
use crate::data::autoscale::fit_range;
use crate::data::framed::FramedSeries;
use crate::data::geometry::{Interval, Rect};
use crate::data::magnifier::Magnifier;
use crate::data::measurement::{AxisReadout, Measurement, PositionReadout, SharedCursor};
use crate::data::scrolling::ScrollingSeries;
use crate::data::transform::ValueTransform;
use crate::data::zoom::{RescaleOutcome, ZoomAnimator, ZoomStack};
use crate::error::PlotError;
use crate::sink::PlotCommand;
use crate::surface::{PlotAxis, RenderSurface};

/// Storage behind a [`LineView`].
pub trait SeriesModel {
    /// Apply one batch: X values (may be empty for models that generate
    /// their own) and one Y block per channel.
    fn ingest(&mut self, x: &[f64], y: &[Vec<f64>], timestamp_us: i64) -> Result<(), PlotError>;

    fn reset(&mut self);

    /// Pick up span/averaging changes from the shared flags.
    fn apply_flags(&mut self, flags: &ViewFlags) -> Result<(), PlotError>;

    fn x_values(&self) -> Vec<f64>;

    fn channel_count(&self) -> usize;

    /// Stored (untransformed) values of one channel.
    fn channel_values(&self, index: usize) -> Vec<f64>;

    /// Horizontal extent shown when nothing has been zoomed.
    fn default_x_range(&self) -> Interval;

    /// Move the zoom stack to follow the stored data. `None` when the stack
    /// was left alone.
    fn follow_extent(&mut self, stack: &mut ZoomStack) -> Option<RescaleOutcome>;
}

impl SeriesModel for ScrollingSeries {
    fn ingest(&mut self, x: &[f64], y: &[Vec<f64>], _timestamp_us: i64) -> Result<(), PlotError> {
        self.append_x(x);
        self.append_y(y);
        Ok(())
    }

    fn reset(&mut self) {
        self.reset_history();
    }

    fn apply_flags(&mut self, flags: &ViewFlags) -> Result<(), PlotError> {
        self.set_span(flags.span)
    }

    fn x_values(&self) -> Vec<f64> {
        self.x().iter().copied().collect()
    }

    fn channel_count(&self) -> usize {
        ScrollingSeries::channel_count(self)
    }

    fn channel_values(&self, index: usize) -> Vec<f64> {
        self.channel(index)
            .map(|c| c.iter().copied().collect())
            .unwrap_or_default()
    }

    fn default_x_range(&self) -> Interval {
        Interval::new(0.0, self.window())
    }

    fn follow_extent(&mut self, stack: &mut ZoomStack) -> Option<RescaleOutcome> {
        let e = self.extent()?;
        Some(self.rescale_zoom_stack(stack, e.min, e.max))
    }
}

impl SeriesModel for FramedSeries {
    fn ingest(&mut self, _x: &[f64], y: &[Vec<f64>], _timestamp_us: i64) -> Result<(), PlotError> {
        self.update(y)
    }

    fn reset(&mut self) {
        self.clear();
    }

    fn apply_flags(&mut self, flags: &ViewFlags) -> Result<(), PlotError> {
        self.set_averaging(flags.averaging)
    }

    fn x_values(&self) -> Vec<f64> {
        self.x().to_vec()
    }

    fn channel_count(&self) -> usize {
        FramedSeries::channel_count(self)
    }

    fn channel_values(&self, index: usize) -> Vec<f64> {
        self.channel(index).map(<[f64]>::to_vec).unwrap_or_default()
    }

    fn default_x_range(&self) -> Interval {
        let (begin, end) = self.x_span();
        Interval::spanning(begin, end)
    }

    fn follow_extent(&mut self, stack: &mut ZoomStack) -> Option<RescaleOutcome> {
        let span = self.default_x_range();
        let base = stack.base();
        if base.x == span {
            return None;
        }
        stack.set_base(Rect::new(span, base.y));
        Some(RescaleOutcome::Reset)
    }
}

/// Transformed curves ready to draw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotData {
    pub x: Vec<f64>,
    pub channels: Vec<Vec<f64>>,
}

pub struct LineView<M: SeriesModel> {
    model: M,
    rx: Option<Receiver<PlotCommand>>,
    queued: Vec<PlotCommand>,
    controls: ViewControls,
    applied: ViewFlags,
    zoom: ZoomStack,
    animator: ZoomAnimator,
    magnifier: Magnifier,
    view_rect: Rect,
    autoscale_on: bool,
    autoscaled: Option<Interval>,
    strobe: StrobeAutoscale,
    readout: PositionReadout,
    cursor: SharedCursor,
    measurement: Measurement,
    markers: Vec<f64>,
    pending_redraw: bool,
}

impl<M: SeriesModel> LineView<M> {
    /// Wrap `model`. Without a receiver, data is fed through
    /// [`enqueue`](Self::enqueue).
    pub fn new(model: M, config: &PlotConfig, rx: Option<Receiver<PlotCommand>>) -> Self {
        let flags = ViewFlags {
            averaging: config.framed.averaging,
            span: config.scrolling.span,
            ..Default::default()
        };
        let base = Rect::new(model.default_x_range(), Interval::default());
        let readout = PositionReadout::new(readout_for(&config.x_axis), readout_for(&config.y_axis));
        Self {
            model,
            rx,
            queued: Vec::new(),
            controls: ViewControls::with_flags(flags.clone()),
            applied: flags,
            zoom: ZoomStack::new(base),
            animator: ZoomAnimator::new(config.animation.duration_ms, config.animation.enabled),
            magnifier: Magnifier::default(),
            view_rect: base,
            autoscale_on: false,
            autoscaled: None,
            strobe: StrobeAutoscale::new(),
            readout,
            cursor: SharedCursor::default(),
            measurement: Measurement::new(&config.title),
            markers: Vec::new(),
            pending_redraw: true,
        }
    }

    /// Handle for flipping flags from other threads.
    pub fn controls(&self) -> ViewControls {
        self.controls.clone()
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Queue a command to be applied on the next update.
    pub fn enqueue(&mut self, cmd: PlotCommand) {
        self.queued.push(cmd);
    }

    /// Apply pending flags and data, then notify `surface` once if anything
    /// changed and the view is not paused. Returns whether a redraw was
    /// requested.
    pub fn update<S: RenderSurface + ?Sized>(&mut self, surface: &mut S, now: Instant) -> bool {
        let flags = self.controls.snapshot();
        let mut changed = self.apply_flags(&flags);

        if let Some(delay) = self.controls.take_strobe_request() {
            self.strobe.arm(now, delay, flags.autoscale);
        }

        let mut commands = std::mem::take(&mut self.queued);
        if let Some(rx) = &self.rx {
            commands.extend(rx.try_iter());
        }
        if flags.reject_data {
            if !commands.is_empty() {
                debug!("rejecting {} commands", commands.len());
            }
        } else {
            for cmd in commands {
                changed |= self.apply_command(cmd);
            }
        }

        if changed {
            self.refresh_extents();
        }

        match self.strobe.poll(now, self.autoscale_on && self.autoscaled.is_some()) {
            Some(StrobeAction::Enable) => {
                self.controls.set_autoscale(true);
                self.set_autoscale(true);
                changed = true;
            }
            Some(StrobeAction::Disable) => {
                self.controls.set_autoscale(false);
                self.set_autoscale(false);
                changed = true;
            }
            None => {}
        }

        self.pending_redraw |= changed;
        if !self.pending_redraw || flags.paused {
            return false;
        }
        self.pending_redraw = false;
        surface.set_axis_interval(PlotAxis::XBottom, self.view_rect.x);
        surface.set_axis_interval(PlotAxis::YLeft, self.view_rect.y);
        surface.request_redraw();
        true
    }

    /// Advance a zoom animation by one frame.
    pub fn tick<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) -> bool {
        match self.animator.tick() {
            Some(rect) => {
                self.show(rect, surface);
                true
            }
            None => false,
        }
    }

    fn apply_flags(&mut self, flags: &ViewFlags) -> bool {
        let mut changed = false;
        if flags.span != self.applied.span || flags.averaging != self.applied.averaging {
            if let Err(e) = self.model.apply_flags(flags) {
                warn!("ignoring view flags: {e}");
            }
            changed = true;
        }
        if flags.transform != self.applied.transform {
            changed = true;
        }
        if flags.autoscale != self.autoscale_on {
            self.set_autoscale(flags.autoscale);
            changed = true;
        }
        if flags.paused != self.applied.paused && !flags.paused {
            // show what arrived while paused
            self.pending_redraw = true;
        }
        self.applied = flags.clone();
        changed
    }

    fn apply_command(&mut self, cmd: PlotCommand) -> bool {
        let result = match cmd {
            PlotCommand::Samples { x, y, timestamp_us } => self.model.ingest(&x, &y, timestamp_us),
            PlotCommand::Frame {
                samples,
                timestamp_us,
            } => {
                let y = vec![samples.iter().map(|&v| v as f64).collect()];
                self.model.ingest(&[], &y, timestamp_us)
            }
            PlotCommand::ResetHistory => {
                self.model.reset();
                self.zoom.zoom_to_base();
                Ok(())
            }
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("dropping plot data: {e}");
                false
            }
        }
    }

    /// Slide the zoom stack with the data and refresh the autoscaled range.
    fn refresh_extents(&mut self) {
        if !self.animator.is_animating() {
            if let Some(outcome) = self.model.follow_extent(&mut self.zoom) {
                if outcome == RescaleOutcome::Reset {
                    self.animator.cancel();
                }
                self.view_rect.x = self.zoom.current().x;
            }
        }
        if self.autoscale_on {
            self.autoscaled = self.fit_y();
            if let Some(r) = self.autoscaled {
                self.view_rect.y = r;
            }
        }
    }

    fn fit_y(&self) -> Option<Interval> {
        let t = self.applied.transform;
        let values: Vec<f64> = (0..self.model.channel_count())
            .flat_map(|ch| t.apply_all(&self.model.channel_values(ch)))
            .collect();
        fit_range(&values)
    }

    /// Switch Y autoscale. Switching off adopts the autoscaled range as the
    /// vertical extent of the zoom base.
    fn set_autoscale(&mut self, enable: bool) {
        if self.autoscale_on && !enable {
            if let Some(r) = self.autoscaled {
                self.zoom.set_base_vertical(r);
                self.view_rect.y = r;
            }
        }
        self.autoscale_on = enable;
        if enable {
            self.autoscaled = self.fit_y();
            if let Some(r) = self.autoscaled {
                self.view_rect.y = r;
            }
        }
        info!("autoscale set to {enable}");
    }

    pub fn is_autoscale_enabled(&self) -> bool {
        self.autoscale_on
    }

    pub fn autoscaled_range(&self) -> Option<Interval> {
        self.autoscaled
    }

    // ── interaction ──────────────────────────────────────────────────────

    /// A rubber-band selection was released: push it as a new zoom level.
    pub fn on_selection_committed<S: RenderSurface + ?Sized>(&mut self, rect: Rect, surface: &mut S) {
        let rect = Rect::new(
            Interval::spanning(rect.x.min, rect.x.max),
            Interval::spanning(rect.y.min, rect.y.max),
        );
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        let target = self.zoom.zoom_in(rect);
        self.animate_to(target, surface);
    }

    pub fn on_zoom_out<S: RenderSurface + ?Sized>(&mut self, steps: usize, surface: &mut S) {
        let target = self.zoom.zoom_out(steps);
        self.animate_to(target, surface);
    }

    pub fn on_zoom_to_base<S: RenderSurface + ?Sized>(&mut self, surface: &mut S) {
        let target = self.zoom.zoom_to_base();
        self.animate_to(target, surface);
    }

    /// Wheel zoom about `cursor` by `factor` (see [`Magnifier`]).
    pub fn on_wheel<S: RenderSurface + ?Sized>(&mut self, factor: f64, cursor: [f64; 2], surface: &mut S) {
        self.animator.cancel();
        let rect = self.magnifier.rescale(self.view_rect, cursor, factor);
        self.show(rect, surface);
    }

    /// Track the cursor; returns the position tracker text.
    pub fn on_pointer_moved(&mut self, point: [f64; 2]) -> String {
        self.cursor.set(point);
        self.readout.position_text(point)
    }

    pub fn on_pointer_left(&mut self) {
        self.cursor.clear();
    }

    /// Click for a two-point distance measurement; returns the distance text
    /// once both points are set.
    pub fn on_measure_click(&mut self, point: [f64; 2]) -> Option<String> {
        self.measurement.set_point(point);
        self.measurement.distance_text(&self.readout)
    }

    fn animate_to<S: RenderSurface + ?Sized>(&mut self, target: Rect, surface: &mut S) {
        if let Some(rect) = self.animator.start(self.view_rect, target) {
            self.show(rect, surface);
        }
    }

    fn show<S: RenderSurface + ?Sized>(&mut self, rect: Rect, surface: &mut S) {
        self.view_rect = rect;
        surface.set_axis_interval(PlotAxis::XBottom, rect.x);
        surface.set_axis_interval(PlotAxis::YLeft, rect.y);
        surface.request_redraw();
    }

    // ── read side ────────────────────────────────────────────────────────

    /// Curves with the display transform applied. Stored samples are never
    /// modified.
    pub fn plot_data(&self) -> PlotData {
        let t: ValueTransform = self.applied.transform;
        PlotData {
            x: self.model.x_values(),
            channels: (0..self.model.channel_count())
                .map(|ch| t.apply_all(&self.model.channel_values(ch)))
                .collect(),
        }
    }

    pub fn view_rect(&self) -> Rect {
        self.view_rect
    }

    pub fn zoom_stack(&self) -> &ZoomStack {
        &self.zoom
    }

    pub fn animator(&self) -> &ZoomAnimator {
        &self.animator
    }

    pub fn magnifier_mut(&mut self) -> &mut Magnifier {
        &mut self.magnifier
    }

    pub fn cursor(&self) -> SharedCursor {
        self.cursor
    }

    pub fn set_vertical_markers(&mut self, markers: Vec<f64>) {
        self.markers = markers;
        self.pending_redraw = true;
    }

    pub fn vertical_markers(&self) -> &[f64] {
        &self.markers
    }
}

impl LineView<ScrollingSeries> {
    /// Scrolling plot fed by `rx`.
    pub fn scrolling(config: &PlotConfig, rx: Receiver<PlotCommand>) -> Result<Self, PlotError> {
        config.validate()?;
        let mut series = ScrollingSeries::new(config.scrolling.span)?;
        series.set_span_scaling_factor(
            config.scrolling.scaling_factor,
            config.scrolling.span_unit.as_deref(),
        )?;
        Ok(Self::new(series, config, Some(rx)))
    }
}

impl LineView<FramedSeries> {
    /// Framed (per-frame redraw) plot fed by `rx`.
    pub fn framed(config: &PlotConfig, rx: Receiver<PlotCommand>) -> Result<Self, PlotError> {
        config.validate()?;
        let mut series = FramedSeries::new();
        series.set_x_span(config.framed.x_begin, config.framed.x_end)?;
        series.set_averaging(config.framed.averaging)?;
        series.set_channel_list(config.framed.channel_list.clone());
        Ok(Self::new(series, config, Some(rx)))
    }
}

fn readout_for(label: &crate::config::AxisLabel) -> AxisReadout {
    AxisReadout {
        unit: label.unit.clone(),
        is_time: label.is_time,
        ..Default::default()
    }
}
