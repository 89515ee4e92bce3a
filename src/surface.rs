//! The outbound seam between views and whatever draws them.

use crate::data::geometry::Interval;

/// Plot axes a view can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotAxis {
    /// Horizontal axis.
    XBottom,
    /// Vertical axis.
    YLeft,
}

/// Capabilities a rendering layer offers to a view.
///
/// Views call these only from `update()`/`tick()` and the `on_*` inputs, on
/// the thread that owns the view.
pub trait RenderSurface {
    /// Schedule a repaint. Called at most once per `update()`.
    fn request_redraw(&mut self);

    /// Show `interval` on `axis`.
    fn set_axis_interval(&mut self, axis: PlotAxis, interval: Interval);

    /// Colour-bar range of a raster plot.
    fn set_z_range(&mut self, _range: Interval) {}

    /// Tick base of the horizontal axis (2 or 10).
    fn set_scale_base(&mut self, _base: u32) {}
}

/// A surface that records every call. Useful for headless runs and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingSurface {
    pub redraws: usize,
    pub x_interval: Option<Interval>,
    pub y_interval: Option<Interval>,
    pub z_range: Option<Interval>,
    pub scale_base: Option<u32>,
}

impl RenderSurface for RecordingSurface {
    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn set_axis_interval(&mut self, axis: PlotAxis, interval: Interval) {
        match axis {
            PlotAxis::XBottom => self.x_interval = Some(interval),
            PlotAxis::YLeft => self.y_interval = Some(interval),
        }
    }

    fn set_z_range(&mut self, range: Interval) {
        self.z_range = Some(range);
    }

    fn set_scale_base(&mut self, base: u32) {
        self.scale_base = Some(base);
    }
}
