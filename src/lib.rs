//! liveraster crate root: re-exports and module wiring.
//!
//! Realtime plot models that do not depend on a GUI toolkit:
//! - `data`: spectrogram ring buffer, scrolling and framed series, zoom
//!   stack, band-power integration, readouts
//! - `sink`: channel for feeding frames and samples from producer threads
//! - `controllers`: shared view flags and strobe autoscale
//! - `views`: waterfall, line and band-power views driving a `RenderSurface`
//! - `config`: YAML/JSON configuration

pub mod config;
pub mod controllers;
pub mod data;
pub mod error;
pub mod sink;
pub mod surface;
pub mod views;

// Public re-exports for a compact external API
pub use config::{AxisLabel, PlotConfig};
pub use controllers::{StrobeAutoscale, ViewControls, ViewFlags};
pub use data::framed::FramedSeries;
pub use data::geometry::{Axis, Interval, Rect};
pub use data::scrolling::ScrollingSeries;
pub use data::spectrogram::{Backfill, SpectrogramData};
pub use data::transform::ValueTransform;
pub use data::zoom::{RescaleOutcome, ZoomAnimator, ZoomStack};
pub use error::{ConfigError, PlotError};
pub use sink::{channel, PlotCommand, PlotSink};
pub use surface::{PlotAxis, RecordingSurface, RenderSurface};
pub use views::{BandPowerView, LineView, WaterfallView};
