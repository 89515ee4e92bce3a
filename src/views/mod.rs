//! Consumers: each view owns its data model and is driven from one thread.

pub mod band_power;
pub mod line;
pub mod waterfall;

pub use band_power::BandPowerView;
pub use line::{LineView, PlotData, SeriesModel};
pub use waterfall::WaterfallView;
