//! Configuration types shared across the plot views.
//!
//! A [`PlotConfig`] can be built in code or loaded from YAML/JSON. Every
//! section has defaults, so a file only needs the values it changes.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::data::autoscale::IntensityAutoscale;
use crate::data::framed::MAX_AVERAGING;
use crate::data::geometry::Interval;
use crate::data::scrolling::DEFAULT_SPAN;
use crate::data::x_formatter::EpochUnit;
use crate::error::{ConfigError, PlotError};

/// Name, unit and kind of a plot axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisLabel {
    pub name: String,
    pub unit: String,
    /// Values are wall-clock time and are labelled `HH:MM:SS`.
    pub is_time: bool,
}

impl AxisLabel {
    pub fn new(name: &str, unit: &str) -> Self {
        Self {
            name: name.to_owned(),
            unit: unit.to_owned(),
            is_time: false,
        }
    }

    pub fn time(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            unit: String::new(),
            is_time: true,
        }
    }

    /// Axis title: `"name [unit]"`, or just the name without a unit.
    pub fn title(&self) -> String {
        if self.unit.is_empty() {
            self.name.clone()
        } else {
            format!("{} [{}]", self.name, self.unit)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterfallConfig {
    /// Ring capacity (rows of history).
    pub rows: usize,
    /// Frames arriving within this many microseconds of the newest row are
    /// averaged into the next row.
    pub line_interval_us: i64,
    pub autoscale: bool,
    pub intensity: IntensityAutoscale,
    /// Colour-bar range used while autoscale is off.
    pub manual_z_range: Interval,
    pub x_range: Interval,
    pub time_unit: EpochUnit,
    pub z_axis: AxisLabel,
}

impl Default for WaterfallConfig {
    fn default() -> Self {
        Self {
            rows: 200,
            line_interval_us: 100_000,
            autoscale: true,
            intensity: IntensityAutoscale::default(),
            manual_z_range: Interval::new(50.0, 80.0),
            x_range: Interval::new(0.0, 1.0),
            time_unit: EpochUnit::Seconds,
            z_axis: AxisLabel::new("Power Level", "dB"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollingConfig {
    pub span: f64,
    pub scaling_factor: f64,
    pub span_unit: Option<String>,
}

impl Default for ScrollingConfig {
    fn default() -> Self {
        Self {
            span: DEFAULT_SPAN,
            scaling_factor: 1.0,
            span_unit: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramedConfig {
    pub averaging: usize,
    pub x_begin: f64,
    pub x_end: f64,
    pub channel_list: Option<Vec<usize>>,
}

impl Default for FramedConfig {
    fn default() -> Self {
        Self {
            averaging: 1,
            x_begin: 0.0,
            x_end: 1.0,
            channel_list: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandPowerConfig {
    pub band_min: f64,
    pub band_max: f64,
    pub n_discrete: usize,
    pub unit: String,
}

impl Default for BandPowerConfig {
    fn default() -> Self {
        Self {
            band_min: 0.0,
            band_max: 1.0,
            n_discrete: 2,
            unit: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub enabled: bool,
    pub duration_ms: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: 800,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PlotConfig
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub title: String,
    pub x_axis: AxisLabel,
    pub y_axis: AxisLabel,
    pub waterfall: WaterfallConfig,
    pub scrolling: ScrollingConfig,
    pub framed: FramedConfig,
    pub band_power: BandPowerConfig,
    pub animation: AnimationConfig,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            title: "Plot".to_owned(),
            x_axis: AxisLabel::new("X", ""),
            y_axis: AxisLabel::new("Y", ""),
            waterfall: WaterfallConfig::default(),
            scrolling: ScrollingConfig::default(),
            framed: FramedConfig::default(),
            band_power: BandPowerConfig::default(),
            animation: AnimationConfig::default(),
        }
    }
}

enum Format {
    Yaml,
    Json,
}

fn format_for(path: &Path) -> Result<Format, ConfigError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => Ok(Format::Yaml),
        Some("json") => Ok(Format::Json),
        _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    }
}

impl PlotConfig {
    /// Load and validate a configuration file (`.yaml`, `.yml` or `.json`).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = format_for(path)?;
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: PlotConfig = match format {
            Format::Yaml => serde_yaml::from_str(&text)?,
            Format::Json => serde_json::from_str(&text)?,
        };
        cfg.validate()?;
        info!("loaded plot configuration \"{}\" from {:?}", cfg.title, path);
        Ok(cfg)
    }

    /// Write the configuration, choosing the format by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = match format_for(path)? {
            Format::Yaml => serde_yaml::to_string(self)?,
            Format::Json => serde_json::to_string_pretty(self)?,
        };
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), PlotError> {
        let w = &self.waterfall;
        if w.rows == 0 {
            return Err(PlotError::config("waterfall rows must be non-zero"));
        }
        if w.line_interval_us < 0 {
            return Err(PlotError::config(format!(
                "waterfall line interval must not be negative, got {} us",
                w.line_interval_us
            )));
        }
        w.manual_z_range.validate("waterfall z")?;
        w.x_range.validate("waterfall x")?;
        let i = &w.intensity;
        if !(i.max_range.is_finite() && i.max_range > 0.0) {
            return Err(PlotError::config(format!(
                "intensity max range must be positive, got {}",
                i.max_range
            )));
        }
        if !(i.below_median.is_finite() && i.above_median.is_finite()) {
            return Err(PlotError::config("intensity offsets must be finite"));
        }

        let s = &self.scrolling;
        if !s.span.is_finite() || s.span <= 0.0 {
            return Err(PlotError::config(format!(
                "span must be finite and positive, got {}",
                s.span
            )));
        }
        if !s.scaling_factor.is_finite() || s.scaling_factor <= 0.0 {
            return Err(PlotError::config(format!(
                "span scaling factor must be finite and positive, got {}",
                s.scaling_factor
            )));
        }

        let f = &self.framed;
        if !(1..=MAX_AVERAGING).contains(&f.averaging) {
            return Err(PlotError::config(format!(
                "averaging must be within 1..={MAX_AVERAGING}, got {}",
                f.averaging
            )));
        }
        if !f.x_begin.is_finite() || !f.x_end.is_finite() {
            return Err(PlotError::config("framed x span must be finite"));
        }

        let b = &self.band_power;
        Interval::new(b.band_min, b.band_max).validate("band")?;
        if b.n_discrete < 2 {
            return Err(PlotError::config(format!(
                "band needs at least 2 discrete frequencies, got {}",
                b.n_discrete
            )));
        }
        Ok(())
    }
}
