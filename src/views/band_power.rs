//! Band-power view: integrates a selected band of each spectrum and scrolls
//! the result over wall-clock time.

use std::sync::mpsc::Receiver;
use std::time::Instant;

use log::{info, warn};

use crate::config::PlotConfig;
use crate::data::band_power::BandPowerIntegrator;
use crate::data::geometry::Interval;
use crate::data::scrolling::ScrollingSeries;
use crate::error::PlotError;
use crate::sink::PlotCommand;
use crate::surface::RenderSurface;
use crate::views::line::LineView;

pub struct BandPowerView {
    rx: Receiver<PlotCommand>,
    integrator: BandPowerIntegrator,
    line: LineView<ScrollingSeries>,
    /// X of the newest emitted sample.
    last_x: Option<f64>,
}

impl BandPowerView {
    pub fn new(config: &PlotConfig, rx: Receiver<PlotCommand>) -> Result<Self, PlotError> {
        config.validate()?;
        let b = &config.band_power;
        let integrator = BandPowerIntegrator::new(b.band_min, b.band_max, b.n_discrete, &b.unit)?;

        let mut line_config = config.clone();
        line_config.x_axis.is_time = true;
        let mut series = ScrollingSeries::new(config.scrolling.span)?;
        series.set_span_scaling_factor(
            config.scrolling.scaling_factor,
            config.scrolling.span_unit.as_deref(),
        )?;
        Ok(Self {
            rx,
            integrator,
            line: LineView::new(series, &line_config, None),
            last_x: None,
        })
    }

    /// Integrate posted spectra and update the inner scrolling plot.
    pub fn update<S: RenderSurface + ?Sized>(&mut self, surface: &mut S, now: Instant) -> bool {
        let flags = self.line.controls().snapshot();
        let commands: Vec<PlotCommand> = self.rx.try_iter().collect();
        if !flags.reject_data {
            for cmd in commands {
                self.apply_command(cmd);
            }
        }
        self.line.update(surface, now)
    }

    fn apply_command(&mut self, cmd: PlotCommand) {
        let result = match cmd {
            PlotCommand::Frame {
                samples,
                timestamp_us,
            } => {
                let ch = vec![samples.iter().map(|&v| v as f64).collect()];
                self.integrator.add_frame(&ch, timestamp_us)
            }
            PlotCommand::Samples { y, timestamp_us, .. } => {
                self.integrator.add_frame(&y, timestamp_us)
            }
            PlotCommand::ResetHistory => {
                self.integrator.reset();
                self.last_x = None;
                self.line.enqueue(PlotCommand::ResetHistory);
                Ok(None)
            }
        };
        match result {
            Ok(Some(sample)) => {
                // seconds of day restart at midnight
                if self.last_x.is_some_and(|last| sample.x < last) {
                    info!("band power time axis wrapped to {}; history cleared", sample.x);
                    self.line.enqueue(PlotCommand::ResetHistory);
                }
                self.last_x = Some(sample.x);
                self.line.enqueue(PlotCommand::Samples {
                    x: vec![sample.x],
                    y: sample.values.into_iter().map(|v| vec![v]).collect(),
                    timestamp_us: 0,
                });
            }
            Ok(None) => {}
            Err(e) => warn!("dropping band power frame: {e}"),
        }
    }

    pub fn set_band_start(&mut self, start: f64) {
        self.integrator.set_band_start(start);
    }

    pub fn set_band_stop(&mut self, stop: f64) {
        self.integrator.set_band_stop(stop);
    }

    pub fn selected_band(&self) -> Interval {
        self.integrator.selected_band()
    }

    /// Vertical markers for the spectrum plot the band is picked from.
    pub fn band_markers(&self) -> [f64; 2] {
        self.integrator.band_markers()
    }

    pub fn integrator(&self) -> &BandPowerIntegrator {
        &self.integrator
    }

    pub fn line(&self) -> &LineView<ScrollingSeries> {
        &self.line
    }

    pub fn line_mut(&mut self) -> &mut LineView<ScrollingSeries> {
        &mut self.line
    }
}
