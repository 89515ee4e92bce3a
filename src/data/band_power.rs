//! Band-power integration over one-second windows.
//!
//! Each spectrum frame contributes the sum of its bins inside the selected
//! band. Once a window has lasted at least one second the per-channel sums
//! are divided by the width of the selectable band and emitted as a single
//! sample whose X is the seconds-of-day of the closing frame.

use log::debug;

use crate::data::geometry::Interval;
use crate::data::x_formatter::seconds_of_day;
use crate::error::PlotError;

pub const INTEGRATION_WINDOW_US: i64 = 1_000_000;

/// One integrated point per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct BandPowerSample {
    pub x: f64,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct BandPowerIntegrator {
    band: Interval,
    n_discrete: usize,
    unit: String,
    start: f64,
    stop: f64,
    window_start_us: Option<i64>,
    sums: Vec<f64>,
}

impl Default for BandPowerIntegrator {
    fn default() -> Self {
        Self {
            band: Interval::new(0.0, 1.0),
            n_discrete: 2,
            unit: String::new(),
            start: 0.0,
            stop: 0.0,
            window_start_us: None,
            sums: Vec::new(),
        }
    }
}

impl BandPowerIntegrator {
    pub fn new(
        band_min: f64,
        band_max: f64,
        n_discrete: usize,
        unit: &str,
    ) -> Result<Self, PlotError> {
        let mut b = Self::default();
        b.set_selectable_band(band_min, band_max, n_discrete, unit)?;
        Ok(b)
    }

    /// Define the frequency range the selection can move over.
    pub fn set_selectable_band(
        &mut self,
        band_min: f64,
        band_max: f64,
        n_discrete: usize,
        unit: &str,
    ) -> Result<(), PlotError> {
        let band = Interval::new(band_min, band_max);
        band.validate("band")?;
        if n_discrete < 2 {
            return Err(PlotError::config(format!(
                "band needs at least 2 discrete frequencies, got {n_discrete}"
            )));
        }
        self.band = band;
        self.n_discrete = n_discrete;
        self.unit = unit.to_owned();
        self.start = self.start.clamp(band.min, band.max);
        self.stop = self.stop.clamp(self.start, band.max);
        Ok(())
    }

    pub fn band(&self) -> Interval {
        self.band
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Selection granularity: `(max - min) / (n_discrete - 1)`.
    pub fn step(&self) -> f64 {
        self.band.width() / (self.n_discrete - 1) as f64
    }

    /// Move the lower edge. Moving it above the upper edge drags the upper
    /// edge along.
    pub fn set_band_start(&mut self, start: f64) {
        self.start = start.clamp(self.band.min, self.band.max);
        if self.start > self.stop {
            self.stop = self.start;
        }
    }

    /// Move the upper edge. Moving it below the lower edge drags the lower
    /// edge along.
    pub fn set_band_stop(&mut self, stop: f64) {
        self.stop = stop.clamp(self.band.min, self.band.max);
        if self.start > self.stop {
            self.start = self.stop;
        }
    }

    pub fn set_selected_band(&mut self, start: f64, stop: f64) {
        self.set_band_start(start);
        self.set_band_stop(stop);
    }

    pub fn selected_band(&self) -> Interval {
        Interval::new(self.start, self.stop)
    }

    /// X positions of the two vertical markers drawn on the spectrum plot.
    pub fn band_markers(&self) -> [f64; 2] {
        [self.start, self.stop]
    }

    /// Inclusive bin range of the selection for a frame of `len` bins.
    pub fn bin_range(&self, len: usize) -> Option<(usize, usize)> {
        if len == 0 {
            return None;
        }
        Some((self.bin_of(self.start, len), self.bin_of(self.stop, len)))
    }

    fn bin_of(&self, freq: f64, len: usize) -> usize {
        let pos = ((freq - self.band.min) / self.band.width() * len as f64).floor();
        if pos.is_nan() || pos <= 0.0 {
            0
        } else {
            (pos as usize).min(len - 1)
        }
    }

    /// Accumulate one spectrum frame (one vector per channel).
    ///
    /// Returns the integrated sample when this frame closes a window.
    pub fn add_frame(
        &mut self,
        channels: &[Vec<f64>],
        timestamp_us: i64,
    ) -> Result<Option<BandPowerSample>, PlotError> {
        if timestamp_us < 0 {
            return Err(PlotError::InvalidTimestamp(timestamp_us));
        }
        let Some(first) = channels.first() else {
            return Err(PlotError::config("band power frame has no channels"));
        };

        if self.sums.len() != channels.len() {
            debug!(
                "band power channel count changed from {} to {}",
                self.sums.len(),
                channels.len()
            );
            self.sums = vec![0.0; channels.len()];
            self.window_start_us = None;
        }
        let window_start = match self.window_start_us {
            Some(t) => t,
            None => {
                self.sums.iter_mut().for_each(|s| *s = 0.0);
                self.window_start_us = Some(timestamp_us);
                timestamp_us
            }
        };

        if let Some((lo, hi)) = self.bin_range(first.len()) {
            for (sum, ch) in self.sums.iter_mut().zip(channels) {
                if lo < ch.len() {
                    let hi = hi.min(ch.len() - 1);
                    *sum += ch[lo..=hi].iter().sum::<f64>();
                }
            }
        }

        if timestamp_us - window_start < INTEGRATION_WINDOW_US {
            return Ok(None);
        }
        let width = self.band.width();
        let values = self.sums.iter().map(|s| s / width).collect();
        self.window_start_us = None;
        Ok(Some(BandPowerSample {
            x: seconds_of_day(timestamp_us),
            values,
        }))
    }

    /// Abandon the window in progress.
    pub fn reset(&mut self) {
        self.window_start_us = None;
        self.sums.iter_mut().for_each(|s| *s = 0.0);
    }
}
