//! Windowed magnitude spectra for feeding waterfall rows.
//!
//! A [`SpectrumAnalyzer`] turns a block of time-domain samples into one
//! one-sided magnitude frame of `fft_size / 2` bins, ready for
//! [`SpectrogramData::add_frame`](crate::data::spectrogram::SpectrogramData::add_frame).

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use serde::{Deserialize, Serialize};

use crate::error::PlotError;

/// Window functions applied before the transform.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FftWindow {
    /// Rectangular (no windowing)
    Rect,
    #[default]
    Hann,
    Hamming,
    Blackman,
}

impl FftWindow {
    /// All available window types (for UI selection)
    pub const ALL: &'static [FftWindow] = &[
        FftWindow::Rect,
        FftWindow::Hann,
        FftWindow::Hamming,
        FftWindow::Blackman,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FftWindow::Rect => "Rect",
            FftWindow::Hann => "Hann",
            FftWindow::Hamming => "Hamming",
            FftWindow::Blackman => "Blackman",
        }
    }

    /// Window weight for sample `n` of `len` (periodic form).
    pub fn weight(&self, n: usize, len: usize) -> f64 {
        let phase = 2.0 * std::f64::consts::PI * n as f64 / len as f64;
        match self {
            FftWindow::Rect => 1.0,
            FftWindow::Hann => 0.5 - 0.5 * phase.cos(),
            FftWindow::Hamming => 0.54 - 0.46 * phase.cos(),
            FftWindow::Blackman => 0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos(),
        }
    }
}

/// Fixed-size forward transform with a cached plan.
pub struct SpectrumAnalyzer {
    fft_size: usize,
    window: FftWindow,
    plan: Arc<dyn Fft<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl std::fmt::Debug for SpectrumAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpectrumAnalyzer")
            .field("fft_size", &self.fft_size)
            .field("window", &self.window)
            .finish()
    }
}

impl SpectrumAnalyzer {
    pub fn new(fft_size: usize, window: FftWindow) -> Result<Self, PlotError> {
        if fft_size < 2 {
            return Err(PlotError::config(format!(
                "fft size must be at least 2, got {fft_size}"
            )));
        }
        let mut planner = FftPlanner::new();
        Ok(Self {
            fft_size,
            window,
            plan: planner.plan_fft_forward(fft_size),
            scratch: Vec::with_capacity(fft_size),
        })
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of bins in each produced frame.
    pub fn bins(&self) -> usize {
        self.fft_size / 2
    }

    pub fn window(&self) -> FftWindow {
        self.window
    }

    /// Frequency of bin `k` for a given sample rate.
    pub fn bin_frequency(&self, k: usize, sample_rate: f64) -> f64 {
        k as f64 * sample_rate / self.fft_size as f64
    }

    /// Magnitude spectrum of the last `fft_size` samples of `samples`.
    ///
    /// Returns `None` when fewer than `fft_size` samples are available.
    pub fn magnitude_frame(&mut self, samples: &[f64]) -> Option<Vec<f32>> {
        if samples.len() < self.fft_size {
            return None;
        }
        let n = self.fft_size;
        let window = self.window;
        let tail = &samples[samples.len() - n..];
        self.scratch.clear();
        self.scratch.extend(tail.iter().enumerate().map(|(i, &v)| Complex {
            re: v * window.weight(i, n),
            im: 0.0,
        }));
        self.plan.process(&mut self.scratch);

        // one-sided amplitude normalisation
        let scale = 2.0 / self.fft_size as f64;
        Some(
            self.scratch
                .iter()
                .take(self.bins())
                .map(|c| (c.norm() * scale) as f32)
                .collect(),
        )
    }
}
