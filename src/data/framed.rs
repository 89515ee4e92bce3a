//! Per-frame line plot data with a generated X axis and running average.
//!
//! Every update replaces the plotted curve. X is not taken from the input:
//! it is generated from `[x_begin, x_end]` with as many points as the frame
//! holds. Y is the mean of the last `averaging` frames per channel.

use std::collections::VecDeque;

use log::{debug, info};

use crate::error::PlotError;

pub const MAX_AVERAGING: usize = 50;

#[derive(Debug, Clone)]
pub struct FramedSeries {
    x_begin: f64,
    x_end: f64,
    x: Vec<f64>,
    x_stale: bool,
    averaging: usize,
    channel_list: Option<Vec<usize>>,
    /// Newest frame at the back; each frame holds one vector per channel.
    history: VecDeque<Vec<Vec<f64>>>,
    averaged: Vec<Vec<f64>>,
}

impl Default for FramedSeries {
    fn default() -> Self {
        Self {
            x_begin: 0.0,
            x_end: 1.0,
            x: Vec::new(),
            x_stale: true,
            averaging: 1,
            channel_list: None,
            history: VecDeque::new(),
            averaged: Vec::new(),
        }
    }
}

impl FramedSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the X range the generated axis covers.
    pub fn set_x_span(&mut self, begin: f64, end: f64) -> Result<(), PlotError> {
        if !begin.is_finite() || !end.is_finite() {
            return Err(PlotError::config(format!(
                "x span must be finite, got [{begin}, {end}]"
            )));
        }
        self.x_begin = begin;
        self.x_end = end;
        self.x_stale = true;
        Ok(())
    }

    pub fn x_span(&self) -> (f64, f64) {
        (self.x_begin, self.x_end)
    }

    /// Number of frames averaged, `1..=50`.
    pub fn set_averaging(&mut self, averaging: usize) -> Result<(), PlotError> {
        if !(1..=MAX_AVERAGING).contains(&averaging) {
            return Err(PlotError::config(format!(
                "averaging must be within 1..={MAX_AVERAGING}, got {averaging}"
            )));
        }
        self.averaging = averaging;
        Ok(())
    }

    pub fn averaging(&self) -> usize {
        self.averaging
    }

    /// Restrict plotting to the given input channels (in that order).
    /// `None` plots every input channel.
    pub fn set_channel_list(&mut self, channels: Option<Vec<usize>>) {
        if channels != self.channel_list {
            self.history.clear();
        }
        self.channel_list = channels;
    }

    /// Feed one frame (one vector per input channel) and recompute the
    /// average.
    pub fn update(&mut self, frame: &[Vec<f64>]) -> Result<(), PlotError> {
        let first = frame
            .first()
            .ok_or_else(|| PlotError::config("framed plot received no channels"))?;
        if first.is_empty() {
            return Err(PlotError::config("framed plot received an empty frame"));
        }

        let selected: Vec<Vec<f64>> = match &self.channel_list {
            None => frame.to_vec(),
            Some(list) => list
                .iter()
                .map(|&ch| {
                    frame.get(ch).cloned().ok_or(PlotError::ChannelOutOfRange {
                        channel: ch,
                        available: frame.len(),
                    })
                })
                .collect::<Result<_, _>>()?,
        };

        let n_points = first.len();
        if self.x.len() != n_points || self.x_stale {
            self.x = generate_axis(self.x_begin, self.x_end, n_points);
            self.x_stale = false;
        }

        if let Some(prev) = self.history.back() {
            let shape_changed = prev.len() != selected.len()
                || prev.iter().zip(&selected).any(|(a, b)| a.len() != b.len());
            if shape_changed {
                info!(
                    "framed plot shape changed to {} channels; averaging history cleared",
                    selected.len()
                );
                self.history.clear();
            }
        }

        // Shrinking drops the oldest frames; growing keeps the pushed frame
        // as a new slot, so the ring grows by one per update.
        self.history.push_back(selected);
        while self.history.len() > self.averaging {
            self.history.pop_front();
        }
        self.recompute_average();
        Ok(())
    }

    fn recompute_average(&mut self) {
        let Some(newest) = self.history.back() else {
            self.averaged.clear();
            return;
        };
        let n = self.history.len() as f64;
        let mut sums: Vec<Vec<f64>> = newest.iter().map(|ch| vec![0.0; ch.len()]).collect();
        for frame in &self.history {
            for (sum, ch) in sums.iter_mut().zip(frame) {
                for (s, v) in sum.iter_mut().zip(ch) {
                    *s += v;
                }
            }
        }
        for sum in &mut sums {
            for s in sum.iter_mut() {
                *s /= n;
            }
        }
        self.averaged = sums;
    }

    /// Number of frames currently in the averaging history.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Averaged Y values of output channel `index`.
    pub fn channel(&self, index: usize) -> Option<&[f64]> {
        self.averaged.get(index).map(Vec::as_slice)
    }

    pub fn channel_count(&self) -> usize {
        self.averaged.len()
    }

    pub fn clear(&mut self) {
        debug!("framed plot history cleared");
        self.history.clear();
        self.averaged.clear();
    }
}

/// `n` evenly spaced points from `begin` to `end`. A single point sits at
/// `begin`.
///
/// ```
/// # use liveraster::data::framed::generate_axis;
/// assert_eq!(generate_axis(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
/// assert_eq!(generate_axis(2.0, 5.0, 1), vec![2.0]);
/// ```
pub fn generate_axis(begin: f64, end: f64, n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![begin; n];
    }
    let step = (end - begin) / (n - 1) as f64;
    (0..n).map(|i| begin + i as f64 * step).collect()
}
