//! Sliding-window history for scrolling line plots.
//!
//! X grows at the tail and is trimmed at the head so that the stored extent
//! never exceeds one span. Each channel's Y sequence is trimmed to X's
//! length after every append.

use std::collections::VecDeque;

use log::{debug, info};

use crate::data::geometry::Interval;
use crate::data::zoom::{RescaleOutcome, ZoomStack};
use crate::error::PlotError;

pub const DEFAULT_SPAN: f64 = 10.0;

#[derive(Debug, Clone)]
pub struct ScrollingSeries {
    x: VecDeque<f64>,
    y: Vec<VecDeque<f64>>,
    span: f64,
    scaling_factor: f64,
    /// Unit shown on the span axis when the scaling factor is not 1.
    span_unit: Option<String>,
}

impl Default for ScrollingSeries {
    fn default() -> Self {
        Self {
            x: VecDeque::new(),
            y: Vec::new(),
            span: DEFAULT_SPAN,
            scaling_factor: 1.0,
            span_unit: None,
        }
    }
}

impl ScrollingSeries {
    pub fn new(span: f64) -> Result<Self, PlotError> {
        let mut s = Self::default();
        s.set_span(span)?;
        Ok(s)
    }

    /// Append X values, then drop head values while the stored extent is
    /// longer than `span × scaling_factor`.
    pub fn append_x(&mut self, values: &[f64]) {
        self.x.extend(values.iter().copied());
        let window = self.window();
        while let (Some(&head), Some(&tail)) = (self.x.front(), self.x.back()) {
            if tail - head > window {
                self.x.pop_front();
            } else {
                break;
            }
        }
    }

    /// Append one block per channel. The channel set follows the number of
    /// blocks supplied; each channel is then trimmed to X's length.
    pub fn append_y(&mut self, channels: &[Vec<f64>]) {
        if channels.len() != self.y.len() {
            info!(
                "scrolling series channel count changed from {} to {}",
                self.y.len(),
                channels.len()
            );
            self.y.resize_with(channels.len(), VecDeque::new);
        }
        let x_len = self.x.len();
        for (stored, incoming) in self.y.iter_mut().zip(channels) {
            stored.extend(incoming.iter().copied());
            while stored.len() > x_len {
                stored.pop_front();
            }
        }
    }

    /// Slide `stack` to the new data extent `[new_head, new_tail]`.
    ///
    /// Each zoom level keeps the fraction of the stack's base extent it
    /// covered before the call. A jump to a disjoint extent resets the stack,
    /// and a zero-width base only moves the base.
    pub fn rescale_zoom_stack(
        &self,
        stack: &mut ZoomStack,
        new_head: f64,
        new_tail: f64,
    ) -> RescaleOutcome {
        let outcome = stack.rescale_horizontal(Interval::new(new_head, new_tail));
        if outcome == RescaleOutcome::Reset {
            debug!("scrolling series discontinuity, zoom levels dropped");
        }
        outcome
    }

    /// Current head and tail of X, if any.
    pub fn extent(&self) -> Option<Interval> {
        match (self.x.front(), self.x.back()) {
            (Some(&head), Some(&tail)) => Some(Interval::new(head, tail)),
            _ => None,
        }
    }

    pub fn set_span(&mut self, span: f64) -> Result<(), PlotError> {
        if !span.is_finite() || span <= 0.0 {
            return Err(PlotError::config(format!(
                "span must be finite and positive, got {span}"
            )));
        }
        self.span = span;
        Ok(())
    }

    /// Set the factor applied to the span (e.g. samples per second) and the
    /// unit shown for it.
    pub fn set_span_scaling_factor(
        &mut self,
        factor: f64,
        unit: Option<&str>,
    ) -> Result<(), PlotError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(PlotError::config(format!(
                "span scaling factor must be finite and positive, got {factor}"
            )));
        }
        self.scaling_factor = factor;
        self.span_unit = unit.map(str::to_owned);
        Ok(())
    }

    pub fn span(&self) -> f64 {
        self.span
    }

    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    pub fn span_unit(&self) -> Option<&str> {
        self.span_unit.as_deref()
    }

    /// Maximum extent kept in X units.
    pub fn window(&self) -> f64 {
        self.span * self.scaling_factor
    }

    /// Drop all X/Y samples.
    pub fn reset_history(&mut self) {
        self.x.clear();
        for ch in &mut self.y {
            ch.clear();
        }
    }

    pub fn x(&self) -> &VecDeque<f64> {
        &self.x
    }

    pub fn channel(&self, index: usize) -> Option<&VecDeque<f64>> {
        self.y.get(index)
    }

    pub fn channel_count(&self) -> usize {
        self.y.len()
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_spans_are_rejected_and_keep_previous() {
        let mut s = ScrollingSeries::default();
        assert!(s.set_span(0.0).is_err());
        assert!(s.set_span(f64::NAN).is_err());
        assert!(s.set_span_scaling_factor(-1.0, None).is_err());
        assert_eq!(s.window(), DEFAULT_SPAN);
    }

    #[test]
    fn y_follows_x_length() {
        let mut s = ScrollingSeries::new(2.0).unwrap();
        s.append_x(&[0.0, 1.0, 2.0, 3.0]);
        s.append_y(&[vec![10.0, 11.0, 12.0, 13.0]]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.channel(0).unwrap().iter().copied().collect::<Vec<_>>(), vec![11.0, 12.0, 13.0]);
    }
}
