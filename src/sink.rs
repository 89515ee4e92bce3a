//! Data source types and channels for feeding data into plot views.
//!
//! Producers own a cloneable [`PlotSink`] and post owned batches. Sends never
//! block; the view drains its receiver in `update()` on its own thread.

use std::sync::mpsc::{Receiver, SendError, Sender};

/// Messages sent over the channel to drive a view.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotCommand {
    /// One spectrum frame for a waterfall or band-power view.
    Frame {
        samples: Vec<f32>,
        timestamp_us: i64,
    },
    /// A multi-channel block: spectra per channel for framed and band-power
    /// views, or X with matching Y blocks for scrolling views.
    Samples {
        x: Vec<f64>,
        y: Vec<Vec<f64>>,
        timestamp_us: i64,
    },
    /// Drop all stored history.
    ResetHistory,
}

/// Convenience sender for feeding data into a view.
#[derive(Clone, Debug)]
pub struct PlotSink {
    tx: Sender<PlotCommand>,
}

impl PlotSink {
    /// Send one waterfall frame.
    pub fn send_frame<I>(&self, samples: I, timestamp_us: i64) -> Result<(), SendError<PlotCommand>>
    where
        I: Into<Vec<f32>>,
    {
        self.tx.send(PlotCommand::Frame {
            samples: samples.into(),
            timestamp_us,
        })
    }

    /// Send X values with one Y block per channel.
    pub fn send_samples(
        &self,
        x: Vec<f64>,
        y: Vec<Vec<f64>>,
        timestamp_us: i64,
    ) -> Result<(), SendError<PlotCommand>> {
        self.tx.send(PlotCommand::Samples { x, y, timestamp_us })
    }

    /// Send per-channel frames without X (framed and band-power views
    /// generate their own).
    #[inline]
    pub fn send_channels(
        &self,
        y: Vec<Vec<f64>>,
        timestamp_us: i64,
    ) -> Result<(), SendError<PlotCommand>> {
        self.send_samples(Vec::new(), y, timestamp_us)
    }

    pub fn reset_history(&self) -> Result<(), SendError<PlotCommand>> {
        self.tx.send(PlotCommand::ResetHistory)
    }

    /// Send a pre-built command.
    pub fn send(&self, cmd: PlotCommand) -> Result<(), SendError<PlotCommand>> {
        self.tx.send(cmd)
    }
}

/// Create a new channel pair for one view.
pub fn channel() -> (PlotSink, Receiver<PlotCommand>) {
    let (tx, rx) = std::sync::mpsc::channel();
    (PlotSink { tx }, rx)
}
