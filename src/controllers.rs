//! Controllers for steering a view from external code.
//!
//! [`ViewControls`] is a cloneable handle holding the flags a view reads once
//! per `update()`. Any thread may flip them; the data itself travels through
//! [`crate::sink::PlotSink`].

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::data::framed::MAX_AVERAGING;
use crate::data::scrolling::DEFAULT_SPAN;
use crate::data::transform::ValueTransform;
use crate::error::PlotError;

/// How long a strobed autoscale stays on at most.
pub const STROBE_HOLD: Duration = Duration::from_millis(100);

/// Flags shared between producers, UI code and the view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewFlags {
    pub transform: ValueTransform,
    pub averaging: usize,
    pub span: f64,
    pub paused: bool,
    pub autoscale: bool,
    /// Drain and discard incoming data.
    pub reject_data: bool,
    /// Pending strobe request, consumed by the view.
    pub strobe_delay: Option<Duration>,
}

impl Default for ViewFlags {
    fn default() -> Self {
        Self {
            transform: ValueTransform::Linear,
            averaging: 1,
            span: DEFAULT_SPAN,
            paused: false,
            autoscale: false,
            reject_data: false,
            strobe_delay: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ViewControls {
    inner: Arc<RwLock<ViewFlags>>,
}

impl ViewControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flags(flags: ViewFlags) -> Self {
        Self {
            inner: Arc::new(RwLock::new(flags)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, ViewFlags> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ViewFlags> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current flags.
    pub fn snapshot(&self) -> ViewFlags {
        self.read().clone()
    }

    pub fn pause(&self) {
        self.write().paused = true;
    }

    pub fn resume(&self) {
        self.write().paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.read().paused
    }

    pub fn set_reject_data(&self, reject: bool) {
        self.write().reject_data = reject;
    }

    pub fn set_transform(&self, transform: ValueTransform) {
        self.write().transform = transform;
    }

    /// Toggle the `10·log10` display conversion.
    pub fn enable_log_conversion(&self, enable: bool) {
        let mut f = self.write();
        f.transform = f.transform.with_log_conversion(enable);
    }

    /// Toggle the `20·log10` display conversion.
    pub fn enable_power_log_conversion(&self, enable: bool) {
        let mut f = self.write();
        f.transform = f.transform.with_power_log_conversion(enable);
    }

    pub fn set_averaging(&self, averaging: usize) -> Result<(), PlotError> {
        if !(1..=MAX_AVERAGING).contains(&averaging) {
            return Err(PlotError::config(format!(
                "averaging must be within 1..={MAX_AVERAGING}, got {averaging}"
            )));
        }
        self.write().averaging = averaging;
        Ok(())
    }

    pub fn set_span(&self, span: f64) -> Result<(), PlotError> {
        if !span.is_finite() || span <= 0.0 {
            return Err(PlotError::config(format!(
                "span must be finite and positive, got {span}"
            )));
        }
        self.write().span = span;
        Ok(())
    }

    pub fn set_autoscale(&self, enable: bool) {
        self.write().autoscale = enable;
    }

    pub fn is_autoscale_enabled(&self) -> bool {
        self.read().autoscale
    }

    /// Ask the view to switch autoscale on after `delay` and off again
    /// shortly after, capturing a zoom base.
    pub fn strobe_autoscale(&self, delay: Duration) {
        self.write().strobe_delay = Some(delay);
    }

    /// Take the pending strobe request, if any.
    pub fn take_strobe_request(&self) -> Option<Duration> {
        self.write().strobe_delay.take()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StrobeAutoscale
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrobeAction {
    Enable,
    Disable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum StrobeState {
    #[default]
    Idle,
    Armed {
        enable_at: Instant,
    },
    Active {
        disable_at: Instant,
    },
}

/// Timer pair that briefly turns autoscale on.
#[derive(Debug, Clone, Default)]
pub struct StrobeAutoscale {
    state: StrobeState,
}

impl StrobeAutoscale {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a strobe `delay` from `now`. Does nothing when autoscale is
    /// already on. Returns whether the strobe was armed.
    pub fn arm(&mut self, now: Instant, delay: Duration, autoscale_enabled: bool) -> bool {
        if autoscale_enabled {
            debug!("strobe autoscale ignored: autoscale already enabled");
            return false;
        }
        info!("strobing autoscale in {} ms", delay.as_millis());
        self.state = StrobeState::Armed {
            enable_at: now + delay,
        };
        true
    }

    /// Advance the timers. `range_valid` reports whether the view has
    /// already produced an autoscaled range while the strobe is on.
    pub fn poll(&mut self, now: Instant, range_valid: bool) -> Option<StrobeAction> {
        match self.state {
            StrobeState::Idle => None,
            StrobeState::Armed { enable_at } if now >= enable_at => {
                self.state = StrobeState::Active {
                    disable_at: enable_at + STROBE_HOLD,
                };
                Some(StrobeAction::Enable)
            }
            StrobeState::Armed { .. } => None,
            StrobeState::Active { disable_at } if range_valid || now >= disable_at => {
                self.state = StrobeState::Idle;
                Some(StrobeAction::Disable)
            }
            StrobeState::Active { .. } => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state != StrobeState::Idle
    }

    pub fn cancel(&mut self) {
        self.state = StrobeState::Idle;
    }
}
