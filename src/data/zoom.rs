//! Zoom stack and zoom animation.
//!
//! A [`ZoomStack`] holds the fully zoomed-out base view at index 0 and
//! successively narrower views above it. [`ZoomAnimator`] moves the visible
//! rectangle towards a new zoom target over a fixed number of frames.

use log::debug;

use crate::data::geometry::{Interval, Rect};

/// Result of sliding a zoom stack to a new data extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescaleOutcome {
    /// Every level was remapped proportionally onto the new extent.
    Rescaled,
    /// The new extent does not overlap the old one; the stack was reset to
    /// its base.
    Reset,
    /// The previous extent was unknown or degenerate; only the base moved.
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoomStack {
    rects: Vec<Rect>,
    index: usize,
}

impl ZoomStack {
    pub fn new(base: Rect) -> Self {
        Self {
            rects: vec![base],
            index: 0,
        }
    }

    pub fn base(&self) -> Rect {
        self.rects[0]
    }

    /// Replace the base and drop every zoom level.
    pub fn set_base(&mut self, base: Rect) {
        self.rects.clear();
        self.rects.push(base);
        self.index = 0;
    }

    /// Replace the vertical extent of the base, keeping the zoom levels.
    pub fn set_base_vertical(&mut self, y: Interval) {
        self.rects[0].y = y;
    }

    /// The currently shown rectangle.
    pub fn current(&self) -> Rect {
        self.rects[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Push a new zoom level above the current one. Levels above the current
    /// index are discarded first.
    pub fn zoom_in(&mut self, rect: Rect) -> Rect {
        self.rects.truncate(self.index + 1);
        self.rects.push(rect);
        self.index += 1;
        rect
    }

    /// Step down `steps` levels (saturating at the base).
    pub fn zoom_out(&mut self, steps: usize) -> Rect {
        self.index = self.index.saturating_sub(steps);
        self.current()
    }

    pub fn zoom_to_base(&mut self) -> Rect {
        self.index = 0;
        self.current()
    }

    /// Slide the base to horizontal extent `new`.
    ///
    /// Each level keeps the fraction of the base extent it covered:
    /// `left' = new.min + new.width() * (left - old.min) / old.width()`, where
    /// `old` is the base extent before the call.
    pub fn rescale_horizontal(&mut self, new: Interval) -> RescaleOutcome {
        let old = self.rects[0].x;
        self.rects[0].x = new;

        if !old.is_valid() || old.width() < f64::EPSILON {
            return RescaleOutcome::Skipped;
        }
        if !old.overlaps(&new) {
            debug!(
                "zoom stack reset: new extent [{}, {}] is disjoint from [{}, {}]",
                new.min, new.max, old.min, old.max
            );
            let base = self.rects[0];
            self.set_base(base);
            return RescaleOutcome::Reset;
        }

        let old_width = old.width();
        let new_width = new.width();
        for rect in self.rects.iter_mut().skip(1) {
            let left_ratio = (rect.x.min - old.min) / old_width;
            let right_ratio = (rect.x.max - old.min) / old_width;
            rect.x = Interval::new(
                new.min + new_width * left_ratio,
                new.min + new_width * right_ratio,
            );
        }
        RescaleOutcome::Rescaled
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ZoomAnimator
// ─────────────────────────────────────────────────────────────────────────────

/// Animation frames per second.
pub const ANIMATION_FPS: u32 = 30;

/// Fraction of the remaining distance left after each frame is `1/1.2`.
const APPROACH_DIVISOR: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationState {
    Normal,
    Animating { frame: u32 },
}

/// Drives a view rectangle towards a zoom target with logarithmic
/// deceleration. While it is animating, the owning view must not rescale
/// its zoom stack.
#[derive(Debug, Clone)]
pub struct ZoomAnimator {
    enabled: bool,
    duration_ms: u32,
    n_frames: u32,
    state: AnimationState,
    current: Rect,
    target: Rect,
}

impl Default for ZoomAnimator {
    fn default() -> Self {
        Self::new(800, true)
    }
}

impl ZoomAnimator {
    pub fn new(duration_ms: u32, enabled: bool) -> Self {
        let mut a = Self {
            enabled,
            duration_ms: 0,
            n_frames: 1,
            state: AnimationState::Normal,
            current: Rect::default(),
            target: Rect::default(),
        };
        a.set_duration_ms(duration_ms);
        a
    }

    pub fn set_duration_ms(&mut self, duration_ms: u32) {
        self.duration_ms = duration_ms;
        self.n_frames = (duration_ms.saturating_mul(ANIMATION_FPS) / 1000).max(1);
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn frame_count(&self) -> u32 {
        self.n_frames
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, AnimationState::Animating { .. })
    }

    /// The rectangle most recently produced.
    pub fn current(&self) -> Rect {
        self.current
    }

    pub fn target(&self) -> Rect {
        self.target
    }

    /// Begin moving from `from` to `target`. With animation disabled the
    /// target is returned for immediate use and the state stays `Normal`.
    pub fn start(&mut self, from: Rect, target: Rect) -> Option<Rect> {
        self.current = from;
        self.target = target;
        if self.enabled && from != target {
            self.state = AnimationState::Animating { frame: 0 };
            None
        } else {
            self.current = target;
            self.state = AnimationState::Normal;
            Some(target)
        }
    }

    /// Produce the next frame, or `None` when idle. The last frame snaps to
    /// the target and returns the state to `Normal`.
    pub fn tick(&mut self) -> Option<Rect> {
        let frame = match self.state {
            AnimationState::Normal => return None,
            AnimationState::Animating { frame } => frame,
        };
        if frame >= self.n_frames {
            self.current = self.target;
            self.state = AnimationState::Normal;
        } else {
            self.current = Rect::new(
                approach(self.current.x, self.target.x),
                approach(self.current.y, self.target.y),
            );
            self.state = AnimationState::Animating { frame: frame + 1 };
        }
        Some(self.current)
    }

    /// Abandon an animation in progress, leaving the current rectangle.
    pub fn cancel(&mut self) {
        self.state = AnimationState::Normal;
    }
}

fn approach(current: Interval, target: Interval) -> Interval {
    Interval::new(
        target.min - (target.min - current.min) / APPROACH_DIVISOR,
        target.max - (target.max - current.max) / APPROACH_DIVISOR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approach_covers_a_sixth_of_the_gap() {
        let i = approach(Interval::new(0.0, 12.0), Interval::new(12.0, 24.0));
        assert!((i.min - 2.0).abs() < 1e-12);
        assert!((i.max - 14.0).abs() < 1e-12);
    }

    #[test]
    fn levels_are_measured_against_the_base() {
        let mut z = ZoomStack::new(Rect::from_edges(0.0, 100.0, 0.0, 1.0));
        z.zoom_in(Rect::from_edges(20.0, 40.0, 0.0, 1.0));
        assert_eq!(z.rescale_horizontal(Interval::new(10.0, 110.0)), RescaleOutcome::Rescaled);
        let level = z.rects()[1].x;
        assert!((level.min - 30.0).abs() < 1e-9 && (level.max - 50.0).abs() < 1e-9);
    }

    #[test]
    fn frame_budget_has_a_floor_of_one() {
        assert_eq!(ZoomAnimator::new(0, true).frame_count(), 1);
        assert_eq!(ZoomAnimator::new(800, true).frame_count(), 24);
    }
}
