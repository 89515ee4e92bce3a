//! Axis value formatting: epoch units, wall-clock labels and numeric readouts.
//!
//! Waterfall time axes and band-power X axes carry wall-clock time as seconds.
//! [`WallClockFormatter`] renders those as `HH:MM:SS` tick labels and
//! `HH:MM:SS.uuuuuu` cursor readouts.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// EpochUnit
// ─────────────────────────────────────────────────────────────────────────────

/// The unit in which time coordinates are expressed on a plot axis.
///
/// Timestamps arrive in microseconds; the unit decides what "1.0" on the
/// axis means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EpochUnit {
    /// Axis values are seconds (e.g. `1_700_000_000.0`).
    #[default]
    Seconds,
    /// Axis values are milliseconds.
    Milliseconds,
    /// Axis values are microseconds.
    Microseconds,
    /// Axis values are nanoseconds.
    Nanoseconds,
}

impl EpochUnit {
    /// How many of this unit make up one second.
    ///
    /// ```
    /// # use liveraster::data::x_formatter::EpochUnit;
    /// assert_eq!(EpochUnit::Milliseconds.units_per_second(), 1_000.0);
    /// ```
    pub fn units_per_second(&self) -> f64 {
        match self {
            EpochUnit::Seconds => 1.0,
            EpochUnit::Milliseconds => 1_000.0,
            EpochUnit::Microseconds => 1_000_000.0,
            EpochUnit::Nanoseconds => 1_000_000_000.0,
        }
    }

    /// Convert a microsecond timestamp to an axis coordinate in this unit.
    pub fn from_micros(&self, us: i64) -> f64 {
        us as f64 * self.units_per_second() / 1e6
    }

    /// Convert an axis coordinate in this unit to seconds.
    pub fn to_seconds(&self, value: f64) -> f64 {
        value / self.units_per_second()
    }
}

impl std::fmt::Display for EpochUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EpochUnit::Seconds => write!(f, "s"),
            EpochUnit::Milliseconds => write!(f, "ms"),
            EpochUnit::Microseconds => write!(f, "µs"),
            EpochUnit::Nanoseconds => write!(f, "ns"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// WallClockFormatter
// ─────────────────────────────────────────────────────────────────────────────

/// Wall-clock formatter for time axes.
///
/// Values are interpreted in [`epoch_unit`](Self::epoch_unit) and rendered in
/// UTC. Only the time of day is shown; waterfall and band-power plots span
/// seconds to minutes, never days.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WallClockFormatter {
    pub epoch_unit: EpochUnit,
}

impl WallClockFormatter {
    pub fn for_epoch_unit(epoch_unit: EpochUnit) -> Self {
        Self { epoch_unit }
    }

    /// Tick label: `HH:MM:SS`.
    ///
    /// ```
    /// # use liveraster::data::x_formatter::WallClockFormatter;
    /// let f = WallClockFormatter::default();
    /// assert_eq!(f.label(3_661.0), "01:01:01");
    /// ```
    pub fn label(&self, value: f64) -> String {
        to_utc(self.epoch_unit.to_seconds(value))
            .format("%H:%M:%S")
            .to_string()
    }

    /// Cursor readout: `HH:MM:SS.uuuuuu`.
    pub fn precise(&self, value: f64) -> String {
        let dt = to_utc(self.epoch_unit.to_seconds(value));
        format!("{}.{:06}", dt.format("%H:%M:%S"), dt.nanosecond() / 1_000)
    }
}

/// Seconds since midnight (UTC) for a microsecond timestamp.
pub fn seconds_of_day(timestamp_us: i64) -> f64 {
    ((timestamp_us / 1_000_000) % (60 * 60 * 24)) as f64
}

/// Seconds (as `f64`) to a UTC date-time; non-finite or unrepresentable
/// values fall back to the UNIX epoch.
fn to_utc(secs: f64) -> DateTime<Utc> {
    if !secs.is_finite() {
        return DateTime::<Utc>::default();
    }
    let s = secs.floor();
    let ns = (((secs - s) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(s as i64, ns).unwrap_or(DateTime::<Utc>::default())
}

// ─────────────────────────────────────────────────────────────────────────────
// Numeric readouts
// ─────────────────────────────────────────────────────────────────────────────

/// `"<value> <unit>"`, or the bare value when `unit` is empty.
pub fn format_with_unit(value: f64, unit: &str) -> String {
    if unit.is_empty() {
        format!("{}", value)
    } else {
        format!("{} {}", value, unit)
    }
}

/// Tick base for an X axis of `n_bins` points: 2 for a power of two (FFT
/// bin counts), 10 otherwise.
///
/// ```
/// # use liveraster::data::x_formatter::scale_base_for_bins;
/// assert_eq!(scale_base_for_bins(1024), 2);
/// assert_eq!(scale_base_for_bins(1000), 10);
/// ```
pub fn scale_base_for_bins(n_bins: usize) -> u32 {
    if n_bins.is_power_of_two() {
        2
    } else {
        10
    }
}
