//! Autoscaling helpers: waterfall intensity range and line-plot Y fitting.

use serde::{Deserialize, Serialize};

use crate::data::geometry::Interval;
use crate::data::spectrogram::SpectrogramData;
use crate::data::transform::ValueTransform;

/// Picks a colour-bar range for a waterfall from the stored samples.
///
/// The range is centred on the median (robust against a few strong
/// carriers), bounded by the observed minimum and maximum, and never wider
/// than `max_range`. All three offsets are in display units (dB once a log
/// transform is active).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntensityAutoscale {
    pub below_median: f64,
    pub above_median: f64,
    pub max_range: f64,
}

impl Default for IntensityAutoscale {
    fn default() -> Self {
        Self {
            below_median: 10.0,
            above_median: 40.0,
            max_range: 100.0,
        }
    }
}

impl IntensityAutoscale {
    /// Range for the spectrogram's current contents under its transform.
    pub fn range(&self, data: &SpectrogramData) -> Option<Interval> {
        let (min, max) = data.z_min_max();
        self.range_from_stats(min, max, data.median(), data.transform())
    }

    /// Range from raw (linear) statistics.
    ///
    /// Returns `None` when the statistics are not finite after transforming
    /// (e.g. negative samples under a log transform).
    pub fn range_from_stats(
        &self,
        min: f64,
        max: f64,
        median: f64,
        transform: ValueTransform,
    ) -> Option<Interval> {
        let min_t = transform.apply(min);
        let max_t = transform.apply(max);
        let median_t = transform.apply(median);
        if !(min_t.is_finite() && max_t.is_finite() && median_t.is_finite()) {
            return None;
        }

        let ceiling = (median_t + self.above_median).min(max_t);
        let mut floor = (median_t - self.below_median).max(min_t);
        if ceiling - floor > self.max_range {
            floor = ceiling - self.max_range;
        }
        if ceiling > floor {
            Some(Interval::new(floor, ceiling))
        } else {
            // flat data
            Some(Interval::new(ceiling - 0.5, ceiling + 0.5))
        }
    }
}

/// Smallest interval holding every finite value, or `None` when there are
/// fewer than two distinct values.
pub fn fit_range<'a, I>(values: I) -> Option<Interval>
where
    I: IntoIterator<Item = &'a f64>,
{
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in values {
        if !v.is_finite() {
            continue;
        }
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    if min < max {
        Some(Interval::new(min, max))
    } else {
        None
    }
}
