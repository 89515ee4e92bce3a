//! Value transforms applied when reading stored samples for display.

use serde::{Deserialize, Serialize};

/// Added to every sample before taking a logarithm so that `log10(0)` never
/// happens.
pub const LOG_FLOOR: f64 = 0.001;

/// How stored linear samples are presented.
///
/// The two logarithmic modes are mutually exclusive by construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ValueTransform {
    /// Samples are returned as stored.
    #[default]
    Linear,
    /// `10·log10(v + 0.001)`: input already in the power domain.
    PowerDb,
    /// `20·log10(v + 0.001)`: input in the amplitude (voltage) domain.
    AmplitudeDb,
}

impl ValueTransform {
    /// All available transforms (for UI selection)
    pub const ALL: &'static [ValueTransform] = &[
        ValueTransform::Linear,
        ValueTransform::PowerDb,
        ValueTransform::AmplitudeDb,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ValueTransform::Linear => "Linear",
            ValueTransform::PowerDb => "10 log10",
            ValueTransform::AmplitudeDb => "20 log10",
        }
    }

    /// Apply the transform to one value.
    ///
    /// ```
    /// # use liveraster::data::transform::ValueTransform;
    /// assert_eq!(ValueTransform::Linear.apply(0.25), 0.25);
    /// assert!((ValueTransform::PowerDb.apply(9.999) - 10.0).abs() < 1e-9);
    /// ```
    #[inline]
    pub fn apply(self, v: f64) -> f64 {
        match self {
            ValueTransform::Linear => v,
            ValueTransform::PowerDb => 10.0 * (v + LOG_FLOOR).log10(),
            ValueTransform::AmplitudeDb => 20.0 * (v + LOG_FLOOR).log10(),
        }
    }

    /// Transform every value of `values` into a new vector.
    pub fn apply_all<'a, I>(self, values: I) -> Vec<f64>
    where
        I: IntoIterator<Item = &'a f64>,
    {
        values.into_iter().map(|v| self.apply(*v)).collect()
    }

    /// Switch the power (10·log10) conversion on or off, leaving the other
    /// mode untouched unless it has to be cleared.
    pub fn with_log_conversion(self, enable: bool) -> Self {
        match (enable, self) {
            (true, _) => ValueTransform::PowerDb,
            (false, ValueTransform::PowerDb) => ValueTransform::Linear,
            (false, other) => other,
        }
    }

    /// Switch the amplitude (20·log10) conversion on or off.
    pub fn with_power_log_conversion(self, enable: bool) -> Self {
        match (enable, self) {
            (true, _) => ValueTransform::AmplitudeDb,
            (false, ValueTransform::AmplitudeDb) => ValueTransform::Linear,
            (false, other) => other,
        }
    }
}
