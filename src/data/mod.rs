pub mod autoscale;
pub mod band_power;
pub mod framed;
pub mod geometry;
pub mod magnifier;
pub mod measurement;
pub mod scrolling;
pub mod spectrogram;
pub mod transform;
pub mod x_formatter;
pub mod zoom;

#[cfg(feature = "fft")]
pub mod fft;
