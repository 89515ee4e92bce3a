//! Error types shared by the data models, views and configuration loader.

use std::path::PathBuf;

/// Failures reported by the plot data models.
///
/// Out-of-range raster queries are never an error: they are clamped to the
/// nearest stored row/column.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid timestamp: {0} us")]
    InvalidTimestamp(i64),
    #[error("channel {channel} out of range (frame has {available} channels)")]
    ChannelOutOfRange { channel: usize, available: usize },
}

impl PlotError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        PlotError::InvalidConfiguration(msg.into())
    }
}

/// Failures while loading or saving a [`crate::config::PlotConfig`].
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("io error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config extension {0:?} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),
    #[error(transparent)]
    Invalid(#[from] PlotError),
}
