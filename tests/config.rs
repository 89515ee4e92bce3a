use std::path::PathBuf;

use liveraster::config::PlotConfig;
use liveraster::{ConfigError, PlotError};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("liveraster-{}-{}", std::process::id(), name))
}

#[test]
fn defaults_match_documented_values() {
    let c = PlotConfig::default();
    assert_eq!(c.waterfall.rows, 200);
    assert_eq!(c.waterfall.line_interval_us, 100_000);
    assert_eq!(c.waterfall.intensity.below_median, 10.0);
    assert_eq!(c.waterfall.intensity.above_median, 40.0);
    assert_eq!(c.waterfall.intensity.max_range, 100.0);
    assert_eq!(c.scrolling.span, 10.0);
    assert_eq!(c.framed.averaging, 1);
    assert!(c.animation.enabled);
    assert_eq!(c.animation.duration_ms, 800);
    assert_eq!((c.band_power.band_min, c.band_power.band_max), (0.0, 1.0));
    assert_eq!(c.band_power.n_discrete, 2);
    assert!(c.validate().is_ok());
}

#[test]
fn yaml_round_trip() {
    let mut c = PlotConfig::default();
    c.title = "Spectrum".into();
    c.waterfall.rows = 64;
    c.scrolling.span_unit = Some("s".into());
    c.framed.channel_list = Some(vec![0, 2]);

    let path = temp_path("round.yaml");
    c.save(&path).unwrap();
    let loaded = PlotConfig::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded, c);
}

#[test]
fn json_round_trip() {
    let mut c = PlotConfig::default();
    c.band_power.band_min = 10.0;
    c.band_power.band_max = 20.0;
    c.band_power.unit = "MHz".into();

    let path = temp_path("round.json");
    c.save(&path).unwrap();
    let loaded = PlotConfig::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded, c);
}

#[test]
fn partial_file_fills_in_defaults() {
    let path = temp_path("partial.yaml");
    std::fs::write(&path, "title: Partial\nwaterfall:\n  rows: 10\n").unwrap();
    let loaded = PlotConfig::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded.title, "Partial");
    assert_eq!(loaded.waterfall.rows, 10);
    assert_eq!(loaded.waterfall.line_interval_us, 100_000);
    assert_eq!(loaded.scrolling.span, 10.0);
}

#[test]
fn invalid_values_fail_validation_on_load() {
    let path = temp_path("bad.json");
    std::fs::write(&path, r#"{ "scrolling": { "span": -1.0 } }"#).unwrap();
    let err = PlotConfig::load(&path).unwrap_err();
    let _ = std::fs::remove_file(&path);
    assert!(
        matches!(err, ConfigError::Invalid(PlotError::InvalidConfiguration(_))),
        "got {:?}",
        err
    );
}

#[test]
fn validate_catches_each_section() {
    let mut c = PlotConfig::default();
    c.waterfall.rows = 0;
    assert!(c.validate().is_err());

    let mut c = PlotConfig::default();
    c.waterfall.line_interval_us = -1;
    assert!(c.validate().is_err());

    let mut c = PlotConfig::default();
    c.framed.averaging = 51;
    assert!(c.validate().is_err());

    let mut c = PlotConfig::default();
    c.band_power.band_max = c.band_power.band_min;
    assert!(c.validate().is_err());
}

#[test]
fn unknown_extension_and_missing_file() {
    let err = PlotConfig::default().save(temp_path("cfg.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat(_)));

    let err = PlotConfig::load(temp_path("does-not-exist.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
