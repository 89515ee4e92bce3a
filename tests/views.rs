use std::time::{Duration, Instant};

use liveraster::config::{PlotConfig, WaterfallConfig};
use liveraster::data::geometry::{Axis, Interval, Rect};
use liveraster::data::x_formatter::seconds_of_day;
use liveraster::{channel, BandPowerView, LineView, RecordingSurface, WaterfallView};

const T0: i64 = 1_000_000;

fn waterfall(rows: usize) -> (liveraster::PlotSink, WaterfallView) {
    let cfg = WaterfallConfig {
        rows,
        ..Default::default()
    };
    let (sink, rx) = channel();
    (sink, WaterfallView::new(cfg, 0, rx).unwrap())
}

fn ramp(n: usize, offset: f64) -> (Vec<f64>, Vec<Vec<f64>>) {
    let x: Vec<f64> = (0..n).map(|i| i as f64 + offset).collect();
    let y = vec![x.iter().map(|v| v * 2.0).collect()];
    (x, y)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ─── waterfall ──────────────────────────────────────────────────────────────

#[test]
fn waterfall_coalesces_redraws() {
    let (sink, mut view) = waterfall(8);
    let mut surf = RecordingSurface::default();
    assert!(view.update(&mut surf), "initial paint");
    assert!(!view.update(&mut surf), "nothing new");

    for i in 0..5 {
        sink.send_frame(vec![i as f32; 4], T0 + i * 100_000).unwrap();
    }
    assert!(view.update(&mut surf));
    assert_eq!(surf.redraws, 2, "one redraw for five frames");

    let data = view.data().unwrap();
    assert_eq!(data.max_time_us(), T0 + 400_000);
    assert_eq!(data.columns(), 4);
    assert_eq!(surf.scale_base, Some(2));
    assert_eq!(surf.y_interval, Some(data.interval(liveraster::Axis::Y)));
}

#[test]
fn waterfall_averages_frames_within_line_interval() {
    let (sink, mut view) = waterfall(4);
    let mut surf = RecordingSurface::default();
    sink.send_frame(vec![2.0f32], T0).unwrap();
    sink.send_frame(vec![4.0f32], T0 + 50_000).unwrap();
    sink.send_frame(vec![6.0f32], T0 + 100_000).unwrap();
    view.update(&mut surf);

    let data = view.data().unwrap();
    let rows: Vec<(i64, f32)> = data.frames().map(|(ts, f)| (ts, f[0])).collect();
    assert_eq!(rows[3], (T0 + 100_000, 5.0), "second row averages two frames");
    assert_eq!(rows[2], (T0, 2.0));
}

#[test]
fn waterfall_backfills_time_axis() {
    let (sink, mut view) = waterfall(10);
    let mut surf = RecordingSurface::default();
    sink.send_frame(vec![1.0f32; 2], 10 * T0).unwrap();
    view.update(&mut surf);

    let data = view.data().unwrap();
    assert_eq!(data.max_time_us(), 10 * T0);
    // nine synthetic rows one line interval apart before the first real row
    assert_eq!(data.min_time_us(), 10 * T0 - 900_000);
}

#[test]
fn paused_waterfall_keeps_data_but_stays_quiet() {
    let (sink, mut view) = waterfall(4);
    let mut surf = RecordingSurface::default();
    view.update(&mut surf);
    let controls = view.controls();

    controls.pause();
    sink.send_frame(vec![1.0f32; 3], T0).unwrap();
    assert!(!view.update(&mut surf));
    assert_eq!(surf.redraws, 1);
    assert_eq!(view.data().unwrap().max_time_us(), T0, "data applied while paused");

    controls.resume();
    assert!(view.update(&mut surf), "resume shows what arrived");
    assert_eq!(surf.redraws, 2);
}

#[test]
fn rejected_data_is_drained_and_dropped() {
    let (sink, mut view) = waterfall(4);
    let mut surf = RecordingSurface::default();
    let controls = view.controls();

    controls.set_reject_data(true);
    sink.send_frame(vec![1.0f32; 3], T0).unwrap();
    view.update(&mut surf);
    assert!(view.data().is_none());

    controls.set_reject_data(false);
    view.update(&mut surf);
    assert!(view.data().is_none(), "rejected frames do not come back");
}

#[test]
fn waterfall_z_range_autoscale_and_manual() {
    let (sink, mut view) = waterfall(2);
    let mut surf = RecordingSurface::default();
    sink.send_frame(vec![0.0f32, 10.0, 20.0, 30.0], T0).unwrap();
    sink.send_frame(vec![5.0f32, 15.0, 25.0, 35.0], T0 + 100_000).unwrap();
    view.update(&mut surf);

    // median 20, ceiling min(60, 35), floor max(10, 0)
    assert_eq!(view.z_range(), Interval::new(10.0, 35.0));
    assert_eq!(surf.z_range, Some(view.z_range()));

    view.controls().set_autoscale(false);
    view.set_manual_z_range(-20.0, 40.0).unwrap();
    view.update(&mut surf);
    assert_eq!(surf.z_range, Some(Interval::new(-20.0, 40.0)));
    assert!(view.set_manual_z_range(5.0, 5.0).is_err());
}

#[test]
fn waterfall_reset_and_width_change() {
    let (sink, mut view) = waterfall(4);
    let mut surf = RecordingSurface::default();
    sink.send_frame(vec![1.0f32; 3], T0).unwrap();
    sink.send_frame(vec![1.0f32; 5], T0 + 100_000).unwrap();
    view.update(&mut surf);
    let data = view.data().unwrap();
    assert_eq!(data.columns(), 5);
    // reallocated with a fresh backfill ending one interval before the new row
    assert_eq!(data.max_time_us(), T0 + 100_000);
    assert_eq!(data.min_time_us(), T0 - 200_000);
    let y = data.interval(Axis::Y);
    assert!(close(y.min, 0.8) && close(y.max, 1.1), "{:?}", y);
    assert_eq!(surf.y_interval, Some(y));

    sink.send_samples(vec![], vec![], T0 + 200_000).unwrap();
    view.update(&mut surf);
    assert_eq!(
        view.data().unwrap().max_time_us(),
        T0 + 100_000,
        "missing channel is dropped"
    );

    sink.reset_history().unwrap();
    view.update(&mut surf);
    assert!(view.data().is_none());
    assert_eq!(view.value(0.0, 0.0), None);
}

// ─── scrolling line view ────────────────────────────────────────────────────

fn scrolling_view(animate: bool) -> (liveraster::PlotSink, LineView<liveraster::ScrollingSeries>) {
    let mut cfg = PlotConfig::default();
    cfg.animation.enabled = animate;
    cfg.x_axis.unit = "s".into();
    cfg.y_axis.unit = "V".into();
    let (sink, rx) = channel();
    (sink, LineView::scrolling(&cfg, rx).unwrap())
}

#[test]
fn scrolling_view_follows_data_and_keeps_zoom_fraction() {
    let (sink, mut view) = scrolling_view(false);
    let mut surf = RecordingSurface::default();
    let now = Instant::now();

    let (x, y) = ramp(21, 0.0);
    sink.send_samples(x, y, 0).unwrap();
    view.update(&mut surf, now);
    assert_eq!(view.view_rect().x, Interval::new(10.0, 20.0));
    assert_eq!(surf.x_interval, Some(Interval::new(10.0, 20.0)));

    view.on_selection_committed(Rect::from_edges(14.0, 12.0, 0.0, 1.0), &mut surf);
    assert_eq!(view.view_rect().x, Interval::new(12.0, 14.0), "selection normalised");
    assert_eq!(view.zoom_stack().index(), 1);

    let (x, y) = ramp(5, 21.0);
    sink.send_samples(x, y, 0).unwrap();
    view.update(&mut surf, now);
    let shown = view.view_rect().x;
    assert!(close(shown.min, 17.0) && close(shown.max, 19.0), "{:?}", shown);
    assert_eq!(view.zoom_stack().base().x, Interval::new(15.0, 25.0));
}

#[test]
fn rescale_waits_for_animation() {
    let (sink, mut view) = scrolling_view(true);
    let mut surf = RecordingSurface::default();
    let now = Instant::now();
    let (x, y) = ramp(11, 0.0);
    sink.send_samples(x, y, 0).unwrap();
    view.update(&mut surf, now);

    view.on_selection_committed(Rect::from_edges(2.0, 4.0, 0.0, 1.0), &mut surf);
    assert!(view.animator().is_animating());

    let (x, y) = ramp(5, 11.0);
    sink.send_samples(x, y, 0).unwrap();
    view.update(&mut surf, now);
    assert_eq!(view.zoom_stack().base().x, Interval::new(0.0, 10.0), "not rescaled mid-animation");

    let mut ticks = 0;
    while view.tick(&mut surf) {
        ticks += 1;
        assert!(ticks < 100);
    }
    assert_eq!(ticks, 25);
    assert_eq!(view.view_rect(), Rect::from_edges(2.0, 4.0, 0.0, 1.0));
}

#[test]
fn transform_applies_on_read_only() {
    let (sink, mut view) = scrolling_view(false);
    let mut surf = RecordingSurface::default();
    sink.send_samples(vec![0.0, 1.0], vec![vec![9.999, 0.999]], 0)
        .unwrap();
    view.controls().enable_log_conversion(true);
    view.update(&mut surf, Instant::now());

    let shown = view.plot_data();
    assert!(close(shown.channels[0][0], 10.0));
    assert!(close(shown.channels[0][1], 0.0));
    let stored: Vec<f64> = view.model().channel(0).unwrap().iter().copied().collect();
    assert_eq!(stored, vec![9.999, 0.999]);
}

#[test]
fn disabling_autoscale_adopts_range_as_zoom_base() {
    let (sink, mut view) = scrolling_view(false);
    let mut surf = RecordingSurface::default();
    let now = Instant::now();
    let (x, y) = ramp(11, 0.0);
    sink.send_samples(x, y, 0).unwrap();

    let controls = view.controls();
    controls.set_autoscale(true);
    view.update(&mut surf, now);
    assert_eq!(view.autoscaled_range(), Some(Interval::new(0.0, 20.0)));

    controls.set_autoscale(false);
    view.update(&mut surf, now);
    assert!(!view.is_autoscale_enabled());
    assert_eq!(view.zoom_stack().base().y, Interval::new(0.0, 20.0));
    assert_eq!(surf.y_interval, Some(Interval::new(0.0, 20.0)));
}

#[test]
fn strobe_autoscale_captures_a_zoom_base() {
    let (sink, mut view) = scrolling_view(false);
    let mut surf = RecordingSurface::default();
    let t0 = Instant::now();
    let (x, y) = ramp(6, 0.0);
    sink.send_samples(x, y, 0).unwrap();

    let controls = view.controls();
    controls.strobe_autoscale(Duration::from_millis(50));
    view.update(&mut surf, t0);
    assert!(!view.is_autoscale_enabled(), "armed, not yet on");

    view.update(&mut surf, t0 + Duration::from_millis(60));
    assert!(view.is_autoscale_enabled());
    assert!(controls.is_autoscale_enabled());

    view.update(&mut surf, t0 + Duration::from_millis(70));
    assert!(!view.is_autoscale_enabled(), "switched off once a range exists");
    assert!(!controls.is_autoscale_enabled());
    assert_eq!(view.zoom_stack().base().y, Interval::new(0.0, 10.0));
}

#[test]
fn wheel_and_pointer_interaction() {
    let (sink, mut view) = scrolling_view(false);
    let mut surf = RecordingSurface::default();
    let (x, y) = ramp(11, 0.0);
    sink.send_samples(x, y, 0).unwrap();
    view.update(&mut surf, Instant::now());

    let before = view.view_rect();
    view.on_wheel(0.5, [5.0, 0.5], &mut surf);
    assert_eq!(view.view_rect().x, Interval::new(2.5, 7.5));
    assert!(view.view_rect().width() < before.width());

    assert_eq!(view.on_pointer_moved([1.5, 2.0]), "1.5 s\n2 V");
    assert!(view.cursor().is_valid());
    view.on_pointer_left();
    assert!(!view.cursor().is_valid());

    assert_eq!(view.on_measure_click([1.0, 1.0]), None);
    assert_eq!(
        view.on_measure_click([3.0, 0.5]).as_deref(),
        Some("dX: 2 s\ndY: 0.5 V")
    );
}

// ─── framed and band power ──────────────────────────────────────────────────

#[test]
fn framed_view_generates_x_and_averages() {
    let mut cfg = PlotConfig::default();
    cfg.framed.x_begin = 0.0;
    cfg.framed.x_end = 100.0;
    cfg.framed.averaging = 2;
    let (sink, rx) = channel();
    let mut view = LineView::framed(&cfg, rx).unwrap();
    let mut surf = RecordingSurface::default();

    sink.send_channels(vec![vec![1.0; 5]], 0).unwrap();
    sink.send_channels(vec![vec![3.0; 5]], 0).unwrap();
    view.update(&mut surf, Instant::now());

    let data = view.plot_data();
    assert_eq!(data.x, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
    assert_eq!(data.channels, vec![vec![2.0; 5]]);
    assert_eq!(view.zoom_stack().base().x, Interval::new(0.0, 100.0));

    view.controls().set_averaging(1).unwrap();
    sink.send_channels(vec![vec![7.0; 5]], 0).unwrap();
    view.update(&mut surf, Instant::now());
    assert_eq!(view.plot_data().channels, vec![vec![7.0; 5]]);
}

#[test]
fn band_power_view_scrolls_integrated_samples() {
    let mut cfg = PlotConfig::default();
    cfg.band_power.band_min = 0.0;
    cfg.band_power.band_max = 10.0;
    cfg.band_power.n_discrete = 11;
    let (sink, rx) = channel();
    let mut view = BandPowerView::new(&cfg, rx).unwrap();
    view.set_band_stop(4.0);
    view.set_band_start(2.0);
    assert_eq!(view.band_markers(), [2.0, 4.0]);

    let spectrum: Vec<f32> = (0..10).map(|i| i as f32).collect();
    let t0 = 3_600 * 1_000_000;
    for dt in [0, 500_000, 1_000_000] {
        sink.send_frame(spectrum.clone(), t0 + dt).unwrap();
    }
    let mut surf = RecordingSurface::default();
    view.update(&mut surf, Instant::now());

    let data = view.line().plot_data();
    assert_eq!(data.x, vec![seconds_of_day(t0 + 1_000_000)]);
    assert_eq!(data.channels, vec![vec![2.7]]);
    assert_eq!(
        view.line_mut().on_pointer_moved([3_601.0, 2.7]),
        "01:00:01.000000\n2.7"
    );
}

#[test]
fn band_power_history_restarts_at_midnight() {
    let mut cfg = PlotConfig::default();
    cfg.band_power.band_max = 4.0;
    cfg.band_power.n_discrete = 5;
    let (sink, rx) = channel();
    let mut view = BandPowerView::new(&cfg, rx).unwrap();
    view.set_band_stop(4.0);

    let day_us: i64 = 86_400 * 1_000_000;
    for t in [
        day_us - 2_000_000,
        day_us - 1_000_000,
        day_us - 500_000,
        day_us + 500_000,
    ] {
        sink.send_frame(vec![1.0f32; 4], t).unwrap();
    }
    let mut surf = RecordingSurface::default();
    view.update(&mut surf, Instant::now());

    // 86399 then 0: the wrapped sample starts a new history
    let data = view.line().plot_data();
    assert_eq!(data.x, vec![0.0]);
    assert_eq!(data.channels, vec![vec![2.0]]);
}
