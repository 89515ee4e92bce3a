//! Example: Waterfall fed from a producer thread
//!
//! What it demonstrates
//! - Posting spectrum frames through `channel()` and `PlotSink::send_frame`.
//! - Driving a `WaterfallView` headless with a `RecordingSurface`.
//! - Intensity autoscale following a drifting noise floor.
//!
//! How to run
//! ```bash
//! RUST_LOG=debug cargo run --example waterfall_feed
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use liveraster::config::WaterfallConfig;
use liveraster::{channel, RecordingSurface, WaterfallView};

const BINS: usize = 256;

fn now_us() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as i64)
        .unwrap_or(0)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let (sink, rx) = channel();
    let config = WaterfallConfig {
        rows: 50,
        line_interval_us: 50_000,
        ..Default::default()
    };
    let mut view = WaterfallView::new(config, 0, rx)?;
    view.set_x_range(liveraster::Interval::new(0.0, 24_000.0))?;

    // Producer: 100 frames per second, a tone sweeping across the band
    let producer = std::thread::spawn(move || {
        for n in 0..300usize {
            let peak = (n * 3) % BINS;
            let floor = 50.0 + (n as f32 / 30.0).sin() * 5.0;
            let frame: Vec<f32> = (0..BINS)
                .map(|i| if i == peak { floor + 30.0 } else { floor })
                .collect();
            if sink.send_frame(frame, now_us()).is_err() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    });

    let mut surface = RecordingSurface::default();
    while !producer.is_finished() {
        view.update(&mut surface);
        std::thread::sleep(Duration::from_millis(33));
    }
    let _ = producer.join();
    view.update(&mut surface);

    println!("redraws requested: {}", surface.redraws);
    println!("z range: {:?}", view.z_range());
    if let Some(data) = view.data() {
        println!(
            "{} rows x {} columns, {:.1} s of history",
            data.rows(),
            data.columns(),
            (data.max_time_us() - data.min_time_us()) as f64 / 1e6
        );
    }
    Ok(())
}
