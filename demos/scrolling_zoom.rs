//! Example: Scrolling line plot that keeps its zoom while data moves
//!
//! What it demonstrates
//! - Streaming X/Y blocks into a `LineView<ScrollingSeries>`.
//! - Zooming into a sub-range and watching it follow the sliding window.
//! - Reading cursor text from the view.
//!
//! How to run
//! ```bash
//! RUST_LOG=info cargo run --example scrolling_zoom
//! ```

use std::time::{Duration, Instant};

use liveraster::config::PlotConfig;
use liveraster::{channel, LineView, RecordingSurface, Rect};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut config = PlotConfig::default();
    config.title = "Sine".into();
    config.scrolling.span = 5.0;
    config.animation.enabled = false;

    let (sink, rx) = channel();
    let mut view = LineView::scrolling(&config, rx)?;
    let mut surface = RecordingSurface::default();

    // Producer: 20 blocks of 50 samples, 1 kHz sample rate, 2 Hz sine
    let producer = std::thread::spawn(move || {
        const FS_HZ: f64 = 1000.0;
        for block in 0..20usize {
            let x: Vec<f64> = (0..50)
                .map(|i| (block * 50 + i) as f64 / FS_HZ * 10.0)
                .collect();
            let y = x
                .iter()
                .map(|t| (2.0 * std::f64::consts::PI * 0.2 * t).sin())
                .collect();
            if sink.send_samples(x, vec![y], 0).is_err() {
                break;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
    });

    std::thread::sleep(Duration::from_millis(100));
    view.update(&mut surface, Instant::now());
    let base = view.zoom_stack().base();
    let mid = (base.left() + base.right()) / 2.0;
    view.on_selection_committed(Rect::from_edges(mid, mid + 1.0, -1.0, 1.0), &mut surface);
    println!("zoomed to {:?}", view.view_rect());

    while !producer.is_finished() {
        view.update(&mut surface, Instant::now());
        std::thread::sleep(Duration::from_millis(33));
    }
    let _ = producer.join();
    view.update(&mut surface, Instant::now());

    let r = view.view_rect();
    println!("zoom followed the data to x = [{:.2}, {:.2}]", r.left(), r.right());
    println!("{}", view.on_pointer_moved([r.left(), 0.0]));
    Ok(())
}
