use liveraster::data::geometry::{Interval, Rect};
use liveraster::data::scrolling::ScrollingSeries;
use liveraster::data::zoom::{RescaleOutcome, ZoomStack};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn span_trimming_bounds_the_extent() {
    let mut s = ScrollingSeries::new(10.0).unwrap();
    for i in 0..=20 {
        s.append_x(&[i as f64]);
        let e = s.extent().unwrap();
        assert!(e.width() <= 10.0, "extent {:?} after x = {}", e, i);
    }
    assert_eq!(s.extent(), Some(Interval::new(10.0, 20.0)));
    assert_eq!(s.len(), 11);
}

#[test]
fn scaling_factor_widens_the_window() {
    let mut s = ScrollingSeries::new(2.0).unwrap();
    s.set_span_scaling_factor(5.0, Some("samples")).unwrap();
    let xs: Vec<f64> = (0..30).map(|i| i as f64).collect();
    s.append_x(&xs);
    assert_eq!(s.extent(), Some(Interval::new(19.0, 29.0)));
    assert_eq!(s.span_unit(), Some("samples"));
}

#[test]
fn channels_follow_the_incoming_block_count() {
    let mut s = ScrollingSeries::default();
    s.append_x(&[0.0, 1.0]);
    s.append_y(&[vec![1.0, 2.0]]);
    assert_eq!(s.channel_count(), 1);

    s.append_x(&[2.0]);
    s.append_y(&[vec![3.0], vec![30.0]]);
    assert_eq!(s.channel_count(), 2);
    assert_eq!(s.channel(0).unwrap().len(), 3);
    assert_eq!(s.channel(1).unwrap().len(), 1);
}

#[test]
fn zoom_levels_keep_their_fraction() {
    let s = ScrollingSeries::default();
    let mut stack = ZoomStack::new(Rect::from_edges(0.0, 100.0, -1.0, 1.0));
    stack.zoom_in(Rect::from_edges(20.0, 40.0, -0.5, 0.5));

    let outcome = s.rescale_zoom_stack(&mut stack, 10.0, 110.0);
    assert_eq!(outcome, RescaleOutcome::Rescaled);
    assert_eq!(stack.base().x, Interval::new(10.0, 110.0));
    let level = stack.rects()[1];
    assert!(close(level.left(), 30.0) && close(level.right(), 50.0), "{:?}", level);
    assert_eq!(level.y, Interval::new(-0.5, 0.5), "vertical extent untouched");
    assert_eq!(stack.index(), 1);
}

#[test]
fn separately_built_stacks_follow_the_same_series() {
    let s = ScrollingSeries::default();
    let mut a = ZoomStack::new(Rect::from_edges(0.0, 10.0, 0.0, 1.0));
    a.zoom_in(Rect::from_edges(0.0, 5.0, 0.0, 1.0));
    let mut b = ZoomStack::new(Rect::from_edges(5.0, 15.0, 0.0, 1.0));
    b.zoom_in(Rect::from_edges(10.0, 15.0, 0.0, 1.0));

    assert_eq!(s.rescale_zoom_stack(&mut a, 10.0, 20.0), RescaleOutcome::Rescaled);
    assert_eq!(s.rescale_zoom_stack(&mut b, 10.0, 20.0), RescaleOutcome::Rescaled);
    assert_eq!(a.rects()[1].x, Interval::new(10.0, 15.0));
    assert_eq!(b.rects()[1].x, Interval::new(15.0, 20.0));
}

#[test]
fn disjoint_extent_resets_the_stack() {
    let s = ScrollingSeries::default();
    let mut stack = ZoomStack::new(Rect::from_edges(0.0, 10.0, 0.0, 1.0));
    stack.zoom_in(Rect::from_edges(2.0, 4.0, 0.0, 1.0));

    let outcome = s.rescale_zoom_stack(&mut stack, 20.0, 30.0);
    assert_eq!(outcome, RescaleOutcome::Reset);
    assert_eq!(stack.len(), 1);
    assert_eq!(stack.index(), 0);
    assert_eq!(stack.current().x, Interval::new(20.0, 30.0));
}

#[test]
fn degenerate_base_only_moves_the_base() {
    let s = ScrollingSeries::default();
    let mut stack = ZoomStack::new(Rect::from_edges(5.0, 5.0, 0.0, 1.0));
    stack.zoom_in(Rect::from_edges(1.0, 2.0, 0.0, 1.0));

    let outcome = s.rescale_zoom_stack(&mut stack, 5.0, 15.0);
    assert_eq!(outcome, RescaleOutcome::Skipped);
    assert_eq!(stack.base().x, Interval::new(5.0, 15.0));
    assert_eq!(stack.rects()[1].x, Interval::new(1.0, 2.0));
    for r in stack.rects() {
        assert!(r.left().is_finite() && r.right().is_finite());
    }
}

#[test]
fn reset_history_clears_samples() {
    let mut s = ScrollingSeries::default();
    s.append_x(&[0.0, 1.0, 2.0]);
    s.append_y(&[vec![0.0, 1.0, 2.0]]);

    s.reset_history();
    assert!(s.is_empty());
    assert_eq!(s.extent(), None);
    assert_eq!(s.channel(0).map(|c| c.len()), Some(0));
}
