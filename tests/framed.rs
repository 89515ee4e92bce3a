use liveraster::data::framed::FramedSeries;
use liveraster::PlotError;

fn frame(v: f64, n: usize) -> Vec<Vec<f64>> {
    vec![vec![v; n]]
}

#[test]
fn x_axis_is_generated_from_span() {
    let mut f = FramedSeries::new();
    f.set_x_span(0.0, 100.0).unwrap();
    f.update(&frame(1.0, 5)).unwrap();
    assert_eq!(f.x(), &[0.0, 25.0, 50.0, 75.0, 100.0]);

    f.set_x_span(10.0, 20.0).unwrap();
    f.update(&frame(1.0, 5)).unwrap();
    assert_eq!(f.x(), &[10.0, 12.5, 15.0, 17.5, 20.0], "span change regenerates X");
}

#[test]
fn running_average_grows_one_slot_per_update() {
    let mut f = FramedSeries::new();
    f.set_averaging(3).unwrap();
    f.update(&frame(3.0, 2)).unwrap();
    assert_eq!(f.channel(0).unwrap(), &[3.0, 3.0], "no drop-out while history fills");
    f.update(&frame(6.0, 2)).unwrap();
    assert_eq!(f.channel(0).unwrap(), &[4.5, 4.5]);
    f.update(&frame(9.0, 2)).unwrap();
    assert_eq!(f.channel(0).unwrap(), &[6.0, 6.0]);
    f.update(&frame(12.0, 2)).unwrap();
    assert_eq!(f.history_len(), 3);
    assert_eq!(f.channel(0).unwrap(), &[9.0, 9.0], "oldest frame dropped");
}

#[test]
fn shrinking_averaging_truncates_history() {
    let mut f = FramedSeries::new();
    f.set_averaging(4).unwrap();
    for v in [1.0, 2.0, 3.0, 4.0] {
        f.update(&frame(v, 1)).unwrap();
    }
    f.set_averaging(1).unwrap();
    f.update(&frame(10.0, 1)).unwrap();
    assert_eq!(f.history_len(), 1);
    assert_eq!(f.channel(0).unwrap(), &[10.0]);
}

#[test]
fn channel_list_selects_inputs() {
    let mut f = FramedSeries::new();
    f.set_channel_list(Some(vec![2, 0]));
    f.update(&[vec![0.0], vec![1.0], vec![2.0]]).unwrap();
    assert_eq!(f.channel_count(), 2);
    assert_eq!(f.channel(0).unwrap(), &[2.0]);
    assert_eq!(f.channel(1).unwrap(), &[0.0]);

    let err = f.update(&[vec![0.0]]).unwrap_err();
    assert_eq!(
        err,
        PlotError::ChannelOutOfRange {
            channel: 2,
            available: 1
        }
    );
}

#[test]
fn bad_input_is_rejected() {
    let mut f = FramedSeries::new();
    assert!(f.update(&[]).is_err());
    assert!(f.update(&[vec![]]).is_err());
    assert!(f.set_averaging(0).is_err());
    assert!(f.set_averaging(51).is_err());
    assert!(f.set_averaging(50).is_ok());
    assert!(f.set_x_span(f64::NAN, 1.0).is_err());
}
