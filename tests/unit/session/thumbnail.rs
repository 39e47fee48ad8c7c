use super::*;

#[test]
fn clamp_keeps_in_range_timestamps() {
    assert_eq!(clamp_timestamp(1.0, 10.0), 1.0);
    assert_eq!(clamp_timestamp(0.0, 10.0), 0.0);
}

#[test]
fn clamp_moves_late_timestamps_to_last_frame() {
    assert!((clamp_timestamp(30.0, 10.0) - 9.9).abs() < 1e-12);
    assert_eq!(clamp_timestamp(1.0, 0.05), 0.0);
}
