use super::*;

#[test]
fn canvas_rejects_zero_and_odd_sizes() {
    assert!(Canvas { width: 0, height: 10 }.validate().is_err());
    assert!(Canvas { width: 11, height: 10 }.validate().is_err());
    assert!(Canvas { width: 10, height: 10 }.validate().is_ok());
    assert!(Canvas::default().validate().is_ok());
}

#[test]
fn canvas_scaled_and_size_arg() {
    let c = Canvas {
        width: 540,
        height: 960,
    };
    assert_eq!(c.scaled(2).size_arg(), "1080x1920");
}

#[test]
fn frames_for_rounds_and_floors_at_one() {
    assert_eq!(frames_for(5.0, 30), 150);
    assert_eq!(frames_for(7.333_333, 30), 220);
    assert_eq!(frames_for(0.0, 30), 1);
    assert_eq!(frames_for(f64::NAN, 30), 1);
}

#[test]
fn format_secs_trims_trailing_zeros() {
    assert_eq!(format_secs(4.0), "4");
    assert_eq!(format_secs(0.5), "0.5");
    assert_eq!(format_secs(0.0), "0");
    assert_eq!(format_secs(22.0 / 3.0), "7.333333");
}
