use super::*;

#[test]
fn direction_alternates_by_parity() {
    assert_eq!(ZoomDirection::for_slide(0), ZoomDirection::ZoomIn);
    assert_eq!(ZoomDirection::for_slide(1), ZoomDirection::ZoomOut);
    assert_eq!(ZoomDirection::for_slide(2), ZoomDirection::ZoomIn);
    assert_eq!(ZoomDirection::ZoomOut.start_zoom(1.1), 1.1);
    assert_eq!(ZoomDirection::ZoomIn.start_zoom(1.1), 1.0);
}

#[test]
fn zoom_in_spans_one_to_factor_within_the_slide() {
    let t = Trajectory::new(0, 5.0, 30, 1.1);
    assert_eq!(t.frames(), 150);
    assert_eq!(t.last_frame(), 149);
    assert!((t.increment() - 0.1 / 149.0).abs() < 1e-15);

    let table = t.zoom_table();
    assert_eq!(table.len(), 150);
    assert_eq!(table.first().copied(), Some(1.0));
    assert_eq!(table.last().copied(), Some(1.1));
    assert!((1.0 + t.increment() * 149.0 - 1.1).abs() < 1e-12);
    assert!(t.zoom_at(10_000) <= 1.1);
}

#[test]
fn zoom_out_spans_factor_to_one_within_the_slide() {
    let table = Trajectory::new(1, 5.0, 30, 1.1).zoom_table();
    assert_eq!(table.first().copied(), Some(1.1));
    assert_eq!(table.last().copied(), Some(1.0));
}

#[test]
fn one_frame_slide_holds_start_zoom() {
    let zin = Trajectory::new(0, 0.01, 30, 1.2);
    assert_eq!(zin.frames(), 1);
    assert_eq!(zin.increment(), 0.0);
    assert_eq!(zin.zoom_table(), vec![1.0]);

    let zout = Trajectory::new(1, 0.01, 30, 1.2);
    assert_eq!(zout.zoom_table(), vec![1.2]);
}

#[test]
fn zoom_in_is_monotonic_and_clamped() {
    let table = Trajectory::new(2, 3.0, 24, 1.25).zoom_table();
    assert_eq!(table.len(), 72);
    assert!(table.windows(2).all(|w| w[0] <= w[1]));
    assert!(table.iter().all(|z| (1.0..=1.25).contains(z)));
}

#[test]
fn zoom_out_starts_at_factor_and_never_drops_below_one() {
    let t = Trajectory::new(1, 4.0, 30, 1.1);
    assert_eq!(t.direction(), ZoomDirection::ZoomOut);
    assert!(t.zoom_at(0) <= 1.1);
    assert_eq!(t.zoom_at(0), 1.1);
    let last = t.frames() - 1;
    assert!(t.zoom_at(last) >= 1.0);
    assert!(t.zoom_at(last * 4) >= 1.0);
    let table = t.zoom_table();
    assert!(table.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn pan_stays_centered() {
    let src = Canvas {
        width: 2000,
        height: 1000,
    };
    let t = Trajectory::new(0, 2.0, 10, 2.0);
    let s0 = t.sample(0, src);
    assert_eq!((s0.x, s0.y), (0.0, 0.0));

    let s = t.sample(t.last_frame(), src);
    assert!((s.zoom - 2.0).abs() < 1e-12);
    assert!((s.x - 500.0).abs() < 1e-9);
    assert!((s.y - 250.0).abs() < 1e-9);
}

#[test]
fn zoom_expressions_are_seeded_per_direction() {
    // 11 frames, 10 steps of 0.05
    let zin = Trajectory::new(0, 1.1, 10, 1.5);
    assert_eq!(zin.zoom_expr(), "min(1+0.05*on,1.5)");

    let zout = Trajectory::new(1, 1.1, 10, 1.5);
    assert_eq!(zout.zoom_expr(), "max(1.5-0.05*on,1)");
}

#[test]
fn filter_chain_scales_crops_and_zooms() {
    let canvas = Canvas {
        width: 540,
        height: 960,
    };
    let chain = Trajectory::new(0, 1.1, 10, 1.5).filter_chain(0, canvas, 10, Pad::label("v0"));
    assert_eq!(
        chain.to_string(),
        "[0:v]scale=1080:1920:force_original_aspect_ratio=increase,crop=1080:1920,\
         zoompan=z='min(1+0.05*on,1.5)':d=1:x='iw/2-(iw/zoom/2)':y='ih/2-(ih/zoom/2)':\
         s=540x960:fps=10,setsar=1[v0]"
    );
}
