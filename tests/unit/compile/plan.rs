use super::*;
use crate::animation::motion::ZoomDirection;
use crate::compile::timing::MIN_SLIDE_SECS;
use crate::scene::model::DurationPolicy;

fn request(n: usize, audio: bool) -> RenderRequest {
    let images: Vec<String> = (0..n).map(|i| format!("img{i}.jpg")).collect();
    let mut req = RenderRequest::from_images(
        images,
        audio.then(|| PathBuf::from("narration.mp3")),
        "out.mp4",
    );
    req.resolution = Canvas {
        width: 540,
        height: 960,
    };
    req
}

#[test]
fn single_slide_has_no_transitions() {
    let req = request(1, false);
    let plan = plan_slideshow(&req, &req.slides, None, MIN_SLIDE_SECS).unwrap();
    assert!(plan.is_single_slide());
    assert_eq!(plan.transition_secs, 0.0);
    assert_eq!(plan.expected_secs, 5.0);
    assert_eq!(plan.graph.chains().len(), 2);
    assert!(!plan.graph.to_string().contains("xfade"));
    assert!(plan.graph.to_string().ends_with("[v0]format=yuv420p[outv]"));
}

#[test]
fn single_slide_with_audio_matches_audio_length() {
    let req = request(1, true);
    let plan = plan_slideshow(&req, &req.slides, Some(12.0), MIN_SLIDE_SECS).unwrap();
    assert_eq!(plan.durations(), vec![12.0]);
    assert_eq!(plan.expected_secs, 12.0);
    assert_eq!(plan.audio_input_index(), Some(1));
}

#[test]
fn audio_paced_plan_covers_audio_length() {
    let req = request(3, true);
    let plan = plan_slideshow(&req, &req.slides, Some(20.0), MIN_SLIDE_SECS).unwrap();
    let expected = 22.0 / 3.0;
    assert!(plan.durations().iter().all(|d| (d - expected).abs() < 1e-12));
    assert!((plan.expected_secs - 20.0).abs() < 1e-9);
    assert_eq!(plan.audio_input_index(), Some(3));
}

#[test]
fn multi_slide_graph_alternates_zoom_and_chains_fades() {
    let req = request(4, false);
    let plan = plan_slideshow(&req, &req.slides, None, MIN_SLIDE_SECS).unwrap();
    let directions: Vec<_> = plan
        .slides
        .iter()
        .map(|s| s.trajectory.direction())
        .collect();
    assert_eq!(
        directions,
        vec![
            ZoomDirection::ZoomIn,
            ZoomDirection::ZoomOut,
            ZoomDirection::ZoomIn,
            ZoomDirection::ZoomOut
        ]
    );

    let text = plan.graph.to_string();
    assert!(text.contains("[v0][v1]xfade=transition=fade:duration=1:offset=4[xf1]"));
    assert!(text.contains("[xf1][v2]xfade=transition=fade:duration=1:offset=8[xf2]"));
    assert!(text.contains("[xf2][v3]xfade=transition=fade:duration=1:offset=12[xf3]"));
    assert!(text.ends_with("[xf3]format=yuv420p[outv]"));
    assert_eq!(plan.expected_secs, 17.0);
    assert!(plan.audio_input_index().is_none());
}

#[test]
fn preserve_hints_keeps_durations_with_audio() {
    let mut req = request(2, true);
    req.duration_policy = DurationPolicy::PreserveHints;
    req.slides[0].duration = 3.0;
    let plan = plan_slideshow(&req, &req.slides, Some(60.0), MIN_SLIDE_SECS).unwrap();
    assert_eq!(plan.durations(), vec![3.0, 5.0]);
}

#[test]
fn transition_must_be_shorter_than_every_slide() {
    let mut req = request(2, false);
    req.transition_duration = 5.0;
    let err = plan_slideshow(&req, &req.slides, None, MIN_SLIDE_SECS).unwrap_err();
    assert!(err.is_input());

    let mut single = request(1, false);
    single.transition_duration = 50.0;
    assert!(plan_slideshow(&single, &single.slides, None, MIN_SLIDE_SECS).is_ok());
}

#[test]
fn empty_slides_are_input_errors() {
    let req = request(2, false);
    let err = plan_slideshow(&req, &[], None, MIN_SLIDE_SECS).unwrap_err();
    assert!(err.is_input());
}
