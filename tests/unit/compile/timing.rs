use super::*;

fn slides(durations: &[f64]) -> Vec<SlideSpec> {
    durations
        .iter()
        .enumerate()
        .map(|(i, d)| SlideSpec::new(format!("s{i}.jpg"), *d))
        .collect()
}

fn params(audio_secs: Option<f64>, policy: DurationPolicy) -> TimingParams {
    TimingParams {
        audio_secs,
        transition_secs: 1.0,
        min_slide_secs: MIN_SLIDE_SECS,
        policy,
    }
}

#[test]
fn no_audio_keeps_caller_durations() {
    let out = allocate(&slides(&[3.0, 4.5, 6.0]), params(None, DurationPolicy::FitAudio));
    assert_eq!(out, vec![3.0, 4.5, 6.0]);
}

#[test]
fn audio_spreads_uniformly_across_slides() {
    let out = allocate(
        &slides(&[5.0, 5.0, 5.0]),
        params(Some(20.0), DurationPolicy::FitAudio),
    );
    let expected = (20.0 + 1.0 * 2.0) / 3.0;
    assert_eq!(out.len(), 3);
    for d in &out {
        assert!((d - expected).abs() < 1e-12);
    }
    assert!(out.windows(2).all(|w| w[0] == w[1]));
    assert!((total_secs(&out, 1.0) - 20.0).abs() < 1e-9);
}

#[test]
fn floor_dominates_for_short_audio() {
    let out = allocate(
        &slides(&[5.0; 10]),
        params(Some(3.0), DurationPolicy::FitAudio),
    );
    assert!(out.iter().all(|d| *d == MIN_SLIDE_SECS));
    assert!(total_secs(&out, 1.0) > 3.0);
}

#[test]
fn preserve_hints_ignores_audio() {
    let out = allocate(
        &slides(&[2.5, 8.0]),
        params(Some(30.0), DurationPolicy::PreserveHints),
    );
    assert_eq!(out, vec![2.5, 8.0]);
}

#[test]
fn single_slide_takes_audio_length() {
    assert_eq!(uniform_slide_secs(1, 12.5, 1.0, MIN_SLIDE_SECS), 12.5);
    assert_eq!(total_secs(&[12.5], 1.0), 12.5);
}

#[test]
fn total_subtracts_overlap_only_between_slides() {
    assert_eq!(total_secs(&[5.0, 5.0, 5.0, 5.0], 1.0), 17.0);
    assert_eq!(total_secs(&[], 1.0), 0.0);
}
