//! Per-slide duration allocation.

use crate::scene::model::{DurationPolicy, SlideSpec};

/// Smallest on-screen time a slide gets when audio drives pacing.
pub const MIN_SLIDE_SECS: f64 = 2.0;

/// Inputs to the allocator, independent of any filesystem state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingParams {
    /// Measured audio length, when a track is present.
    pub audio_secs: Option<f64>,
    /// Cross-fade length.
    pub transition_secs: f64,
    /// Floor applied to the audio-derived slide length.
    pub min_slide_secs: f64,
    /// Preserve-or-override rule for caller durations.
    pub policy: DurationPolicy,
}

/// Uniform slide length that makes `n` cross-faded slides cover `audio_secs`.
///
/// Each of the `n - 1` transitions hides `transition_secs` of screen time, so the slides together
/// must run `audio_secs + transition_secs * (n - 1)`. The result is floored at `min_slide_secs`,
/// in which case the rendered video runs longer than the audio.
pub fn uniform_slide_secs(n: usize, audio_secs: f64, transition_secs: f64, min_slide_secs: f64) -> f64 {
    if n == 0 {
        return min_slide_secs;
    }
    let overlap = transition_secs * (n as f64 - 1.0);
    ((audio_secs + overlap) / n as f64).max(min_slide_secs)
}

/// Compute every slide's on-screen duration.
///
/// Without audio, or under [`DurationPolicy::PreserveHints`], caller durations are returned as-is.
pub fn allocate(slides: &[SlideSpec], params: TimingParams) -> Vec<f64> {
    match (params.audio_secs, params.policy) {
        (Some(audio), DurationPolicy::FitAudio) => {
            let d = uniform_slide_secs(
                slides.len(),
                audio,
                params.transition_secs,
                params.min_slide_secs,
            );
            vec![d; slides.len()]
        }
        _ => slides.iter().map(|s| s.duration).collect(),
    }
}

/// Rendered length of a cross-faded sequence.
///
/// Transitions only exist between slides, so a single slide runs exactly its own duration.
pub fn total_secs(durations: &[f64], transition_secs: f64) -> f64 {
    let sum: f64 = durations.iter().sum();
    if durations.len() <= 1 {
        return sum;
    }
    sum - transition_secs * (durations.len() as f64 - 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/compile/timing.rs"]
mod tests;
