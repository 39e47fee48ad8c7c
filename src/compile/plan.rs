//! Slideshow planning: timing, motion and cross-fades folded into one filter graph.

use std::path::PathBuf;

use crate::animation::motion::Trajectory;
use crate::compile::graph::{Filter, FilterChain, FilterGraph, Pad};
use crate::compile::timing::{self, TimingParams};
use crate::effects::transitions::crossfade_chain;
use crate::foundation::core::Canvas;
use crate::foundation::error::{SlidecastError, SlidecastResult};
use crate::scene::model::{RenderRequest, SlideSpec};

/// Label of the composed video pad mapped into the output file.
pub const OUTPUT_LABEL: &str = "outv";

/// One slide after timing allocation.
#[derive(Clone, Debug, PartialEq)]
pub struct SlidePlan {
    /// Still image shown on this slide.
    pub image_path: PathBuf,
    /// Allocated on-screen time.
    pub duration: f64,
    /// Ken Burns zoom over the slide.
    pub trajectory: Trajectory,
}

/// Everything the invoker needs to serialize one slideshow render.
#[derive(Clone, Debug, PartialEq)]
pub struct SlideshowPlan {
    /// Slides in order, one encoder input each.
    pub slides: Vec<SlidePlan>,
    /// Audio input, placed after all image inputs.
    pub audio_path: Option<PathBuf>,
    /// Output frame size.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: u32,
    /// Effective transition length; zero for a single slide.
    pub transition_secs: f64,
    /// Complete `-filter_complex` graph ending in [`OUTPUT_LABEL`].
    pub graph: FilterGraph,
    /// Expected video length before any `-shortest` trimming.
    pub expected_secs: f64,
}

impl SlideshowPlan {
    /// Allocated slide durations in order.
    pub fn durations(&self) -> Vec<f64> {
        self.slides.iter().map(|s| s.duration).collect()
    }

    /// Encoder input index of the audio track.
    pub fn audio_input_index(&self) -> Option<usize> {
        self.audio_path.as_ref().map(|_| self.slides.len())
    }

    /// One slide: no cross-fade in the graph.
    pub fn is_single_slide(&self) -> bool {
        self.slides.len() == 1
    }
}

/// Build the plan for `slides` (the caller has already dropped missing images) using the request's
/// output parameters.
///
/// `audio_secs` is the measured audio length when the request carries audio.
pub fn plan_slideshow(
    req: &RenderRequest,
    slides: &[SlideSpec],
    audio_secs: Option<f64>,
    min_slide_secs: f64,
) -> SlidecastResult<SlideshowPlan> {
    if slides.is_empty() {
        return Err(SlidecastError::input("slideshow needs at least one slide"));
    }

    let single = slides.len() == 1;
    let transition_secs = if single {
        0.0
    } else {
        req.transition_duration
    };

    let durations = timing::allocate(
        slides,
        TimingParams {
            audio_secs,
            transition_secs,
            min_slide_secs,
            policy: req.duration_policy,
        },
    );

    if !single {
        let shortest = durations.iter().copied().fold(f64::INFINITY, f64::min);
        if transition_secs >= shortest {
            return Err(SlidecastError::input(format!(
                "transition_duration {transition_secs}s must be shorter than the shortest slide ({shortest}s)"
            )));
        }
    }

    let mut graph = FilterGraph::new();
    let mut planned = Vec::with_capacity(slides.len());
    let mut streams = Vec::with_capacity(slides.len());
    for (i, (slide, duration)) in slides.iter().zip(&durations).enumerate() {
        let trajectory = Trajectory::new(i, *duration, req.fps, req.zoom_factor);
        let pad = Pad::label(format!("v{i}"));
        graph.push(trajectory.filter_chain(i, req.resolution, req.fps, pad.clone()));
        streams.push(pad);
        planned.push(SlidePlan {
            image_path: slide.image_path.clone(),
            duration: *duration,
            trajectory,
        });
    }

    let xfade = crossfade_chain(&streams, &durations, transition_secs);
    for chain in xfade.chains {
        graph.push(chain);
    }
    graph.push(FilterChain::new(
        vec![xfade.output],
        vec![Filter::new("format").arg("yuv420p")],
        vec![Pad::label(OUTPUT_LABEL)],
    ));
    graph.validate()?;

    Ok(SlideshowPlan {
        expected_secs: timing::total_secs(&durations, transition_secs),
        slides: planned,
        audio_path: req.audio_path.clone(),
        canvas: req.resolution,
        fps: req.fps,
        transition_secs,
        graph,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
