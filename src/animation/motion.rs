//! Ken Burns zoom trajectories.
//!
//! A trajectory maps an output frame index to a zoom level and crop origin. The same closed form
//! is evaluated here (for tests and previews) and emitted as a `zoompan` expression for ffmpeg.

use crate::compile::graph::{Filter, FilterChain, Pad};
use crate::foundation::core::{Canvas, format_secs, frames_for};

/// Zoompan crop origin that keeps the pan centered: `iw/2-(iw/zoom/2)`.
pub const CENTER_X_EXPR: &str = "iw/2-(iw/zoom/2)";
/// Vertical counterpart of [`CENTER_X_EXPR`].
pub const CENTER_Y_EXPR: &str = "ih/2-(ih/zoom/2)";

/// Zoom direction of one slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
    /// 1.0 rising to the zoom factor.
    ZoomIn,
    /// Zoom factor falling to 1.0.
    ZoomOut,
}

impl ZoomDirection {
    /// Even slides zoom in, odd slides zoom out.
    pub fn for_slide(index: usize) -> Self {
        if index.is_multiple_of(2) {
            Self::ZoomIn
        } else {
            Self::ZoomOut
        }
    }

    /// Zoom at frame 0.
    pub fn start_zoom(self, zoom_factor: f64) -> f64 {
        match self {
            Self::ZoomIn => 1.0,
            Self::ZoomOut => zoom_factor,
        }
    }
}

/// Zoom level and crop origin for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomSample {
    /// Magnification, within `[1.0, zoom_factor]`.
    pub zoom: f64,
    /// Crop origin x in source pixels.
    pub x: f64,
    /// Crop origin y in source pixels.
    pub y: f64,
}

/// Per-slide zoom trajectory.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trajectory {
    direction: ZoomDirection,
    zoom_factor: f64,
    increment: f64,
    frames: u64,
}

impl Trajectory {
    /// Trajectory for slide `index` shown for `duration_secs` at `fps`.
    ///
    /// The zoom moves by a constant per-frame delta from its start value on frame 0 to its end
    /// value on the slide's last frame, so the delta is `(zoom_factor - 1) / (frames - 1)`.
    pub fn new(index: usize, duration_secs: f64, fps: u32, zoom_factor: f64) -> Self {
        Self::with_direction(
            ZoomDirection::for_slide(index),
            duration_secs,
            fps,
            zoom_factor,
        )
    }

    /// Trajectory with an explicit direction.
    pub fn with_direction(
        direction: ZoomDirection,
        duration_secs: f64,
        fps: u32,
        zoom_factor: f64,
    ) -> Self {
        let frames = frames_for(duration_secs, fps);
        let steps = frames.saturating_sub(1);
        let increment = if steps == 0 {
            0.0
        } else {
            (zoom_factor - 1.0) / steps as f64
        };
        Self {
            direction,
            zoom_factor,
            increment,
            frames,
        }
    }

    /// Zoom in or zoom out.
    pub fn direction(&self) -> ZoomDirection {
        self.direction
    }

    /// Per-frame zoom delta.
    pub fn increment(&self) -> f64 {
        self.increment
    }

    /// Frames covered by the slide.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Index of the slide's last frame.
    pub fn last_frame(&self) -> u64 {
        self.frames.saturating_sub(1)
    }

    /// Clamped zoom at output frame `frame`.
    ///
    /// Frame 0 is the start zoom and the last frame is exactly the end zoom. A one-frame slide
    /// holds its start zoom.
    pub fn zoom_at(&self, frame: u64) -> f64 {
        let last = self.last_frame();
        match self.direction {
            ZoomDirection::ZoomIn if last > 0 && frame >= last => self.zoom_factor,
            ZoomDirection::ZoomOut if last > 0 && frame >= last => 1.0,
            ZoomDirection::ZoomIn => (1.0 + self.increment * frame as f64).min(self.zoom_factor),
            ZoomDirection::ZoomOut => (self.zoom_factor - self.increment * frame as f64).max(1.0),
        }
    }

    /// Zoom plus centered crop origin for a source of size `src`.
    pub fn sample(&self, frame: u64, src: Canvas) -> ZoomSample {
        let zoom = self.zoom_at(frame);
        let iw = f64::from(src.width);
        let ih = f64::from(src.height);
        ZoomSample {
            zoom,
            x: iw / 2.0 - iw / zoom / 2.0,
            y: ih / 2.0 - ih / zoom / 2.0,
        }
    }

    /// Pre-sampled zoom for every frame of the slide.
    pub fn zoom_table(&self) -> Vec<f64> {
        (0..self.frames).map(|f| self.zoom_at(f)).collect()
    }

    /// `zoompan` `z` expression over the output frame counter `on`.
    ///
    /// The zoom-out branch is seeded at the zoom factor rather than relying on zoompan's running
    /// `zoom` state, which always starts at 1.0.
    pub fn zoom_expr(&self) -> String {
        let zf = format_secs(self.zoom_factor);
        let inc = self.increment;
        match self.direction {
            ZoomDirection::ZoomIn => format!("min(1+{inc}*on,{zf})"),
            ZoomDirection::ZoomOut => format!("max({zf}-{inc}*on,1)"),
        }
    }

    /// Motion chain for encoder input `input`: cover-scale to twice the canvas, center crop,
    /// zoompan down to `canvas` at `fps`.
    pub fn filter_chain(&self, input: usize, canvas: Canvas, fps: u32, output: Pad) -> FilterChain {
        let work = canvas.scaled(2);
        FilterChain::new(
            vec![Pad::video_input(input)],
            vec![
                Filter::new("scale")
                    .arg(work.width)
                    .arg(work.height)
                    .opt("force_original_aspect_ratio", "increase"),
                Filter::new("crop").arg(work.width).arg(work.height),
                Filter::new("zoompan")
                    .expr("z", self.zoom_expr())
                    .opt("d", 1)
                    .expr("x", CENTER_X_EXPR)
                    .expr("y", CENTER_Y_EXPR)
                    .opt("s", canvas.size_arg())
                    .opt("fps", fps),
                Filter::new("setsar").arg(1),
            ],
            vec![output],
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/motion.rs"]
mod tests;
