use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::core::Canvas;
use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Default on-screen time per slide when no audio drives pacing.
pub const DEFAULT_SLIDE_SECS: f64 = 5.0;
/// Default output frame rate.
pub const DEFAULT_FPS: u32 = 30;
/// Default cross-fade length.
pub const DEFAULT_TRANSITION_SECS: f64 = 1.0;
/// Default Ken Burns zoom (10%).
pub const DEFAULT_ZOOM_FACTOR: f64 = 1.1;

/// One still image and how long it stays on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideSpec {
    /// Local, already-normalized image file.
    pub image_path: PathBuf,
    /// Seconds on screen, `> 0`. Overwritten by the timing allocator under
    /// [`DurationPolicy::FitAudio`] when audio is present.
    #[serde(default = "default_slide_secs")]
    pub duration: f64,
}

impl SlideSpec {
    /// Slide with an explicit duration.
    pub fn new(image_path: impl Into<PathBuf>, duration: f64) -> Self {
        Self {
            image_path: image_path.into(),
            duration,
        }
    }
}

/// What to do with caller-supplied slide durations when an audio track is present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationPolicy {
    /// Spread the audio length uniformly over all slides (hints are discarded).
    #[default]
    FitAudio,
    /// Keep caller durations; the audio is cut or padded by `-shortest` semantics.
    PreserveHints,
}

/// Immutable contract for one slideshow render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    /// Ordered, non-empty.
    pub slides: Vec<SlideSpec>,
    /// Optional narration / background track.
    #[serde(default)]
    pub audio_path: Option<PathBuf>,
    /// Destination video file.
    pub output_path: PathBuf,
    /// Output frame size.
    #[serde(default)]
    pub resolution: Canvas,
    /// Output frame rate.
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Cross-fade length in seconds; ignored for single-slide requests.
    #[serde(default = "default_transition_secs")]
    pub transition_duration: f64,
    /// Maximum zoom reached by each slide's trajectory, `> 1.0`.
    #[serde(default = "default_zoom_factor")]
    pub zoom_factor: f64,
    /// Preserve-or-override rule for slide durations under audio.
    #[serde(default)]
    pub duration_policy: DurationPolicy,
}

impl RenderRequest {
    /// Request with default pacing, resolution, fps and zoom for a list of images.
    pub fn from_images<I, P>(images: I, audio_path: Option<PathBuf>, output_path: P) -> Self
    where
        I: IntoIterator,
        I::Item: Into<PathBuf>,
        P: Into<PathBuf>,
    {
        Self {
            slides: images
                .into_iter()
                .map(|p| SlideSpec::new(p, DEFAULT_SLIDE_SECS))
                .collect(),
            audio_path,
            output_path: output_path.into(),
            resolution: Canvas::default(),
            fps: DEFAULT_FPS,
            transition_duration: DEFAULT_TRANSITION_SECS,
            zoom_factor: DEFAULT_ZOOM_FACTOR,
            duration_policy: DurationPolicy::default(),
        }
    }

    /// Check numeric parameters. Does not touch the filesystem.
    pub fn validate_params(&self) -> SlidecastResult<()> {
        if self.slides.is_empty() {
            return Err(SlidecastError::input("slideshow needs at least one slide"));
        }
        self.resolution.validate()?;
        if self.fps == 0 {
            return Err(SlidecastError::input("fps must be non-zero"));
        }
        if !self.zoom_factor.is_finite() || self.zoom_factor <= 1.0 {
            return Err(SlidecastError::input(format!(
                "zoom_factor must be finite and > 1.0, got {}",
                self.zoom_factor
            )));
        }
        if !self.transition_duration.is_finite() || self.transition_duration < 0.0 {
            return Err(SlidecastError::input(format!(
                "transition_duration must be finite and >= 0, got {}",
                self.transition_duration
            )));
        }
        for (i, s) in self.slides.iter().enumerate() {
            if !s.duration.is_finite() || s.duration <= 0.0 {
                return Err(SlidecastError::input(format!(
                    "slide {i} duration must be finite and > 0, got {}",
                    s.duration
                )));
            }
        }
        Ok(())
    }
}

/// Output of a successful render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderResult {
    /// Rendered video.
    pub output_path: PathBuf,
    /// Length reported by the container (advisory).
    pub duration_seconds: f64,
    /// Extracted frame, when requested and successful.
    pub thumbnail_path: Option<PathBuf>,
}

/// Where a pre-rendered clip comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClipSource {
    /// File on local disk.
    Local(PathBuf),
    /// `http://` or `https://` URL, downloaded into scratch space before merging.
    Remote(String),
}

impl ClipSource {
    /// Classify a path-or-URL string.
    pub fn parse(s: &str) -> Self {
        if s.starts_with("http://") || s.starts_with("https://") {
            Self::Remote(s.to_string())
        } else {
            Self::Local(PathBuf::from(s))
        }
    }

    /// Borrow the local path, if any.
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Self::Local(p) => Some(p),
            Self::Remote(_) => None,
        }
    }
}

impl From<&str> for ClipSource {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<PathBuf> for ClipSource {
    fn from(p: PathBuf) -> Self {
        Self::Local(p)
    }
}

/// Stitch pre-rendered clips and mux one shared audio track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeRequest {
    /// Ordered, non-empty.
    pub clips: Vec<ClipSource>,
    /// Required shared audio track.
    pub audio_path: PathBuf,
    /// Destination video file.
    pub output_path: PathBuf,
    /// Every clip is letterboxed to this size.
    #[serde(default)]
    pub resolution: Canvas,
    /// Every clip is resampled to this frame rate.
    #[serde(default = "default_fps")]
    pub fps: u32,
}

impl MergeRequest {
    /// Merge with default resolution and fps.
    pub fn new<I>(clips: I, audio_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ClipSource>,
    {
        Self {
            clips: clips.into_iter().map(Into::into).collect(),
            audio_path: audio_path.into(),
            output_path: output_path.into(),
            resolution: Canvas::default(),
            fps: DEFAULT_FPS,
        }
    }
}

fn default_slide_secs() -> f64 {
    DEFAULT_SLIDE_SECS
}

fn default_fps() -> u32 {
    DEFAULT_FPS
}

fn default_transition_secs() -> f64 {
    DEFAULT_TRANSITION_SECS
}

fn default_zoom_factor() -> f64 {
    DEFAULT_ZOOM_FACTOR
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
