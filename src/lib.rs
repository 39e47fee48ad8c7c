//! Slidecast composes narrated slideshow videos with an external `ffmpeg`.
//!
//! The public API is service-oriented:
//!
//! - Describe a render with a [`RenderRequest`] (or a clip merge with a [`MergeRequest`])
//! - Create a [`Composer`] from a [`ComposerConfig`]
//! - Render, extract thumbnails, report durations or merge clips
//!
//! Planning is pure: slide timing, Ken Burns trajectories and the cross-fade chain are compiled
//! into a typed [`FilterGraph`] that is only serialized to text when the encoder is invoked.
#![forbid(unsafe_code)]

mod foundation;

pub mod animation;
/// Media probing and remote clip download.
pub mod assets;
/// Pure planning: timing allocation, filter graph IR, slideshow plans.
pub mod compile;
/// Composer configuration.
pub mod config;
pub mod effects;
pub mod encode;
/// Boundary request and result model.
pub mod scene;
/// The composition service.
pub mod session;

pub use crate::foundation::core::{Canvas, format_secs, frames_for};
pub use crate::foundation::error::{SlidecastError, SlidecastResult};

pub use crate::animation::motion::{Trajectory, ZoomDirection};
pub use crate::assets::fetch::{ClipFetcher, HttpFetcher};
pub use crate::compile::graph::{Filter, FilterChain, FilterGraph, Pad};
pub use crate::compile::plan::SlideshowPlan;
pub use crate::config::{CodecOpts, ComposerConfig};
pub use crate::encode::process::{
    Completion, Invocation, ProcessOutput, ProcessRunner, SystemRunner,
};
pub use crate::scene::model::{
    ClipSource, DurationPolicy, MergeRequest, RenderRequest, RenderResult, SlideSpec,
};
pub use crate::session::composer::Composer;
