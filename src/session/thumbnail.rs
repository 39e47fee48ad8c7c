use std::path::{Path, PathBuf};

use crate::assets::probe;
use crate::encode::ffmpeg::thumbnail_invocation;
use crate::encode::process::execute;
use crate::encode::staging::{StagedOutput, output_extension};
use crate::foundation::error::{SlidecastError, SlidecastResult};
use crate::session::composer::Composer;

/// Distance kept from the end of the video when clamping a thumbnail timestamp.
pub const LAST_FRAME_MARGIN_SECS: f64 = 0.1;

/// Clamp `requested` so it lands on a frame of a video `duration_secs` long.
pub fn clamp_timestamp(requested: f64, duration_secs: f64) -> f64 {
    let last = (duration_secs - LAST_FRAME_MARGIN_SECS).max(0.0);
    requested.clamp(0.0, last)
}

impl Composer {
    /// Extract one frame of `video` at `timestamp` (default `thumbnail_time_secs`) into `out`.
    ///
    /// Timestamps past the end of the video are clamped to the last frame. When the video cannot
    /// be probed the timestamp is used as given.
    #[tracing::instrument(skip(self))]
    pub fn generate_thumbnail(
        &self,
        video: &Path,
        out: &Path,
        timestamp: Option<f64>,
    ) -> SlidecastResult<PathBuf> {
        if !video.is_file() {
            return Err(SlidecastError::input(format!(
                "video '{}' does not exist",
                video.display()
            )));
        }
        output_extension(out)?;
        let requested = timestamp.unwrap_or(self.cfg.thumbnail_time_secs);
        if !requested.is_finite() || requested < 0.0 {
            return Err(SlidecastError::input(format!(
                "thumbnail timestamp must be finite and >= 0, got {requested}"
            )));
        }

        let at = match self.probe_duration(video) {
            Ok(duration) => clamp_timestamp(requested, duration),
            Err(e) => {
                tracing::debug!(error = %e, "cannot clamp thumbnail timestamp");
                requested
            }
        };
        if at != requested {
            tracing::debug!(requested, at, "thumbnail timestamp clamped");
        }

        let staged = StagedOutput::new(out)?;
        let inv = thumbnail_invocation(&self.cfg, video, staged.path(), at);
        execute(self.runner(), &inv, self.cfg.diagnostic_tail_chars)?;
        staged.commit(&inv.program_name())
    }

    /// Container duration of `path`, or `fallback_duration_secs` when it cannot be measured.
    pub fn get_duration(&self, path: &Path) -> f64 {
        probe::duration_or_default(self.runner(), &self.cfg, path)
    }

    /// Container duration of `path`, surfacing probe failures.
    pub fn probe_duration(&self, path: &Path) -> SlidecastResult<f64> {
        probe::probe_duration(self.runner(), &self.cfg, path)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/thumbnail.rs"]
mod tests;
