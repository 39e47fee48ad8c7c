//! Composer configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::compile::timing::MIN_SLIDE_SECS;
use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Environment override for [`ComposerConfig::ffmpeg_bin`].
pub const ENV_FFMPEG: &str = "SLIDECAST_FFMPEG";
/// Environment override for [`ComposerConfig::ffprobe_bin`].
pub const ENV_FFPROBE: &str = "SLIDECAST_FFPROBE";

/// Encoder settings shared by every render pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOpts {
    pub video_codec: String,
    pub preset: String,
    pub crf: u8,
    pub audio_codec: String,
    pub audio_bitrate: String,
}

impl Default for CodecOpts {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            preset: "medium".to_string(),
            crf: 23,
            audio_codec: "aac".to_string(),
            audio_bitrate: "192k".to_string(),
        }
    }
}

/// Settings for a [`Composer`](crate::Composer). Every field has a default, so a partial JSON
/// file is enough.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Encoder executable.
    pub ffmpeg_bin: PathBuf,
    /// Prober executable.
    pub ffprobe_bin: PathBuf,
    /// Budget for a slideshow render.
    pub render_timeout_secs: u64,
    /// Budget for each merge pass.
    pub merge_timeout_secs: u64,
    pub thumbnail_timeout_secs: u64,
    pub probe_timeout_secs: u64,
    pub download_timeout_secs: u64,
    /// Floor for audio-paced slide durations.
    pub min_slide_secs: f64,
    /// Returned by `get_duration` when probing fails.
    pub fallback_duration_secs: f64,
    /// Thumbnails are scaled to this width, aspect preserved.
    pub thumbnail_width: u32,
    /// Default thumbnail timestamp.
    pub thumbnail_time_secs: f64,
    /// Upper bound on the diagnostic excerpt carried by process failures.
    pub diagnostic_tail_chars: usize,
    pub codec: CodecOpts,
    /// Parent for scratch directories; system temp dir when unset.
    pub temp_root: Option<PathBuf>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            ffmpeg_bin: PathBuf::from("ffmpeg"),
            ffprobe_bin: PathBuf::from("ffprobe"),
            render_timeout_secs: 300,
            merge_timeout_secs: 600,
            thumbnail_timeout_secs: 30,
            probe_timeout_secs: 30,
            download_timeout_secs: 120,
            min_slide_secs: MIN_SLIDE_SECS,
            fallback_duration_secs: 10.0,
            thumbnail_width: 640,
            thumbnail_time_secs: 1.0,
            diagnostic_tail_chars: 500,
            codec: CodecOpts::default(),
            temp_root: None,
        }
    }
}

impl ComposerConfig {
    /// Parse a JSON config file.
    pub fn from_json_path(path: &Path) -> SlidecastResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            SlidecastError::config(format!("read config '{}': {e}", path.display()))
        })?;
        let cfg: Self = serde_json::from_slice(&bytes).map_err(|e| {
            SlidecastError::config(format!("parse config '{}': {e}", path.display()))
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `SLIDECAST_FFMPEG` / `SLIDECAST_FFPROBE` when set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = std::env::var_os(ENV_FFMPEG).filter(|v| !v.is_empty()) {
            self.ffmpeg_bin = PathBuf::from(v);
        }
        if let Some(v) = std::env::var_os(ENV_FFPROBE).filter(|v| !v.is_empty()) {
            self.ffprobe_bin = PathBuf::from(v);
        }
        self
    }

    /// Reject settings no render can run with, such as a zero timeout.
    pub fn validate(&self) -> SlidecastResult<()> {
        let timeouts = [
            ("render_timeout_secs", self.render_timeout_secs),
            ("merge_timeout_secs", self.merge_timeout_secs),
            ("thumbnail_timeout_secs", self.thumbnail_timeout_secs),
            ("probe_timeout_secs", self.probe_timeout_secs),
            ("download_timeout_secs", self.download_timeout_secs),
        ];
        if let Some((name, _)) = timeouts.iter().find(|(_, v)| *v == 0) {
            return Err(SlidecastError::config(format!("{name} must be non-zero")));
        }
        if !self.min_slide_secs.is_finite() || self.min_slide_secs <= 0.0 {
            return Err(SlidecastError::config("min_slide_secs must be finite and > 0"));
        }
        if self.thumbnail_width == 0 {
            return Err(SlidecastError::config("thumbnail_width must be non-zero"));
        }
        Ok(())
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }

    pub fn merge_timeout(&self) -> Duration {
        Duration::from_secs(self.merge_timeout_secs)
    }

    pub fn thumbnail_timeout(&self) -> Duration {
        Duration::from_secs(self.thumbnail_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
