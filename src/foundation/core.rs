use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Output frame size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Vertical 1080x1920, the mobile-first default.
    pub const PORTRAIT_1080: Canvas = Canvas {
        width: 1080,
        height: 1920,
    };

    /// Reject zero or odd dimensions.
    ///
    /// Output is always `yuv420p`, which needs even sizes.
    pub fn validate(self) -> SlidecastResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SlidecastError::input("resolution width/height must be non-zero"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(SlidecastError::input(format!(
                "resolution {}x{} must be even (required for yuv420p output)",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Same aspect, each side scaled by `k`.
    pub fn scaled(self, k: u32) -> Canvas {
        Canvas {
            width: self.width * k,
            height: self.height * k,
        }
    }

    /// `WxH` as ffmpeg expects for size options.
    pub fn size_arg(self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::PORTRAIT_1080
    }
}

/// Number of frames covering `secs` at `fps`, never less than one.
pub fn frames_for(secs: f64, fps: u32) -> u64 {
    let n = (secs * f64::from(fps)).round();
    if n.is_finite() && n >= 1.0 { n as u64 } else { 1 }
}

/// Format seconds for ffmpeg arguments: fixed precision, trailing zeros trimmed.
pub fn format_secs(secs: f64) -> String {
    let s = format!("{secs:.6}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
