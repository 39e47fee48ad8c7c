//! Media duration queries through `ffprobe`.

use std::path::Path;

use crate::config::ComposerConfig;
use crate::encode::ffmpeg::probe_duration_invocation;
use crate::encode::process::{ProcessRunner, execute};
use crate::foundation::error::{SlidecastError, SlidecastResult};

#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    format: Option<ProbeFormat>,
}

/// Extract `format.duration` from `ffprobe -of json` output.
pub fn parse_duration_json(stdout: &[u8]) -> SlidecastResult<f64> {
    let parsed: ProbeOut = serde_json::from_slice(stdout)
        .map_err(|e| SlidecastError::probe(format!("ffprobe json parse failed: {e}")))?;
    let raw = parsed
        .format
        .and_then(|f| f.duration)
        .ok_or_else(|| SlidecastError::probe("ffprobe reported no format duration"))?;
    let secs = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| SlidecastError::probe(format!("invalid duration '{raw}': {e}")))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(SlidecastError::probe(format!("invalid duration '{raw}'")));
    }
    Ok(secs)
}

/// Query the container duration of `path`. Every failure is a [`SlidecastError::Probe`].
pub fn probe_duration(
    runner: &dyn ProcessRunner,
    cfg: &ComposerConfig,
    path: &Path,
) -> SlidecastResult<f64> {
    if !path.exists() {
        return Err(SlidecastError::probe(format!(
            "'{}' does not exist",
            path.display()
        )));
    }
    let inv = probe_duration_invocation(cfg, path);
    let out = execute(runner, &inv, cfg.diagnostic_tail_chars).map_err(|e| match e {
        SlidecastError::Probe(_) => e,
        other => SlidecastError::probe(format!("'{}': {other}", path.display())),
    })?;
    parse_duration_json(&out.stdout)
}

/// [`probe_duration`], degrading to `cfg.fallback_duration_secs` on failure.
pub fn duration_or_default(runner: &dyn ProcessRunner, cfg: &ComposerConfig, path: &Path) -> f64 {
    match probe_duration(runner, cfg, path) {
        Ok(secs) => secs,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                fallback_secs = cfg.fallback_duration_secs,
                "duration probe failed, using fallback"
            );
            cfg.fallback_duration_secs
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/probe.rs"]
mod tests;
