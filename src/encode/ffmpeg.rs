use std::path::{Path, PathBuf};

use crate::compile::graph::{Filter, FilterChain};
use crate::compile::plan::{OUTPUT_LABEL, SlideshowPlan};
use crate::config::{CodecOpts, ComposerConfig};
use crate::encode::process::Invocation;
use crate::foundation::core::{Canvas, format_secs};

fn ffmpeg_base(cfg: &ComposerConfig, timeout: std::time::Duration) -> Invocation {
    let mut inv = Invocation::new(&cfg.ffmpeg_bin, timeout);
    inv.args(["-hide_banner", "-nostdin", "-loglevel", "error", "-y"]);
    inv
}

fn push_video_codec(inv: &mut Invocation, codec: &CodecOpts) {
    let crf = codec.crf.to_string();
    inv.args([
        "-c:v",
        codec.video_codec.as_str(),
        "-preset",
        codec.preset.as_str(),
        "-crf",
        crf.as_str(),
        "-pix_fmt",
        "yuv420p",
    ]);
}

fn push_audio_codec(inv: &mut Invocation, codec: &CodecOpts) {
    inv.args([
        "-c:a",
        codec.audio_codec.as_str(),
        "-b:a",
        codec.audio_bitrate.as_str(),
    ]);
}

/// Full slideshow render: one looped image input per slide, optional audio input, the planned
/// filter graph, H.264 + AAC with fast-start.
pub fn slideshow_invocation(plan: &SlideshowPlan, cfg: &ComposerConfig, out: &Path) -> Invocation {
    let mut inv = ffmpeg_base(cfg, cfg.render_timeout());
    let fps = plan.fps.to_string();

    for slide in &plan.slides {
        inv.args(["-loop", "1", "-framerate", fps.as_str(), "-t"])
            .arg(format_secs(slide.duration))
            .arg("-i")
            .arg(&slide.image_path);
    }
    if let Some(audio) = &plan.audio_path {
        inv.arg("-i").arg(audio);
    }

    inv.arg("-filter_complex")
        .arg(plan.graph.to_string())
        .arg("-map")
        .arg(format!("[{OUTPUT_LABEL}]"));

    if let Some(idx) = plan.audio_input_index() {
        inv.arg("-map").arg(format!("{idx}:a"));
        push_audio_codec(&mut inv, &cfg.codec);
        inv.arg("-shortest");
    }

    push_video_codec(&mut inv, &cfg.codec);
    inv.args(["-r", fps.as_str(), "-movflags", "+faststart"]);
    if plan.is_single_slide() {
        inv.arg("-t").arg(format_secs(plan.expected_secs));
    }
    inv.arg(out);
    inv
}

/// Grab one frame at `timestamp_secs`, scaled to `cfg.thumbnail_width` with aspect preserved.
pub fn thumbnail_invocation(
    cfg: &ComposerConfig,
    video: &Path,
    out: &Path,
    timestamp_secs: f64,
) -> Invocation {
    let mut inv = ffmpeg_base(cfg, cfg.thumbnail_timeout());
    let scale = FilterChain::simple(vec![
        Filter::new("scale").arg(cfg.thumbnail_width).arg(-2),
    ]);
    inv.arg("-ss")
        .arg(format_secs(timestamp_secs))
        .arg("-i")
        .arg(video)
        .args(["-frames:v", "1", "-an", "-vf"])
        .arg(scale.to_string())
        .args(["-q:v", "2"])
        .arg(out);
    inv
}

/// `ffprobe` query for the container duration, as JSON.
pub fn probe_duration_invocation(cfg: &ComposerConfig, path: &Path) -> Invocation {
    let mut inv = Invocation::new(&cfg.ffprobe_bin, cfg.probe_timeout());
    inv.args([
        "-v",
        "error",
        "-show_entries",
        "format=duration",
        "-of",
        "json",
    ])
    .arg(path);
    inv
}

/// Letterbox to `canvas` and resample to `fps`.
pub fn normalize_chain(canvas: Canvas, fps: u32) -> FilterChain {
    FilterChain::simple(vec![
        Filter::new("scale")
            .arg(canvas.width)
            .arg(canvas.height)
            .opt("force_original_aspect_ratio", "decrease"),
        Filter::new("pad")
            .arg(canvas.width)
            .arg(canvas.height)
            .arg("(ow-iw)/2")
            .arg("(oh-ih)/2"),
        Filter::new("fps").arg(fps),
        Filter::new("setsar").arg(1),
    ])
}

/// Concat-demuxer list; single quotes in paths are escaped as `'\''`.
pub fn concat_list(paths: &[PathBuf]) -> String {
    let mut list = String::new();
    for p in paths {
        let escaped = p.to_string_lossy().replace('\'', r"'\''");
        list.push_str(&format!("file '{escaped}'\n"));
    }
    list
}

/// First merge pass: join every clip listed in `list` into one silent, normalized video.
pub fn concat_invocation(
    cfg: &ComposerConfig,
    list: &Path,
    canvas: Canvas,
    fps: u32,
    out: &Path,
) -> Invocation {
    let mut inv = ffmpeg_base(cfg, cfg.merge_timeout());
    inv.args(["-f", "concat", "-safe", "0", "-i"])
        .arg(list)
        .arg("-vf")
        .arg(normalize_chain(canvas, fps).to_string())
        .arg("-an");
    push_video_codec(&mut inv, &cfg.codec);
    inv.arg(out);
    inv
}

/// Mux `audio` onto `video`, truncating to the shorter stream.
///
/// With `normalize`, the video is re-encoded through [`normalize_chain`]; otherwise it is copied.
pub fn mux_audio_invocation(
    cfg: &ComposerConfig,
    video: &Path,
    audio: &Path,
    normalize: Option<(Canvas, u32)>,
    out: &Path,
) -> Invocation {
    let mut inv = ffmpeg_base(cfg, cfg.merge_timeout());
    inv.arg("-i")
        .arg(video)
        .arg("-i")
        .arg(audio)
        .args(["-map", "0:v", "-map", "1:a"]);
    match normalize {
        Some((canvas, fps)) => {
            inv.arg("-vf").arg(normalize_chain(canvas, fps).to_string());
            push_video_codec(&mut inv, &cfg.codec);
        }
        None => {
            inv.args(["-c:v", "copy"]);
        }
    }
    push_audio_codec(&mut inv, &cfg.codec);
    inv.args(["-movflags", "+faststart", "-shortest"]).arg(out);
    inv
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
