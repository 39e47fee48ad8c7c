use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "slidecast", version)]
struct Cli {
    /// Composer config JSON (every field optional).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a slideshow video (requires `ffmpeg` and `ffprobe` on PATH).
    Render(RenderArgs),
    /// Print the timing plan, filter graph and encoder command without rendering.
    Plan(RequestArgs),
    /// Extract one frame of a video as an image.
    Thumbnail(ThumbnailArgs),
    /// Print the duration of a media file in seconds.
    Duration(DurationArgs),
    /// Concatenate clips and mux a shared audio track.
    Merge(MergeArgs),
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Render request JSON. Flags below override its fields.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Slide image, in order (repeatable).
    #[arg(long = "image")]
    images: Vec<PathBuf>,

    /// Audio track pacing the slides.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Output video path.
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long)]
    fps: Option<u32>,

    /// Cross-fade length in seconds.
    #[arg(long)]
    transition: Option<f64>,

    /// Maximum Ken Burns zoom, e.g. 1.1.
    #[arg(long)]
    zoom: Option<f64>,

    /// How slide durations react to an audio track.
    #[arg(long, value_enum)]
    policy: Option<PolicyChoice>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    request: RequestArgs,

    /// Also extract a thumbnail of the rendered video to this path.
    #[arg(long)]
    thumbnail: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ThumbnailArgs {
    /// Source video.
    #[arg(long)]
    video: PathBuf,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Timestamp in seconds (clamped to the last frame).
    #[arg(long)]
    at: Option<f64>,
}

#[derive(Args, Debug)]
struct DurationArgs {
    /// Media file to probe.
    path: PathBuf,
}

#[derive(Args, Debug)]
struct MergeArgs {
    /// Clip path or http(s) URL, in order (repeatable).
    #[arg(long = "clip", required = true)]
    clips: Vec<String>,

    /// Shared audio track.
    #[arg(long)]
    audio: PathBuf,

    /// Output video path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long)]
    fps: Option<u32>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyChoice {
    FitAudio,
    PreserveHints,
}

impl From<PolicyChoice> for slidecast::DurationPolicy {
    fn from(p: PolicyChoice) -> Self {
        match p {
            PolicyChoice::FitAudio => Self::FitAudio,
            PolicyChoice::PreserveHints => Self::PreserveHints,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let cfg = match &cli.config {
        Some(path) => slidecast::ComposerConfig::from_json_path(path)?,
        None => slidecast::ComposerConfig::default(),
    }
    .with_env_overrides();
    let composer = slidecast::Composer::new(cfg)?;

    match cli.cmd {
        Command::Render(args) => cmd_render(&composer, args),
        Command::Plan(args) => cmd_plan(&composer, args),
        Command::Thumbnail(args) => cmd_thumbnail(&composer, args),
        Command::Duration(args) => cmd_duration(&composer, args),
        Command::Merge(args) => cmd_merge(&composer, args),
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::WARN,
        (false, 1) => tracing::Level::INFO,
        (false, 2) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn read_request_json(path: &Path) -> anyhow::Result<slidecast::RenderRequest> {
    let f = File::open(path).with_context(|| format!("open request '{}'", path.display()))?;
    let r = BufReader::new(f);
    let req: slidecast::RenderRequest =
        serde_json::from_reader(r).with_context(|| "parse render request JSON")?;
    Ok(req)
}

fn build_request(args: RequestArgs) -> anyhow::Result<slidecast::RenderRequest> {
    let mut req = match &args.in_path {
        Some(path) => {
            let mut req = read_request_json(path)?;
            if !args.images.is_empty() {
                req.slides = args
                    .images
                    .into_iter()
                    .map(|p| slidecast::SlideSpec::new(p, slidecast::scene::model::DEFAULT_SLIDE_SECS))
                    .collect();
            }
            req
        }
        None => {
            if args.images.is_empty() {
                anyhow::bail!("pass --in <request.json> or at least one --image");
            }
            let out = args
                .out
                .clone()
                .context("--out is required without --in")?;
            slidecast::RenderRequest::from_images(args.images, None, out)
        }
    };

    if let Some(audio) = args.audio {
        req.audio_path = Some(audio);
    }
    if let Some(out) = args.out {
        req.output_path = out;
    }
    if let Some(w) = args.width {
        req.resolution.width = w;
    }
    if let Some(h) = args.height {
        req.resolution.height = h;
    }
    if let Some(fps) = args.fps {
        req.fps = fps;
    }
    if let Some(t) = args.transition {
        req.transition_duration = t;
    }
    if let Some(z) = args.zoom {
        req.zoom_factor = z;
    }
    if let Some(p) = args.policy {
        req.duration_policy = p.into();
    }
    Ok(req)
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}

fn cmd_render(composer: &slidecast::Composer, args: RenderArgs) -> anyhow::Result<()> {
    let req = build_request(args.request)?;
    let result = composer.render(&req, args.thumbnail.as_deref())?;
    eprintln!("wrote {}", result.output_path.display());
    print_json(&result)
}

fn cmd_plan(composer: &slidecast::Composer, args: RequestArgs) -> anyhow::Result<()> {
    let req = build_request(args)?;
    let plan = composer.plan_slideshow(&req)?;
    let inv =
        slidecast::encode::ffmpeg::slideshow_invocation(&plan, composer.config(), &req.output_path);
    let offsets = slidecast::effects::transitions::crossfade_offsets(
        &plan.durations(),
        plan.transition_secs,
    );
    print_json(&serde_json::json!({
        "slides": plan.slides.len(),
        "durations": plan.durations(),
        "transition_secs": plan.transition_secs,
        "crossfade_offsets": offsets,
        "expected_secs": plan.expected_secs,
        "filter_graph": plan.graph.to_string(),
        "command": std::iter::once(inv.program_name())
            .chain(inv.args_lossy())
            .collect::<Vec<_>>(),
    }))
}

fn cmd_thumbnail(composer: &slidecast::Composer, args: ThumbnailArgs) -> anyhow::Result<()> {
    let out = composer.generate_thumbnail(&args.video, &args.out, args.at)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_duration(composer: &slidecast::Composer, args: DurationArgs) -> anyhow::Result<()> {
    let secs = composer.probe_duration(&args.path)?;
    println!("{}", slidecast::format_secs(secs));
    Ok(())
}

fn cmd_merge(composer: &slidecast::Composer, args: MergeArgs) -> anyhow::Result<()> {
    let mut req = slidecast::MergeRequest::new(
        args.clips.iter().map(String::as_str),
        args.audio,
        args.out,
    );
    if let Some(w) = args.width {
        req.resolution.width = w;
    }
    if let Some(h) = args.height {
        req.resolution.height = h;
    }
    if let Some(fps) = args.fps {
        req.fps = fps;
    }
    let out = composer.merge_clips_with_audio(&req)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}
