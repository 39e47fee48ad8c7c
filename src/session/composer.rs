use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::assets::fetch::{ClipFetcher, HttpFetcher};
use crate::assets::probe::duration_or_default;
use crate::compile::plan::{self, SlideshowPlan};
use crate::config::ComposerConfig;
use crate::encode::ffmpeg::slideshow_invocation;
use crate::encode::process::{ProcessRunner, SystemRunner, execute};
use crate::encode::staging::{StagedOutput, output_extension};
use crate::foundation::error::{SlidecastError, SlidecastResult};
use crate::scene::model::{DurationPolicy, RenderRequest, RenderResult, SlideSpec};

/// Slideshow composition service.
///
/// Construct once and share by reference: renders hold no mutable state, so concurrent calls on
/// one `Composer` are independent as long as their output paths differ.
pub struct Composer {
    pub(crate) cfg: ComposerConfig,
    pub(crate) runner: Box<dyn ProcessRunner>,
    pub(crate) fetcher: Box<dyn ClipFetcher>,
}

impl Composer {
    /// Composer running real `ffmpeg`/`ffprobe` processes and fetching clips over HTTP.
    pub fn new(cfg: ComposerConfig) -> SlidecastResult<Self> {
        cfg.validate()?;
        let fetcher = HttpFetcher::new(cfg.download_timeout())?;
        Ok(Self {
            cfg,
            runner: Box::new(SystemRunner::new()),
            fetcher: Box::new(fetcher),
        })
    }

    /// Replace the process runner.
    pub fn with_runner(mut self, runner: impl ProcessRunner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    /// Replace the clip fetcher.
    pub fn with_fetcher(mut self, fetcher: impl ClipFetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    /// Configuration the composer was built with.
    pub fn config(&self) -> &ComposerConfig {
        &self.cfg
    }

    pub(crate) fn runner(&self) -> &dyn ProcessRunner {
        self.runner.as_ref()
    }

    /// Validate `req`, drop slides whose image is missing, measure the audio and build the
    /// render plan. Only the prober runs here, and only when audio paces the slides.
    pub fn plan_slideshow(&self, req: &RenderRequest) -> SlidecastResult<SlideshowPlan> {
        req.validate_params()?;
        let slides = existing_slides(&req.slides)?;

        let audio_secs = match &req.audio_path {
            Some(audio) => {
                if !audio.is_file() {
                    return Err(SlidecastError::input(format!(
                        "audio file '{}' does not exist",
                        audio.display()
                    )));
                }
                match req.duration_policy {
                    DurationPolicy::FitAudio => {
                        Some(duration_or_default(self.runner(), &self.cfg, audio))
                    }
                    DurationPolicy::PreserveHints => None,
                }
            }
            None => None,
        };

        plan::plan_slideshow(req, &slides, audio_secs, self.cfg.min_slide_secs)
    }

    /// Render `req` to `req.output_path`.
    ///
    /// The encoder writes into a staging file beside the destination; the destination only
    /// appears once the encoder has succeeded.
    #[tracing::instrument(
        skip(self, req),
        fields(slides = req.slides.len(), output = %req.output_path.display())
    )]
    pub fn render_slideshow(&self, req: &RenderRequest) -> SlidecastResult<PathBuf> {
        output_extension(&req.output_path)?;
        let plan = self.plan_slideshow(req)?;
        let staged = StagedOutput::new(&req.output_path)?;
        let inv = slideshow_invocation(&plan, &self.cfg, staged.path());

        tracing::info!(
            slides = plan.slides.len(),
            expected_secs = plan.expected_secs,
            audio = plan.audio_path.is_some(),
            "rendering slideshow"
        );
        let started = Instant::now();
        execute(self.runner(), &inv, self.cfg.diagnostic_tail_chars)?;
        let out = staged.commit(&inv.program_name())?;
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "slideshow rendered"
        );
        Ok(out)
    }

    /// Render, then report the final duration and optionally extract a thumbnail.
    ///
    /// A failed thumbnail is logged and leaves `thumbnail_path` empty; the video is still returned.
    pub fn render(
        &self,
        req: &RenderRequest,
        thumbnail_out: Option<&Path>,
    ) -> SlidecastResult<RenderResult> {
        let output_path = self.render_slideshow(req)?;
        let duration_seconds = self.get_duration(&output_path);
        let thumbnail_path = match thumbnail_out {
            Some(thumb) => match self.generate_thumbnail(&output_path, thumb, None) {
                Ok(p) => Some(p),
                Err(e) => {
                    tracing::warn!(error = %e, "thumbnail extraction failed");
                    None
                }
            },
            None => None,
        };
        Ok(RenderResult {
            output_path,
            duration_seconds,
            thumbnail_path,
        })
    }
}

/// Keep slides whose image exists; fail when none do.
fn existing_slides(slides: &[SlideSpec]) -> SlidecastResult<Vec<SlideSpec>> {
    let kept: Vec<SlideSpec> = slides
        .iter()
        .filter(|s| {
            let ok = s.image_path.is_file();
            if !ok {
                tracing::warn!(image = %s.image_path.display(), "skipping missing image");
            }
            ok
        })
        .cloned()
        .collect();
    if kept.is_empty() {
        return Err(SlidecastError::input(format!(
            "none of the {} image(s) exist",
            slides.len()
        )));
    }
    Ok(kept)
}
