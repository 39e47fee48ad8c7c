use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context as _;
use tempfile::TempDir;

use crate::encode::ffmpeg::{concat_invocation, concat_list, mux_audio_invocation};
use crate::encode::process::execute;
use crate::encode::staging::{StagedOutput, output_extension};
use crate::foundation::error::{SlidecastError, SlidecastResult};
use crate::scene::model::{ClipSource, MergeRequest};
use crate::session::composer::Composer;

const SCRATCH_PREFIX: &str = "slidecast-merge-";
const CONCAT_LIST_NAME: &str = "concat.txt";
const CONCATENATED_NAME: &str = "concatenated.mp4";

impl Composer {
    /// Join `req.clips` in order and mux `req.audio_path` over the result.
    ///
    /// Remote clips are downloaded into a scratch directory that is removed on every exit path.
    /// A single clip is re-encoded with the audio in one pass; several clips are first
    /// concatenated into a silent normalized video, which is then muxed with the audio.
    #[tracing::instrument(
        skip(self, req),
        fields(clips = req.clips.len(), output = %req.output_path.display())
    )]
    pub fn merge_clips_with_audio(&self, req: &MergeRequest) -> SlidecastResult<PathBuf> {
        check_merge_request(req)?;
        output_extension(&req.output_path)?;

        let scratch = self.scratch_dir()?;
        let started = Instant::now();
        let clips = self.localize_clips(&req.clips, scratch.path())?;

        let staged = StagedOutput::new(&req.output_path)?;
        let tail = self.cfg.diagnostic_tail_chars;
        let program = if let [only] = clips.as_slice() {
            let inv = mux_audio_invocation(
                &self.cfg,
                only,
                &req.audio_path,
                Some((req.resolution, req.fps)),
                staged.path(),
            );
            tracing::info!("muxing single clip with audio");
            execute(self.runner(), &inv, tail)?;
            inv.program_name()
        } else {
            let list = scratch.path().join(CONCAT_LIST_NAME);
            std::fs::write(&list, concat_list(&clips))
                .with_context(|| format!("failed to write concat list '{}'", list.display()))?;

            let joined = scratch.path().join(CONCATENATED_NAME);
            let concat = concat_invocation(&self.cfg, &list, req.resolution, req.fps, &joined);
            tracing::info!(clips = clips.len(), "concatenating clips");
            execute(self.runner(), &concat, tail)?;

            let mux = mux_audio_invocation(&self.cfg, &joined, &req.audio_path, None, staged.path());
            tracing::info!("muxing audio");
            execute(self.runner(), &mux, tail)?;
            mux.program_name()
        };
        let out = staged.commit(&program)?;

        if let Err(e) = scratch.close() {
            tracing::warn!(error = %e, "failed to remove merge scratch directory");
        }
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "clips merged"
        );
        Ok(out)
    }

    fn scratch_dir(&self) -> SlidecastResult<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        let dir = match &self.cfg.temp_root {
            Some(root) => {
                std::fs::create_dir_all(root).with_context(|| {
                    format!("failed to create temp root '{}'", root.display())
                })?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
        .context("failed to create merge scratch directory")?;
        Ok(dir)
    }

    /// Absolute local paths for every clip, downloading remote ones into `scratch`.
    fn localize_clips(&self, clips: &[ClipSource], scratch: &Path) -> SlidecastResult<Vec<PathBuf>> {
        clips
            .iter()
            .enumerate()
            .map(|(i, clip)| -> SlidecastResult<PathBuf> {
                match clip {
                    ClipSource::Local(path) => Ok(std::path::absolute(path).with_context(|| {
                        format!("failed to resolve clip path '{}'", path.display())
                    })?),
                    ClipSource::Remote(url) => {
                        let dest = scratch.join(format!("clip_{i:03}.mp4"));
                        self.fetcher.fetch(url, &dest)?;
                        Ok(dest)
                    }
                }
            })
            .collect()
    }
}

/// Reject merge requests that cannot succeed before any scratch space or process is used.
fn check_merge_request(req: &MergeRequest) -> SlidecastResult<()> {
    if req.clips.is_empty() {
        return Err(SlidecastError::input("merge needs at least one clip"));
    }
    req.resolution.validate()?;
    if req.fps == 0 {
        return Err(SlidecastError::input("fps must be non-zero"));
    }
    if !req.audio_path.is_file() {
        return Err(SlidecastError::input(format!(
            "audio file '{}' does not exist",
            req.audio_path.display()
        )));
    }
    for clip in &req.clips {
        if let Some(path) = clip.local_path()
            && !path.is_file()
        {
            return Err(SlidecastError::input(format!(
                "clip '{}' does not exist",
                path.display()
            )));
        }
    }
    Ok(())
}
