//! Atomic output files.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use tempfile::NamedTempFile;

use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Hidden sibling file the encoder writes into; renamed over the destination on
/// [`commit`](Self::commit) and deleted on drop otherwise.
#[derive(Debug)]
pub struct StagedOutput {
    dest: PathBuf,
    file: NamedTempFile,
}

impl StagedOutput {
    /// Stage next to `dest`, keeping its extension so the encoder infers the same container.
    ///
    /// A destination without an extension is an [`SlidecastError::Input`].
    pub fn new(dest: &Path) -> SlidecastResult<Self> {
        let suffix = format!(".{}", output_extension(dest)?.to_string_lossy());
        ensure_parent_dir(dest)?;
        let dir = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let file = tempfile::Builder::new()
            .prefix(".slidecast-")
            .suffix(&suffix)
            .tempfile_in(dir)
            .with_context(|| format!("failed to create staging file in '{}'", dir.display()))?;
        Ok(Self {
            dest: dest.to_path_buf(),
            file,
        })
    }

    /// Path handed to the encoder.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Final destination.
    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Move the staged file over the destination.
    ///
    /// An empty staging file means the encoder exited cleanly without writing anything, which is
    /// reported as a process failure.
    pub fn commit(self, program: &str) -> SlidecastResult<PathBuf> {
        let len = self
            .file
            .as_file()
            .metadata()
            .map(|m| m.len())
            .with_context(|| format!("failed to stat '{}'", self.file.path().display()))?;
        if len == 0 {
            return Err(SlidecastError::ProcessFailure {
                program: program.to_string(),
                code: Some(0),
                diagnostics: format!("no output written for '{}'", self.dest.display()),
            });
        }
        let dest = self.dest;
        self.file
            .persist(&dest)
            .map_err(|e| e.error)
            .with_context(|| format!("failed to move output into '{}'", dest.display()))?;
        Ok(dest)
    }
}

/// Extension of an output path; the encoder picks the container from it.
pub fn output_extension(dest: &Path) -> SlidecastResult<&OsStr> {
    dest.extension().filter(|e| !e.is_empty()).ok_or_else(|| {
        SlidecastError::input(format!(
            "output '{}' needs a file extension to pick a container",
            dest.display()
        ))
    })
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> SlidecastResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/staging.rs"]
mod tests;
