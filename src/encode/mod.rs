//! External encoder plumbing.
//!
//! Commands are assembled as [`process::Invocation`] values by [`ffmpeg`], executed through a
//! [`process::ProcessRunner`], and write into [`staging::StagedOutput`] files.

/// `ffmpeg` / `ffprobe` argument builders.
pub mod ffmpeg;
/// Process execution, timeouts and failure classification.
pub mod process;
/// Atomic output files.
pub mod staging;
