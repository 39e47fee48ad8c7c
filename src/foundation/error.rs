use std::time::Duration;

/// Convenience result alias used across the crate.
pub type SlidecastResult<T> = Result<T, SlidecastError>;

/// Error taxonomy for slideshow composition.
///
/// `Input` is always raised before any external process starts. `Timeout` and `ProcessFailure`
/// come from the render invoker. `Probe` is non-fatal for callers of [`get_duration`] style
/// helpers, which degrade to a default instead of propagating it.
///
/// [`get_duration`]: crate::Composer::get_duration
#[derive(thiserror::Error, Debug)]
pub enum SlidecastError {
    /// Degenerate or invalid caller input.
    #[error("input error: {0}")]
    Input(String),

    /// External process exceeded its wall-clock budget and was killed.
    #[error("process timeout: {program} exceeded {}s", .timeout.as_secs())]
    Timeout {
        /// Program that was running.
        program: String,
        /// Budget that was exceeded.
        timeout: Duration,
    },

    /// External process could not be started or exited non-zero.
    #[error("process failure: {program} exited with {}: {diagnostics}", describe_code(.code))]
    ProcessFailure {
        /// Program that failed.
        program: String,
        /// Exit code, `None` when the process never started or was killed by a signal.
        code: Option<i32>,
        /// Bounded tail of the process diagnostic stream.
        diagnostics: String,
    },

    /// Media duration query failed.
    #[error("probe error: {0}")]
    Probe(String),

    /// Remote clip download failed.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(String),

    /// Anything else (filesystem staging, etc.).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SlidecastError {
    /// Build an [`SlidecastError::Input`].
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build an [`SlidecastError::Probe`].
    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }

    /// Build an [`SlidecastError::Fetch`].
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build an [`SlidecastError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Return `true` for errors detected before any external process was started.
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }

    /// Return `true` when the failure was a wall-clock timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "no status".to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
