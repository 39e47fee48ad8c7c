//! External process execution with a wall-clock budget.

use std::ffi::{OsStr, OsString};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use crate::foundation::error::{SlidecastError, SlidecastResult};

/// One fully serialized external command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    /// Executable, resolved through `PATH` when relative.
    pub program: PathBuf,
    /// Arguments in order.
    pub args: Vec<OsString>,
    /// Wall-clock budget; the child is killed when it runs longer.
    pub timeout: Duration,
}

impl Invocation {
    /// Invocation of `program` with no arguments yet.
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout,
        }
    }

    /// Append one argument.
    pub fn arg(&mut self, arg: impl AsRef<OsStr>) -> &mut Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append arguments in order.
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for a in args {
            self.arg(a);
        }
        self
    }

    /// Short program name for errors and logs.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Arguments as lossy UTF-8, for logging and dry runs.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Position of the first argument equal to `flag`.
    pub fn find_arg(&self, flag: &str) -> Option<usize> {
        self.args.iter().position(|a| a == flag)
    }

    /// Argument right after the first `flag`.
    pub fn value_of(&self, flag: &str) -> Option<&OsStr> {
        self.find_arg(flag)
            .and_then(|i| self.args.get(i + 1))
            .map(OsString::as_os_str)
    }
}

/// Captured result of a process that exited on its own.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
    /// Everything written to stdout.
    pub stdout: Vec<u8>,
    /// Everything written to stderr.
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    /// Exit code zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// How a run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Process exited before the deadline.
    Exited(ProcessOutput),
    /// Deadline passed; the process was killed and reaped.
    TimedOut {
        /// Diagnostics captured up to the kill.
        stderr: Vec<u8>,
    },
}

/// Seam between command construction and process execution.
pub trait ProcessRunner: Send + Sync {
    /// Run to completion or until `invocation.timeout` elapses.
    ///
    /// `Err` means the process could not be started or waited on.
    fn run(&self, invocation: &Invocation) -> std::io::Result<Completion>;
}

/// Runs commands as real child processes.
///
/// On unix each child leads its own process group and an expired budget kills the whole group,
/// including helpers the child forked.
#[derive(Clone, Debug)]
pub struct SystemRunner {
    poll_interval: Duration,
    drain_grace: Duration,
}

impl SystemRunner {
    /// Runner polling every 50ms.
    pub fn new() -> Self {
        Self {
            poll_interval: Duration::from_millis(50),
            drain_grace: Duration::from_millis(500),
        }
    }

    /// How often the child is polled for exit.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(Duration::from_millis(1));
        self
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> std::io::Result<Completion> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }
        let mut child = cmd.spawn()?;

        // Both pipes are drained concurrently so a chatty child never blocks on a full pipe.
        let stdout_drain = child.stdout.take().map(spawn_drain);
        let stderr_drain = child.stderr.take().map(spawn_drain);

        let deadline = Instant::now() + invocation.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break Some(status),
                Ok(None) => {}
                Err(e) => {
                    kill_tree(&mut child);
                    return Err(e);
                }
            }
            let now = Instant::now();
            if now >= deadline {
                kill_tree(&mut child);
                break None;
            }
            std::thread::sleep(self.poll_interval.min(deadline - now));
        };

        Ok(match status {
            Some(status) => Completion::Exited(ProcessOutput {
                code: status.code(),
                stdout: collect_drain(stdout_drain, None)?,
                stderr: collect_drain(stderr_drain, None)?,
            }),
            None => {
                // Whatever is still holding a pipe after the kill is abandoned with its thread.
                drop(stdout_drain);
                Completion::TimedOut {
                    stderr: collect_drain(stderr_drain, Some(self.drain_grace))?,
                }
            }
        })
    }
}

/// Kill the child's process group (unix) and the child itself, then reap it.
fn kill_tree(child: &mut Child) {
    #[cfg(unix)]
    {
        let group = format!("-{}", child.id());
        let _ = Command::new("kill")
            .args(["-KILL", "--", group.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
    }
    let _ = child.kill();
    let _ = child.wait();
}

type Drain = Receiver<std::io::Result<Vec<u8>>>;

fn spawn_drain<R: Read + Send + 'static>(mut pipe: R) -> Drain {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut bytes = Vec::new();
        let read = pipe.read_to_end(&mut bytes).map(|_| bytes);
        let _ = tx.send(read);
    });
    rx
}

/// Bytes read by a drain thread. With a `grace`, waits at most that long and yields nothing if
/// the pipe is still open by then.
fn collect_drain(drain: Option<Drain>, grace: Option<Duration>) -> std::io::Result<Vec<u8>> {
    let Some(rx) = drain else {
        return Ok(Vec::new());
    };
    match grace {
        None => rx
            .recv()
            .map_err(|_| std::io::Error::other("pipe drain thread panicked"))?,
        Some(grace) => match rx.recv_timeout(grace) {
            Ok(read) => read,
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(Vec::new()),
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(std::io::Error::other("pipe drain thread panicked"))
            }
        },
    }
}

/// Last `max_chars` characters of `text`, trimmed.
pub fn diagnostic_tail(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    let count = text.chars().count();
    text.chars().skip(count.saturating_sub(max_chars)).collect()
}

/// Run `invocation` and classify the outcome.
///
/// Spawn errors and non-zero exits become [`SlidecastError::ProcessFailure`] carrying at most
/// `tail_chars` of stderr; an expired budget becomes [`SlidecastError::Timeout`]. The full
/// stderr is only logged.
pub fn execute(
    runner: &dyn ProcessRunner,
    invocation: &Invocation,
    tail_chars: usize,
) -> SlidecastResult<ProcessOutput> {
    let program = invocation.program_name();
    tracing::debug!(program = %program, args = ?invocation.args_lossy(), "spawning");
    let started = Instant::now();

    let completion = runner.run(invocation).map_err(|e| {
        tracing::error!(program = %program, error = %e, "failed to run");
        SlidecastError::ProcessFailure {
            program: program.clone(),
            code: None,
            diagnostics: format!("failed to run {program} (is it installed and on PATH?): {e}"),
        }
    })?;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match completion {
        Completion::TimedOut { stderr } => {
            tracing::error!(
                program = %program,
                timeout_secs = invocation.timeout.as_secs(),
                stderr = %String::from_utf8_lossy(&stderr).trim(),
                "process timed out and was killed"
            );
            Err(SlidecastError::Timeout {
                program,
                timeout: invocation.timeout,
            })
        }
        Completion::Exited(output) if !output.success() => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(
                program = %program,
                code = ?output.code,
                elapsed_ms,
                stderr = %stderr.trim(),
                "process failed"
            );
            Err(SlidecastError::ProcessFailure {
                program,
                code: output.code,
                diagnostics: diagnostic_tail(&stderr, tail_chars),
            })
        }
        Completion::Exited(output) => {
            tracing::debug!(program = %program, elapsed_ms, "process finished");
            Ok(output)
        }
    }
}

/// Return `true` when `program -version` runs successfully.
pub fn is_program_available(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/process.rs"]
mod tests;
