use super::*;

struct Fixed(Completion);

impl ProcessRunner for Fixed {
    fn run(&self, _invocation: &Invocation) -> std::io::Result<Completion> {
        Ok(self.0.clone())
    }
}

struct Unspawnable;

impl ProcessRunner for Unspawnable {
    fn run(&self, _invocation: &Invocation) -> std::io::Result<Completion> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "not found"))
    }
}

fn ffmpeg() -> Invocation {
    let mut inv = Invocation::new("/usr/bin/ffmpeg", Duration::from_secs(300));
    inv.args(["-y", "-i", "in.jpg", "out.mp4"]);
    inv
}

#[test]
fn invocation_helpers_find_flags() {
    let inv = ffmpeg();
    assert_eq!(inv.program_name(), "ffmpeg");
    assert_eq!(inv.find_arg("-i"), Some(1));
    assert_eq!(inv.value_of("-i"), Some(OsStr::new("in.jpg")));
    assert!(inv.value_of("-t").is_none());
    assert_eq!(inv.args_lossy().last().map(String::as_str), Some("out.mp4"));
}

#[test]
fn diagnostic_tail_keeps_the_end() {
    let long = format!("{}END", "x".repeat(1000));
    let tail = diagnostic_tail(&long, 500);
    assert_eq!(tail.chars().count(), 500);
    assert!(tail.ends_with("END"));
    assert_eq!(diagnostic_tail("  short \n", 500), "short");
    assert_eq!(diagnostic_tail("héllo", 3), "llo");
}

#[test]
fn execute_success_returns_output() {
    let runner = Fixed(Completion::Exited(ProcessOutput {
        code: Some(0),
        stdout: b"12.5\n".to_vec(),
        stderr: Vec::new(),
    }));
    let out = execute(&runner, &ffmpeg(), 500).unwrap();
    assert_eq!(out.stdout, b"12.5\n");
}

#[test]
fn execute_non_zero_is_process_failure_with_bounded_tail() {
    let stderr = format!("{}\nConversion failed!", "noise ".repeat(200));
    let runner = Fixed(Completion::Exited(ProcessOutput {
        code: Some(1),
        stdout: Vec::new(),
        stderr: stderr.into_bytes(),
    }));
    match execute(&runner, &ffmpeg(), 500).unwrap_err() {
        SlidecastError::ProcessFailure {
            program,
            code,
            diagnostics,
        } => {
            assert_eq!(program, "ffmpeg");
            assert_eq!(code, Some(1));
            assert!(diagnostics.chars().count() <= 500);
            assert!(diagnostics.ends_with("Conversion failed!"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn execute_timeout_is_typed() {
    let runner = Fixed(Completion::TimedOut {
        stderr: b"frame=  10".to_vec(),
    });
    let err = execute(&runner, &ffmpeg(), 500).unwrap_err();
    assert!(err.is_timeout());
}

#[test]
fn execute_spawn_error_is_process_failure_without_code() {
    let err = execute(&Unspawnable, &ffmpeg(), 500).unwrap_err();
    assert!(matches!(
        err,
        SlidecastError::ProcessFailure { code: None, .. }
    ));
}

#[cfg(unix)]
#[test]
fn system_runner_captures_exit_code_and_streams() {
    let mut inv = Invocation::new("sh", Duration::from_secs(10));
    inv.args(["-c", "echo out; echo err >&2; exit 3"]);
    match SystemRunner::new().run(&inv).unwrap() {
        Completion::Exited(out) => {
            assert_eq!(out.code, Some(3));
            assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "out");
            assert_eq!(String::from_utf8_lossy(&out.stderr).trim(), "err");
        }
        Completion::TimedOut { .. } => panic!("should not time out"),
    }
}

#[cfg(unix)]
#[test]
fn system_runner_kills_on_timeout() {
    let mut inv = Invocation::new("sh", Duration::from_millis(200));
    inv.args(["-c", "exec sleep 5"]);
    let started = Instant::now();
    let completion = SystemRunner::new()
        .with_poll_interval(Duration::from_millis(10))
        .run(&inv)
        .unwrap();
    assert!(matches!(completion, Completion::TimedOut { .. }));
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[test]
fn system_runner_reports_missing_program() {
    let inv = Invocation::new("slidecast-definitely-not-a-program", Duration::from_secs(1));
    assert!(SystemRunner::new().run(&inv).is_err());
    assert!(!is_program_available(Path::new(
        "slidecast-definitely-not-a-program"
    )));
}

#[cfg(unix)]
#[test]
fn system_runner_kills_forked_children_on_timeout() {
    // No exec: sh stays the parent and sleep inherits the pipes.
    let mut inv = Invocation::new("sh", Duration::from_secs(1));
    inv.args(["-c", "sleep 8; echo done"]);
    let started = Instant::now();
    let completion = SystemRunner::new()
        .with_poll_interval(Duration::from_millis(10))
        .run(&inv)
        .unwrap();
    match completion {
        Completion::TimedOut { stderr } => assert!(stderr.is_empty()),
        Completion::Exited(out) => panic!("should time out, exited with {:?}", out.code),
    }
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[cfg(unix)]
#[test]
fn system_runner_keeps_stderr_written_before_timeout() {
    let mut inv = Invocation::new("sh", Duration::from_millis(300));
    inv.args(["-c", "echo frame=1 >&2; sleep 8"]);
    match SystemRunner::new().run(&inv).unwrap() {
        Completion::TimedOut { stderr } => {
            assert_eq!(String::from_utf8_lossy(&stderr).trim(), "frame=1");
        }
        Completion::Exited(_) => panic!("should time out"),
    }
}
