use super::*;
use crate::encode::process::{Completion, Invocation, ProcessOutput};

struct Stdout(&'static str, i32);

impl ProcessRunner for Stdout {
    fn run(&self, _invocation: &Invocation) -> std::io::Result<Completion> {
        Ok(Completion::Exited(ProcessOutput {
            code: Some(self.1),
            stdout: self.0.as_bytes().to_vec(),
            stderr: b"moov atom not found".to_vec(),
        }))
    }
}

fn existing_file() -> tempfile::NamedTempFile {
    tempfile::Builder::new().suffix(".mp3").tempfile().unwrap()
}

#[test]
fn parses_ffprobe_json() {
    let secs = parse_duration_json(br#"{ "format": { "duration": "12.345000" } }"#).unwrap();
    assert!((secs - 12.345).abs() < 1e-9);
}

#[test]
fn rejects_missing_or_bad_duration() {
    assert!(parse_duration_json(br#"{ "format": {} }"#).is_err());
    assert!(parse_duration_json(br#"{}"#).is_err());
    assert!(parse_duration_json(br#"{ "format": { "duration": "N/A" } }"#).is_err());
    assert!(parse_duration_json(b"not json").is_err());
}

#[test]
fn probe_returns_parsed_duration() {
    let f = existing_file();
    let cfg = ComposerConfig::default();
    let runner = Stdout(r#"{ "format": { "duration": "20.0" } }"#, 0);
    assert_eq!(probe_duration(&runner, &cfg, f.path()).unwrap(), 20.0);
}

#[test]
fn probe_failures_are_probe_errors() {
    let f = existing_file();
    let cfg = ComposerConfig::default();
    let err = probe_duration(&Stdout("", 1), &cfg, f.path()).unwrap_err();
    assert!(matches!(err, SlidecastError::Probe(_)));

    let missing = probe_duration(
        &Stdout("", 0),
        &cfg,
        Path::new("/definitely/not/here.mp3"),
    )
    .unwrap_err();
    assert!(matches!(missing, SlidecastError::Probe(_)));
}

#[test]
fn duration_or_default_degrades_to_fallback() {
    let f = existing_file();
    let cfg = ComposerConfig::default();
    assert_eq!(duration_or_default(&Stdout("garbage", 0), &cfg, f.path()), 10.0);

    let custom = ComposerConfig {
        fallback_duration_secs: 3.5,
        ..ComposerConfig::default()
    };
    assert_eq!(duration_or_default(&Stdout("", 1), &custom, f.path()), 3.5);
}
