use super::*;

#[test]
fn redact_drops_query_and_fragment() {
    assert_eq!(
        redact("https://bucket.example.com/c.mp4?X-Amz-Signature=abc"),
        "https://bucket.example.com/c.mp4"
    );
    assert_eq!(redact("https://x/c.mp4#t=3"), "https://x/c.mp4");
    assert_eq!(redact("https://x/c.mp4"), "https://x/c.mp4");
}

#[test]
fn unreachable_host_is_fetch_error() {
    let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let err = fetcher
        .fetch("http://127.0.0.1:9/clip.mp4", &dir.path().join("c.mp4"))
        .unwrap_err();
    assert!(matches!(err, SlidecastError::Fetch(_)));
}
