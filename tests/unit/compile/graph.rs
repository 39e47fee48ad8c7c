use super::*;

#[test]
fn filter_renders_positional_keyed_and_quoted_args() {
    let f = Filter::new("scale")
        .arg(2160)
        .arg(3840)
        .opt("force_original_aspect_ratio", "increase");
    assert_eq!(
        f.to_string(),
        "scale=2160:3840:force_original_aspect_ratio=increase"
    );

    let z = Filter::new("zoompan").expr("z", "min(1+0.001*on,1.1)").opt("d", 1);
    assert_eq!(z.to_string(), "zoompan=z='min(1+0.001*on,1.1)':d=1");
    assert_eq!(z.get("d"), Some(&FilterValue::Raw("1".to_string())));
    assert!(z.get("x").is_none());

    assert_eq!(Filter::new("null").to_string(), "null");
}

#[test]
fn graph_renders_chains_with_pads() {
    let mut g = FilterGraph::new();
    g.push(FilterChain::new(
        vec![Pad::video_input(0)],
        vec![Filter::new("format").opt("pix_fmts", "yuv420p")],
        vec![Pad::label("v0")],
    ));
    g.push(FilterChain::new(
        vec![Pad::label("v0")],
        vec![Filter::new("null")],
        vec![Pad::label("outv")],
    ));
    assert_eq!(
        g.to_string(),
        "[0:v]format=pix_fmts=yuv420p[v0];[v0]null[outv]"
    );
    assert!(g.validate().is_ok());
}

#[test]
fn audio_input_pad_renders_stream_selector() {
    let pad = Pad::Input {
        index: 3,
        stream: StreamKind::Audio,
    };
    assert_eq!(pad.to_string(), "[3:a]");
}

#[test]
fn validate_rejects_dangling_and_duplicate_labels() {
    let mut dangling = FilterGraph::new();
    dangling.push(FilterChain::new(
        vec![Pad::label("nope")],
        vec![Filter::new("null")],
        vec![Pad::label("outv")],
    ));
    assert!(dangling.validate().is_err());

    let mut twice = FilterGraph::new();
    twice.push(FilterChain::new(
        vec![Pad::video_input(0)],
        vec![Filter::new("null")],
        vec![Pad::label("v0")],
    ));
    twice.push(FilterChain::new(
        vec![Pad::label("v0")],
        vec![Filter::new("null")],
        vec![Pad::label("a")],
    ));
    twice.push(FilterChain::new(
        vec![Pad::label("v0")],
        vec![Filter::new("null")],
        vec![Pad::label("b")],
    ));
    assert!(twice.validate().is_err());
}

#[test]
fn simple_chain_has_no_pads() {
    let chain = FilterChain::simple(vec![
        Filter::new("scale").arg(640).arg(-2),
        Filter::new("fps").arg(30),
    ]);
    assert_eq!(chain.to_string(), "scale=640:-2,fps=30");
}
