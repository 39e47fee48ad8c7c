//! Cross-fade chain between consecutive slides.

use crate::compile::graph::{Filter, FilterChain, Pad};
use crate::foundation::core::format_secs;

/// `xfade` transition used between every pair of slides.
pub const XFADE_TRANSITION: &str = "fade";

/// Start time of each transition, one per slide after the first.
///
/// The fade into slide `i` begins at `sum(durations[..i]) - transition * i`: every earlier fade
/// already pulled the timeline back by one transition length. Offsets are clamped at zero, which
/// degrades to "fade starts immediately" when slides are shorter than the transitions.
pub fn crossfade_offsets(durations: &[f64], transition_secs: f64) -> Vec<f64> {
    let transitions = durations.len().saturating_sub(1);
    let mut elapsed = 0.0;
    durations[..transitions]
        .iter()
        .enumerate()
        .map(|(k, d)| {
            elapsed += d;
            (elapsed - transition_secs * (k + 1) as f64).max(0.0)
        })
        .collect()
}

/// Output of [`crossfade_chain`].
#[derive(Clone, Debug, PartialEq)]
pub struct Crossfade {
    /// One `xfade` chain per transition, in order.
    pub chains: Vec<FilterChain>,
    /// Pad carrying the fully composed video track.
    pub output: Pad,
}

/// Fold per-slide streams into one track: `s0` fades into `s1` as `xf1`, `xf1` into `s2` as
/// `xf2`, and so on.
///
/// A single stream is returned untouched with no chains.
pub fn crossfade_chain(streams: &[Pad], durations: &[f64], transition_secs: f64) -> Crossfade {
    debug_assert_eq!(streams.len(), durations.len());
    let Some(first) = streams.first() else {
        return Crossfade {
            chains: Vec::new(),
            output: Pad::label("v0"),
        };
    };

    let offsets = crossfade_offsets(durations, transition_secs);
    let mut prev = first.clone();
    let mut chains = Vec::with_capacity(offsets.len());
    for (i, (stream, offset)) in streams.iter().skip(1).zip(offsets).enumerate() {
        let out = Pad::label(format!("xf{}", i + 1));
        chains.push(FilterChain::new(
            vec![prev, stream.clone()],
            vec![
                Filter::new("xfade")
                    .opt("transition", XFADE_TRANSITION)
                    .opt("duration", format_secs(transition_secs))
                    .opt("offset", format_secs(offset)),
            ],
            vec![out.clone()],
        ));
        prev = out;
    }

    Crossfade {
        chains,
        output: prev,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transitions.rs"]
mod tests;
