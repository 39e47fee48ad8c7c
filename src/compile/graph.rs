//! Typed filter-graph IR.
//!
//! Builders produce [`FilterGraph`] values; the textual ffmpeg syntax only appears when the graph
//! is rendered at the invocation boundary.

use std::collections::BTreeSet;
use std::fmt;

use crate::foundation::error::{SlidecastError, SlidecastResult};

/// Elementary stream kind of a numbered input pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamKind {
    /// `v`
    Video,
    /// `a`
    Audio,
}

/// Link between chains: either a numbered encoder input or a named intermediate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pad {
    /// Stream of the `index`-th `-i` input.
    Input {
        /// Position among `-i` inputs.
        index: usize,
        /// Stream selector.
        stream: StreamKind,
    },
    /// Named intermediate (`[v0]`, `[xf1]`, ...).
    Label(String),
}

impl Pad {
    /// Video stream of input `index`.
    pub fn video_input(index: usize) -> Self {
        Self::Input {
            index,
            stream: StreamKind::Video,
        }
    }

    /// Named intermediate pad.
    pub fn label(name: impl Into<String>) -> Self {
        Self::Label(name.into())
    }
}

impl fmt::Display for Pad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pad::Input { index, stream } => {
                let s = match stream {
                    StreamKind::Video => "v",
                    StreamKind::Audio => "a",
                };
                write!(f, "[{index}:{s}]")
            }
            Pad::Label(name) => write!(f, "[{name}]"),
        }
    }
}

/// Option value; expressions are quoted so their commas and colons survive parsing.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterValue {
    /// Written verbatim.
    Raw(String),
    /// Written inside single quotes.
    Expr(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Raw(v) => f.write_str(v),
            FilterValue::Expr(e) => write!(f, "'{e}'"),
        }
    }
}

/// One filter with its ordered options.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    name: String,
    args: Vec<(Option<String>, FilterValue)>,
}

impl Filter {
    /// Filter with no options.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Append a positional value.
    pub fn arg(mut self, value: impl ToString) -> Self {
        self.args.push((None, FilterValue::Raw(value.to_string())));
        self
    }

    /// Append `key=value`.
    pub fn opt(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.args
            .push((Some(key.into()), FilterValue::Raw(value.to_string())));
        self
    }

    /// Append `key='expr'`.
    pub fn expr(mut self, key: impl Into<String>, expr: impl Into<String>) -> Self {
        self.args
            .push((Some(key.into()), FilterValue::Expr(expr.into())));
        self
    }

    /// Filter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a keyed option.
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.args
            .iter()
            .find(|(k, _)| k.as_deref() == Some(key))
            .map(|(_, v)| v)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for (i, (key, value)) in self.args.iter().enumerate() {
            f.write_str(if i == 0 { "=" } else { ":" })?;
            if let Some(key) = key {
                write!(f, "{key}=")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

/// Linear run of filters between input and output pads.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterChain {
    /// Consumed pads, in order.
    pub inputs: Vec<Pad>,
    /// Filters applied left to right.
    pub filters: Vec<Filter>,
    /// Produced pads.
    pub outputs: Vec<Pad>,
}

impl FilterChain {
    /// Chain with explicit pads.
    pub fn new(inputs: Vec<Pad>, filters: Vec<Filter>, outputs: Vec<Pad>) -> Self {
        Self {
            inputs,
            filters,
            outputs,
        }
    }

    /// Pad-less chain, suitable for `-vf`.
    pub fn simple(filters: Vec<Filter>) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pad in &self.inputs {
            write!(f, "{pad}")?;
        }
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{filter}")?;
        }
        for pad in &self.outputs {
            write!(f, "{pad}")?;
        }
        Ok(())
    }
}

/// Ordered set of chains forming one `-filter_complex` graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterGraph {
    chains: Vec<FilterChain>,
}

impl FilterGraph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chain.
    pub fn push(&mut self, chain: FilterChain) {
        self.chains.push(chain);
    }

    /// Chains in evaluation order.
    pub fn chains(&self) -> &[FilterChain] {
        &self.chains
    }

    /// Check that every named pad is produced once, before it is consumed, and consumed at most
    /// once.
    pub fn validate(&self) -> SlidecastResult<()> {
        let mut produced = BTreeSet::new();
        let mut consumed = BTreeSet::new();
        for chain in &self.chains {
            for pad in &chain.inputs {
                if let Pad::Label(name) = pad {
                    if !produced.contains(name) {
                        return Err(SlidecastError::input(format!(
                            "filter graph consumes [{name}] before it is produced"
                        )));
                    }
                    if !consumed.insert(name.clone()) {
                        return Err(SlidecastError::input(format!(
                            "filter graph consumes [{name}] twice"
                        )));
                    }
                }
            }
            for pad in &chain.outputs {
                if let Pad::Label(name) = pad
                    && !produced.insert(name.clone())
                {
                    return Err(SlidecastError::input(format!(
                        "filter graph produces [{name}] twice"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chain) in self.chains.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{chain}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/graph.rs"]
mod tests;
