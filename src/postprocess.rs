//! # Text Post-Processing
//!
//! Cleans the converter's markdown in three ordered passes:
//!
//! 1. [`RemoveMarkers`] drops every literal `**::**`.
//! 2. [`FilterDirectiveLines`] drops fenced-div lines (trimmed line starts
//!    with `:::`) and rewrites relative links `(../x/index.html)` to `(x)`.
//! 3. [`StripBraceSpans`] removes `{...}` attribute annotations.
//!
//! Brace stripping is first-match and not nesting aware: `a{b{c}d}e` becomes
//! `ad}e`, and an unterminated `{` swallows the rest of the text.

use crate::core::traits::Transform;

const MARKER: &str = "**::**";
const DIRECTIVE_PREFIX: &str = ":::";

/// Removes every occurrence of the `**::**` marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveMarkers;

impl Transform for RemoveMarkers {
    type Input = String;
    type Output = String;

    fn transform(&self, input: String) -> String {
        remove_markers(&input)
    }
}

/// Drops directive lines and rewrites relative links in the rest.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterDirectiveLines;

impl Transform for FilterDirectiveLines {
    type Input = String;
    type Output = String;

    fn transform(&self, input: String) -> String {
        filter_directive_lines(&input)
    }
}

/// Removes brace-delimited spans.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripBraceSpans;

impl Transform for StripBraceSpans {
    type Input = String;
    type Output = String;

    fn transform(&self, input: String) -> String {
        strip_brace_spans(&input)
    }
}

type Pass = Box<dyn Transform<Input = String, Output = String>>;

/// An ordered chain of text passes.
#[derive(Debug)]
pub struct PostProcessor {
    passes: Vec<Pass>,
}

impl Default for PostProcessor {
    /// Markers, then directive lines, then brace spans.
    fn default() -> Self {
        Self {
            passes: vec![
                Box::new(RemoveMarkers),
                Box::new(FilterDirectiveLines),
                Box::new(StripBraceSpans),
            ],
        }
    }
}

impl PostProcessor {
    /// Creates a processor with no passes.
    pub fn empty() -> Self {
        Self { passes: Vec::new() }
    }

    /// Appends a pass to the end of the chain.
    pub fn with_pass<T>(mut self, pass: T) -> Self
    where
        T: Transform<Input = String, Output = String> + 'static,
    {
        self.passes.push(Box::new(pass));
        self
    }

    /// Runs every pass in order.
    pub fn run(&self, text: &str) -> String {
        self.passes
            .iter()
            .fold(text.to_string(), |acc, pass| pass.transform(acc))
    }
}

/// Applies the default three passes.
pub fn post_process(text: &str) -> String {
    PostProcessor::default().run(text)
}

/// Removes every literal `**::**`.
pub fn remove_markers(text: &str) -> String {
    text.replace(MARKER, "")
}

/// Drops lines whose trimmed content starts with `:::` and rewrites
/// `(../` to `(` and `/index.html)` to `)` in the lines that remain.
pub fn filter_directive_lines(text: &str) -> String {
    text.split('\n')
        .filter(|line| !line.trim().starts_with(DIRECTIVE_PREFIX))
        .map(|line| line.replace("(../", "(").replace("/index.html)", ")"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Copying,
    InBraceSpan,
}

/// Removes every `{...}` span, delimiters included.
///
/// The first `}` after a `{` closes the span regardless of any `{` in
/// between. A `{` with no later `}` drops everything from it to the end.
pub fn strip_brace_spans(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = ScanState::Copying;

    for c in text.chars() {
        state = match (state, c) {
            (ScanState::Copying, '{') => ScanState::InBraceSpan,
            (ScanState::Copying, c) => {
                out.push(c);
                ScanState::Copying
            }
            (ScanState::InBraceSpan, '}') => ScanState::Copying,
            (ScanState::InBraceSpan, _) => ScanState::InBraceSpan,
        };
    }
    out
}
