//! # Tree Extractor
//!
//! Parses an HTML document with `html5ever` into an `RcDom` and walks it in
//! depth-first pre-order, serializing every node the
//! [classifier](crate::classify) accepts. Once a node is accepted its
//! children are not visited, so no emitted fragment ever contains another.

use std::fmt;

use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, RcDom, SerializableHandle};

use crate::classify::is_target_element;
use crate::core::error::{HtmlSiftError, Result};

/// Serialized HTML for one accepted node and its subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment(String);

impl Fragment {
    /// Returns the serialized HTML.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses a complete HTML document from raw bytes.
///
/// Invalid UTF-8 sequences are replaced rather than rejected, and the parser
/// recovers from malformed markup; only a failure of the underlying reader
/// surfaces as an error.
pub fn parse_html(mut input: &[u8]) -> std::io::Result<RcDom> {
    parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut input)
}

/// Serializes `node`, including its own tag and attributes.
pub fn serialize_node(node: &Handle) -> Result<String> {
    let mut buf = Vec::new();
    let handle = SerializableHandle::from(node.clone());
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    serialize(&mut buf, &handle, opts).map_err(|e| {
        HtmlSiftError::internal_error(format!(
            "Failed to serialize node: {}",
            e
        ))
    })?;
    String::from_utf8(buf).map_err(|e| {
        HtmlSiftError::internal_error(format!(
            "Serialized node is not UTF-8: {}",
            e
        ))
    })
}

/// Collects fragments for every accepted node under `root`, in document order.
///
/// An empty result is valid.
pub fn extract_fragments(root: &Handle) -> Result<Vec<Fragment>> {
    let mut fragments = Vec::new();
    visit(root, &mut fragments)?;
    Ok(fragments)
}

fn visit(node: &Handle, fragments: &mut Vec<Fragment>) -> Result<()> {
    if is_target_element(node) {
        fragments.push(Fragment(serialize_node(node)?));
        return Ok(());
    }
    for child in node.children.borrow().iter() {
        visit(child, fragments)?;
    }
    Ok(())
}

/// Parses `input` and extracts its fragments in one step.
pub fn extract_from_str(input: &str) -> Result<Vec<Fragment>> {
    let dom = parse_html(input.as_bytes()).map_err(|e| HtmlSiftError::ParseError {
        path: Default::default(),
        message: e.to_string(),
    })?;
    extract_fragments(&dom.document)
}
