//! # Element Classifier
//!
//! Decides, for a single parsed node, whether the node and its whole subtree
//! are kept verbatim as one fragment. A rejected node is not emitted itself,
//! but the extractor still descends into its children.
//!
//! | Tag | Kept when |
//! |---|---|
//! | `ul` | no `id` and no `style` attribute |
//! | `p` | no `class` and no `style` attribute, text lacks `Copyright` |
//! | `h3` | no `class` and no `id` attribute, text lacks `District Map` |
//! | `h1`, `h2` | no `class` and no `id` attribute |
//! | `div` | has `class="photogimg"` exactly |
//!
//! Every other node, including text and comments, is rejected.

use html5ever::Attribute;
use markup5ever_rcdom::{Handle, NodeData};

/// Paragraphs whose text contains this are boilerplate footers.
const COPYRIGHT_MARKER: &str = "Copyright";

/// Level-3 headings whose text contains this caption an embedded map.
const DISTRICT_MAP_MARKER: &str = "District Map";

/// Class value identifying a photo container div.
const PHOTO_CLASS: &str = "photogimg";

/// The tags the classifier has a rule for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// `<ul>`
    UnorderedList,
    /// `<p>`
    Paragraph,
    /// `<h1>`
    Heading1,
    /// `<h2>`
    Heading2,
    /// `<h3>`
    Heading3,
    /// `<div>`
    Div,
    /// Anything else.
    Other,
}

impl Tag {
    /// Maps an element's local name to a recognised tag.
    pub fn from_local_name(name: &str) -> Self {
        match name {
            "ul" => Tag::UnorderedList,
            "p" => Tag::Paragraph,
            "h1" => Tag::Heading1,
            "h2" => Tag::Heading2,
            "h3" => Tag::Heading3,
            "div" => Tag::Div,
            _ => Tag::Other,
        }
    }
}

/// Returns `true` when the node should be kept together with its subtree.
pub fn is_target_element(node: &Handle) -> bool {
    let NodeData::Element {
        ref name,
        ref attrs,
        ..
    } = node.data
    else {
        return false;
    };
    let attrs = attrs.borrow();

    match Tag::from_local_name(&name.local) {
        Tag::UnorderedList => has_no_attributes(&attrs, &["id", "style"]),
        Tag::Paragraph => {
            has_no_attributes(&attrs, &["class", "style"])
                && !flattened_text(node).contains(COPYRIGHT_MARKER)
        }
        Tag::Heading3 => {
            has_no_attributes(&attrs, &["class", "id"])
                && !flattened_text(node).contains(DISTRICT_MAP_MARKER)
        }
        Tag::Heading1 | Tag::Heading2 => {
            has_no_attributes(&attrs, &["class", "id"])
        }
        // Allow-rule: the value matters here, unlike the checks above.
        Tag::Div => attrs.iter().any(|attr| {
            &*attr.name.local == "class" && &*attr.value == PHOTO_CLASS
        }),
        Tag::Other => false,
    }
}

/// Returns `true` when none of `excluded` appears as an attribute key.
///
/// Only keys are compared. An excluded key with any value, empty included,
/// counts as present.
pub fn has_no_attributes(attrs: &[Attribute], excluded: &[&str]) -> bool {
    !attrs
        .iter()
        .any(|attr| excluded.contains(&&*attr.name.local))
}

/// Concatenates every text node under `node` in document order and trims
/// the result at both ends.
pub fn flattened_text(node: &Handle) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text.trim().to_string()
}

fn collect_text(node: &Handle, out: &mut String) {
    if let NodeData::Text { ref contents } = node.data {
        out.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}
