//! Immutable element snapshots handed to the command-resolution service and
//! kept on history entries. Captured at selection time and again at
//! command-send time; never mutated after creation.

use crate::document::{Document, Rect};
use indextree::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The computed-style subset worth describing an element by.
pub const CONTEXT_STYLE_PROPERTIES: &[&str] = &[
    "color",
    "background-color",
    "font-size",
    "font-weight",
    "font-family",
    "display",
    "margin",
    "padding",
    "text-align",
    "border",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementContext {
    pub selector: String,
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub styles: BTreeMap<String, String>,
    pub rect: Rect,
}

impl ElementContext {
    /// Snapshot `node` as it stands right now. `None` for non-elements.
    pub fn capture(doc: &Document, node: NodeId, selector: &str, max_text: usize) -> Option<Self> {
        let tag = doc.tag(node)?.to_owned();
        let mut styles = BTreeMap::new();
        for property in CONTEXT_STYLE_PROPERTIES {
            let value = doc.computed_style(node, property);
            if !value.is_empty() {
                styles.insert((*property).to_owned(), value);
            }
        }
        let text = normalize_text(&doc.text_content(node), max_text);
        Some(Self {
            selector: selector.to_owned(),
            tag,
            id: doc.id(node),
            classes: doc.classes(node),
            text,
            styles,
            rect: doc.layout_rect(node).unwrap_or(Rect::ZERO),
        })
    }
}

fn normalize_text(raw: &str, max_text: usize) -> Option<String> {
    let trimmed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.chars().count() <= max_text {
        return Some(trimmed);
    }
    let mut truncated: String = trimmed.chars().take(max_text).collect();
    truncated.push('…');
    Some(truncated)
}
