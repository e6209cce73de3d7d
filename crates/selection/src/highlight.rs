//! Visual hover/selection feedback via inline `outline` overrides. The
//! element's own outline declarations are stashed in a side map before the
//! override goes in, and restored byte-for-byte when the highlight comes off,
//! so pages that style outlines themselves come back untouched.

use dom::{Document, NodeId};
use log::trace;
use std::collections::HashMap;

pub const HOVER_OUTLINE: &str = "2px dashed #3b82f6";
pub const SELECTED_OUTLINE: &str = "2px solid #3b82f6";
const OUTLINE_OFFSET: &str = "2px";

/// Inline outline declarations as they stood before we touched the element.
#[derive(Debug, Clone, Default)]
struct SavedOutline {
    outline: Option<String>,
    offset: Option<String>,
}

#[derive(Debug, Default)]
pub struct Highlighter {
    saved: HashMap<NodeId, SavedOutline>,
}

impl Highlighter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_highlighted(&self, node: NodeId) -> bool {
        self.saved.contains_key(&node)
    }

    pub fn apply(&mut self, doc: &mut Document, node: NodeId, outline: &str) {
        // First touch saves the element's own declarations; re-applying (e.g.
        // hover promoted to selected) must not overwrite that snapshot.
        self.saved.entry(node).or_insert_with(|| SavedOutline {
            outline: doc.style_property(node, "outline"),
            offset: doc.style_property(node, "outline-offset"),
        });
        doc.set_style_property(node, "outline", outline);
        doc.set_style_property(node, "outline-offset", OUTLINE_OFFSET);
    }

    /// Remove the highlight and put back whatever the element declared.
    pub fn remove(&mut self, doc: &mut Document, node: NodeId) {
        let Some(saved) = self.saved.remove(&node) else {
            return;
        };
        trace!("removing highlight from {:?}", node);
        match saved.outline {
            Some(value) => doc.set_style_property(node, "outline", &value),
            None => doc.remove_style_property(node, "outline"),
        }
        match saved.offset {
            Some(value) => doc.set_style_property(node, "outline-offset", &value),
            None => doc.remove_style_property(node, "outline-offset"),
        }
    }

    /// Remove every active highlight. Detached nodes are simply dropped from
    /// the map since there is nothing left to restore on.
    pub fn clear(&mut self, doc: &mut Document) {
        let nodes: Vec<NodeId> = self.saved.keys().copied().collect();
        for node in nodes {
            if doc.is_attached(node) {
                self.remove(doc, node);
            } else {
                self.saved.remove(&node);
            }
        }
    }

    /// Forget all saved state without touching the document. Used on
    /// navigation, when the old tree is gone anyway.
    pub fn reset(&mut self) {
        self.saved.clear();
    }
}
