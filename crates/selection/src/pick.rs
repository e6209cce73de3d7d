//! Raw event targets are usually too granular — the `<span>` wrapping a
//! text node rather than the button around it. This walk finds the nearest
//! edit-worthy unit without requiring the page's cooperation.

use dom::{Document, NodeId};

/// Cap on the ancestor walk; beyond this we give up and keep the target.
pub const MAX_ANCESTOR_HOPS: usize = 10;

/// Elements worth selecting on tag semantics alone.
const MEANINGFUL_TAGS: &[&str] = &[
    "a", "button", "input", "select", "textarea", "label", "img", "video", "audio", "h1", "h2",
    "h3", "h4", "h5", "h6", "p", "li", "ul", "ol", "table", "form", "nav", "header", "footer",
    "main", "section", "article", "aside", "figure", "blockquote",
];

/// Resolve the event target to the element a human plausibly meant to pick:
/// walk up the ancestor chain, skipping elements that are currently not
/// selectable, and stop at the first that is either semantically meaningful
/// or large enough with something visible about it. Falls back to the
/// original target when nothing within reach qualifies.
pub fn find_selectable(doc: &Document, target: NodeId) -> NodeId {
    let mut current = Some(target);
    let mut hops = 0;
    while let Some(node) = current {
        if hops > MAX_ANCESTOR_HOPS {
            break;
        }
        if doc.is_element(node) && doc.is_visible(node) && is_edit_worthy(doc, node) {
            return node;
        }
        current = doc.parent(node);
        hops += 1;
    }
    target
}

fn is_edit_worthy(doc: &Document, node: NodeId) -> bool {
    let Some(tag) = doc.tag(node) else {
        return false;
    };
    if MEANINGFUL_TAGS.contains(&tag) {
        return true;
    }
    let Some(rect) = doc.layout_rect(node) else {
        return false;
    };
    if rect.width <= 20 || rect.height <= 20 {
        return false;
    }
    has_visible_text(doc, node) || has_background(doc, node) || has_border(doc, node)
}

fn has_visible_text(doc: &Document, node: NodeId) -> bool {
    !doc.text_content(node).trim().is_empty()
}

fn has_background(doc: &Document, node: NodeId) -> bool {
    let background = doc.computed_style(node, "background-color");
    !background.is_empty() && background != "transparent" && background != "rgba(0, 0, 0, 0)"
}

fn has_border(doc: &Document, node: NodeId) -> bool {
    doc.style_property(node, "border")
        .is_some_and(|border| border != "none" && !border.starts_with('0'))
        || doc
            .style_property(node, "border-width")
            .is_some_and(|width| width != "0" && width != "0px")
}
