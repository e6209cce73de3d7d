//! The gate every mutation passes before any write: the selector must
//! parse, the target must not be a protected anchor, and rich content must
//! be free of script-capable markup.

use crate::error::MutationError;
use crate::mutation::DomMutation;
use dom::{Document, NodeId, parse_selector_list, query_selector};

/// Elements the engine refuses to touch regardless of what a command asks
/// for. Stylesheet `<link>` elements are covered separately.
pub const PROTECTED_TAGS: &[&str] = &["html", "head", "body", "script", "style", "meta"];

pub fn is_protected(doc: &Document, node: NodeId) -> bool {
    let Some(tag) = doc.tag(node) else {
        return true;
    };
    if PROTECTED_TAGS.contains(&tag) {
        return true;
    }
    tag == "link"
        && doc
            .attribute(node, "rel")
            .is_some_and(|rel| rel.to_ascii_lowercase().contains("stylesheet"))
}

/// Scan markup for script-capable constructs. Returns the reason when the
/// value must not be assigned as rich content.
pub fn unsafe_markup(value: &str) -> Option<&'static str> {
    let lowered = value.to_ascii_lowercase();
    if lowered.contains("<script") {
        return Some("script tag");
    }
    if lowered.contains("javascript:") {
        return Some("javascript: URI");
    }
    if lowered.contains("<iframe") || lowered.contains("<object") || lowered.contains("<embed") {
        return Some("embedded frame or object");
    }
    if has_inline_handler(&lowered) {
        return Some("inline event handler");
    }
    None
}

/// Detect `onclick=`-style attributes: `on` + letters + `=`, preceded by a
/// tag-internal boundary character.
fn has_inline_handler(lowered: &str) -> bool {
    let bytes = lowered.as_bytes();
    for (index, window) in bytes.windows(2).enumerate() {
        if window[0] != b'o' || window[1] != b'n' {
            continue;
        }
        if index > 0 && !matches!(bytes[index - 1], b' ' | b'\t' | b'\n' | b'"' | b'\'' | b'<') {
            continue;
        }
        let mut cursor = index + 2;
        let mut saw_letter = false;
        while cursor < bytes.len() && bytes[cursor].is_ascii_alphabetic() {
            saw_letter = true;
            cursor += 1;
        }
        if saw_letter && cursor < bytes.len() && bytes[cursor] == b'=' {
            return true;
        }
    }
    false
}

/// Validate a mutation against the current document and resolve its target.
/// No writes happen here; failures leave all state untouched.
pub fn validate_target(doc: &Document, mutation: &DomMutation) -> Result<NodeId, MutationError> {
    let selector = mutation.selector();
    if let Err(error) = parse_selector_list(selector) {
        return Err(MutationError::InvalidSelector {
            selector: selector.to_owned(),
            message: error.to_string(),
        });
    }
    let node = query_selector(doc, selector)
        .ok_or_else(|| MutationError::TargetNotFound(selector.to_owned()))?;
    validate_resolved(doc, node, mutation)?;
    Ok(node)
}

/// The write-independent part of the gate, for callers that already hold a
/// resolved target (e.g. redo after a fallback lookup).
pub fn validate_resolved(
    doc: &Document,
    node: NodeId,
    mutation: &DomMutation,
) -> Result<(), MutationError> {
    if is_protected(doc, node) {
        return Err(MutationError::ProtectedElement(
            doc.tag(node).unwrap_or("unknown").to_owned(),
        ));
    }
    match mutation {
        DomMutation::Content {
            rich: true, value, ..
        } => {
            if let Some(reason) = unsafe_markup(value) {
                return Err(MutationError::UnsafeContent(reason));
            }
        }
        DomMutation::Content { rich: false, .. }
        | DomMutation::Style { .. }
        | DomMutation::Attribute { .. } => {}
    }
    Ok(())
}
