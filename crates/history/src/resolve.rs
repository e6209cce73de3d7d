//! Best-effort element re-resolution. A selector recorded minutes ago may
//! no longer match after a framework re-render, so the direct query falls
//! back to the id token and then to the first class token embedded in the
//! selector string.

use dom::{Document, NodeId, query_selector};
use log::trace;

/// Resolve a recorded selector against the current document.
pub fn resolve_element(doc: &Document, selector: &str) -> Option<NodeId> {
    if let Some(node) = query_selector(doc, selector) {
        return Some(node);
    }
    if let Some(id) = extract_token(selector, '#')
        && let Some(node) = doc.element_by_id(&id)
    {
        trace!("resolved `{selector}` through id fallback #{id}");
        return Some(node);
    }
    if let Some(class) = extract_token(selector, '.')
        && let Some(node) = doc.elements_by_class(&class).into_iter().next()
    {
        trace!("resolved `{selector}` through class fallback .{class}");
        return Some(node);
    }
    None
}

/// Pull the first `#ident` / `.ident` token out of a selector string.
fn extract_token(selector: &str, marker: char) -> Option<String> {
    let bytes = selector.as_bytes();
    let start = selector.find(marker)? + 1;
    let mut end = start;
    while end < bytes.len()
        && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'-' || bytes[end] == b'_')
    {
        end += 1;
    }
    if end == start {
        return None;
    }
    Some(selector[start..end].to_owned())
}
