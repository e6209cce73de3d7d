//! Deterministic selector generation: the same DOM shape always yields the
//! same string, and the string is chosen to survive a reload of the same
//! markup. Ids win, stable data attributes next, then a short structural
//! path that avoids framework-generated class names.

use dom::{Document, NodeId};

/// Data attributes considered stable identifiers, in priority order.
pub const STABLE_DATA_ATTRIBUTES: &[&str] =
    &["data-testid", "data-test", "data-qa", "data-cy", "data-id"];

/// Path segments kept when falling back to a structural selector.
const MAX_PATH_SEGMENTS: usize = 5;

/// Classes kept per segment.
const MAX_SEGMENT_CLASSES: usize = 2;

pub fn generate_selector(doc: &Document, node: NodeId) -> String {
    if let Some(id) = doc.id(node)
        && is_safe_identifier(&id)
    {
        return format!("#{id}");
    }
    for attribute in STABLE_DATA_ATTRIBUTES {
        if let Some(value) = doc.attribute(node, attribute)
            && !value.is_empty()
            && !value.contains('"')
        {
            return format!("[{attribute}=\"{value}\"]");
        }
    }
    structural_path(doc, node)
}

fn structural_path(doc: &Document, node: NodeId) -> String {
    let mut segments: Vec<String> = Vec::new();
    let mut current = Some(node);
    while let Some(step) = current {
        let Some(tag) = doc.tag(step) else {
            break;
        };
        if tag == "body" || tag == "html" {
            break;
        }
        segments.push(segment_for(doc, step, tag));
        if segments.len() == MAX_PATH_SEGMENTS {
            break;
        }
        // An id anchor makes the rest of the path redundant.
        if let Some(id) = doc.id(step)
            && is_safe_identifier(&id)
        {
            break;
        }
        current = doc.parent(step);
    }
    segments.reverse();
    segments.join(" > ")
}

fn segment_for(doc: &Document, node: NodeId, tag: &str) -> String {
    if let Some(id) = doc.id(node)
        && is_safe_identifier(&id)
    {
        return format!("{tag}#{id}");
    }
    let mut segment = tag.to_owned();
    for class in doc
        .classes(node)
        .iter()
        .filter(|class| is_stable_class(class))
        .take(MAX_SEGMENT_CLASSES)
    {
        segment.push('.');
        segment.push_str(class);
    }
    if doc.same_tag_sibling_count(node) > 1 {
        segment.push_str(&format!(":nth-child({})", doc.nth_child_index(node)));
    }
    segment
}

/// A conservative identifier shape: starts with a letter, short, and free
/// of characters that would need escaping inside a selector.
pub fn is_safe_identifier(candidate: &str) -> bool {
    if candidate.is_empty() || candidate.len() > 64 {
        return false;
    }
    let mut chars = candidate.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

/// Filter out obviously generated class names: CSS-in-JS prefixes, hash
/// suffixes, and utility-variant syntax none of which survive a rebuild.
pub fn is_stable_class(class: &str) -> bool {
    if class.is_empty() || class.len() > 24 {
        return false;
    }
    if !is_safe_identifier(class) {
        return false;
    }
    let lowered = class.to_ascii_lowercase();
    for prefix in ["css-", "jss", "sc-", "emotion-", "chakra-"] {
        if lowered.starts_with(prefix) {
            return false;
        }
    }
    // A long trailing run of hex-ish characters is a build hash.
    let trailing_hash = class
        .chars()
        .rev()
        .take_while(|ch| ch.is_ascii_hexdigit())
        .count();
    trailing_hash < 5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> (Document, NodeId) {
        let mut doc = Document::new("about:blank");
        let html = doc.append_element(doc.root(), "html");
        let body = doc.append_element(html, "body");
        (doc, body)
    }

    #[test]
    fn prefers_a_safe_id() {
        let (mut doc, body) = page();
        let button = doc.append_element(body, "button");
        doc.set_attribute(button, "id", "cta");
        assert_eq!(generate_selector(&doc, button), "#cta");
    }

    #[test]
    fn rejects_unsafe_ids_and_uses_data_attributes() {
        let (mut doc, body) = page();
        let button = doc.append_element(body, "button");
        doc.set_attribute(button, "id", "123:generated");
        doc.set_attribute(button, "data-testid", "signup");
        assert_eq!(generate_selector(&doc, button), "[data-testid=\"signup\"]");
    }

    #[test]
    fn builds_a_structural_path_with_stable_classes_only() {
        let (mut doc, body) = page();
        let main = doc.append_element(body, "main");
        let card = doc.append_element(main, "div");
        doc.set_attribute(card, "class", "card css-1q2w3e highlighted extra");
        let para = doc.append_element(card, "p");

        assert_eq!(
            generate_selector(&doc, para),
            "main > div.card.highlighted > p"
        );
    }

    #[test]
    fn adds_nth_child_only_for_same_tag_siblings() {
        let (mut doc, body) = page();
        let list = doc.append_element(body, "ul");
        let _first = doc.append_element(list, "li");
        let second = doc.append_element(list, "li");

        assert_eq!(generate_selector(&doc, second), "ul > li:nth-child(2)");

        let lone = doc.append_element(body, "table");
        assert_eq!(generate_selector(&doc, lone), "table");
    }

    #[test]
    fn anchors_the_path_at_an_ancestor_id() {
        let (mut doc, body) = page();
        let section = doc.append_element(body, "section");
        doc.set_attribute(section, "id", "pricing");
        let div = doc.append_element(section, "div");

        assert_eq!(generate_selector(&doc, div), "section#pricing > div");
    }

    #[test]
    fn is_deterministic_for_the_same_shape() {
        let (mut doc, body) = page();
        let div = doc.append_element(body, "div");
        doc.set_attribute(div, "class", "hero");
        let first = generate_selector(&doc, div);
        let second = generate_selector(&doc, div);
        assert_eq!(first, second);
    }

    #[test]
    fn stable_class_filter() {
        assert!(is_stable_class("card"));
        assert!(is_stable_class("btn-primary"));
        assert!(!is_stable_class("css-1x2y3z"));
        assert!(!is_stable_class("sc-bdVaJa"));
        assert!(!is_stable_class("a1b2c3d4e5f6"));
        assert!(!is_stable_class("hover:bg-blue-500"));
        assert!(!is_stable_class(""));
    }
}
