use dom::{Document, Rect, query_selector, query_selector_all};

fn page() -> (Document, dom::NodeId, dom::NodeId) {
    let mut doc = Document::new("https://example.test/");
    let html = doc.append_element(doc.root(), "html");
    let body = doc.append_element(html, "body");
    (doc, html, body)
}

#[test]
fn attributes_classes_and_text() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (mut doc, _html, body) = page();
    let button = doc.append_element(body, "button");
    doc.set_attribute(button, "ID", "cta");
    doc.set_attribute(button, "class", "btn  btn-primary");
    doc.append_text(button, "Buy ");
    let span = doc.append_element(button, "span");
    doc.append_text(span, "now");

    assert_eq!(doc.id(button).as_deref(), Some("cta"));
    assert!(doc.has_class(button, "btn-primary"));
    assert!(!doc.has_class(button, "btn-"));
    assert_eq!(doc.text_content(button), "Buy now");

    doc.set_text_content(button, "Later");
    assert_eq!(doc.text_content(button), "Later");
    assert!(!doc.is_attached(span));
}

#[test]
fn computed_style_prefers_inline_and_canonicalizes_colors() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (mut doc, _html, body) = page();
    let button = doc.append_element(body, "button");
    doc.set_attribute(button, "style", "background-color: rgb(59,130,246)");

    assert_eq!(
        doc.computed_style(button, "backgroundColor"),
        "rgb(59, 130, 246)"
    );
    // No inline color declaration: falls back to the UA default.
    assert_eq!(doc.computed_style(button, "color"), "rgb(0, 0, 0)");
    assert_eq!(
        doc.computed_style(button, "background-color"),
        "rgb(59, 130, 246)"
    );
}

#[test]
fn inherited_properties_walk_ancestors() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (mut doc, _html, body) = page();
    doc.set_style_property(body, "color", "#112233");
    let div = doc.append_element(body, "div");
    let span = doc.append_element(div, "span");

    assert_eq!(doc.computed_style(span, "color"), "rgb(17, 34, 51)");
    // Non-inherited property does not leak down.
    doc.set_style_property(body, "background-color", "red");
    assert_eq!(
        doc.computed_style(span, "background-color"),
        "rgba(0, 0, 0, 0)"
    );
}

#[test]
fn style_property_roundtrip_and_removal() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (mut doc, _html, body) = page();
    let div = doc.append_element(body, "div");

    doc.set_style_property(div, "backgroundColor", "red");
    doc.set_style_property(div, "margin", "4px");
    assert_eq!(
        doc.style_property(div, "background-color").as_deref(),
        Some("red")
    );

    doc.remove_style_property(div, "background-color");
    assert_eq!(doc.style_property(div, "background-color"), None);
    assert_eq!(doc.style_property(div, "margin").as_deref(), Some("4px"));

    doc.remove_style_property(div, "margin");
    assert_eq!(doc.attribute(div, "style"), None);
}

#[test]
fn query_selector_walks_in_document_order() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (mut doc, _html, body) = page();
    let nav = doc.append_element(body, "nav");
    let first = doc.append_element(nav, "a");
    doc.set_attribute(first, "class", "link");
    let main = doc.append_element(body, "main");
    let second = doc.append_element(main, "a");
    doc.set_attribute(second, "class", "link");
    doc.set_attribute(second, "data-testid", "primary-link");

    assert_eq!(query_selector(&doc, "a.link"), Some(first));
    assert_eq!(query_selector_all(&doc, "a.link").len(), 2);
    assert_eq!(query_selector(&doc, "main > a"), Some(second));
    assert_eq!(query_selector(&doc, "nav main a"), None);
    assert_eq!(
        query_selector(&doc, r#"[data-testid="primary-link"]"#),
        Some(second)
    );
    assert_eq!(query_selector(&doc, "body a:nth-child(1)"), Some(first));
    // Unparseable selectors resolve to nothing rather than failing.
    assert_eq!(query_selector(&doc, "???"), None);
}

#[test]
fn detached_elements_stop_resolving() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (mut doc, _html, body) = page();
    let div = doc.append_element(body, "div");
    doc.set_attribute(div, "id", "gone");

    assert_eq!(query_selector(&doc, "#gone"), Some(div));
    doc.detach(div);
    assert_eq!(query_selector(&doc, "#gone"), None);
    assert!(!doc.is_attached(div));
    // The node itself is still answerable through its handle.
    assert_eq!(doc.id(div).as_deref(), Some("gone"));
}

#[test]
fn visibility_accounts_for_styles_layout_and_tag() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (mut doc, _html, body) = page();
    let div = doc.append_element(body, "div");
    doc.set_layout_rect(div, Rect::new(0, 0, 100, 40));
    assert!(doc.is_visible(div));

    doc.set_style_property(div, "display", "none");
    assert!(!doc.is_visible(div));
    doc.remove_style_property(div, "display");
    assert!(doc.is_visible(div));

    doc.set_layout_rect(div, Rect::new(0, 0, 1, 1));
    assert!(!doc.is_visible(div));

    let script = doc.append_element(body, "script");
    assert!(!doc.is_visible(script));

    let hidden = doc.append_element(body, "p");
    doc.set_attribute(hidden, "hidden", "");
    assert!(!doc.is_visible(hidden));
}
