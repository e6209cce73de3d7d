use std::collections::VecDeque;
use std::time::{Duration, Instant};

use dom::{Document, NodeId, Rect};
use editor::{
    CommandRequest, CommandResolver, EditorConfig, EditorSession, KeyMods, ResolveError,
    SessionError, Severity,
};
use mutation::DomMutation;
use selection::PickPolicy;

/// Replays canned responses, optionally after a fixed delay.
struct ScriptedResolver {
    responses: VecDeque<Result<DomMutation, ResolveError>>,
    delay: Option<Duration>,
}

impl ScriptedResolver {
    fn returning(responses: Vec<Result<DomMutation, ResolveError>>) -> Box<Self> {
        Box::new(Self {
            responses: responses.into(),
            delay: None,
        })
    }
}

impl CommandResolver for ScriptedResolver {
    fn resolve(&mut self, _request: &CommandRequest) -> Result<DomMutation, ResolveError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.responses
            .pop_front()
            .unwrap_or_else(|| Err(ResolveError::Rejected("out of scripted responses".into())))
    }
}

fn page() -> (Document, NodeId) {
    let mut doc = Document::new("https://example.test/");
    let html = doc.append_element(doc.root(), "html");
    let body = doc.append_element(html, "body");
    let button = doc.append_element(body, "button");
    doc.set_attribute(button, "id", "cta");
    doc.set_attribute(button, "style", "background-color: rgb(59,130,246)");
    doc.set_layout_rect(button, Rect::new(0, 0, 120, 40));
    doc.append_text(button, "Sign up");
    (doc, button)
}

fn session_with(
    doc: &Document,
    responses: Vec<Result<DomMutation, ResolveError>>,
) -> EditorSession {
    let _ = env_logger::builder().is_test(true).try_init();
    EditorSession::new(
        EditorConfig::default(),
        ScriptedResolver::returning(responses),
        doc,
    )
}

#[test]
fn command_flow_from_pick_to_undo() {
    let (mut doc, button) = page();
    let mut session = session_with(
        &doc,
        vec![Ok(DomMutation::style("#cta", "backgroundColor", "red"))],
    );

    session.start_picking();
    assert_eq!(session.clicked(&mut doc, button), Some(button));

    let outcome = session.run_command(&mut doc, "make it red").unwrap();
    assert_eq!(outcome.action_id, 1);
    assert_eq!(outcome.selector, "#cta");
    assert!(!outcome.downgraded_to_text);
    assert_eq!(
        doc.style_property(button, "background-color").as_deref(),
        Some("red")
    );
    assert_eq!(session.history_counts().undo, 1);
    assert!(session.is_modified(button));

    assert!(session.undo(&mut doc));
    assert_eq!(
        doc.computed_style(button, "background-color"),
        "rgb(59, 130, 246)"
    );
    assert!(session.redo(&mut doc));
    assert_eq!(
        doc.style_property(button, "background-color").as_deref(),
        Some("red")
    );
}

#[test]
fn command_without_a_selection_is_refused() {
    let (mut doc, _button) = page();
    let mut session = session_with(
        &doc,
        vec![Ok(DomMutation::style("#cta", "color", "red"))],
    );

    let error = session.run_command(&mut doc, "make it red").unwrap_err();
    assert!(matches!(error, SessionError::NoSelection));
    assert_eq!(error.notice().severity, Severity::Soft);
    assert_eq!(session.history_counts().undo, 0);
}

#[test]
fn resolver_rejection_leaves_the_document_untouched() {
    let (mut doc, button) = page();
    let mut session = session_with(
        &doc,
        vec![Err(ResolveError::Rejected("ambiguous command".into()))],
    );
    session.start_picking();
    session.clicked(&mut doc, button);

    let error = session.run_command(&mut doc, "do something vague").unwrap_err();
    assert!(matches!(
        error,
        SessionError::Resolve(ResolveError::Rejected(_))
    ));
    assert_eq!(error.notice().severity, Severity::Blocking);
    assert_eq!(session.history_counts().undo, 0);
    assert_eq!(session.modified_count(), 0);
}

#[test]
fn overrunning_the_deadline_discards_the_result() {
    let (mut doc, button) = page();
    let _ = env_logger::builder().is_test(true).try_init();
    let mut resolver =
        ScriptedResolver::returning(vec![Ok(DomMutation::style("#cta", "color", "red"))]);
    resolver.delay = Some(Duration::from_millis(10));
    let config = EditorConfig::new(PickPolicy::MultiSelect, 50, 150, 200, 250, 1, 200);
    let mut session = EditorSession::new(config, resolver, &doc);
    session.start_picking();
    session.clicked(&mut doc, button);

    let error = session.run_command(&mut doc, "make it red").unwrap_err();
    assert!(matches!(
        error,
        SessionError::Resolve(ResolveError::Timeout { .. })
    ));
    assert!(doc.style_property(button, "color").is_none());
    assert_eq!(session.history_counts().undo, 0);
}

#[test]
fn protected_targets_are_refused_at_the_gate() {
    let (mut doc, button) = page();
    let mut session = session_with(
        &doc,
        vec![Ok(DomMutation::style("body", "display", "none"))],
    );
    session.start_picking();
    session.clicked(&mut doc, button);

    let error = session.run_command(&mut doc, "hide the page").unwrap_err();
    assert!(matches!(error, SessionError::Mutation(_)));
    assert_eq!(error.notice().severity, Severity::Blocking);
    assert_eq!(session.history_counts().undo, 0);
}

#[test]
fn unsafe_markup_is_downgraded_and_reported() {
    let (mut doc, button) = page();
    let mut session = session_with(
        &doc,
        vec![Ok(DomMutation::text(
            "#cta",
            "<script>alert(1)</script>Buy now",
        ))],
    );
    session.start_picking();
    session.clicked(&mut doc, button);

    let outcome = session.run_command(&mut doc, "change the label").unwrap();
    assert!(outcome.downgraded_to_text);
    assert_eq!(doc.text_content(button), "<script>alert(1)</script>Buy now");
}

#[test]
fn navigation_resets_selection_markers_and_history() {
    let (mut doc, button) = page();
    let mut session = session_with(
        &doc,
        vec![Ok(DomMutation::style("#cta", "color", "red"))],
    );
    session.start_picking();
    session.clicked(&mut doc, button);
    session.run_command(&mut doc, "make it red").unwrap();
    assert_eq!(session.history_counts().undo, 1);

    doc.set_url("https://example.test/next");
    session.tick(&mut doc, Instant::now());

    assert!(session.selected().is_empty());
    assert!(!session.is_picking());
    assert_eq!(session.history_counts().undo, 0);
    assert_eq!(session.modified_count(), 0);
}

#[test]
fn navigation_removes_highlights_from_surviving_elements() {
    let (mut doc, button) = page();
    let mut session = session_with(&doc, vec![]);
    session.start_picking();
    session.clicked(&mut doc, button);
    assert_eq!(
        doc.style_property(button, "outline").as_deref(),
        Some(selection::SELECTED_OUTLINE)
    );

    // An SPA route change: the URL moves on but the tree survives.
    doc.set_url("https://example.test/spa-route");
    session.tick(&mut doc, Instant::now());

    assert!(doc.style_property(button, "outline").is_none());
    assert!(doc.style_property(button, "outline-offset").is_none());
    assert!(session.selected().is_empty());
}

#[test]
fn recorded_snapshot_reflects_the_pre_edit_element() {
    let (mut doc, button) = page();
    let mut session = session_with(
        &doc,
        vec![Ok(DomMutation::style("#cta", "backgroundColor", "red"))],
    );
    session.start_picking();
    session.clicked(&mut doc, button);
    session.run_command(&mut doc, "make it red").unwrap();

    // The history entry describes the element as the resolver saw it, not
    // the post-edit state.
    let entry = &session.undo_entries()[0];
    assert_eq!(
        entry.element.styles.get("background-color").map(String::as_str),
        Some("rgb(59, 130, 246)")
    );

    // Same for host-supplied mutations that skip command resolution.
    session
        .apply_mutation(&mut doc, DomMutation::text("#cta", "Buy now"))
        .unwrap();
    let entry = session.undo_entries().last().unwrap();
    assert_eq!(entry.element.text.as_deref(), Some("Sign up"));
    assert_eq!(doc.text_content(button), "Buy now");
}

#[test]
fn restore_all_reverts_every_tracked_edit() {
    let (mut doc, button) = page();
    let body = doc.parent(button).unwrap();
    let heading = doc.append_element(body, "h1");
    doc.set_attribute(heading, "id", "title");
    doc.append_text(heading, "Hello");

    let mut session = session_with(&doc, vec![]);
    session
        .apply_mutation(&mut doc, DomMutation::style("#cta", "color", "red"))
        .unwrap();
    session
        .apply_mutation(&mut doc, DomMutation::text("#title", "Goodbye"))
        .unwrap();
    session
        .apply_mutation(
            &mut doc,
            DomMutation::attribute("#title", "data-x", "1"),
        )
        .unwrap();

    assert_eq!(session.restore_all(&mut doc), 2);
    assert!(doc.style_property(button, "color").is_none());
    assert_eq!(doc.text_content(heading), "Hello");
    assert!(doc.attribute(heading, "data-x").is_none());
    assert_eq!(session.history_counts().undo, 0);
    assert_eq!(session.modified_count(), 0);
}

#[test]
fn keyboard_shortcuts_drive_undo_redo_and_exit() {
    let (mut doc, button) = page();
    let mut session = session_with(&doc, vec![]);
    session
        .apply_mutation(&mut doc, DomMutation::style("#cta", "color", "red"))
        .unwrap();

    let ctrl = KeyMods {
        ctrl: true,
        ..KeyMods::default()
    };
    assert!(session.key_down(&mut doc, "z", ctrl));
    assert!(doc.style_property(button, "color").is_none());

    assert!(session.key_down(
        &mut doc,
        "Z",
        KeyMods {
            shift: true,
            ..ctrl
        }
    ));
    assert_eq!(doc.style_property(button, "color").as_deref(), Some("red"));

    session.start_picking();
    assert!(session.key_down(&mut doc, "Escape", KeyMods::default()));
    assert!(!session.is_picking());
    // Escape with picking already off is not consumed.
    assert!(!session.key_down(&mut doc, "Escape", KeyMods::default()));
}

#[test]
fn resize_sweeps_detached_selection_entries_after_settling() {
    let (mut doc, button) = page();
    let body = doc.parent(button).unwrap();
    let heading = doc.append_element(body, "h1");
    let mut session = session_with(&doc, vec![]);
    session.start_picking();
    session.clicked(&mut doc, button);
    session.clicked(&mut doc, heading);

    let start = Instant::now();
    session.viewport_resized(start);
    doc.detach(heading);

    session.tick(&mut doc, start + Duration::from_millis(10));
    assert_eq!(session.selected().len(), 2);

    session.tick(&mut doc, start + Duration::from_millis(500));
    assert_eq!(session.selected(), &[button]);
}
