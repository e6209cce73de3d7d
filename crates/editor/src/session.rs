//! The session ties the engines together: picking feeds contexts to the
//! command resolver, resolved mutations go through the mutation engine, and
//! every applied edit lands in history. The session owns all engine state;
//! the host owns the document and passes it into every call.

use std::time::Instant;

use dom::{Document, ElementContext, NodeId};
use history::{EditAction, HistoryCounts, HistoryEngine, IntegrityIssue, RepairReport};
use log::{debug, info, warn};
use mutation::{DomMutation, MutationEngine, MutationError, now_ms};
use selection::{Debounce, SelectionEngine};
use serde::Serialize;
use thiserror::Error;

use crate::config::EditorConfig;
use crate::events::{KeyMods, Shortcut, shortcut_for};
use crate::resolver::{CommandRequest, CommandResolver, ResolveError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a command is already in flight")]
    Busy,
    #[error("no element is selected")]
    NoSelection,
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Mutation(#[from] MutationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Transient; the user can simply try again.
    Soft,
    /// The request was refused outright and retrying as-is will not help.
    Blocking,
}

/// User-facing failure report, consumed by the UI layer.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl SessionError {
    pub fn notice(&self) -> Notice {
        let severity = match self {
            Self::Mutation(
                MutationError::ProtectedElement(_) | MutationError::UnsafeContent(_),
            ) => Severity::Blocking,
            Self::Resolve(ResolveError::Rejected(_)) => Severity::Blocking,
            _ => Severity::Soft,
        };
        Notice {
            severity,
            message: self.to_string(),
        }
    }
}

/// What the host gets back from a successful command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutcome {
    pub action_id: u64,
    pub selector: String,
    pub description: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub downgraded_to_text: bool,
}

pub struct EditorSession {
    config: EditorConfig,
    selection: SelectionEngine,
    mutations: MutationEngine,
    history: HistoryEngine,
    resolver: Box<dyn CommandResolver>,
    resize_settle: Debounce,
    busy: bool,
    next_action_id: u64,
    last_url: String,
}

impl EditorSession {
    pub fn new(config: EditorConfig, resolver: Box<dyn CommandResolver>, doc: &Document) -> Self {
        let selection = SelectionEngine::new(
            config.pick_policy,
            config.hover_throttle(),
            config.mouseout_grace(),
            config.max_context_text,
        );
        let resize_settle = Debounce::new(config.resize_debounce());
        let history = HistoryEngine::with_capacity(config.max_history);
        Self {
            config,
            selection,
            mutations: MutationEngine::new(),
            history,
            resolver,
            resize_settle,
            busy: false,
            next_action_id: 1,
            last_url: doc.url().to_owned(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Picking
    // ------------------------------------------------------------------

    pub fn start_picking(&mut self) {
        self.selection.enable();
    }

    pub fn stop_picking(&mut self, doc: &mut Document) {
        self.selection.disable(doc);
    }

    pub fn is_picking(&self) -> bool {
        self.selection.is_active()
    }

    pub fn pointer_moved(&mut self, doc: &mut Document, target: NodeId, now: Instant) {
        self.selection.pointer_moved(doc, target, now);
    }

    pub fn pointer_left(&mut self, now: Instant) {
        self.selection.pointer_left(now);
    }

    pub fn clicked(&mut self, doc: &mut Document, target: NodeId) -> Option<NodeId> {
        self.selection.clicked(doc, target)
    }

    pub fn selected(&self) -> &[NodeId] {
        self.selection.selected()
    }

    pub fn remove_selected(&mut self, doc: &mut Document, index: usize) -> Option<NodeId> {
        self.selection.remove_selected(doc, index)
    }

    pub fn clear_selection(&mut self, doc: &mut Document) {
        self.selection.clear_selection(doc);
    }

    /// Context snapshot for the most recent selection entry, as a command
    /// would see it.
    pub fn selected_context(&self, doc: &Document) -> Option<ElementContext> {
        let node = self.selection.selected().last().copied()?;
        self.selection.get_context(doc, node)
    }

    pub fn viewport_resized(&mut self, now: Instant) {
        self.resize_settle.arm_at(now);
    }

    /// Periodic host tick: detects navigation, fires pending delays, and
    /// sweeps selection entries whose elements were removed by a resize
    /// re-render once the resize settles.
    pub fn tick(&mut self, doc: &mut Document, now: Instant) {
        if doc.url() != self.last_url {
            self.handle_navigation(doc);
        }
        self.selection.tick(doc, now);
        if self.resize_settle.fire_ready(now) {
            self.selection.sweep_detached(doc);
        }
    }

    /// The host replaced the page. Edit state is forgotten wholesale: the
    /// old markers and history entries are meaningless against the new
    /// route. Elements that survive the route change (SPA navigations keep
    /// most of the tree) get their highlight outlines removed first.
    pub fn notify_navigation(&mut self, doc: &mut Document) {
        self.handle_navigation(doc);
    }

    fn handle_navigation(&mut self, doc: &mut Document) {
        info!("navigation to {}, resetting session state", doc.url());
        self.last_url = doc.url().to_owned();
        self.selection.teardown(doc);
        self.resize_settle.cancel();
        self.mutations.sweep_markers();
        self.history.clear();
        self.busy = false;
    }

    /// Dispatch a keydown. Returns true when the key was consumed.
    pub fn key_down(&mut self, doc: &mut Document, key: &str, mods: KeyMods) -> bool {
        match shortcut_for(key, mods) {
            Some(Shortcut::Undo) => {
                self.undo(doc);
                true
            }
            Some(Shortcut::Redo) => {
                self.redo(doc);
                true
            }
            Some(Shortcut::ExitPicking) => {
                let was_picking = self.is_picking();
                self.stop_picking(doc);
                was_picking
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Commands and edits
    // ------------------------------------------------------------------

    /// Run a natural-language command against the most recent selection.
    /// One command at a time; a second call while one is resolving gets
    /// [`SessionError::Busy`].
    pub fn run_command(
        &mut self,
        doc: &mut Document,
        command: &str,
    ) -> Result<CommandOutcome, SessionError> {
        if self.busy {
            return Err(SessionError::Busy);
        }
        self.busy = true;
        let result = self.run_command_inner(doc, command);
        self.busy = false;
        result
    }

    fn run_command_inner(
        &mut self,
        doc: &mut Document,
        command: &str,
    ) -> Result<CommandOutcome, SessionError> {
        let context = self
            .selected_context(doc)
            .ok_or(SessionError::NoSelection)?;
        let request = CommandRequest {
            command: command.to_owned(),
            context: context.clone(),
            page_url: doc.url().to_owned(),
            timeout: self.config.command_timeout(),
        };
        debug!("resolving command {command:?} against `{}`", request.context.selector);
        let started = Instant::now();
        let mutation = self.resolver.resolve(&request)?;
        let elapsed = started.elapsed();
        if elapsed > self.config.command_timeout() {
            warn!("command {command:?} overran its deadline, discarding result");
            return Err(ResolveError::Timeout {
                elapsed_ms: elapsed.as_millis() as u64,
            }
            .into());
        }
        self.apply_recorded(doc, mutation, context)
    }

    /// Validate, apply, and record one host-supplied mutation that skipped
    /// command resolution. The history snapshot is captured before the
    /// write, matching what a resolver would have seen.
    pub fn apply_mutation(
        &mut self,
        doc: &mut Document,
        mutation: DomMutation,
    ) -> Result<CommandOutcome, SessionError> {
        let node = self.mutations.validate(doc, &mutation)?;
        let context = ElementContext::capture(
            doc,
            node,
            mutation.selector(),
            self.config.max_context_text,
        )
        .ok_or_else(|| MutationError::TargetNotFound(mutation.selector().to_owned()))?;
        self.apply_recorded(doc, mutation, context)
    }

    /// Apply and push to history, with `context` the pre-apply snapshot of
    /// the target element.
    fn apply_recorded(
        &mut self,
        doc: &mut Document,
        mut mutation: DomMutation,
        context: ElementContext,
    ) -> Result<CommandOutcome, SessionError> {
        let outcome = self.mutations.apply(doc, &mut mutation)?;
        let selector = mutation.selector().to_owned();
        let description = mutation.describe();
        let action_id = self.next_action_id;
        self.next_action_id += 1;
        self.history
            .add_edit(EditAction::new(action_id, context, mutation, now_ms()));
        Ok(CommandOutcome {
            action_id,
            selector,
            description,
            downgraded_to_text: outcome.downgraded_to_text,
        })
    }

    pub fn undo(&mut self, doc: &mut Document) -> bool {
        self.history.undo(doc, &mut self.mutations)
    }

    pub fn redo(&mut self, doc: &mut Document) -> bool {
        self.history.redo(doc, &mut self.mutations)
    }

    pub fn history_counts(&self) -> HistoryCounts {
        self.history.counts()
    }

    pub fn last_edit_label(&self) -> Option<&str> {
        self.history.last_edit_label()
    }

    pub fn undo_entries(&self) -> &[EditAction] {
        self.history.undo_entries()
    }

    pub fn validate_history(&self, doc: &Document) -> Vec<IntegrityIssue> {
        self.history.validate(doc)
    }

    pub fn repair_history(&mut self, doc: &Document) -> RepairReport {
        self.history.repair(doc)
    }

    /// Revert every tracked edit and clear all session edit state.
    pub fn restore_all(&mut self, doc: &mut Document) -> usize {
        let restored = self.mutations.restore_all(doc);
        self.history.clear();
        restored
    }

    pub fn modified_count(&self) -> usize {
        self.mutations.modified_count()
    }

    pub fn is_modified(&self, node: NodeId) -> bool {
        self.mutations.is_modified(node)
    }
}
