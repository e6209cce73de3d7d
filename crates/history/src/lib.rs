//! History Engine: bounded undo/redo stacks of edit records. Every re-entry
//! into the DOM re-resolves the selector (with id/class fallbacks) instead
//! of trusting a cached handle, because the host page may have re-rendered
//! or removed the element since the edit was recorded.

pub mod action;
pub mod integrity;
pub mod resolve;

pub use action::EditAction;
pub use integrity::{IntegrityIssue, RepairReport, StackKind};
pub use resolve::resolve_element;

use dom::Document;
use log::{debug, info, warn};
use mutation::MutationEngine;
use serde::Serialize;

/// Cap on each stack; pushing past it evicts the oldest entry.
pub const MAX_HISTORY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HistoryCounts {
    pub undo: usize,
    pub redo: usize,
}

#[derive(Debug, Default)]
pub struct HistoryEngine {
    undo_stack: Vec<EditAction>,
    redo_stack: Vec<EditAction>,
    max_history: usize,
}

impl HistoryEngine {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }

    pub fn with_capacity(max_history: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_history: max_history.max(1),
        }
    }

    /// Record a new edit. Any redo history is invalidated: a new edit starts
    /// a new branch.
    pub fn add_edit(&mut self, action: EditAction) {
        debug!("history: add edit #{} ({})", action.id, action.label);
        self.undo_stack.push(action);
        self.redo_stack.clear();
        if self.undo_stack.len() > self.max_history {
            self.undo_stack.remove(0);
        }
    }

    /// Undo the most recent edit. Returns false when there is nothing to
    /// undo, the top entry is pinned non-undoable, or its element has left
    /// the document (in which case the entry is dropped as unrecoverable and
    /// both stacks are swept for other stale entries).
    pub fn undo(&mut self, doc: &mut Document, mutations: &mut MutationEngine) -> bool {
        let Some(mut action) = self.undo_stack.pop() else {
            return false;
        };
        if !action.undoable {
            debug!("history: edit #{} is not undoable", action.id);
            self.undo_stack.push(action);
            return false;
        }
        let Some(node) = resolve_element(doc, action.mutation.selector()) else {
            warn!(
                "history: `{}` no longer resolves, dropping edit #{}",
                action.mutation.selector(),
                action.id
            );
            self.sweep_stale(doc);
            return false;
        };
        // Capture the post-apply value before reverting so redo stays
        // symmetric even if the host page changed the element meanwhile.
        let current = mutations.current_value_on(doc, node, &action.mutation);
        mutations.revert_on(doc, node, &action.mutation);
        action.mutation.set_previous(Some(current));
        self.redo_stack.push(action);
        if self.redo_stack.len() > self.max_history {
            self.redo_stack.remove(0);
        }
        true
    }

    /// Re-apply the most recently undone edit. Re-adds through the normal
    /// [`Self::add_edit`] path, which clears any newer redo entries.
    pub fn redo(&mut self, doc: &mut Document, mutations: &mut MutationEngine) -> bool {
        let Some(mut action) = self.redo_stack.pop() else {
            return false;
        };
        let Some(node) = resolve_element(doc, action.mutation.selector()) else {
            warn!(
                "history: `{}` no longer resolves, dropping redo #{}",
                action.mutation.selector(),
                action.id
            );
            self.sweep_stale(doc);
            return false;
        };
        if let Err(error) = mutations.apply_to(doc, node, &mut action.mutation) {
            // A refusal (e.g. the target became protected) may be transient;
            // keep the entry so a later retry is possible. Stale targets
            // were already handled above.
            warn!("history: redo #{} failed: {error}", action.id);
            self.redo_stack.push(action);
            return false;
        }
        self.add_edit(action);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn counts(&self) -> HistoryCounts {
        HistoryCounts {
            undo: self.undo_stack.len(),
            redo: self.redo_stack.len(),
        }
    }

    /// Label of the edit `undo()` would revert next, if any.
    pub fn last_edit_label(&self) -> Option<&str> {
        self.undo_stack.last().map(|action| action.label.as_str())
    }

    pub fn undo_entries(&self) -> &[EditAction] {
        &self.undo_stack
    }

    pub fn redo_entries(&self) -> &[EditAction] {
        &self.redo_stack
    }

    pub fn clear(&mut self) {
        if self.can_undo() || self.can_redo() {
            debug!(
                "history: clearing {} undo / {} redo entries",
                self.undo_stack.len(),
                self.redo_stack.len()
            );
        }
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Drop every entry whose selector no longer resolves.
    pub fn sweep_stale(&mut self, doc: &Document) -> usize {
        let before = self.undo_stack.len() + self.redo_stack.len();
        self.undo_stack
            .retain(|action| resolve_element(doc, action.mutation.selector()).is_some());
        self.redo_stack
            .retain(|action| resolve_element(doc, action.mutation.selector()).is_some());
        let dropped = before - self.undo_stack.len() - self.redo_stack.len();
        if dropped > 0 {
            info!("history: swept {dropped} stale entr(y/ies)");
        }
        dropped
    }

    /// Check the invariants this engine promises: unique action ids,
    /// resolvable selectors, bounded stacks, chronological ordering.
    pub fn validate(&self, doc: &Document) -> Vec<IntegrityIssue> {
        integrity::validate(
            doc,
            &self.undo_stack,
            &self.redo_stack,
            self.max_history,
        )
    }

    /// Restore the invariants [`Self::validate`] checks. Safe to run at any
    /// time; running it twice is a no-op the second time.
    pub fn repair(&mut self, doc: &Document) -> RepairReport {
        integrity::repair(
            doc,
            &mut self.undo_stack,
            &mut self.redo_stack,
            self.max_history,
        )
    }
}
