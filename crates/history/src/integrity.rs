//! Integrity checking and repair for the history stacks. Selector
//! resolution is best-effort against a DOM this engine does not own, so the
//! stacks can rot; `repair` is the idempotent cleanup both engines and
//! embedders may run at any time.

use crate::action::EditAction;
use crate::resolve::resolve_element;
use dom::Document;
use log::info;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StackKind {
    Undo,
    Redo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum IntegrityIssue {
    DuplicateId { id: u64 },
    Unresolvable { stack: StackKind, id: u64, selector: String },
    Oversized { stack: StackKind, len: usize, max: usize },
    OutOfOrder { stack: StackKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RepairReport {
    pub dropped_unresolvable: usize,
    pub dropped_duplicates: usize,
    pub truncated: usize,
    pub reordered: bool,
}

impl RepairReport {
    pub fn changed_anything(&self) -> bool {
        self.dropped_unresolvable > 0
            || self.dropped_duplicates > 0
            || self.truncated > 0
            || self.reordered
    }
}

pub fn validate(
    doc: &Document,
    undo_stack: &[EditAction],
    redo_stack: &[EditAction],
    max_history: usize,
) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    for action in undo_stack.iter().chain(redo_stack.iter()) {
        if !seen.insert(action.id) {
            issues.push(IntegrityIssue::DuplicateId { id: action.id });
        }
    }
    for (kind, stack) in [(StackKind::Undo, undo_stack), (StackKind::Redo, redo_stack)] {
        for action in stack {
            if resolve_element(doc, action.mutation.selector()).is_none() {
                issues.push(IntegrityIssue::Unresolvable {
                    stack: kind,
                    id: action.id,
                    selector: action.mutation.selector().to_owned(),
                });
            }
        }
        if stack.len() > max_history {
            issues.push(IntegrityIssue::Oversized {
                stack: kind,
                len: stack.len(),
                max: max_history,
            });
        }
        if stack
            .windows(2)
            .any(|pair| pair[0].timestamp_ms > pair[1].timestamp_ms)
        {
            issues.push(IntegrityIssue::OutOfOrder { stack: kind });
        }
    }
    issues
}

pub fn repair(
    doc: &Document,
    undo_stack: &mut Vec<EditAction>,
    redo_stack: &mut Vec<EditAction>,
    max_history: usize,
) -> RepairReport {
    let mut report = RepairReport::default();
    let mut seen: HashSet<u64> = HashSet::new();
    for stack in [&mut *undo_stack, &mut *redo_stack] {
        let before = stack.len();
        stack.retain(|action| resolve_element(doc, action.mutation.selector()).is_some());
        report.dropped_unresolvable += before - stack.len();

        let before = stack.len();
        stack.retain(|action| seen.insert(action.id));
        report.dropped_duplicates += before - stack.len();

        if stack
            .windows(2)
            .any(|pair| pair[0].timestamp_ms > pair[1].timestamp_ms)
        {
            stack.sort_by_key(|action| action.timestamp_ms);
            report.reordered = true;
        }

        // Keep the most recent entries when truncating.
        if stack.len() > max_history {
            let excess = stack.len() - max_history;
            stack.drain(0..excess);
            report.truncated += excess;
        }
    }
    if report.changed_anything() {
        info!(
            "history repair: dropped {} unresolvable, {} duplicate(s), truncated {}, reordered: {}",
            report.dropped_unresolvable,
            report.dropped_duplicates,
            report.truncated,
            report.reordered
        );
    }
    report
}
