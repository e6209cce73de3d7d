use dom::ElementContext;
use mutation::DomMutation;
use serde::Serialize;

/// One recorded edit. Created by the orchestrator after a successful apply
/// and owned by the history engine from then on. Immutable except for
/// `mutation.previous`, which undo rewrites to keep redo symmetric.
#[derive(Debug, Clone, Serialize)]
pub struct EditAction {
    pub id: u64,
    /// Short human-readable description, e.g. for a history panel.
    pub label: String,
    /// Snapshot of the element at command-send time.
    pub element: ElementContext,
    pub mutation: DomMutation,
    /// Unix millis at creation; the stacks stay ordered by this.
    pub timestamp_ms: u64,
    /// Pinned entries (e.g. edits the host marked permanent) are skipped by
    /// undo.
    pub undoable: bool,
}

impl EditAction {
    pub fn new(id: u64, element: ElementContext, mutation: DomMutation, timestamp_ms: u64) -> Self {
        Self {
            id,
            label: mutation.describe(),
            element,
            mutation,
            timestamp_ms,
            undoable: true,
        }
    }
}
