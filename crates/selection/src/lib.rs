//! Interactive element picking: hover feedback, click-to-select, selector
//! generation, and context capture. The engine is event-driven and owns no
//! threads; the host feeds it pointer events and periodic ticks with an
//! explicit `Instant`, and every scheduler in here is cancellable so
//! disabling the engine leaves nothing pending.

pub mod highlight;
pub mod pick;
pub mod selector_gen;
pub mod timing;

use std::time::{Duration, Instant};

use dom::{Document, ElementContext, NodeId};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

pub use highlight::{HOVER_OUTLINE, Highlighter, SELECTED_OUTLINE};
pub use pick::find_selectable;
pub use selector_gen::generate_selector;
pub use timing::{Debounce, Throttle};

/// What a click does once an element is picked.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PickPolicy {
    /// One element at a time; a successful pick also exits picking mode.
    SingleSelect,
    /// Clicks accumulate into the selection until the host clears it.
    #[default]
    MultiSelect,
}

#[derive(Debug)]
pub struct SelectionEngine {
    policy: PickPolicy,
    enabled: bool,
    hovered: Option<NodeId>,
    selected: Vec<NodeId>,
    highlighter: Highlighter,
    hover_throttle: Throttle,
    clear_grace: Debounce,
    max_context_text: usize,
}

impl SelectionEngine {
    pub fn new(
        policy: PickPolicy,
        hover_throttle: Duration,
        clear_grace: Duration,
        max_context_text: usize,
    ) -> Self {
        Self {
            policy,
            enabled: false,
            hovered: None,
            selected: Vec::new(),
            highlighter: Highlighter::new(),
            hover_throttle: Throttle::new(hover_throttle),
            clear_grace: Debounce::new(clear_grace),
            max_context_text,
        }
    }

    pub fn policy(&self) -> PickPolicy {
        self.policy
    }

    pub fn is_active(&self) -> bool {
        self.enabled
    }

    pub fn enable(&mut self) {
        if !self.enabled {
            debug!("selection mode on ({:?})", self.policy);
        }
        self.enabled = true;
    }

    /// Leave picking mode. Hover feedback comes off and both schedulers are
    /// cancelled; the selection itself survives so the host can still read
    /// contexts off it.
    pub fn disable(&mut self, doc: &mut Document) {
        if self.enabled {
            debug!("selection mode off");
        }
        self.enabled = false;
        self.unhover(doc);
        self.hover_throttle.cancel();
        self.clear_grace.cancel();
    }

    // ------------------------------------------------------------------
    // Pointer events
    // ------------------------------------------------------------------

    /// Pointer moved over `target`. Throttled; at most one hover resolution
    /// per window regardless of event rate.
    pub fn pointer_moved(&mut self, doc: &mut Document, target: NodeId, now: Instant) {
        if !self.enabled {
            return;
        }
        // A pending unhover is cancelled by any re-entry, including moves
        // the throttle swallows.
        self.clear_grace.cancel();
        if !self.hover_throttle.allow_at(now) {
            return;
        }
        let candidate = find_selectable(doc, target);
        if Some(candidate) == self.hovered {
            return;
        }
        self.unhover(doc);
        if !doc.is_element(candidate) {
            return;
        }
        trace!("hover {:?}", candidate);
        if !self.selected.contains(&candidate) {
            self.highlighter.apply(doc, candidate, HOVER_OUTLINE);
        }
        self.hovered = Some(candidate);
    }

    /// Pointer left the document. The hover highlight comes off after a
    /// grace delay so brief exits (scrollbars, devtools) don't flicker.
    pub fn pointer_left(&mut self, now: Instant) {
        if self.enabled && self.hovered.is_some() {
            self.clear_grace.arm_at(now);
        }
    }

    /// Periodic host tick; fires the pending unhover once its grace delay
    /// has passed.
    pub fn tick(&mut self, doc: &mut Document, now: Instant) {
        if self.clear_grace.fire_ready(now) {
            self.unhover(doc);
        }
    }

    /// Click on `target`. Resolves to the edit-worthy element, adds it to
    /// the selection, and returns it; `None` when picking is off or the
    /// resolved node is not an element.
    pub fn clicked(&mut self, doc: &mut Document, target: NodeId) -> Option<NodeId> {
        if !self.enabled {
            return None;
        }
        let candidate = find_selectable(doc, target);
        if !doc.is_element(candidate) {
            return None;
        }
        self.clear_grace.cancel();
        if self.hovered == Some(candidate) {
            self.hovered = None;
        }
        if self.policy == PickPolicy::SingleSelect {
            self.clear_selection(doc);
        }
        if !self.selected.contains(&candidate) {
            self.selected.push(candidate);
        }
        self.highlighter.apply(doc, candidate, SELECTED_OUTLINE);
        debug!("selected {:?} ({} total)", candidate, self.selected.len());
        if self.policy == PickPolicy::SingleSelect {
            self.disable(doc);
        }
        Some(candidate)
    }

    // ------------------------------------------------------------------
    // Selection access
    // ------------------------------------------------------------------

    pub fn selected(&self) -> &[NodeId] {
        &self.selected
    }

    /// Drop the selection entry at `index`, restoring its outline.
    pub fn remove_selected(&mut self, doc: &mut Document, index: usize) -> Option<NodeId> {
        if index >= self.selected.len() {
            return None;
        }
        let node = self.selected.remove(index);
        self.highlighter.remove(doc, node);
        Some(node)
    }

    pub fn clear_selection(&mut self, doc: &mut Document) {
        for node in std::mem::take(&mut self.selected) {
            if doc.is_attached(node) {
                self.highlighter.remove(doc, node);
            }
        }
    }

    /// Drop selection entries whose elements are no longer attached.
    pub fn sweep_detached(&mut self, doc: &Document) {
        self.selected.retain(|node| doc.is_attached(*node));
        if let Some(hovered) = self.hovered
            && !doc.is_attached(hovered)
        {
            self.hovered = None;
        }
    }

    /// Selector plus snapshot for `node`, as sent to the command resolver.
    pub fn get_context(&self, doc: &Document, node: NodeId) -> Option<ElementContext> {
        if !doc.is_attached(node) {
            return None;
        }
        let selector = generate_selector(doc, node);
        ElementContext::capture(doc, node, &selector, self.max_context_text)
    }

    /// Remove every highlight still on the page, then forget all state.
    /// For navigation, where elements may survive a route change and must
    /// not keep engine-written outlines.
    pub fn teardown(&mut self, doc: &mut Document) {
        self.clear_selection(doc);
        self.hovered = None;
        self.highlighter.clear(doc);
        self.reset();
    }

    /// Forget everything without touching the document. For teardown paths
    /// where the old tree is already gone.
    pub fn reset(&mut self) {
        self.enabled = false;
        self.hovered = None;
        self.selected.clear();
        self.highlighter.reset();
        self.hover_throttle.cancel();
        self.clear_grace.cancel();
    }

    fn unhover(&mut self, doc: &mut Document) {
        if let Some(node) = self.hovered.take()
            && !self.selected.contains(&node)
            && doc.is_attached(node)
        {
            self.highlighter.remove(doc, node);
        }
    }
}
