//! The original-value side table: a map from element identity to the
//! first-seen value of everything the engine has touched on it. Presence in
//! the table doubles as the "modified" marker, and the table is the sole
//! source of truth for reverts; `DomMutation::previous` is only a fallback
//! when the record is gone (e.g. after a navigation sweep).
//!
//! Nothing here is ever written onto the page's elements, so the host page
//! can never observe or clobber it.

use dom::NodeId;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// First-seen state of one style property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleOriginal {
    /// The inline declaration at first touch, `None` when the element had no
    /// inline override (revert then removes the override instead of writing
    /// a literal value).
    pub inline: Option<String>,
    /// The computed value at first touch; stamped into
    /// `DomMutation::previous` and used for redo symmetry.
    pub computed: String,
}

/// Everything captured for one element.
#[derive(Debug, Clone, Default)]
pub struct OriginalRecord {
    pub styles: HashMap<String, StyleOriginal>,
    /// First-seen attribute values; `None` means the attribute was absent.
    pub attributes: HashMap<String, Option<String>>,
    /// First-seen text content, captured once before the first content edit.
    pub content: Option<String>,
    /// Unix-millis timestamp of the first edit that touched this element.
    pub first_modified_ms: u64,
}

#[derive(Debug, Default)]
pub struct OriginalValues {
    records: HashMap<NodeId, OriginalRecord>,
}

impl OriginalValues {
    pub fn new() -> Self {
        Self::default()
    }

    fn record_for(&mut self, node: NodeId) -> &mut OriginalRecord {
        self.records.entry(node).or_insert_with(|| OriginalRecord {
            first_modified_ms: now_ms(),
            ..OriginalRecord::default()
        })
    }

    /// Capture the original for a style property; first write wins. Returns
    /// the stored original.
    pub fn record_style(
        &mut self,
        node: NodeId,
        property: &str,
        original: StyleOriginal,
    ) -> StyleOriginal {
        self.record_for(node)
            .styles
            .entry(property.to_owned())
            .or_insert(original)
            .clone()
    }

    pub fn record_attribute(
        &mut self,
        node: NodeId,
        name: &str,
        original: Option<String>,
    ) -> Option<String> {
        self.record_for(node)
            .attributes
            .entry(name.to_owned())
            .or_insert(original)
            .clone()
    }

    pub fn record_content(&mut self, node: NodeId, original: String) -> String {
        let record = self.record_for(node);
        record.content.get_or_insert(original).clone()
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&StyleOriginal> {
        self.records.get(&node)?.styles.get(property)
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&Option<String>> {
        self.records.get(&node)?.attributes.get(name)
    }

    pub fn content(&self, node: NodeId) -> Option<&str> {
        self.records.get(&node)?.content.as_deref()
    }

    pub fn is_modified(&self, node: NodeId) -> bool {
        self.records.contains_key(&node)
    }

    pub fn first_modified_ms(&self, node: NodeId) -> Option<u64> {
        self.records.get(&node).map(|record| record.first_modified_ms)
    }

    pub fn modified_nodes(&self) -> Vec<NodeId> {
        self.records.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drain every record, e.g. for restore-all.
    pub fn take_all(&mut self) -> Vec<(NodeId, OriginalRecord)> {
        self.records.drain().collect()
    }

    /// Drop every record without reverting anything (navigation sweep).
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
