use crate::error::MutationError;
use crate::mutation::DomMutation;
use crate::original::{OriginalValues, StyleOriginal};
use crate::validate::{unsafe_markup, validate_resolved, validate_target};
use dom::{Document, NodeId, query_selector};
use log::{debug, info, warn};

/// Result of a successful apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub node: NodeId,
    /// True when a plain content mutation carried unsafe markup and was
    /// assigned as text instead of being dropped.
    pub downgraded_to_text: bool,
}

/// Applies and reverts typed edits against a live document. Owns the
/// original-value side table; nothing else writes to it.
#[derive(Debug, Default)]
pub struct MutationEngine {
    originals: OriginalValues,
}

impl MutationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and apply one mutation. On first touch of an
    /// (element, property) pair the original is captured in the side table
    /// and stamped into `mutation.previous`; later applies leave both alone.
    pub fn apply(
        &mut self,
        doc: &mut Document,
        mutation: &mut DomMutation,
    ) -> Result<ApplyOutcome, MutationError> {
        mutation.normalize();
        let node = validate_target(doc, mutation)?;
        self.apply_to(doc, node, mutation)
    }

    /// Run the validation gate without writing anything.
    pub fn validate(
        &self,
        doc: &Document,
        mutation: &DomMutation,
    ) -> Result<NodeId, MutationError> {
        validate_target(doc, mutation)
    }

    /// Apply to an already-resolved target, skipping selector resolution but
    /// not the safety checks. Used by redo, where the element may only be
    /// reachable through a fallback lookup.
    pub fn apply_to(
        &mut self,
        doc: &mut Document,
        node: NodeId,
        mutation: &mut DomMutation,
    ) -> Result<ApplyOutcome, MutationError> {
        mutation.normalize();
        validate_resolved(doc, node, mutation)?;
        let mut downgraded = false;
        match mutation {
            DomMutation::Style {
                property,
                value,
                previous,
                ..
            } => {
                let original = self.originals.record_style(
                    node,
                    property,
                    StyleOriginal {
                        inline: doc.style_property(node, property),
                        computed: doc.computed_style(node, property),
                    },
                );
                if previous.is_none() {
                    *previous = Some(original.computed);
                }
                doc.set_style_property(node, property, value);
                debug!("applied style {property} on {}", mutation_target(doc, node));
            }
            DomMutation::Attribute {
                property,
                value,
                previous,
                ..
            } => {
                let original =
                    self.originals
                        .record_attribute(node, property, doc.attribute(node, property));
                if previous.is_none() {
                    // Absent attributes are stamped as "" so revert removes them.
                    *previous = Some(original.unwrap_or_default());
                }
                if value.is_empty() {
                    doc.remove_attribute(node, property);
                } else {
                    doc.set_attribute(node, property, value);
                }
                debug!(
                    "applied attribute {property} on {}",
                    mutation_target(doc, node)
                );
            }
            DomMutation::Content {
                value,
                rich,
                previous,
                ..
            } => {
                if !*rich
                    && let Some(reason) = unsafe_markup(value)
                {
                    info!("content downgraded to plain text ({reason})");
                    downgraded = true;
                }
                let original = self.originals.record_content(node, doc.text_content(node));
                if previous.is_none() {
                    *previous = Some(original);
                }
                doc.set_text_content(node, value);
                debug!("applied content on {}", mutation_target(doc, node));
            }
        }
        Ok(ApplyOutcome {
            node,
            downgraded_to_text: downgraded,
        })
    }

    /// Write the original value back. The side table is consulted first;
    /// `mutation.previous` is the fallback when no record exists. Values of
    /// `""`/`"initial"` for styles remove the inline override so the element
    /// falls back to its computed default.
    pub fn revert(
        &mut self,
        doc: &mut Document,
        mutation: &DomMutation,
    ) -> Result<NodeId, MutationError> {
        let selector = mutation.selector();
        let node = query_selector(doc, selector)
            .ok_or_else(|| MutationError::TargetNotFound(selector.to_owned()))?;
        self.revert_on(doc, node, mutation);
        Ok(node)
    }

    /// Revert against an already-resolved target.
    pub fn revert_on(&mut self, doc: &mut Document, node: NodeId, mutation: &DomMutation) {
        let selector = mutation.selector();
        match mutation {
            DomMutation::Style {
                property, previous, ..
            } => match self.originals.style(node, property).cloned() {
                Some(StyleOriginal {
                    inline: Some(value),
                    ..
                }) => doc.set_style_property(node, property, &value),
                Some(StyleOriginal { inline: None, .. }) => {
                    doc.remove_style_property(node, property);
                }
                None => match previous.as_deref() {
                    Some("") | Some("initial") => doc.remove_style_property(node, property),
                    Some(value) => doc.set_style_property(node, property, value),
                    None => warn!("nothing to revert for {property} on `{selector}`"),
                },
            },
            DomMutation::Attribute {
                property, previous, ..
            } => {
                let original = self
                    .originals
                    .attribute(node, property)
                    .cloned()
                    .unwrap_or_else(|| previous.clone().filter(|value| !value.is_empty()));
                match original {
                    Some(value) => doc.set_attribute(node, property, &value),
                    None => doc.remove_attribute(node, property),
                }
            }
            DomMutation::Content { previous, .. } => {
                let original = self
                    .originals
                    .content(node)
                    .map(str::to_owned)
                    .or_else(|| previous.clone());
                match original {
                    Some(value) => doc.set_text_content(node, &value),
                    None => warn!("nothing to revert for content on `{selector}`"),
                }
            }
        }
    }

    /// Current observable value of the mutation's target field, for
    /// symmetric redo. `None` when the element no longer resolves.
    pub fn current_value(&self, doc: &Document, mutation: &DomMutation) -> Option<String> {
        let node = query_selector(doc, mutation.selector())?;
        Some(self.current_value_on(doc, node, mutation))
    }

    /// Same as [`Self::current_value`], against a resolved target.
    pub fn current_value_on(
        &self,
        doc: &Document,
        node: NodeId,
        mutation: &DomMutation,
    ) -> String {
        match mutation {
            DomMutation::Style { property, .. } => doc.computed_style(node, property),
            DomMutation::Attribute { property, .. } => {
                doc.attribute(node, property).unwrap_or_default()
            }
            DomMutation::Content { .. } => doc.text_content(node),
        }
    }

    /// Disaster-recovery path: revert everything the side table knows about,
    /// independent of history integrity, and drop every modified marker.
    /// Returns the number of elements restored; detached elements are
    /// counted as swept, not restored.
    pub fn restore_all(&mut self, doc: &mut Document) -> usize {
        let mut restored = 0;
        for (node, record) in self.originals.take_all() {
            if !doc.is_attached(node) {
                debug!("restore_all: skipping detached element");
                continue;
            }
            for (property, original) in &record.styles {
                match &original.inline {
                    Some(value) => doc.set_style_property(node, property, value),
                    None => doc.remove_style_property(node, property),
                }
            }
            for (name, original) in &record.attributes {
                match original {
                    Some(value) => doc.set_attribute(node, name, value),
                    None => doc.remove_attribute(node, name),
                }
            }
            if let Some(text) = &record.content {
                doc.set_text_content(node, text);
            }
            restored += 1;
        }
        info!("restore_all reverted {restored} element(s)");
        restored
    }

    /// Drop all modified markers without touching the document. Used by the
    /// navigation sweep, where the old page is gone anyway.
    pub fn sweep_markers(&mut self) {
        if !self.originals.is_empty() {
            debug!("sweeping {} modified marker(s)", self.originals.len());
        }
        self.originals.clear();
    }

    pub fn is_modified(&self, node: NodeId) -> bool {
        self.originals.is_modified(node)
    }

    pub fn modified_count(&self) -> usize {
        self.originals.len()
    }

    pub fn modified_nodes(&self) -> Vec<NodeId> {
        self.originals.modified_nodes()
    }

    pub fn first_modified_ms(&self, node: NodeId) -> Option<u64> {
        self.originals.first_modified_ms(node)
    }
}

fn mutation_target(doc: &Document, node: NodeId) -> String {
    match (doc.tag(node), doc.id(node)) {
        (Some(tag), Some(id)) => format!("<{tag} #{id}>"),
        (Some(tag), None) => format!("<{tag}>"),
        _ => "<unknown>".to_owned(),
    }
}
