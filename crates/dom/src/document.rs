use crate::node::{DomNode, NodeKind};
use crate::style;
use indextree::{Arena, NodeId};
use serde::{Deserialize, Serialize};

/// Integer-pixel layout rectangle, as assigned by the host's layout pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const ZERO: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// The document tree. The host owns and freely mutates it between engine
/// calls; engines hold `NodeId` values only and re-validate them on entry.
#[derive(Debug)]
pub struct Document {
    arena: Arena<DomNode>,
    root: NodeId,
    url: String,
}

impl Document {
    pub fn new(url: &str) -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(DomNode::default());
        Self {
            arena,
            root,
            url: url.to_owned(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Simulate a navigation: the tree stays whatever the host leaves in it,
    /// only the address changes. Session teardown is the orchestrator's job.
    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_owned();
    }

    // ------------------------------------------------------------------
    // Construction and structural mutation (host-side API)
    // ------------------------------------------------------------------

    /// Create a detached element node.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.arena.new_node(DomNode::element(tag))
    }

    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        parent.append(child, &mut self.arena);
    }

    /// Create an element and append it to `parent` in one step.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let node = self.create_element(tag);
        self.append(parent, node);
        node
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let node = self.arena.new_node(DomNode::text(text));
        self.append(parent, node);
        node
    }

    /// Detach `node` (and its subtree) from the document. The nodes stay
    /// allocated, so stale `NodeId` handles held elsewhere stay answerable,
    /// they just no longer resolve from the root.
    pub fn detach(&mut self, node: NodeId) {
        node.detach(&mut self.arena);
    }

    /// Whether `node` is still reachable from the document root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.arena.get(node).is_some() && node.ancestors(&self.arena).last() == Some(self.root)
    }

    // ------------------------------------------------------------------
    // Node access
    // ------------------------------------------------------------------

    pub fn get(&self, node: NodeId) -> Option<&DomNode> {
        self.arena.get(node).map(indextree::Node::get)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut DomNode> {
        self.arena.get_mut(node).map(indextree::Node::get_mut)
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.get(node).and_then(DomNode::tag)
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.get(node).is_some_and(DomNode::is_element)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node).and_then(indextree::Node::parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        node.children(&self.arena).collect()
    }

    pub fn child_elements(&self, node: NodeId) -> Vec<NodeId> {
        node.children(&self.arena)
            .filter(|child| self.is_element(*child))
            .collect()
    }

    /// All attached elements in document order, the universe every selector
    /// query runs over.
    pub fn all_elements(&self) -> Vec<NodeId> {
        self.root
            .descendants(&self.arena)
            .filter(|node| self.is_element(*node))
            .collect()
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.get(node).and_then(|n| n.attr(name)).map(str::to_owned)
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(n) = self.get_mut(node) {
            n.set_attr(name, value);
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(n) = self.get_mut(node) {
            n.remove_attr(name);
        }
    }

    pub fn id(&self, node: NodeId) -> Option<String> {
        self.attribute(node, "id").filter(|id| !id.is_empty())
    }

    /// Class tokens in attribute order.
    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.attribute(node, "class")
            .map(|attr| {
                attr.split_whitespace()
                    .map(str::to_owned)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|attr| attr.split_whitespace().any(|token| token == class))
    }

    // ------------------------------------------------------------------
    // Lookup walks (document order, attached nodes only)
    // ------------------------------------------------------------------

    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.all_elements()
            .into_iter()
            .find(|node| self.id(*node).as_deref() == Some(id))
    }

    pub fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
        self.all_elements()
            .into_iter()
            .filter(|node| self.has_class(*node, class))
            .collect()
    }

    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        let needle = tag.to_ascii_lowercase();
        self.all_elements()
            .into_iter()
            .filter(|node| self.tag(*node) == Some(needle.as_str()))
            .collect()
    }

    // ------------------------------------------------------------------
    // Text content
    // ------------------------------------------------------------------

    /// Concatenated text of the node's subtree.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        for descendant in node.descendants(&self.arena) {
            if let Some(DomNode {
                kind: NodeKind::Text { text },
                ..
            }) = self.get(descendant)
            {
                out.push_str(text);
            }
        }
        out
    }

    /// Replace the node's children with a single text node.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        let children: Vec<NodeId> = node.children(&self.arena).collect();
        for child in children {
            child.detach(&mut self.arena);
        }
        let text_node = self.arena.new_node(DomNode::text(text));
        node.append(text_node, &mut self.arena);
    }

    // ------------------------------------------------------------------
    // Inline styles and computed style
    // ------------------------------------------------------------------

    /// Inline declaration for `property` (normalised to kebab-case), if any.
    pub fn style_property(&self, node: NodeId, property: &str) -> Option<String> {
        let needle = style::normalize_property(property);
        let attr = self.attribute(node, "style")?;
        style::parse_inline(&attr)
            .into_iter()
            .find(|(name, _)| *name == needle)
            .map(|(_, value)| value)
    }

    pub fn set_style_property(&mut self, node: NodeId, property: &str, value: &str) {
        let needle = style::normalize_property(property);
        let attr = self.attribute(node, "style").unwrap_or_default();
        let mut decls = style::parse_inline(&attr);
        if let Some(entry) = decls.iter_mut().find(|(name, _)| *name == needle) {
            entry.1 = value.to_owned();
        } else {
            decls.push((needle, value.to_owned()));
        }
        let serialized = style::serialize_inline(&decls);
        self.set_attribute(node, "style", &serialized);
    }

    pub fn remove_style_property(&mut self, node: NodeId, property: &str) {
        let needle = style::normalize_property(property);
        let Some(attr) = self.attribute(node, "style") else {
            return;
        };
        let mut decls = style::parse_inline(&attr);
        decls.retain(|(name, _)| *name != needle);
        if decls.is_empty() {
            self.remove_attribute(node, "style");
        } else {
            let serialized = style::serialize_inline(&decls);
            self.set_attribute(node, "style", &serialized);
        }
    }

    /// Resolved style value for `property`: inline declaration first, then
    /// inherited inline values for inheritable properties, then the
    /// user-agent default. Color values come back canonicalised, e.g.
    /// `rgb(59, 130, 246)`.
    pub fn computed_style(&self, node: NodeId, property: &str) -> String {
        let needle = style::normalize_property(property);
        if let Some(value) = self.style_property(node, &needle) {
            return style::canonicalize_value(&needle, &value);
        }
        if style::is_inherited(&needle) {
            let mut current = self.parent(node);
            while let Some(ancestor) = current {
                if let Some(value) = self.style_property(ancestor, &needle) {
                    return style::canonicalize_value(&needle, &value);
                }
                current = self.parent(ancestor);
            }
        }
        style::default_value(self.tag(node).unwrap_or(""), &needle)
    }

    // ------------------------------------------------------------------
    // Layout and visibility
    // ------------------------------------------------------------------

    pub fn layout_rect(&self, node: NodeId) -> Option<Rect> {
        self.get(node).and_then(DomNode::layout)
    }

    pub fn set_layout_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(n) = self.get_mut(node) {
            n.set_layout(rect);
        }
    }

    /// Whether the element renders at all: not a non-visual tag, not
    /// `hidden`, not `display: none` / `visibility: hidden`, and not
    /// laid out at (near-)zero size. Size is only judged when the host has
    /// provided a rect.
    pub fn is_visible(&self, node: NodeId) -> bool {
        let Some(tag) = self.tag(node) else {
            return false;
        };
        if style::NON_VISUAL_TAGS.contains(&tag) {
            return false;
        }
        if self.get(node).is_some_and(|n| n.has_attr("hidden")) {
            return false;
        }
        if self.computed_style(node, "display") == "none" {
            return false;
        }
        if self.computed_style(node, "visibility") == "hidden" {
            return false;
        }
        if let Some(rect) = self.layout_rect(node) {
            if rect.width <= 2 || rect.height <= 2 {
                return false;
            }
        }
        true
    }

    /// 1-based position of `node` among its element siblings.
    pub fn nth_child_index(&self, node: NodeId) -> usize {
        let Some(parent) = self.parent(node) else {
            return 1;
        };
        let mut index = 0;
        for sibling in parent.children(&self.arena) {
            if self.is_element(sibling) {
                index += 1;
            }
            if sibling == node {
                break;
            }
        }
        index.max(1)
    }

    /// Number of element siblings (including `node`) sharing its tag.
    pub fn same_tag_sibling_count(&self, node: NodeId) -> usize {
        let Some(tag) = self.tag(node) else {
            return 0;
        };
        let Some(parent) = self.parent(node) else {
            return 1;
        };
        parent
            .children(&self.arena)
            .filter(|sibling| self.tag(*sibling) == Some(tag))
            .count()
    }
}
