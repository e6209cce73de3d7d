use crate::document::Rect;
use smallvec::SmallVec;

/// The kind of a node in the document tree.
#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    #[default]
    Document,
    Element {
        tag: String,
    },
    Text {
        text: String,
    },
}

/// A single node: kind, attribute list, and the layout rectangle assigned by
/// the host. Attribute names are stored lowercased; values verbatim.
#[derive(Debug, Clone, Default)]
pub struct DomNode {
    pub kind: NodeKind,
    attrs: SmallVec<[(String, String); 4]>,
    layout: Option<Rect>,
}

impl DomNode {
    pub fn element(tag: &str) -> Self {
        Self {
            kind: NodeKind::Element {
                tag: tag.to_ascii_lowercase(),
            },
            attrs: SmallVec::new(),
            layout: None,
        }
    }

    pub fn text(text: &str) -> Self {
        Self {
            kind: NodeKind::Text {
                text: text.to_owned(),
            },
            attrs: SmallVec::new(),
            layout: None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    /// Lowercased tag name, for element nodes only.
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        let needle = name.to_ascii_lowercase();
        self.attrs
            .iter()
            .find(|(attr_name, _)| *attr_name == needle)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        let needle = name.to_ascii_lowercase();
        if let Some(entry) = self.attrs.iter_mut().find(|(attr_name, _)| *attr_name == needle) {
            entry.1 = value.to_owned();
        } else {
            self.attrs.push((needle, value.to_owned()));
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        let needle = name.to_ascii_lowercase();
        self.attrs.retain(|(attr_name, _)| *attr_name != needle);
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Attribute names currently present, in insertion order.
    pub fn attr_names(&self) -> impl Iterator<Item = &str> {
        self.attrs.iter().map(|(name, _)| name.as_str())
    }

    pub fn layout(&self) -> Option<Rect> {
        self.layout
    }

    pub fn set_layout(&mut self, rect: Rect) {
        self.layout = Some(rect);
    }
}
