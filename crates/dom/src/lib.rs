//! Live-page substrate for the Peekberry edit engine.
//!
//! This crate models the document the engines operate against: an
//! arena-backed element tree with attributes, inline styles, computed-style
//! resolution, and layout rectangles, plus the small CSS selector subset the
//! engines emit and re-resolve. The document is owned by the host (embedder
//! or test), not by the engines — elements may be detached or replaced
//! between any two engine calls, which is why everything here is addressed
//! by value (`NodeId`) and re-checked on every entry.

pub mod context;
pub mod document;
pub mod node;
pub mod query;
pub mod selector;
pub mod style;

pub use context::{CONTEXT_STYLE_PROPERTIES, ElementContext};
pub use document::{Document, Rect};
pub use indextree::NodeId;
pub use node::{DomNode, NodeKind};
pub use query::{matches, query_selector, query_selector_all};
pub use selector::{
    Combinator, ComplexSelector, CompoundSelector, SelectorParseError, SimpleSelector,
    parse_selector_list,
};
pub use style::normalize_property;
