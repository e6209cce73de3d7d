//! Selector matching over a [`Document`]. Matching anchors on the rightmost
//! compound and walks ancestors for the remaining sequence, so deep chains
//! stay cheap on wide trees.

use crate::document::Document;
use crate::selector::{
    Combinator, ComplexSelector, CompoundSelector, SimpleSelector, parse_selector_list,
};
use indextree::NodeId;
use log::trace;

/// Whether `node` matches any selector in the parsed list.
pub fn matches_any(doc: &Document, node: NodeId, selectors: &[ComplexSelector]) -> bool {
    selectors
        .iter()
        .any(|selector| matches(doc, node, selector))
}

/// Whether `node` matches a single complex selector.
pub fn matches(doc: &Document, node: NodeId, selector: &ComplexSelector) -> bool {
    matches_sequence(doc, node, &selector.sequence)
}

fn matches_sequence(
    doc: &Document,
    node: NodeId,
    sequence: &[(CompoundSelector, Option<Combinator>)],
) -> bool {
    let Some(((compound, _), rest)) = sequence.split_last() else {
        return false;
    };
    if !compound_matches(doc, node, compound) {
        return false;
    }
    let Some((_, Some(combinator))) = rest.last() else {
        // Nothing further left of this compound.
        return rest.is_empty();
    };
    match combinator {
        Combinator::Child => doc
            .parent(node)
            .is_some_and(|parent| matches_sequence(doc, parent, rest)),
        Combinator::Descendant => {
            let mut current = doc.parent(node);
            while let Some(ancestor) = current {
                if matches_sequence(doc, ancestor, rest) {
                    return true;
                }
                current = doc.parent(ancestor);
            }
            false
        }
    }
}

fn compound_matches(doc: &Document, node: NodeId, compound: &CompoundSelector) -> bool {
    if !doc.is_element(node) {
        return false;
    }
    compound.simples.iter().all(|simple| match simple {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(tag) => doc.tag(node) == Some(tag.as_str()),
        SimpleSelector::Id(id) => doc.id(node).as_deref() == Some(id.as_str()),
        SimpleSelector::Class(class) => doc.has_class(node, class),
        SimpleSelector::Attribute { name, value } => match (doc.attribute(node, name), value) {
            (Some(_), None) => true,
            (Some(actual), Some(expected)) => actual == *expected,
            (None, _) => false,
        },
        SimpleSelector::NthChild(index) => doc.nth_child_index(node) == *index,
    })
}

/// First attached element matching `input`, in document order. Returns
/// `None` both for "no match" and for an unparseable selector; callers that
/// care about the distinction parse first.
pub fn query_selector(doc: &Document, input: &str) -> Option<NodeId> {
    let selectors = match parse_selector_list(input) {
        Ok(selectors) => selectors,
        Err(error) => {
            trace!("query_selector: {error}");
            return None;
        }
    };
    doc.all_elements()
        .into_iter()
        .find(|node| matches_any(doc, *node, &selectors))
}

/// All attached elements matching `input`, in document order.
pub fn query_selector_all(doc: &Document, input: &str) -> Vec<NodeId> {
    let selectors = match parse_selector_list(input) {
        Ok(selectors) => selectors,
        Err(error) => {
            trace!("query_selector_all: {error}");
            return Vec::new();
        }
    };
    doc.all_elements()
        .into_iter()
        .filter(|node| matches_any(doc, *node, &selectors))
        .collect()
}
