use dom::normalize_property;
use serde::{Deserialize, Serialize};

/// A single typed, reversible edit targeted at one element.
///
/// The union is closed on purpose: apply, revert, and validation all match
/// exhaustively, so a new kind cannot be added without updating every one of
/// them. `previous` is stamped by the mutation engine the first time a given
/// (element, property) pair is touched and is never overwritten by a later
/// "first application"; the history engine rewrites it transiently during
/// undo to keep redo symmetric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DomMutation {
    Style {
        selector: String,
        property: String,
        value: String,
        #[serde(
            default,
            rename = "previousValue",
            skip_serializing_if = "Option::is_none"
        )]
        previous: Option<String>,
    },
    Attribute {
        selector: String,
        property: String,
        value: String,
        #[serde(
            default,
            rename = "previousValue",
            skip_serializing_if = "Option::is_none"
        )]
        previous: Option<String>,
    },
    Content {
        selector: String,
        value: String,
        #[serde(default)]
        rich: bool,
        #[serde(
            default,
            rename = "previousValue",
            skip_serializing_if = "Option::is_none"
        )]
        previous: Option<String>,
    },
}

impl DomMutation {
    pub fn style(selector: &str, property: &str, value: &str) -> Self {
        Self::Style {
            selector: selector.to_owned(),
            property: normalize_property(property),
            value: value.to_owned(),
            previous: None,
        }
    }

    pub fn attribute(selector: &str, name: &str, value: &str) -> Self {
        Self::Attribute {
            selector: selector.to_owned(),
            property: name.to_ascii_lowercase(),
            value: value.to_owned(),
            previous: None,
        }
    }

    pub fn text(selector: &str, value: &str) -> Self {
        Self::Content {
            selector: selector.to_owned(),
            value: value.to_owned(),
            rich: false,
            previous: None,
        }
    }

    pub fn rich_content(selector: &str, value: &str) -> Self {
        Self::Content {
            selector: selector.to_owned(),
            value: value.to_owned(),
            rich: true,
            previous: None,
        }
    }

    pub fn selector(&self) -> &str {
        match self {
            Self::Style { selector, .. }
            | Self::Attribute { selector, .. }
            | Self::Content { selector, .. } => selector,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Style { value, .. }
            | Self::Attribute { value, .. }
            | Self::Content { value, .. } => value,
        }
    }

    pub fn previous(&self) -> Option<&str> {
        match self {
            Self::Style { previous, .. }
            | Self::Attribute { previous, .. }
            | Self::Content { previous, .. } => previous.as_deref(),
        }
    }

    pub fn set_previous(&mut self, value: Option<String>) {
        match self {
            Self::Style { previous, .. }
            | Self::Attribute { previous, .. }
            | Self::Content { previous, .. } => *previous = value,
        }
    }

    /// Stamp `previous` only if it has never been stamped.
    pub fn stamp_previous(&mut self, value: String) {
        if self.previous().is_none() {
            self.set_previous(Some(value));
        }
    }

    /// Normalise field spellings in place. Mutations arriving over the wire
    /// bypass the constructors, so the engine calls this before applying.
    pub fn normalize(&mut self) {
        match self {
            Self::Style { property, .. } => *property = normalize_property(property),
            Self::Attribute { property, .. } => *property = property.to_ascii_lowercase(),
            Self::Content { .. } => {}
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Style { .. } => "style",
            Self::Attribute { .. } => "attribute",
            Self::Content { .. } => "content",
        }
    }

    /// Short human-readable summary, used for history labels and logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Style {
                selector,
                property,
                value,
                ..
            } => format!("{selector}: {property} -> {value}"),
            Self::Attribute {
                selector,
                property,
                value,
                ..
            } => {
                if value.is_empty() {
                    format!("{selector}: remove [{property}]")
                } else {
                    format!("{selector}: [{property}] -> {value}")
                }
            }
            Self::Content { selector, rich, .. } => {
                if *rich {
                    format!("{selector}: replace markup")
                } else {
                    format!("{selector}: replace text")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_normalize_property_names() {
        let mutation = DomMutation::style("#cta", "backgroundColor", "red");
        assert!(
            matches!(mutation, DomMutation::Style { ref property, .. } if property == "background-color")
        );
    }

    #[test]
    fn stamp_previous_is_first_write_wins() {
        let mut mutation = DomMutation::style("#cta", "color", "red");
        mutation.stamp_previous("blue".to_owned());
        mutation.stamp_previous("green".to_owned());
        assert_eq!(mutation.previous(), Some("blue"));
    }
}
