//! The seam between the session and whatever turns natural-language
//! commands into mutations. The session is deliberately ignorant of the
//! transport; implementations may call a remote service, a local model, or
//! (in tests) a canned table.

use core::time::Duration;
use dom::ElementContext;
use mutation::DomMutation;
use serde::Serialize;
use thiserror::Error;

/// Everything a resolver gets to work with: the user's command, a snapshot
/// of the targeted element, and where the page lives.
#[derive(Debug, Clone, Serialize)]
pub struct CommandRequest {
    pub command: String,
    pub context: ElementContext,
    #[serde(rename = "pageUrl")]
    pub page_url: String,
    #[serde(skip)]
    pub timeout: Duration,
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("command resolution timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
    #[error("resolution service failed")]
    Service(#[source] anyhow::Error),
    #[error("command rejected: {0}")]
    Rejected(String),
}

pub trait CommandResolver {
    /// Turn `request` into a concrete mutation, or explain why not.
    fn resolve(&mut self, request: &CommandRequest) -> Result<DomMutation, ResolveError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::Document;

    #[test]
    fn request_serializes_without_the_timeout() {
        let mut doc = Document::new("https://example.test/");
        let button = doc.append_element(doc.root(), "button");
        let context = ElementContext::capture(&doc, button, "button", 100).unwrap();
        let request = CommandRequest {
            command: "make it blue".to_owned(),
            context,
            page_url: "https://example.test/".to_owned(),
            timeout: Duration::from_secs(30),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["command"], "make it blue");
        assert_eq!(json["pageUrl"], "https://example.test/");
        assert!(json.get("timeout").is_none());
        assert_eq!(json["context"]["selector"], "button");
    }
}
