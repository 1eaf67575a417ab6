//! Diagnostic placeholder shown in place of a node that could not be rendered.

use serde::Serialize;

use crate::error::CanvasError;
use crate::node::Node;

/// Why a node fell back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FallbackReason {
    UnknownType,
    DepthExceeded,
    RenderError,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fallback {
    /// Attempted component type, `unknown` when the node had none
    pub component: String,
    pub reason: FallbackReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Pretty-printed dump of the offending node
    pub raw: String,
    /// Whether the raw dump is shown expanded
    pub expanded: bool,
}

impl Fallback {
    /// Build a fallback for `node`. `dump_depth` bounds how many levels of
    /// children are included in the raw dump.
    pub fn new(
        node: &Node,
        reason: FallbackReason,
        error: Option<&CanvasError>,
        dump_depth: usize,
    ) -> Self {
        Self {
            component: node.component_name().to_string(),
            reason,
            message: error.map(ToString::to_string),
            raw: dump_node(node, dump_depth),
            expanded: false,
        }
    }

    pub fn toggle(&mut self) {
        self.expanded = !self.expanded;
    }

    /// One-line headline for the placeholder
    pub fn summary(&self) -> String {
        match self.reason {
            FallbackReason::UnknownType => format!("Unknown component '{}'", self.component),
            FallbackReason::DepthExceeded => format!("'{}' is nested too deeply", self.component),
            FallbackReason::RenderError => format!("'{}' failed to render", self.component),
        }
    }
}

/// Pretty JSON dump of a node, limited to `max_depth` levels of children.
///
/// Never fails: deeper children are summarized and a serialization failure
/// degrades to the `Debug` representation.
pub fn dump_node(node: &Node, max_depth: usize) -> String {
    let value = node.to_value_limited(max_depth);
    serde_json::to_string_pretty(&value)
        .unwrap_or_else(|err| format!("{:#?}\n<unserializable: {}>", value, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_fallback_for_untyped_node() {
        let node = Node::default();
        let fallback = Fallback::new(&node, FallbackReason::UnknownType, None, 8);
        assert_eq!(fallback.component, "unknown");
        assert_eq!(fallback.message, None);
        assert_eq!(fallback.raw, "{}");
        assert!(!fallback.expanded);
    }

    #[test]
    fn test_fallback_carries_error_message() {
        let node = Node::new("Chart");
        let err = CanvasError::MaxNestingDepthExceeded { max_depth: 50 };
        let fallback = Fallback::new(&node, FallbackReason::DepthExceeded, Some(&err), 8);
        assert_eq!(
            fallback.message.as_deref(),
            Some("Maximum nesting depth (50) exceeded")
        );
        assert_eq!(fallback.summary(), "'Chart' is nested too deeply");
    }

    #[test]
    fn test_toggle() {
        let mut fallback = Fallback::new(&Node::new("X"), FallbackReason::UnknownType, None, 8);
        fallback.toggle();
        assert!(fallback.expanded);
        fallback.toggle();
        assert!(!fallback.expanded);
    }

    #[test]
    fn test_dump_round_trips_shallow_node() {
        let node = Node::new("Heading").with_prop("text", "Hi");
        let dumped: Value = serde_json::from_str(&dump_node(&node, 8)).unwrap();
        assert_eq!(dumped, json!({"component": "Heading", "props": {"text": "Hi"}}));
    }

    #[test]
    fn test_dump_truncates_deep_children() {
        let node = Node::new("A").with_child(
            Node::new("B").with_child(Node::new("C")).with_child(Node::new("D")),
        );
        let dumped: Value = serde_json::from_str(&dump_node(&node, 1)).unwrap();
        assert_eq!(
            dumped,
            json!({
                "component": "A",
                "props": {},
                "children": [
                    {"component": "B", "props": {}, "children": "<2 children omitted>"}
                ]
            })
        );
    }

    #[test]
    fn test_dump_shows_malformed_values() {
        let node = Node::from_value(json!({"component": "Heading", "props": "oops"})).unwrap();
        let dumped: Value = serde_json::from_str(&dump_node(&node, 8)).unwrap();
        assert_eq!(dumped, json!({"component": "Heading", "props": "oops"}));
    }

    #[test]
    fn test_dump_handles_very_deep_chain() {
        let mut node = Node::new("Leaf");
        for _ in 0..2_000 {
            node = Node::new("Wrap").with_child(node);
        }
        let dumped = dump_node(&node, 8);
        assert!(dumped.contains("<1 children omitted>"));
    }
}
