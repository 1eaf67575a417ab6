use serde::de::{self, Deserializer, Unexpected};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CanvasError, CanvasResult};
use crate::style::StylePreset;

/// Flat property map handed to widgets
pub type Props = serde_json::Map<String, Value>;

/// Display name used when a node carries no component type
pub const UNKNOWN_COMPONENT: &str = "unknown";

/// Field name recorded when a tree element is not an object at all
pub const NODE_FIELD: &str = "node";

/// One node of an AI-generated canvas tree.
///
/// `component` and `props` are required by the schema but kept optional here so
/// a malformed tree still loads and can be reported by the validator, or shown
/// as a fallback by the renderer, instead of failing to deserialize. Fields of
/// the wrong JSON type are kept verbatim in `malformed`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub component: Option<String>,
    pub props: Option<Props>,
    pub children: Option<Vec<Node>>,
    pub style: Option<StylePreset>,
    pub malformed: Vec<MalformedField>,
}

/// A node field that was present with the wrong shape
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedField {
    /// Field name, dotted for style entries (`style.spacing`)
    pub field: String,
    /// What the field should have been, e.g. `an object`
    pub expected: &'static str,
    /// The value as it appeared in the input
    pub found: Value,
}

impl MalformedField {
    fn new(field: impl Into<String>, expected: &'static str, found: Value) -> Self {
        Self {
            field: field.into(),
            expected,
            found,
        }
    }

    pub fn to_error(&self) -> CanvasError {
        CanvasError::MalformedField {
            field: self.field.clone(),
            expected: self.expected.to_string(),
        }
    }
}

impl Node {
    /// Create a node of the given type with empty props
    pub fn new(component: impl Into<String>) -> Self {
        Self {
            component: Some(component.into()),
            props: Some(Props::new()),
            ..Default::default()
        }
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props
            .get_or_insert_with(Props::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn with_style(mut self, style: StylePreset) -> Self {
        self.style = Some(style);
        self
    }

    /// Component type, or `"unknown"` when the node has none
    pub fn component_name(&self) -> &str {
        self.component.as_deref().unwrap_or(UNKNOWN_COMPONENT)
    }

    /// Children in document order (empty when absent)
    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn is_well_formed(&self) -> bool {
        self.malformed.is_empty()
    }

    /// Malformed entry for `field`, if that field had the wrong shape
    pub fn malformed_field(&self, field: &str) -> Option<&MalformedField> {
        self.malformed.iter().find(|m| m.field == field)
    }

    /// Convert an already-decoded JSON value into a node.
    ///
    /// The root must be an object; anything below it always converts.
    pub fn from_value(value: Value) -> CanvasResult<Self> {
        if !value.is_object() {
            return Err(CanvasError::Json(format!(
                "invalid type: {}, expected a canvas node object",
                unexpected(&value)
            )));
        }
        Ok(Node::from_raw(value))
    }

    /// Lenient conversion used for every element of a tree
    fn from_raw(value: Value) -> Self {
        let mut node = Node::default();
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                node.malformed
                    .push(MalformedField::new(NODE_FIELD, "an object", other));
                return node;
            }
        };

        for (key, value) in fields {
            match (key.as_str(), value) {
                (_, Value::Null) => {}
                ("component", Value::String(name)) => node.component = Some(name),
                ("props", Value::Object(props)) => node.props = Some(props),
                ("children", Value::Array(items)) => {
                    node.children = Some(items.into_iter().map(Node::from_raw).collect());
                }
                ("style", Value::Object(entries)) => {
                    node.style = Some(StylePreset::from_entries(entries, &mut node.malformed));
                }
                ("component", other) => {
                    node.malformed
                        .push(MalformedField::new("component", "a string", other));
                }
                ("props", other) => {
                    node.malformed
                        .push(MalformedField::new("props", "an object", other));
                }
                ("children", other) => {
                    node.malformed
                        .push(MalformedField::new("children", "an array", other));
                }
                ("style", other) => {
                    node.malformed
                        .push(MalformedField::new("style", "an object", other));
                }
                _ => {}
            }
        }
        node
    }

    /// JSON form of the node, malformed fields included as they were read
    pub fn to_value(&self) -> Value {
        self.to_value_limited(usize::MAX)
    }

    /// Like [`Node::to_value`] but children below `remaining` levels are
    /// replaced by a short summary string
    pub(crate) fn to_value_limited(&self, remaining: usize) -> Value {
        if let Some(whole) = self.malformed_field(NODE_FIELD) {
            return whole.found.clone();
        }

        let mut map = serde_json::Map::new();
        if let Some(component) = &self.component {
            map.insert("component".to_string(), Value::String(component.clone()));
        }
        if let Some(props) = &self.props {
            map.insert("props".to_string(), Value::Object(props.clone()));
        }
        if let Some(style) = &self.style {
            map.insert("style".to_string(), Value::Object(style.to_entries()));
        }
        if let Some(children) = &self.children {
            let value = if remaining == 0 && !children.is_empty() {
                Value::String(format!("<{} children omitted>", children.len()))
            } else {
                Value::Array(
                    children
                        .iter()
                        .map(|child| child.to_value_limited(remaining.saturating_sub(1)))
                        .collect(),
                )
            };
            map.insert("children".to_string(), value);
        }

        for bad in &self.malformed {
            match bad.field.split_once('.') {
                Some((parent, key)) => {
                    let entry = map
                        .entry(parent.to_string())
                        .or_insert_with(|| Value::Object(serde_json::Map::new()));
                    if let Value::Object(inner) = entry {
                        inner.insert(key.to_string(), bad.found.clone());
                    }
                }
                None => {
                    map.insert(bad.field.clone(), bad.found.clone());
                }
            }
        }
        Value::Object(map)
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if !value.is_object() {
            return Err(de::Error::invalid_type(
                unexpected(&value),
                &"a canvas node object",
            ));
        }
        Ok(Node::from_raw(value))
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}

/// Parse a canvas tree from JSON
pub fn parse_tree(json: &str) -> CanvasResult<Node> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a canvas tree from YAML
pub fn parse_tree_yaml(yaml: &str) -> CanvasResult<Node> {
    Ok(serde_yaml::from_str(yaml)?)
}
