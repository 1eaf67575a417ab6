use serde::Serialize;
use serde_json::Value;

use crate::fallback::Fallback;
use crate::node::Props;

/// Rendered output of a canvas tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum View {
    Element(Element),
    Text(String),
    Fallback(Fallback),
}

/// A widget's rendered element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    /// HTML tag used when serializing
    pub tag: String,
    /// Registry name of the widget that produced it
    pub component: String,
    pub props: Props,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<View>,
}

impl Element {
    pub fn new(tag: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            component: component.into(),
            props: Props::new(),
            children: Vec::new(),
        }
    }

    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = View>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn push(&mut self, child: View) {
        self.children.push(child);
    }

    pub fn into_view(self) -> View {
        View::Element(self)
    }
}

impl From<Element> for View {
    fn from(element: Element) -> Self {
        View::Element(element)
    }
}

impl From<Fallback> for View {
    fn from(fallback: Fallback) -> Self {
        View::Fallback(fallback)
    }
}

impl View {
    pub fn text(text: impl Into<String>) -> Self {
        View::Text(text.into())
    }

    /// Component name of an element or fallback
    pub fn component(&self) -> Option<&str> {
        match self {
            View::Element(e) => Some(e.component.as_str()),
            View::Fallback(f) => Some(f.component.as_str()),
            View::Text(_) => None,
        }
    }

    pub fn children(&self) -> &[View] {
        match self {
            View::Element(e) => &e.children,
            _ => &[],
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, View::Fallback(_))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            View::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_fallback(&self) -> Option<&Fallback> {
        match self {
            View::Fallback(f) => Some(f),
            _ => None,
        }
    }

    /// Every fallback in the tree, depth-first in document order
    pub fn fallbacks(&self) -> Vec<&Fallback> {
        let mut found = Vec::new();
        collect_fallbacks(self, &mut found);
        found
    }

    pub fn fallback_count(&self) -> usize {
        self.fallbacks().len()
    }

    /// Concatenated text content of this view and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_fallbacks<'a>(view: &'a View, found: &mut Vec<&'a Fallback>) {
    match view {
        View::Fallback(f) => found.push(f),
        View::Element(e) => {
            for child in &e.children {
                collect_fallbacks(child, found);
            }
        }
        View::Text(_) => {}
    }
}

fn collect_text(view: &View, out: &mut String) {
    match view {
        View::Text(t) => out.push_str(t),
        View::Element(e) => {
            for child in &e.children {
                collect_text(child, out);
            }
        }
        View::Fallback(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::FallbackReason;
    use crate::node::Node;
    use serde_json::json;

    #[test]
    fn test_fallbacks_in_document_order() {
        let first = Fallback::new(&Node::new("A"), FallbackReason::UnknownType, None, 4);
        let second = Fallback::new(&Node::new("B"), FallbackReason::UnknownType, None, 4);
        let view = Element::new("div", "Stack")
            .with_children([
                first.into(),
                Element::new("div", "Card")
                    .with_children([second.into()])
                    .into_view(),
            ])
            .into_view();

        let names: Vec<_> = view.fallbacks().iter().map(|f| f.component.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(view.fallback_count(), 2);
    }

    #[test]
    fn test_text_content() {
        let view = Element::new("p", "Text")
            .with_children([View::text("Hello "), View::text("world")])
            .into_view();
        assert_eq!(view.text_content(), "Hello world");
    }

    #[test]
    fn test_serialize_shape() {
        let view = Element::new("hr", "Divider").into_view();
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({
                "kind": "element",
                "value": {"tag": "hr", "component": "Divider", "props": {}}
            })
        );
    }
}
