//! Reference widgets.
//!
//! A small built-in catalogue so trees can be rendered end to end without a
//! host application. Hosts register their own widgets alongside or instead.

use serde_json::Value;

use crate::error::{CanvasError, CanvasResult};
use crate::node::Props;
use crate::registry::ComponentRegistry;
use crate::view::{Element, View};

/// Names registered by [`ComponentRegistry::with_builtin_widgets`]
pub const BUILTIN_WIDGETS: &[&str] = &[
    "Badge", "Button", "Card", "Divider", "Heading", "List", "ListItem", "Stack", "Text",
];

impl ComponentRegistry {
    /// A registry pre-populated with the reference widgets
    pub fn with_builtin_widgets() -> CanvasResult<Self> {
        let mut registry = Self::new();
        register_builtin_widgets(&mut registry)?;
        Ok(registry)
    }
}

pub fn register_builtin_widgets(registry: &mut ComponentRegistry) -> CanvasResult<()> {
    registry.register("Badge", badge)?;
    registry.register("Button", button)?;
    registry.register("Card", card)?;
    registry.register("Divider", divider)?;
    registry.register("Heading", heading)?;
    registry.register("List", list)?;
    registry.register("ListItem", list_item)?;
    registry.register("Stack", stack)?;
    registry.register("Text", text)?;
    Ok(())
}

fn card(props: &Props, children: Option<Vec<View>>) -> CanvasResult<View> {
    let mut el = Element::new("section", "Card").with_props(props.clone());
    if let Some(title) = optional_str("Card", props, "title")? {
        el.push(
            Element::new("h3", "Heading")
                .with_children([View::text(title)])
                .into_view(),
        );
    }
    Ok(el.with_children(children.unwrap_or_default()).into_view())
}

fn stack(props: &Props, children: Option<Vec<View>>) -> CanvasResult<View> {
    Ok(Element::new("div", "Stack")
        .with_props(props.clone())
        .with_children(children.unwrap_or_default())
        .into_view())
}

fn heading(props: &Props, _children: Option<Vec<View>>) -> CanvasResult<View> {
    let text = required_str("Heading", props, "text")?;
    let level = match props.get("level") {
        None | Some(Value::Null) => 2,
        Some(Value::Number(n)) => match n.as_u64() {
            Some(level @ 1..=6) => level,
            _ => return Err(invalid("Heading", "level", "must be an integer from 1 to 6")),
        },
        Some(_) => return Err(invalid("Heading", "level", "must be an integer from 1 to 6")),
    };
    Ok(Element::new(format!("h{}", level), "Heading")
        .with_props(props.clone())
        .with_children([View::text(text)])
        .into_view())
}

fn text(props: &Props, _children: Option<Vec<View>>) -> CanvasResult<View> {
    let text = required_str("Text", props, "text")?;
    Ok(Element::new("p", "Text")
        .with_props(props.clone())
        .with_children([View::text(text)])
        .into_view())
}

fn button(props: &Props, _children: Option<Vec<View>>) -> CanvasResult<View> {
    let label = required_str("Button", props, "label")?;
    if let Some(disabled) = props.get("disabled") {
        if !disabled.is_boolean() {
            return Err(invalid("Button", "disabled", "must be a boolean"));
        }
    }
    Ok(Element::new("button", "Button")
        .with_props(props.clone())
        .with_children([View::text(label)])
        .into_view())
}

fn badge(props: &Props, _children: Option<Vec<View>>) -> CanvasResult<View> {
    let text = required_str("Badge", props, "text")?;
    Ok(Element::new("span", "Badge")
        .with_props(props.clone())
        .with_children([View::text(text)])
        .into_view())
}

fn list(props: &Props, children: Option<Vec<View>>) -> CanvasResult<View> {
    let el = Element::new("ul", "List").with_props(props.clone());
    let items = match children {
        Some(items) => items,
        None => {
            let empty = optional_str("List", props, "emptyText")?.unwrap_or("No items");
            vec![Element::new("li", "ListItem")
                .with_children([View::text(empty)])
                .into_view()]
        }
    };
    Ok(el.with_children(items).into_view())
}

fn list_item(props: &Props, children: Option<Vec<View>>) -> CanvasResult<View> {
    let mut el = Element::new("li", "ListItem").with_props(props.clone());
    if let Some(text) = optional_str("ListItem", props, "text")? {
        el.push(View::text(text));
    }
    Ok(el.with_children(children.unwrap_or_default()).into_view())
}

fn divider(props: &Props, _children: Option<Vec<View>>) -> CanvasResult<View> {
    Ok(Element::new("hr", "Divider")
        .with_props(props.clone())
        .into_view())
}

// --- prop helpers ---

fn required_str<'p>(component: &str, props: &'p Props, property: &str) -> CanvasResult<&'p str> {
    optional_str(component, props, property)?.ok_or_else(|| CanvasError::MissingProperty {
        component: component.to_string(),
        property: property.to_string(),
    })
}

fn optional_str<'p>(
    component: &str,
    props: &'p Props,
    property: &str,
) -> CanvasResult<Option<&'p str>> {
    match props.get(property) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(invalid(
            component,
            property,
            &format!("expected a string, got {}", json_type(other)),
        )),
    }
}

fn invalid(component: &str, property: &str, reason: &str) -> CanvasError {
    CanvasError::InvalidProperty {
        component: component.to_string(),
        property: property.to_string(),
        reason: reason.to_string(),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
