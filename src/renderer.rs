//! Recursive renderer for canvas trees.
//!
//! Every node resolves to exactly one [`View`]. Nodes that cannot be rendered
//! (unknown type, wrong-typed fields, nesting too deep, widget failure) become a
//! [`Fallback`] at their own position while the rest of the tree renders
//! normally; no error ever propagates to the caller.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, warn};

use crate::config::RenderConfig;
use crate::error::CanvasError;
use crate::fallback::{dump_node, Fallback, FallbackReason};
use crate::node::{Node, Props, NODE_FIELD};
use crate::registry::{ComponentRegistry, Widget};
use crate::style::apply_style_presets;
use crate::validator::{validate_tree, TreeIssue};
use crate::view::View;

/// Final state of one node in a render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOutcome {
    Rendered,
    Fallback(FallbackReason),
}

impl NodeOutcome {
    pub fn of(view: &View) -> Self {
        match view {
            View::Fallback(f) => NodeOutcome::Fallback(f.reason),
            _ => NodeOutcome::Rendered,
        }
    }
}

pub struct Renderer<'r> {
    registry: &'r ComponentRegistry,
    config: RenderConfig,
}

impl<'r> Renderer<'r> {
    pub fn new(registry: &'r ComponentRegistry) -> Self {
        Self::with_config(registry, RenderConfig::default())
    }

    pub fn with_config(registry: &'r ComponentRegistry, config: RenderConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render a whole tree starting at depth 0
    pub fn render(&self, root: &Node) -> View {
        self.render_node(root, 0)
    }

    /// Validate first and only render a structurally valid tree
    pub fn render_checked(&self, root: &Node) -> Result<View, Vec<TreeIssue>> {
        let issues = validate_tree(root, self.registry);
        if issues.is_empty() {
            Ok(self.render(root))
        } else {
            Err(issues)
        }
    }

    /// Render one node found at `depth`
    pub fn render_node(&self, node: &Node, depth: usize) -> View {
        if depth > self.config.max_depth {
            let err = CanvasError::MaxNestingDepthExceeded {
                max_depth: self.config.max_depth,
            };
            warn!(component = node.component_name(), depth, "{}", err);
            return self.fallback(node, FallbackReason::DepthExceeded, Some(&err));
        }

        let widget = match node.component.as_deref() {
            Some(name) => self.registry.get(name),
            None => None,
        };
        let Some(widget) = widget else {
            let bad_type = node
                .malformed_field(NODE_FIELD)
                .or_else(|| node.malformed_field("component"));
            let err = match (&node.component, bad_type) {
                (Some(name), _) => CanvasError::UnknownComponent {
                    component: name.clone(),
                },
                (None, Some(bad)) => bad.to_error(),
                (None, None) => CanvasError::MissingComponent,
            };
            warn!(
                component = node.component_name(),
                depth,
                node = %dump_node(node, self.config.dump_depth),
                "{}",
                err
            );
            return self.fallback(node, FallbackReason::UnknownType, Some(&err));
        };

        if let Some(bad) = node.malformed.first() {
            let err = bad.to_error();
            warn!(
                component = node.component_name(),
                depth,
                node = %dump_node(node, self.config.dump_depth),
                "{}",
                err
            );
            return self.fallback(node, FallbackReason::RenderError, Some(&err));
        }

        let empty = Props::new();
        let base = node.props.as_ref().unwrap_or(&empty);
        let props = apply_style_presets(base, node.style.as_ref());

        let rendered: Vec<View> = node
            .children()
            .iter()
            .map(|child| self.render_node(child, depth + 1))
            .collect();
        let children = (!rendered.is_empty()).then_some(rendered);

        debug!(component = node.component_name(), depth, "rendering node");
        self.invoke_isolated(node, widget, &props, children)
    }

    /// Run one widget invocation; any failure becomes a fallback for this node only
    fn invoke_isolated(
        &self,
        node: &Node,
        widget: &dyn Widget,
        props: &Props,
        children: Option<Vec<View>>,
    ) -> View {
        let outcome = if self.config.catch_panics {
            panic::catch_unwind(AssertUnwindSafe(|| widget.render(props, children)))
                .unwrap_or_else(|payload| {
                    Err(CanvasError::WidgetPanicked {
                        component: node.component_name().to_string(),
                        message: panic_message(&*payload),
                    })
                })
        } else {
            widget.render(props, children)
        };

        match outcome {
            Ok(view) => view,
            Err(err) => {
                error!(
                    component = node.component_name(),
                    node = %dump_node(node, self.config.dump_depth),
                    error = %err,
                    "component failed to render"
                );
                self.fallback(node, FallbackReason::RenderError, Some(&err))
            }
        }
    }

    fn fallback(&self, node: &Node, reason: FallbackReason, err: Option<&CanvasError>) -> View {
        View::Fallback(Fallback::new(node, reason, err, self.config.dump_depth))
    }
}

/// Render a tree with the default configuration
pub fn render_tree(root: &Node, registry: &ComponentRegistry) -> View {
    Renderer::new(registry).render(root)
}

/// Render a tree with an explicit configuration
pub fn render_tree_with_config(root: &Node, registry: &ComponentRegistry, config: RenderConfig) -> View {
    Renderer::with_config(registry, config).render(root)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CanvasResult;
    use crate::view::Element;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn echo(name: &'static str) -> impl Widget {
        move |props: &Props, children: Option<Vec<View>>| -> CanvasResult<View> {
            Ok(Element::new("div", name)
                .with_props(props.clone())
                .with_children(children.unwrap_or_default())
                .into_view())
        }
    }

    fn registry() -> ComponentRegistry {
        let mut registry = ComponentRegistry::new();
        registry.register("Box", echo("Box")).unwrap();
        registry
            .register(
                "Broken",
                |_: &Props, _: Option<Vec<View>>| -> CanvasResult<View> {
                    Err(CanvasError::MissingProperty {
                        component: "Broken".to_string(),
                        property: "text".to_string(),
                    })
                },
            )
            .unwrap();
        registry
            .register(
                "Panics",
                |_: &Props, _: Option<Vec<View>>| -> CanvasResult<View> {
                    panic!("widget exploded")
                },
            )
            .unwrap();
        registry
    }

    fn chain(levels: usize) -> Node {
        let mut node = Node::new("Box").with_prop("level", levels);
        for level in (0..levels).rev() {
            node = Node::new("Box").with_prop("level", level).with_child(node);
        }
        node
    }

    #[test]
    fn test_renders_registered_widget() {
        let registry = registry();
        let view = render_tree(&Node::new("Box").with_prop("a", 1), &registry);
        assert_eq!(NodeOutcome::of(&view), NodeOutcome::Rendered);
        assert_eq!(view.as_element().unwrap().props["a"], json!(1));
    }

    #[test]
    fn test_widget_error_becomes_fallback() {
        let registry = registry();
        let view = render_tree(&Node::new("Broken"), &registry);
        assert_eq!(
            NodeOutcome::of(&view),
            NodeOutcome::Fallback(FallbackReason::RenderError)
        );
        assert_eq!(
            view.as_fallback().unwrap().message.as_deref(),
            Some("Missing required property 'text' for component 'Broken'")
        );
    }

    #[test]
    fn test_widget_panic_becomes_fallback() {
        let registry = registry();
        let tree = Node::new("Box")
            .with_child(Node::new("Panics"))
            .with_child(Node::new("Box"));
        let view = render_tree(&tree, &registry);

        assert_eq!(NodeOutcome::of(&view), NodeOutcome::Rendered);
        let failed = view.children()[0].as_fallback().unwrap();
        assert_eq!(failed.reason, FallbackReason::RenderError);
        assert!(failed.message.as_deref().unwrap().contains("widget exploded"));
        assert_eq!(NodeOutcome::of(&view.children()[1]), NodeOutcome::Rendered);
    }

    #[test]
    fn test_missing_component_is_unknown_type() {
        let registry = registry();
        let view = render_tree(&Node::default(), &registry);
        let fallback = view.as_fallback().unwrap();
        assert_eq!(fallback.reason, FallbackReason::UnknownType);
        assert_eq!(fallback.component, "unknown");
    }

    #[test]
    fn test_missing_props_render_as_empty() {
        let registry = registry();
        let node = Node {
            component: Some("Box".to_string()),
            ..Default::default()
        };
        let view = render_tree(&node, &registry);
        assert!(view.as_element().unwrap().props.is_empty());
    }

    #[test]
    fn test_malformed_node_falls_back_alone() {
        let registry = registry();
        let tree = Node::from_value(json!({
            "component": "Box",
            "props": {},
            "children": [
                {"component": "Box", "props": "oops"},
                {"component": 42},
                ["Box", {}],
                {"component": "Box", "props": {"ok": true}}
            ]
        }))
        .unwrap();
        let view = render_tree(&tree, &registry);

        assert_eq!(NodeOutcome::of(&view), NodeOutcome::Rendered);
        let children = view.children();
        assert_eq!(
            NodeOutcome::of(&children[0]),
            NodeOutcome::Fallback(FallbackReason::RenderError)
        );
        assert_eq!(
            children[0].as_fallback().unwrap().message.as_deref(),
            Some("'props' must be an object")
        );
        assert_eq!(
            children[1].as_fallback().unwrap().message.as_deref(),
            Some("'component' must be a string")
        );
        assert_eq!(
            NodeOutcome::of(&children[2]),
            NodeOutcome::Fallback(FallbackReason::UnknownType)
        );
        assert_eq!(children[3].as_element().unwrap().props["ok"], json!(true));
    }

    #[test]
    fn test_configurable_depth() {
        let registry = registry();
        let config = RenderConfig::default().with_max_depth(3);
        let view = render_tree_with_config(&chain(4), &registry, config);

        let mut current = &view;
        for _ in 0..4 {
            assert_eq!(NodeOutcome::of(current), NodeOutcome::Rendered);
            current = &current.children()[0];
        }
        assert_eq!(
            NodeOutcome::of(current),
            NodeOutcome::Fallback(FallbackReason::DepthExceeded)
        );
    }

    #[test]
    fn test_render_checked_rejects_invalid_tree() {
        let registry = registry();
        let renderer = Renderer::new(&registry);
        let issues = renderer
            .render_checked(&Node::new("Box").with_child(Node::new("Nope")))
            .unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, vec![0]);
        assert!(renderer.render_checked(&Node::new("Box")).is_ok());
    }

    #[test]
    fn test_children_argument_absent_without_children() {
        let seen: Arc<Mutex<Vec<bool>>> = Arc::default();
        let record = Arc::clone(&seen);
        let registry = ComponentRegistry::new()
            .with(
                "Recorder",
                move |_: &Props, children: Option<Vec<View>>| -> CanvasResult<View> {
                    record.lock().unwrap().push(children.is_some());
                    Ok(Element::new("div", "Recorder").into_view())
                },
            )
            .unwrap();

        render_tree(&Node::new("Recorder"), &registry);
        render_tree(&Node::new("Recorder").with_children(Vec::new()), &registry);
        render_tree(&Node::new("Recorder").with_child(Node::new("Recorder")), &registry);

        // leaf, empty list, child, then parent with a rendered child
        assert_eq!(*seen.lock().unwrap(), vec![false, false, false, true]);
    }
}
