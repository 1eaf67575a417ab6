use std::fmt;

use crate::error::CanvasError;
use crate::node::{Node, NODE_FIELD};
use crate::registry::ComponentRegistry;

/// A structural problem found in a canvas tree
#[derive(Debug, Clone, PartialEq)]
pub struct TreeIssue {
    /// Child indices from the root to the offending node (empty for the root)
    pub path: Vec<usize>,
    pub error: CanvasError,
}

impl fmt::Display for TreeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in &self.path {
            write!(f, "Child {}: ", index)?;
        }
        write!(f, "{}", self.error)
    }
}

/// Validate a tree without rendering it, returning one message per problem.
///
/// An empty list means the tree is valid. Messages for nested nodes are
/// prefixed with their position, e.g. `Child 0: Child 2: Missing required field 'props' ...`.
pub fn validate_component_tree(node: &Node, registry: &ComponentRegistry) -> Vec<String> {
    validate_tree(node, registry)
        .iter()
        .map(ToString::to_string)
        .collect()
}

/// Structured form of [`validate_component_tree`], in document order
pub fn validate_tree(node: &Node, registry: &ComponentRegistry) -> Vec<TreeIssue> {
    let mut issues = Vec::new();
    // Every visited node gets a slot holding its parent slot and child index,
    // so a path is only built when an issue is reported.
    let mut slots: Vec<Option<(usize, usize)>> = vec![None];
    // Explicit stack: untrusted trees may nest arbitrarily deep
    let mut pending: Vec<(&Node, usize)> = vec![(node, 0)];

    while let Some((current, slot)) = pending.pop() {
        let errors = check_node(current, registry);
        if !errors.is_empty() {
            let path = path_to(&slots, slot);
            issues.extend(errors.into_iter().map(|error| TreeIssue {
                path: path.clone(),
                error,
            }));
        }

        for (index, child) in current.children().iter().enumerate().rev() {
            slots.push(Some((slot, index)));
            pending.push((child, slots.len() - 1));
        }
    }

    issues
}

pub fn is_valid_tree(node: &Node, registry: &ComponentRegistry) -> bool {
    validate_tree(node, registry).is_empty()
}

fn path_to(slots: &[Option<(usize, usize)>], mut slot: usize) -> Vec<usize> {
    let mut path = Vec::new();
    while let Some((parent, index)) = slots[slot] {
        path.push(index);
        slot = parent;
    }
    path.reverse();
    path
}

fn check_node(node: &Node, registry: &ComponentRegistry) -> Vec<CanvasError> {
    if let Some(whole) = node.malformed_field(NODE_FIELD) {
        return vec![whole.to_error()];
    }

    let mut errors = Vec::new();

    if node.component.is_none() && node.malformed_field("component").is_none() {
        errors.push(CanvasError::MissingComponent);
    }

    if node.props.is_none() && node.malformed_field("props").is_none() {
        errors.push(CanvasError::MissingProps {
            component: node.component_name().to_string(),
        });
    }

    if let Some(component) = &node.component {
        if !registry.contains(component) {
            errors.push(CanvasError::UnknownComponent {
                component: component.clone(),
            });
        }
    }

    errors.extend(node.malformed.iter().map(|m| m.to_error()));
    errors
}
