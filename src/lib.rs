//! # Canvas tree renderer
//!
//! Turns an AI-generated JSON description of a UI into a rendered view tree.
//!
//! ## Features
//! - Registry-based dispatch from component type names to [`Widget`]s
//! - Style presets (`spacing`, `theme`, `emphasis`) merged into widget props
//! - Configurable nesting depth bound
//! - Per-node isolation: unknown types, over-deep nodes and failing widgets
//!   render as inline diagnostic fallbacks instead of aborting the tree
//! - Structural validation without rendering
//! - Safe HTML serialization of the result
//!
//! ## Example
//! ```ignore
//! use canvas_render::{parse_tree, render_tree, validate_component_tree, ComponentRegistry};
//!
//! let tree = parse_tree(r#"
//!   {"component": "Card", "props": {"title": "Today"},
//!    "children": [{"component": "Text", "props": {"text": "Nothing due"}}]}
//! "#)?;
//!
//! let registry = ComponentRegistry::with_builtin_widgets()?;
//! assert!(validate_component_tree(&tree, &registry).is_empty());
//!
//! let html = render_tree(&tree, &registry).to_html();
//! ```

pub mod config;
pub mod error;
pub mod fallback;
pub mod html;
pub mod node;
pub mod registry;
pub mod renderer;
pub mod style;
pub mod validator;
pub mod view;
pub mod widgets;

// --- Core types ---
pub use config::RenderConfig;
pub use error::{CanvasError, CanvasResult};
pub use fallback::{Fallback, FallbackReason};
pub use node::{parse_tree, parse_tree_yaml, MalformedField, Node, Props};
pub use registry::{ComponentRegistry, Widget};
pub use renderer::{render_tree, render_tree_with_config, NodeOutcome, Renderer};
pub use style::{apply_style_presets, StylePreset};
pub use validator::{is_valid_tree, validate_component_tree, validate_tree, TreeIssue};
pub use view::{Element, View};
