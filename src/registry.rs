use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use crate::error::{CanvasError, CanvasResult};
use crate::node::Props;
use crate::view::View;

/// A renderable widget.
///
/// `props` are the node's props with style presets already merged in.
/// `children` holds the already-rendered child views, and is `None` when the
/// node had no children so the widget keeps its own default content.
pub trait Widget: Send + Sync {
    fn render(&self, props: &Props, children: Option<Vec<View>>) -> CanvasResult<View>;
}

impl<F> Widget for F
where
    F: Fn(&Props, Option<Vec<View>>) -> CanvasResult<View> + Send + Sync,
{
    fn render(&self, props: &Props, children: Option<Vec<View>>) -> CanvasResult<View> {
        self(props, children)
    }
}

/// Startup-time mapping from component type names to widgets
#[derive(Default)]
pub struct ComponentRegistry {
    widgets: HashMap<String, Box<dyn Widget>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a widget under a PascalCase name
    pub fn register(
        &mut self,
        name: impl Into<String>,
        widget: impl Widget + 'static,
    ) -> CanvasResult<()> {
        let name = name.into();
        validate_component_name(&name)?;
        if self.widgets.contains_key(&name) {
            return Err(CanvasError::DuplicateComponent { name });
        }
        self.widgets.insert(name, Box::new(widget));
        Ok(())
    }

    /// Builder form of [`register`](Self::register)
    pub fn with(mut self, name: impl Into<String>, widget: impl Widget + 'static) -> CanvasResult<Self> {
        self.register(name, widget)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Widget> {
        self.widgets.get(name).map(|w| w.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.widgets.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.widgets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("components", &self.names())
            .finish()
    }
}

/// Component names are PascalCase identifiers
pub fn validate_component_name(name: &str) -> CanvasResult<()> {
    static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = NAME_REGEX.get_or_init(|| Regex::new(r"^[A-Z][A-Za-z0-9]*$").unwrap());

    if re.is_match(name) {
        Ok(())
    } else {
        Err(CanvasError::InvalidComponentName {
            name: name.to_string(),
            reason: "must be PascalCase (an uppercase letter followed by letters or digits)"
                .to_string(),
        })
    }
}
