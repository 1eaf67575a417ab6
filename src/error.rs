use thiserror::Error;

pub type CanvasResult<T> = Result<T, CanvasError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CanvasError {
    // --- tree structure ---

    #[error("Missing required field 'component'")]
    MissingComponent,

    #[error("Missing required field 'props' for component '{component}'")]
    MissingProps { component: String },

    #[error("Unknown component type '{component}': not present in the component registry")]
    UnknownComponent { component: String },

    #[error("'{field}' must be {expected}")]
    MalformedField { field: String, expected: String },

    #[error("Maximum nesting depth ({max_depth}) exceeded")]
    MaxNestingDepthExceeded { max_depth: usize },

    // --- widget invocation ---

    #[error("Missing required property '{property}' for component '{component}'")]
    MissingProperty {
        component: String,
        property: String,
    },

    #[error("Invalid property '{property}' for component '{component}': {reason}")]
    InvalidProperty {
        component: String,
        property: String,
        reason: String,
    },

    #[error("Component '{component}' panicked while rendering: {message}")]
    WidgetPanicked { component: String, message: String },

    // --- registry ---

    #[error("Invalid component name '{name}': {reason}")]
    InvalidComponentName { name: String, reason: String },

    #[error("Component '{name}' is already registered")]
    DuplicateComponent { name: String },

    // --- loading ---

    #[error("JSON error: {0}")]
    Json(String),

    #[error("YAML error: {0}")]
    Yaml(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CanvasError {
    fn from(err: serde_json::Error) -> Self {
        CanvasError::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for CanvasError {
    fn from(err: serde_yaml::Error) -> Self {
        CanvasError::Yaml(err.to_string())
    }
}

impl From<std::io::Error> for CanvasError {
    fn from(err: std::io::Error) -> Self {
        CanvasError::Io(err.to_string())
    }
}
