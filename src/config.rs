use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CanvasError, CanvasResult};

/// Default maximum nesting depth for a render pass
pub const DEFAULT_MAX_DEPTH: usize = 50;

/// Default number of child levels kept in a fallback's raw dump
pub const DEFAULT_DUMP_DEPTH: usize = 8;

/// Environment variable overriding [`RenderConfig::max_depth`]
pub const MAX_DEPTH_ENV: &str = "CANVAS_MAX_DEPTH";

/// Renderer settings, loadable from a YAML file such as:
///
/// ```yaml
/// maxDepth: 80
/// catchPanics: true
/// dumpDepth: 4
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderConfig {
    /// Nodes deeper than this render as a fallback
    pub max_depth: usize,
    /// Convert panicking widgets into fallbacks instead of unwinding
    pub catch_panics: bool,
    /// Child levels kept in a fallback's raw dump
    pub dump_depth: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            catch_panics: true,
            dump_depth: DEFAULT_DUMP_DEPTH,
        }
    }
}

impl RenderConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn from_yaml(yaml: &str) -> CanvasResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config file
    pub fn load(path: impl AsRef<Path>) -> CanvasResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| CanvasError::Io(format!("read {}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    /// Apply `CANVAS_MAX_DEPTH` if it is set
    pub fn with_env_overrides(self) -> CanvasResult<Self> {
        match std::env::var(MAX_DEPTH_ENV) {
            Ok(raw) => self.with_max_depth_override(&raw),
            Err(_) => Ok(self),
        }
    }

    fn with_max_depth_override(self, raw: &str) -> CanvasResult<Self> {
        let max_depth = raw.trim().parse::<usize>().map_err(|_| {
            CanvasError::Config(format!(
                "{} must be a non-negative integer, got '{}'",
                MAX_DEPTH_ENV, raw
            ))
        })?;
        Ok(self.with_max_depth(max_depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.max_depth, 50);
        assert!(config.catch_panics);
        assert_eq!(config.dump_depth, 8);
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = RenderConfig::from_yaml("maxDepth: 80\n").unwrap();
        assert_eq!(config.max_depth, 80);
        assert!(config.catch_panics);
        assert_eq!(config.dump_depth, DEFAULT_DUMP_DEPTH);
    }

    #[test]
    fn test_from_yaml_empty() {
        assert_eq!(RenderConfig::from_yaml("").unwrap(), RenderConfig::default());
    }

    #[test]
    fn test_from_yaml_invalid() {
        assert!(matches!(
            RenderConfig::from_yaml("maxDepth: lots"),
            Err(CanvasError::Yaml(_))
        ));
    }

    #[test]
    fn test_max_depth_override() {
        let config = RenderConfig::default().with_max_depth_override(" 120 ").unwrap();
        assert_eq!(config.max_depth, 120);
        assert!(matches!(
            RenderConfig::default().with_max_depth_override("-1"),
            Err(CanvasError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            RenderConfig::load("/nonexistent/canvas.yaml"),
            Err(CanvasError::Io(_))
        ));
    }
}
