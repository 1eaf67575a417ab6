use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

use crate::node::{MalformedField, Props};

pub const SPACING_PROP: &str = "spacing";
pub const THEME_PROP: &str = "theme";
pub const EMPHASIS_PROP: &str = "emphasis";

/// Style hints an AI producer may attach to a node.
///
/// A set field overrides the widget's default for that concern; an unset field
/// inherits it. Fields outside these three are ignored when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePreset {
    /// Layout gap token (e.g. `compact`, `relaxed`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<String>,
    /// Named visual theme token (e.g. `success`, `danger`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Typographic weight token (e.g. `low`, `high`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<String>,
}

impl StylePreset {
    pub fn spacing(mut self, token: impl Into<String>) -> Self {
        self.spacing = Some(token.into());
        self
    }

    pub fn theme(mut self, token: impl Into<String>) -> Self {
        self.theme = Some(token.into());
        self
    }

    pub fn emphasis(mut self, token: impl Into<String>) -> Self {
        self.emphasis = Some(token.into());
        self
    }

    /// True when no recognized field is set
    pub fn is_empty(&self) -> bool {
        self.spacing.is_none() && self.theme.is_none() && self.emphasis.is_none()
    }

    /// Build a preset from a decoded style object, recording wrong-typed
    /// tokens in `malformed` instead of failing
    pub(crate) fn from_entries(entries: Props, malformed: &mut Vec<MalformedField>) -> Self {
        let mut style = StylePreset::default();
        for (key, value) in entries {
            let slot = match key.as_str() {
                SPACING_PROP => &mut style.spacing,
                THEME_PROP => &mut style.theme,
                EMPHASIS_PROP => &mut style.emphasis,
                _ => continue,
            };
            match value {
                Value::String(token) => *slot = Some(token),
                Value::Null => {}
                other => malformed.push(MalformedField {
                    field: format!("style.{}", key),
                    expected: "a string",
                    found: other,
                }),
            }
        }
        style
    }

    pub(crate) fn to_entries(&self) -> Props {
        self.entries()
            .into_iter()
            .filter_map(|(key, token)| Some((key.to_string(), Value::String(token?.clone()))))
            .collect()
    }

    fn entries(&self) -> [(&'static str, Option<&String>); 3] {
        [
            (SPACING_PROP, self.spacing.as_ref()),
            (THEME_PROP, self.theme.as_ref()),
            (EMPHASIS_PROP, self.emphasis.as_ref()),
        ]
    }
}

/// Merge style hints into a node's props.
///
/// Returns the input borrowed when there is nothing to merge. Otherwise every
/// set preset field overwrites the same-named prop.
pub fn apply_style_presets<'a>(props: &'a Props, style: Option<&StylePreset>) -> Cow<'a, Props> {
    let Some(style) = style.filter(|s| !s.is_empty()) else {
        return Cow::Borrowed(props);
    };

    let mut merged = props.clone();
    for (key, value) in style.entries() {
        if let Some(token) = value {
            merged.insert(key.to_string(), Value::String(token.clone()));
        }
    }
    Cow::Owned(merged)
}
