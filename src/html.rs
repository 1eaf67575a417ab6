//! Converts rendered views to safe HTML.
//! Only structure, text and `data-*` attributes; no scripts or inline handlers.

use regex::Regex;
use serde_json::Value;
use std::fmt::Write;
use std::sync::OnceLock;

use crate::fallback::Fallback;
use crate::view::{Element, View};

/// Tags a widget may emit; anything else is written as a `div`
const ALLOWED_TAGS: &[&str] = &[
    "div", "section", "article", "header", "footer", "span", "p", "h1", "h2", "h3", "h4", "h5",
    "h6", "ul", "ol", "li", "button", "hr", "strong", "em", "code", "pre",
];

const VOID_TAGS: &[&str] = &["hr"];

impl View {
    /// Serialize this view as an HTML fragment
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = view_to_html(self, &mut out);
        out
    }
}

fn view_to_html(view: &View, out: &mut String) -> std::fmt::Result {
    match view {
        View::Text(text) => write!(out, "{}", escape_html(text)),
        View::Element(el) => element_to_html(el, out),
        View::Fallback(fallback) => fallback_to_html(fallback, out),
    }
}

fn element_to_html(el: &Element, out: &mut String) -> std::fmt::Result {
    let tag = if ALLOWED_TAGS.contains(&el.tag.as_str()) {
        el.tag.as_str()
    } else {
        "div"
    };

    write!(
        out,
        "<{} class=\"canvas-{}\"",
        tag,
        escape_html(&kebab_case(&el.component))
    )?;
    for (key, value) in &el.props {
        let Some(text) = scalar_attr(value) else {
            continue;
        };
        let name = format!("data-{}", kebab_case(key));
        if is_safe_data_attr(&name) {
            write!(out, " {}=\"{}\"", name, escape_html(&text))?;
        }
    }

    if VOID_TAGS.contains(&tag) {
        return write!(out, ">");
    }

    write!(out, ">")?;
    for child in &el.children {
        view_to_html(child, out)?;
    }
    write!(out, "</{}>", tag)
}

fn fallback_to_html(fallback: &Fallback, out: &mut String) -> std::fmt::Result {
    write!(
        out,
        "<div class=\"canvas-fallback\" role=\"alert\" data-reason=\"{}\">",
        reason_attr(fallback)
    )?;
    write!(out, "<strong>{}</strong>", escape_html(&fallback.summary()))?;
    if let Some(message) = &fallback.message {
        write!(out, "<p>{}</p>", escape_html(message))?;
    }
    let open = if fallback.expanded { " open" } else { "" };
    write!(
        out,
        "<details{}><summary>Node data</summary><pre>{}</pre></details></div>",
        open,
        escape_html(&fallback.raw)
    )
}

fn reason_attr(fallback: &Fallback) -> &'static str {
    use crate::fallback::FallbackReason::*;
    match fallback.reason {
        UnknownType => "unknown-type",
        DepthExceeded => "depth-exceeded",
        RenderError => "render-error",
    }
}

fn scalar_attr(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn is_safe_data_attr(name: &str) -> bool {
    static DATA_ATTR_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = DATA_ATTR_REGEX.get_or_init(|| Regex::new(r"^data-[a-z][a-z0-9-]*$").unwrap());
    re.is_match(name)
}

/// `ListItem` -> `list-item`, `emptyText` -> `empty-text`
fn kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
