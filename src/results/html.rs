//! Escaping markup builders.
//!
//! Cell values are always text. The replay download link is the only markup
//! built from data, and it goes through [`replay_link`].

use serde_json::Value;

/// Escape text for use as element content or a quoted attribute value.
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Text shown for a cell value. `null` shows as nothing.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Bare filename of a path, splitting on both `/` and `\`.
pub fn replay_basename(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path)
}

/// Href for a replay file under `route`, e.g. `/replays/`.
pub fn replay_href(route: &str, filename: &str) -> String {
    format!("{}{}", route, urlencoding::encode(filename))
}

/// Download anchor for a replay href.
pub fn replay_link(href: &str) -> String {
    format!(r#"<a href="{}" download>Replay</a>"#, escape_text(href))
}
