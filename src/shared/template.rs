//! Small helpers used while rendering HTML pages.

use chrono::{Local, TimeZone};
use url::Url;

/// Normalize OS path separators to forward slashes for use in links
pub fn as_uri(path: &str) -> String {
    path.replace(std::path::MAIN_SEPARATOR, "/").replace('\\', "/")
}

/// Format Unix seconds in local time as `YYYY-MM-DD HH:MM`
pub fn as_date(seconds: i64) -> String {
    match Local.timestamp_opt(seconds, 0).earliest() {
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M").to_string(),
        None => String::new(),
    }
}

/// Human readable byte count
pub fn as_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Build an absolute link `prefix` + percent-encoded `/` separated `path`
pub fn link(prefix: &str, path: &str) -> String {
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return format!("{}{}", prefix, path);
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear();
        segments.extend(prefix.split('/').filter(|s| !s.is_empty()));
        segments.extend(as_uri(path).split('/').filter(|s| !s.is_empty()));
    }
    url.path().to_string()
}

/// JSON that can be embedded inside a `<script>` element
pub fn script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}
