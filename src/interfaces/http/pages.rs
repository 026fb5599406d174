use actix_web::http::StatusCode;

use crate::domain::chart::ChartSelection;
use crate::domain::directory::{Breadcrumb, DirectoryEntry, DirectoryListing};
use crate::shared::template::{as_date, as_size, escape_html, link, script_json};

const PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; color: #222; }
header { background: #2c3e50; color: #fff; padding: 0.75rem 1.5rem; }
header a { color: #fff; text-decoration: none; }
main { padding: 1rem 1.5rem; }
nav.crumbs a { color: #2c6fbb; }
table.listing { border-collapse: collapse; min-width: 40rem; }
table.listing td, table.listing th { text-align: left; padding: 0.3rem 1rem 0.3rem 0; }
table.listing tr:hover { background: #f3f6fa; }
form.selection { display: flex; gap: 2rem; align-items: flex-start; }
form.selection select { min-width: 12rem; }
#chart { width: 100%; height: 70vh; }
.muted { color: #888; }
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<header><a href="/">chartdir</a></header>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape_html(title),
        style = STYLE,
        body = body
    )
}

fn crumbs(breadcrumbs: &[Breadcrumb]) -> String {
    let mut html = String::from(r#"<nav class="crumbs"><a href="/">~</a>"#);
    for crumb in breadcrumbs {
        html.push_str(&format!(
            r#" / <a href="{}">{}</a>"#,
            escape_html(&link("/", &crumb.path)),
            escape_html(&crumb.name)
        ));
    }
    html.push_str("</nav>");
    html
}

fn entry_row(entry: &DirectoryEntry, href: String, label: String) -> String {
    let modified = entry.modified.map(as_date).unwrap_or_default();
    let size = if entry.is_dir() {
        String::new()
    } else {
        as_size(entry.size)
    };
    format!(
        r#"<tr><td><a href="{}">{}</a></td><td class="muted">{}</td><td class="muted">{}</td></tr>"#,
        escape_html(&href),
        escape_html(&label),
        modified,
        size
    )
}

/// Directory page: sub-directories first, then plottable files
pub fn listing_page(listing: &DirectoryListing) -> String {
    let mut rows = String::new();

    if let Some(parent) = listing.parent() {
        rows.push_str(&format!(
            r#"<tr><td><a href="{}">..</a></td><td></td><td></td></tr>"#,
            escape_html(&link("/", &parent))
        ));
    }
    for dir in &listing.directories {
        rows.push_str(&entry_row(dir, link("/", &dir.path), format!("{}/", dir.name)));
    }
    for file in &listing.files {
        rows.push_str(&entry_row(file, link("/plot", &file.path), file.name.clone()));
    }

    let empty_note = if listing.directories.is_empty() && listing.files.is_empty() {
        r#"<p class="muted">No sub-directories or data files here.</p>"#
    } else {
        ""
    };

    let title = if listing.path.is_empty() {
        "~".to_string()
    } else {
        listing.path.clone()
    };

    let body = format!(
        r#"{crumbs}
<table class="listing">
<thead><tr><th>Name</th><th>Modified</th><th>Size</th></tr></thead>
<tbody>
{rows}
</tbody>
</table>
{empty_note}"#,
        crumbs = crumbs(&listing.breadcrumbs),
        rows = rows,
        empty_note = empty_note
    );

    layout(&title, &body)
}

fn options(columns: &[&str], is_selected: impl Fn(&str) -> bool) -> String {
    columns
        .iter()
        .map(|name| {
            format!(
                r#"<option value="{value}"{selected}>{label}</option>"#,
                value = escape_html(name),
                selected = if is_selected(name) { " selected" } else { "" },
                label = escape_html(name)
            )
        })
        .collect::<Vec<_>>()
        .join("")
}

/// Chart page: column pickers bound to the chart through a GET form
pub fn chart_page(
    selection: &ChartSelection,
    columns: &[&str],
    row_count: usize,
    chart_json: &str,
) -> String {
    let breadcrumbs = crate::domain::directory::breadcrumbs(&selection.path);
    let x_options = options(columns, |name| name == selection.x);
    let y_options = options(columns, |name| selection.y.iter().any(|y| y == name));
    let y_size = columns.len().clamp(2, 10);

    let body = format!(
        r#"{crumbs}
<p class="muted">{rows} rows, {cols} columns</p>
<form class="selection" method="get" action="{action}">
<label>X axis<br><select name="x" onchange="this.form.submit()">{x_options}</select></label>
<label>Y axis<br><select name="y" multiple size="{y_size}" onchange="this.form.submit()">{y_options}</select></label>
<noscript><button type="submit">Plot</button></noscript>
</form>
<div id="chart"></div>
<script src="{plotly}"></script>
<script>
const chart = {chart_json};
Plotly.newPlot("chart", chart.series, {{
  title: {{ text: chart.title }},
  xaxis: {{ title: {{ text: chart.x_label }} }},
  showlegend: true
}});
</script>"#,
        crumbs = crumbs(&breadcrumbs),
        rows = row_count,
        cols = columns.len(),
        action = escape_html(&link("/plot", &selection.path)),
        x_options = x_options,
        y_size = y_size,
        y_options = y_options,
        plotly = PLOTLY_SRC,
        chart_json = script_json(chart_json)
    );

    layout(&selection.path, &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        r#"<h1>{} {}</h1>
<p>{}</p>
<p><a href="/">Back to the start</a></p>"#,
        status.as_u16(),
        escape_html(reason),
        escape_html(message)
    );
    layout(reason, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::directory::EntryKind;

    fn listing() -> DirectoryListing {
        DirectoryListing::from_entries(
            "data".to_string(),
            vec![
                DirectoryEntry::new(
                    "raw files".to_string(),
                    "data/raw files".to_string(),
                    EntryKind::Directory,
                    0,
                    None,
                ),
                DirectoryEntry::new(
                    "q1.csv".to_string(),
                    "data/q1.csv".to_string(),
                    EntryKind::File,
                    2048,
                    Some(1_609_459_200),
                ),
            ],
        )
    }

    #[test]
    fn test_listing_page_links() {
        let html = listing_page(&listing());
        assert!(html.contains(r#"href="/data/raw%20files">raw files/</a>"#), "{}", html);
        assert!(html.contains(r#"href="/plot/data/q1.csv">q1.csv</a>"#));
        assert!(html.contains(r#"<a href="/">..</a>"#));
        assert!(html.contains("2.0 KB"));
        assert!(html.contains(&as_date(1_609_459_200)));
    }

    #[test]
    fn test_empty_listing_note() {
        let html = listing_page(&DirectoryListing::from_entries(String::new(), Vec::new()));
        assert!(html.contains("No sub-directories or data files here."));
        assert!(!html.contains(">..</a>"));
    }

    #[test]
    fn test_chart_page_marks_selection() {
        let selection = ChartSelection::new("data/q1.csv", "date", vec!["b".to_string()]);
        let html = chart_page(&selection, &["date", "a", "b"], 3, r#"{"series":[]}"#);

        assert!(html.contains(r#"<select name="x" onchange="this.form.submit()"><option value="date" selected>date</option>"#));
        assert!(html.contains(r#"<option value="a">a</option><option value="b" selected>b</option></select>"#));
        assert!(html.contains(r#"action="/plot/data/q1.csv""#));
        assert!(html.contains(r#"const chart = {"series":[]};"#));
        assert!(html.contains("3 rows, 3 columns"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let html = error_page(StatusCode::NOT_FOUND, "<script>x</script>");
        assert!(html.contains("404 Not Found"));
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>x"));
    }
}
