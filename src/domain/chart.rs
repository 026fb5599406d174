use serde::{Deserialize, Serialize};

use super::table::{Scalar, Table};

/// Which file is plotted and which columns drive the axes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSelection {
    /// File path relative to the browse root
    pub path: String,
    /// Column plotted on the x axis (empty only for a table without columns)
    pub x: String,
    /// Columns plotted as one line each, in display order
    pub y: Vec<String>,
}

impl ChartSelection {
    pub fn new(path: impl Into<String>, x: impl Into<String>, y: Vec<String>) -> Self {
        Self {
            path: path.into(),
            x: x.into(),
            y: dedup_preserving_order(y),
        }
    }

    /// First column against the last column
    pub fn default_for(path: impl Into<String>, table: &Table) -> Self {
        let x = table
            .columns
            .first()
            .map(|c| c.name.clone())
            .unwrap_or_default();
        let y = table
            .columns
            .last()
            .map(|c| vec![c.name.clone()])
            .unwrap_or_default();
        Self::new(path, x, y)
    }

    /// Names in this selection that `table` does not have
    pub fn missing_columns(&self, table: &Table) -> Vec<String> {
        if table.is_empty() {
            return Vec::new();
        }
        std::iter::once(&self.x)
            .chain(self.y.iter())
            .filter(|name| !table.has_column(name))
            .cloned()
            .collect()
    }

    pub fn fits(&self, table: &Table) -> bool {
        self.missing_columns(table).is_empty()
    }
}

/// One plotted line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub x: Vec<Scalar>,
    pub y: Vec<Scalar>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
}

impl Series {
    pub fn line(name: impl Into<String>, x: Vec<Scalar>, y: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            kind: "scatter",
            mode: "lines",
        }
    }
}

/// Everything the browser needs to draw the chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescription {
    pub title: String,
    pub x_label: String,
    pub series: Vec<Series>,
}

fn dedup_preserving_order(names: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}
