use crate::domain::chart::{ChartDescription, ChartSelection, Series};
use crate::domain::error::{AppError, Result};
use crate::domain::table::Table;

/// Column choice carried by a request, before it is checked against a table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionQuery {
    pub x: Option<String>,
    pub y: Vec<String>,
}

impl SelectionQuery {
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_empty()
    }
}

/// Turns a table plus a column selection into a chart description
#[derive(Debug, Clone, Default)]
pub struct ChartViewUseCase;

impl ChartViewUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Decide which columns to plot.
    ///
    /// An explicit query wins and must name existing columns. Without one, a stored
    /// selection for the same file is reused if it still fits, otherwise the defaults
    /// apply. A query with only `y` keeps the stored `x` for the same file. A query
    /// with `x` but no `y` plots nothing.
    pub fn resolve_selection(
        &self,
        path: &str,
        table: &Table,
        query: &SelectionQuery,
        stored: Option<ChartSelection>,
    ) -> Result<ChartSelection> {
        let default = ChartSelection::default_for(path, table);
        let stored = stored.filter(|s| s.path == path && s.fits(table));

        if query.is_empty() {
            return Ok(stored.unwrap_or(default));
        }

        let x = match (&query.x, stored) {
            (Some(x), _) => x.clone(),
            (None, Some(stored)) => stored.x,
            (None, None) => default.x,
        };
        let selection = ChartSelection::new(path, x, query.y.clone());

        let missing = selection.missing_columns(table);
        if !missing.is_empty() {
            return Err(AppError::ValidationError(format!(
                "Unknown column(s) {} in {}; available: {}",
                missing.join(", "),
                path,
                table.column_names().join(", ")
            )));
        }

        Ok(selection)
    }

    /// One line per selected y column, plotted against the x column
    pub fn describe(&self, table: &Table, selection: &ChartSelection) -> ChartDescription {
        let title = selection
            .path
            .rsplit('/')
            .next()
            .unwrap_or(&selection.path)
            .to_string();

        let series = match table.column(&selection.x) {
            Some(x_column) => selection
                .y
                .iter()
                .filter_map(|name| table.column(name))
                .map(|y_column| {
                    Series::line(
                        y_column.name.clone(),
                        x_column.values.clone(),
                        y_column.values.clone(),
                    )
                })
                .collect(),
            None => Vec::new(),
        };

        ChartDescription {
            title,
            x_label: selection.x.clone(),
            series,
        }
    }
}
