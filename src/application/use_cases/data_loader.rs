use std::path::PathBuf;

use crate::domain::directory::DataFormat;
use crate::domain::error::{AppError, Result};
use crate::domain::table::Table;
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::spreadsheet::SpreadsheetParser;
use crate::infrastructure::storage::{normalize_request_path, resolve_within};

/// Loads a data file below the browse root, choosing the parser by extension
#[derive(Debug, Clone)]
pub struct DataLoader {
    root: PathBuf,
}

impl DataLoader {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Parse the file at `request_path`; nothing is cached, every call reads from disk
    pub fn load(&self, request_path: &str) -> Result<Table> {
        let relative = normalize_request_path(request_path)?;
        let path = resolve_within(&self.root, &relative);

        let format = DataFormat::from_path(&path).ok_or_else(|| {
            AppError::ParseError(format!(
                "Unsupported file format: {} (expected .csv, .xls or .xlsx)",
                relative
            ))
        })?;

        let table = match format {
            DataFormat::Csv => CsvParser::new().parse_file(&path)?,
            DataFormat::Spreadsheet => SpreadsheetParser::new().parse_file(&path)?,
        };

        tracing::info!(
            path = %path.display(),
            columns = table.width(),
            rows = table.row_count(),
            "Loaded table"
        );
        Ok(table)
    }
}
