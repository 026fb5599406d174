// ============================================================
// CSV PARSER
// ============================================================
// Parse CSV files into tables with encoding detection and error handling

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::WINDOWS_1252;

use crate::domain::error::AppError;
use crate::domain::table::{Scalar, Table};

const UTF8_BOM: &str = "\u{feff}";

/// CSV parser with encoding detection
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,

    /// Whether to trim whitespace from values
    trim: bool,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: false,
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to trim whitespace
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Parse a CSV file into a table
    pub fn parse_file(&self, path: &Path) -> Result<Table, AppError> {
        let content = self.read_with_encoding_detection(path)?;

        self.parse_content(&content).map_err(|e| match e {
            AppError::ParseError(msg) => {
                AppError::ParseError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse CSV content from string
    pub fn parse_content(&self, content: &str) -> Result<Table, AppError> {
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
        if content.trim().is_empty() {
            return Err(AppError::ParseError(
                "No columns to parse from file".to_string(),
            ));
        }

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .flexible(true) // Width is checked per row below
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .clone();
        let width = headers.len();

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;

            if is_blank(&record) {
                continue;
            }
            if record.len() > width {
                let line = record
                    .position()
                    .map(|p| p.line())
                    .unwrap_or(index as u64 + 2);
                return Err(AppError::ParseError(format!(
                    "Expected {} fields in line {}, saw {}",
                    width,
                    line,
                    record.len()
                )));
            }

            rows.push(record.iter().map(Scalar::infer).collect());
        }

        let headers = headers.iter().map(str::to_string).collect();
        Ok(Table::from_rows(headers, rows))
    }

    /// Read file as UTF-8, falling back to Windows-1252 for legacy exports
    fn read_with_encoding_detection(&self, path: &Path) -> Result<String, AppError> {
        let buffer = fs::read(path).map_err(|e| AppError::from_io(e, path))?;

        match String::from_utf8(buffer) {
            Ok(content) => Ok(content),
            Err(err) => {
                let bytes = err.into_bytes();
                let (decoded, _, had_errors) = WINDOWS_1252.decode(&bytes);
                if had_errors {
                    tracing::warn!(
                        path = %path.display(),
                        "CSV contains bytes that are neither UTF-8 nor Windows-1252"
                    );
                }
                Ok(decoded.into_owned())
            }
        }
    }
}

/// Lines with no content at all are skipped
fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0).map(str::is_empty).unwrap_or(true)
}
