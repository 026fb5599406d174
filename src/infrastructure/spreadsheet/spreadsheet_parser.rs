use std::fs;
use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Range, Reader};

use crate::domain::error::AppError;
use crate::domain::table::{Scalar, Table};

/// Reads the first worksheet of a workbook into a table, first row as header
#[derive(Debug, Clone, Default)]
pub struct SpreadsheetParser;

impl SpreadsheetParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_file(&self, path: &Path) -> Result<Table, AppError> {
        // Surface missing/unreadable files as filesystem errors, not parse errors
        fs::metadata(path).map_err(|e| AppError::from_io(e, path))?;

        let mut workbook = open_workbook_auto(path).map_err(|e| {
            AppError::ParseError(format!(
                "Failed to open Excel file {}: {}",
                path.display(),
                e
            ))
        })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| {
                AppError::ParseError(format!("No worksheet found in {}", path.display()))
            })?
            .map_err(|e| {
                AppError::ParseError(format!(
                    "Failed to read Excel range {}: {}",
                    path.display(),
                    e
                ))
            })?;

        table_from_range(&range).map_err(|e| match e {
            AppError::ParseError(msg) => {
                AppError::ParseError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }
}

/// Convert a worksheet range into a table
pub(crate) fn table_from_range(range: &Range<Data>) -> Result<Table, AppError> {
    let mut rows = range.rows();

    let header = rows
        .next()
        .ok_or_else(|| AppError::ParseError("No columns to parse from worksheet".to_string()))?;
    let headers: Vec<String> = header.iter().map(header_name).collect();

    let body: Vec<Vec<Scalar>> = rows
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    Ok(Table::from_rows(headers, body))
}

fn header_name(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cell_value(cell: &Data) -> Scalar {
    match cell {
        Data::Empty | Data::Error(_) => Scalar::Empty,
        Data::Int(value) => Scalar::Number(*value as f64),
        Data::Float(value) => Scalar::Number(*value),
        Data::Bool(value) => Scalar::Text(value.to_string()),
        Data::String(s) => Scalar::infer(s),
        other => match other.as_datetime() {
            Some(datetime) => Scalar::from_datetime(datetime),
            None => Scalar::infer(&other.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};
    use chrono::NaiveDate;
    use std::io::Write;

    fn sheet(cells: &[&[Data]]) -> Range<Data> {
        let height = cells.len() as u32;
        let width = cells.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    #[test]
    fn test_range_to_table() {
        let range = sheet(&[
            &[Data::String("day".into()), Data::String("sales".into())],
            &[Data::String("2021-01-01".into()), Data::Int(10)],
            &[Data::String("2021-01-02".into()), Data::Float(20.5)],
        ]);

        let table = table_from_range(&range).unwrap();
        assert_eq!(table.column_names(), vec!["day", "sales"]);
        assert_eq!(
            table.column("day").unwrap().values[1],
            Scalar::Date(NaiveDate::from_ymd_opt(2021, 1, 2).unwrap())
        );
        assert_eq!(
            table.column("sales").unwrap().values,
            vec![Scalar::Number(10.0), Scalar::Number(20.5)]
        );
    }

    #[test]
    fn test_excel_serial_dates() {
        let range = sheet(&[
            &[Data::String("when".into())],
            &[Data::DateTime(ExcelDateTime::new(
                44197.0,
                ExcelDateTimeType::DateTime,
                false,
            ))],
            &[Data::DateTime(ExcelDateTime::new(
                44197.5,
                ExcelDateTimeType::DateTime,
                false,
            ))],
        ]);

        let table = table_from_range(&range).unwrap();
        let noon = NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(
            table.column("when").unwrap().values,
            vec![
                Scalar::Date(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()),
                Scalar::DateTime(noon),
            ]
        );
    }

    #[test]
    fn test_blank_headers_and_error_cells() {
        let range = sheet(&[
            &[Data::Empty, Data::String("v".into()), Data::Float(2021.0)],
            &[
                Data::Int(1),
                Data::Error(calamine::CellErrorType::Div0),
                Data::Bool(true),
            ],
        ]);

        let table = table_from_range(&range).unwrap();
        assert_eq!(table.column_names(), vec!["Unnamed: 0", "v", "2021"]);
        assert_eq!(table.column("v").unwrap().values[0], Scalar::Empty);
        assert_eq!(
            table.column("2021").unwrap().values[0],
            Scalar::Text("true".to_string())
        );
    }

    #[test]
    fn test_trailing_empty_rows_are_dropped() {
        let range = sheet(&[
            &[Data::String("a".into())],
            &[Data::Int(1)],
            &[Data::Empty],
        ]);
        let table = table_from_range(&range).unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_empty_range_is_parse_error() {
        let range: Range<Data> = Range::empty();
        assert!(matches!(
            table_from_range(&range),
            Err(AppError::ParseError(_))
        ));
    }

    #[test]
    fn test_corrupt_workbook_is_parse_error() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"definitely not a zip archive").unwrap();

        let err = SpreadsheetParser::new().parse_file(file.path()).unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)), "{:?}", err);
    }

    #[test]
    fn test_missing_workbook_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = SpreadsheetParser::new()
            .parse_file(&dir.path().join("nope.xlsx"))
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
