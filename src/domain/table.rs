// ============================================================
// TABLE TYPES
// ============================================================
// In-memory representation of a parsed CSV or spreadsheet

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

/// Strings read as missing values, same set pandas uses by default
const NA_VALUES: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(String),
    Empty,
}

impl Scalar {
    /// Infer the most specific value for a raw text cell
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || NA_VALUES.contains(&trimmed) {
            return Scalar::Empty;
        }
        if let Ok(number) = trimmed.parse::<f64>() {
            return Scalar::Number(number);
        }
        if let Some(date) = DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        {
            return Scalar::Date(date);
        }
        if let Some(datetime) = DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        {
            return Scalar::DateTime(datetime);
        }
        Scalar::Text(raw.to_string())
    }

    /// Collapse a midnight timestamp to a plain date
    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        if datetime.time() == NaiveTime::MIN {
            Scalar::Date(datetime.date())
        } else {
            Scalar::DateTime(datetime)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Scalar::Empty)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number(value) => write!(f, "{}", value),
            Scalar::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Scalar::DateTime(datetime) => write!(f, "{}", datetime.format("%Y-%m-%d %H:%M:%S")),
            Scalar::Text(text) => f.write_str(text),
            Scalar::Empty => Ok(()),
        }
    }
}

/// Numbers stay numbers, temporal values become ISO strings, empty cells become `null`
impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Number(value) => serializer.serialize_f64(*value),
            Scalar::Empty => serializer.serialize_none(),
            Scalar::Text(text) => serializer.serialize_str(text),
            other => serializer.collect_str(other),
        }
    }
}

/// A named column of cells
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Scalar>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered named columns; the first column doubles as the row index
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Build a table from a header and row-major cells.
    ///
    /// Header names are normalized with [`normalize_headers`]. Rows shorter than
    /// the header are padded with [`Scalar::Empty`]; extra trailing cells are dropped,
    /// callers that care reject them before building.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Scalar>>) -> Self {
        let names = normalize_headers(headers);
        let mut columns: Vec<Column> = names
            .into_iter()
            .map(|name| Column::new(name, Vec::with_capacity(rows.len())))
            .collect();

        for row in rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.values.push(cells.next().unwrap_or(Scalar::Empty));
            }
        }

        Self { columns }
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// The implicit row index (first column)
    pub fn index(&self) -> Option<&Column> {
        self.columns.first()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Replace blank names with `Unnamed: <i>` and make duplicates unique as `name.1`, `name.2`, ...
pub fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut names = Vec::with_capacity(headers.len());

    for (idx, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            header
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }

        seen.insert(name.clone());
        names.push(name);
    }

    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_infer_numbers() {
        assert_eq!(Scalar::infer("10"), Scalar::Number(10.0));
        assert_eq!(Scalar::infer(" -2.5 "), Scalar::Number(-2.5));
        assert_eq!(Scalar::infer("1e3"), Scalar::Number(1000.0));
    }

    #[test]
    fn test_infer_missing_values() {
        for raw in ["", "   ", "NaN", "N/A", "null", "NULL", "#N/A"] {
            assert_eq!(Scalar::infer(raw), Scalar::Empty, "raw={:?}", raw);
        }
    }

    #[test]
    fn test_infer_temporal() {
        assert_eq!(Scalar::infer("2021-01-01"), Scalar::Date(date(2021, 1, 1)));
        assert_eq!(Scalar::infer("2021/03/04"), Scalar::Date(date(2021, 3, 4)));
        assert_eq!(
            Scalar::infer("2021-01-01 12:30:00"),
            Scalar::DateTime(date(2021, 1, 1).and_hms_opt(12, 30, 0).unwrap())
        );
        assert_eq!(
            Scalar::infer("2021-01-01T08:15"),
            Scalar::DateTime(date(2021, 1, 1).and_hms_opt(8, 15, 0).unwrap())
        );
    }

    #[test]
    fn test_infer_text_keeps_original() {
        assert_eq!(Scalar::infer(" Berlin "), Scalar::Text(" Berlin ".to_string()));
    }

    #[test]
    fn test_from_datetime_midnight_is_date() {
        let midnight = date(2020, 5, 1).and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(Scalar::from_datetime(midnight), Scalar::Date(date(2020, 5, 1)));

        let noon = date(2020, 5, 1).and_hms_opt(12, 0, 0).unwrap();
        assert_eq!(Scalar::from_datetime(noon), Scalar::DateTime(noon));
    }

    #[test]
    fn test_scalar_serialization() {
        let values = vec![
            Scalar::Number(1.5),
            Scalar::Date(date(2021, 1, 2)),
            Scalar::Text("abc".to_string()),
            Scalar::Empty,
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[1.5,"2021-01-02","abc",null]"#);
    }

    #[test]
    fn test_scalar_display() {
        assert_eq!(Scalar::Number(10.0).to_string(), "10");
        assert_eq!(Scalar::Number(0.25).to_string(), "0.25");
        assert_eq!(Scalar::Date(date(2021, 1, 1)).to_string(), "2021-01-01");
        assert_eq!(Scalar::Empty.to_string(), "");
    }

    #[test]
    fn test_normalize_headers() {
        let names = normalize_headers(vec![
            "".to_string(),
            "a".to_string(),
            "a".to_string(),
            "a.1".to_string(),
            "  ".to_string(),
        ]);
        assert_eq!(names, vec!["Unnamed: 0", "a", "a.1", "a.1.1", "Unnamed: 4"]);
    }

    #[test]
    fn test_from_rows_pads_short_rows() {
        let table = Table::from_rows(
            vec!["x".to_string(), "y".to_string(), "z".to_string()],
            vec![
                vec![Scalar::Number(1.0), Scalar::Number(2.0), Scalar::Number(3.0)],
                vec![Scalar::Number(4.0)],
            ],
        );

        assert_eq!(table.width(), 3);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column("z").unwrap().values[1], Scalar::Empty);
        assert_eq!(table.index().unwrap().name, "x");
    }

    #[test]
    fn test_empty_table() {
        let table = Table::default();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
        assert!(table.index().is_none());
    }
}
