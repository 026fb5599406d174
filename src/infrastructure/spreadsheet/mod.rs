// ============================================================
// SPREADSHEET INFRASTRUCTURE LAYER
// ============================================================
// Excel (.xls / .xlsx) workbooks read through calamine

mod spreadsheet_parser;

pub use spreadsheet_parser::SpreadsheetParser;
