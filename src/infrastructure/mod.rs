pub mod bootstrap;
pub mod config;
pub mod csv;
pub mod session;
pub mod spreadsheet;
pub mod storage;
