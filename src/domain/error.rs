use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppError {
    Internal(String),
    NotFound(String),
    PermissionDenied(String),
    ValidationError(String),
    ParseError(String),
    IoError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => AppError::NotFound(err.to_string()),
            std::io::ErrorKind::PermissionDenied => AppError::PermissionDenied(err.to_string()),
            _ => AppError::IoError(err.to_string()),
        }
    }
}

impl AppError {
    /// Attach the offending path to an I/O failure while keeping its category.
    pub fn from_io(err: std::io::Error, path: &std::path::Path) -> Self {
        let detail = format!("{}: {}", path.display(), err);
        match err.kind() {
            std::io::ErrorKind::NotFound => AppError::NotFound(detail),
            std::io::ErrorKind::PermissionDenied => AppError::PermissionDenied(detail),
            _ => AppError::IoError(detail),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
