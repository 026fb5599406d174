// ============================================================
// DIRECTORY DOMAIN TYPES
// ============================================================
// Entries produced by a single directory scan

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extensions recognized as plottable data files (lowercase, no dot)
pub const DATA_EXTENSIONS: [&str; 3] = ["csv", "xls", "xlsx"];

/// Parser family selected from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataFormat {
    /// Comma separated text
    Csv,
    /// Excel workbook (`.xls` or `.xlsx`)
    Spreadsheet,
}

impl DataFormat {
    /// Determine the format from a file name or path, `None` when not recognized
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(DataFormat::Csv),
            "xls" | "xlsx" => Some(DataFormat::Spreadsheet),
            _ => None,
        }
    }
}

/// Whether `name` carries one of the [`DATA_EXTENSIONS`]
pub fn is_data(name: impl AsRef<Path>) -> bool {
    DataFormat::from_path(name).is_some()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// A single child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// File or directory name
    pub name: String,

    /// Path relative to the browse root, `/` separated
    pub path: String,

    pub kind: EntryKind,

    /// True iff the extension is in [`DATA_EXTENSIONS`]
    pub is_data: bool,

    /// Size in bytes (0 for directories)
    pub size: u64,

    /// Last modification time as Unix seconds, when the platform reports it
    pub modified: Option<i64>,
}

impl DirectoryEntry {
    pub fn new(name: String, path: String, kind: EntryKind, size: u64, modified: Option<i64>) -> Self {
        let is_data = kind == EntryKind::File && is_data(&name);
        Self {
            name,
            path,
            kind,
            is_data,
            size,
            modified,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// One clickable segment of the current location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub name: String,
    pub path: String,
}

/// Result of listing one directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryListing {
    /// Listed path relative to the browse root (empty for the root itself)
    pub path: String,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub directories: Vec<DirectoryEntry>,
    pub files: Vec<DirectoryEntry>,
}

impl DirectoryListing {
    /// Split entries into sub-directories and recognized data files, both sorted by name
    pub fn from_entries(path: String, entries: Vec<DirectoryEntry>) -> Self {
        let (mut directories, files): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(DirectoryEntry::is_dir);
        let mut files: Vec<_> = files.into_iter().filter(|entry| entry.is_data).collect();

        directories.sort_by_key(|entry| entry.name.to_lowercase());
        files.sort_by_key(|entry| entry.name.to_lowercase());

        let breadcrumbs = breadcrumbs(&path);
        Self {
            path,
            breadcrumbs,
            directories,
            files,
        }
    }

    /// Path of the parent directory, `None` at the browse root
    pub fn parent(&self) -> Option<String> {
        if self.path.is_empty() {
            return None;
        }
        Some(match self.path.rsplit_once('/') {
            Some((parent, _)) => parent.to_string(),
            None => String::new(),
        })
    }
}

/// Cumulative prefixes of a `/` separated path
pub fn breadcrumbs(path: &str) -> Vec<Breadcrumb> {
    let mut crumbs = Vec::new();
    let mut prefix = String::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(segment);
        crumbs.push(Breadcrumb {
            name: segment.to_string(),
            path: prefix.clone(),
        });
    }
    crumbs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> DirectoryEntry {
        DirectoryEntry::new(name.to_string(), name.to_string(), EntryKind::File, 10, None)
    }

    fn dir(name: &str) -> DirectoryEntry {
        DirectoryEntry::new(name.to_string(), name.to_string(), EntryKind::Directory, 0, None)
    }

    #[test]
    fn test_is_data_whitelist() {
        for name in ["a.csv", "b.xls", "c.xlsx", "UPPER.CSV", "dir/nested.xlsx"] {
            assert!(is_data(name), "{} should be data", name);
        }
        for name in ["a.txt", "b.json", "c.parquet", "csv", ".csv", "archive.csv.gz", "noext"] {
            assert!(!is_data(name), "{} should not be data", name);
        }
    }

    #[test]
    fn test_data_format_dispatch() {
        assert_eq!(DataFormat::from_path("x.csv"), Some(DataFormat::Csv));
        assert_eq!(DataFormat::from_path("x.xls"), Some(DataFormat::Spreadsheet));
        assert_eq!(DataFormat::from_path("x.XLSX"), Some(DataFormat::Spreadsheet));
        assert_eq!(DataFormat::from_path("x.ods"), None);
    }

    #[test]
    fn test_directory_named_like_data_is_not_data() {
        assert!(!dir("backup.csv").is_data);
    }

    #[test]
    fn test_listing_splits_and_sorts() {
        let listing = DirectoryListing::from_entries(
            "reports/2021".to_string(),
            vec![
                file("zeta.csv"),
                dir("Beta"),
                file("notes.txt"),
                file("Alpha.xlsx"),
                dir("alpha"),
            ],
        );

        let dirs: Vec<_> = listing.directories.iter().map(|e| e.name.as_str()).collect();
        let files: Vec<_> = listing.files.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(dirs, vec!["alpha", "Beta"]);
        assert_eq!(files, vec!["Alpha.xlsx", "zeta.csv"]);
    }

    #[test]
    fn test_only_directories_gives_no_files() {
        let listing =
            DirectoryListing::from_entries(String::new(), vec![dir("a"), dir("b"), dir("c.csv")]);
        assert!(listing.files.is_empty());
        assert_eq!(listing.directories.len(), 3);
    }

    #[test]
    fn test_breadcrumbs_and_parent() {
        let listing = DirectoryListing::from_entries("a/b/c".to_string(), Vec::new());
        let paths: Vec<_> = listing.breadcrumbs.iter().map(|b| b.path.as_str()).collect();
        assert_eq!(paths, vec!["a", "a/b", "a/b/c"]);
        assert_eq!(listing.parent().as_deref(), Some("a/b"));

        let top = DirectoryListing::from_entries("a".to_string(), Vec::new());
        assert_eq!(top.parent().as_deref(), Some(""));

        let root = DirectoryListing::from_entries(String::new(), Vec::new());
        assert!(root.breadcrumbs.is_empty());
        assert_eq!(root.parent(), None);
    }
}
