use std::path::PathBuf;

use crate::domain::directory::DirectoryListing;
use crate::domain::error::Result;
use crate::infrastructure::storage::{normalize_request_path, read_entries, resolve_within};

/// Lists sub-directories and recognized data files below the browse root
#[derive(Debug, Clone)]
pub struct DirectoryListingUseCase {
    root: PathBuf,
    show_hidden: bool,
}

impl DirectoryListingUseCase {
    pub fn new(root: PathBuf, show_hidden: bool) -> Self {
        Self { root, show_hidden }
    }

    pub fn execute(&self, request_path: &str) -> Result<DirectoryListing> {
        let relative = normalize_request_path(request_path)?;
        let dir = resolve_within(&self.root, &relative);

        let entries = read_entries(&dir, &relative, self.show_hidden)?;
        tracing::debug!(path = %dir.display(), entries = entries.len(), "Listed directory");

        Ok(DirectoryListing::from_entries(relative, entries))
    }
}
