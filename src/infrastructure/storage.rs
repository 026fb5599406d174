use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::domain::directory::{DirectoryEntry, EntryKind};
use crate::domain::error::{AppError, Result};

/// Normalize a request path to a `/` separated path relative to the browse root.
///
/// Empty segments and `.` are dropped; `..` and absolute paths are rejected so a
/// request can never leave the root.
pub fn normalize_request_path(request_path: &str) -> Result<String> {
    let request_path = request_path.replace('\\', "/");
    let mut segments = Vec::new();

    for component in Path::new(&request_path).components() {
        match component {
            Component::Normal(segment) => {
                let segment = segment.to_str().ok_or_else(|| {
                    AppError::ValidationError(format!("Path is not valid UTF-8: {}", request_path))
                })?;
                segments.push(segment.to_string());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(AppError::ValidationError(format!(
                    "Parent directory references are not allowed: {}",
                    request_path
                )))
            }
            _ => {
                return Err(AppError::ValidationError(format!(
                    "Absolute paths are not allowed: {}",
                    request_path
                )))
            }
        }
    }

    Ok(segments.join("/"))
}

/// Join a normalized relative path onto the root
pub fn resolve_within(root: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

/// Read the children of `dir`, which is `relative` below the browse root.
///
/// Entries whose metadata cannot be read are skipped.
pub fn read_entries(dir: &Path, relative: &str, show_hidden: bool) -> Result<Vec<DirectoryEntry>> {
    let metadata = fs::metadata(dir).map_err(|e| AppError::from_io(e, dir))?;
    if !metadata.is_dir() {
        return Err(AppError::NotFound(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| AppError::from_io(e, dir))? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "Skipping unreadable entry");
                continue;
            }
        };

        let name = entry.file_name().to_string_lossy().into_owned();
        if !show_hidden && name.starts_with('.') {
            continue;
        }

        // Follows symlinks so linked directories can be browsed
        let metadata = match fs::metadata(entry.path()) {
            Ok(metadata) => metadata,
            Err(err) => {
                tracing::warn!(
                    path = %entry.path().display(),
                    error = %err,
                    "Skipping entry without readable metadata"
                );
                continue;
            }
        };

        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else if metadata.is_file() {
            EntryKind::File
        } else {
            continue;
        };

        let modified = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map(|duration| duration.as_secs() as i64);

        let path = if relative.is_empty() {
            name.clone()
        } else {
            format!("{}/{}", relative, name)
        };
        let size = if kind == EntryKind::File { metadata.len() } else { 0 };

        entries.push(DirectoryEntry::new(name, path, kind, size, modified));
    }

    Ok(entries)
}
