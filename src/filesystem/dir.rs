// src/filesystem/dir.rs
use super::{AttributeStore, EntryKind, FileSystemEntry, FileTree, SkippedEntry, SortOrder};
use crate::error::{ExplorerError, Result};
use std::path::Path;
use walkdir::WalkDir;

/// Walks a root directory into a fresh [`FileTree`]: every level lists its
/// subdirectories (expanded) before its files. Symlinks are leaves.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    pub sort_by: SortOrder,
}

impl TreeBuilder {
    pub fn new(sort_by: SortOrder) -> Self {
        TreeBuilder { sort_by }
    }

    pub fn build(&self, root: &Path, store: &dyn AttributeStore) -> Result<FileTree> {
        let metadata = std::fs::metadata(root).map_err(|e| ExplorerError::io(root, e))?;
        if !metadata.is_dir() {
            return Err(ExplorerError::NotADirectory(root.to_path_buf()));
        }
        // An unreadable root is fatal; unreadable subtrees are not.
        std::fs::read_dir(root).map_err(|e| ExplorerError::io(root, e))?;

        let mut skipped = Vec::new();
        let children = self.children_of(root, store, &mut skipped);
        let mut node = entry_for(root, 0, None, store);
        node.kind = EntryKind::Directory { children };

        log::debug!("built tree for {} ({} nodes, {} skipped)", root.display(), node.count(), skipped.len());
        Ok(FileTree { root: node, skipped })
    }

    fn children_of(&self, path: &Path, store: &dyn AttributeStore, skipped: &mut Vec<SkippedEntry>) -> Vec<FileSystemEntry> {
        let mut walker = WalkDir::new(path).min_depth(1).max_depth(1).follow_links(false);
        if self.sort_by == SortOrder::Name {
            walker = walker.sort_by_file_name();
        }

        let mut dirs = Vec::new();
        let mut files = Vec::new();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let failed = err.path().unwrap_or(path).to_path_buf();
                    log::warn!("skipping {}: {}", failed.display(), err);
                    skipped.push(SkippedEntry { path: failed, reason: err.to_string() });
                    continue;
                }
            };

            let metadata = entry.metadata().ok();
            let size = metadata.as_ref().map(|m| m.len()).unwrap_or(0);
            let modified = metadata
                .as_ref()
                .and_then(|m| m.modified().ok())
                .map(chrono::DateTime::<chrono::Utc>::from);

            if entry.file_type().is_dir() {
                let mut node = entry_for(entry.path(), 0, modified, store);
                let children = self.children_of(entry.path(), store, skipped);
                node.kind = EntryKind::Directory { children };
                dirs.push(node);
            } else {
                files.push(entry_for(entry.path(), size, modified, store));
            }
        }

        dirs.extend(files);
        dirs
    }
}

fn entry_for(
    path: &Path,
    size: u64,
    modified: Option<chrono::DateTime<chrono::Utc>>,
    store: &dyn AttributeStore,
) -> FileSystemEntry {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let attributes = store.query(path).unwrap_or_default();

    FileSystemEntry { name, path: path.to_path_buf(), attributes, size, modified, kind: EntryKind::File }
}
