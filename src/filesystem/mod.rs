// src/filesystem/mod.rs
pub mod attributes;
pub mod dir;
pub mod file;

pub use attributes::{Attribute, AttributeStore, Attributes, LedgerAttributes};
pub use dir::TreeBuilder;
pub use file::OpenedFile;

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Whatever order the OS enumerates.
    Native,
    #[default]
    Name,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryKind {
    Directory { children: Vec<FileSystemEntry> },
    File,
}

/// One node of the snapshot. Plain data: the UI binds actions to it by path.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSystemEntry {
    pub name: String,
    pub path: PathBuf,
    pub attributes: Attributes,
    pub size: u64,
    pub modified: Option<chrono::DateTime<chrono::Utc>>,
    pub kind: EntryKind,
}

impl FileSystemEntry {
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Directory { .. })
    }

    pub fn children(&self) -> &[FileSystemEntry] {
        match &self.kind {
            EntryKind::Directory { children } => children,
            EntryKind::File => &[],
        }
    }

    pub fn find(&self, path: &Path) -> Option<&FileSystemEntry> {
        if self.path == path {
            return Some(self);
        }
        if !path.starts_with(&self.path) {
            return None;
        }
        self.children().iter().find_map(|child| child.find(path))
    }

    /// Number of nodes in this subtree, itself included.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(FileSystemEntry::count).sum::<usize>()
    }
}

/// A subtree that could not be enumerated.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct FileTree {
    pub root: FileSystemEntry,
    pub skipped: Vec<SkippedEntry>,
}

impl FileTree {
    pub fn find(&self, path: &Path) -> Option<&FileSystemEntry> {
        self.root.find(path)
    }

    pub fn len(&self) -> usize {
        self.root.count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(path: &str) -> FileSystemEntry {
        FileSystemEntry {
            name: Path::new(path).file_name().unwrap().to_string_lossy().to_string(),
            path: PathBuf::from(path),
            attributes: Attributes::default(),
            size: 0,
            modified: None,
            kind: EntryKind::File,
        }
    }

    #[test]
    fn test_find_and_count() {
        let sub = FileSystemEntry {
            kind: EntryKind::Directory { children: vec![leaf("/r/sub/x.txt")] },
            ..leaf("/r/sub")
        };
        let root = FileSystemEntry {
            kind: EntryKind::Directory { children: vec![sub, leaf("/r/y.txt")] },
            ..leaf("/r")
        };
        let tree = FileTree { root, skipped: Vec::new() };

        assert_eq!(tree.len(), 4);
        assert!(!tree.is_empty());
        assert_eq!(tree.find(Path::new("/r/sub/x.txt")).unwrap().name, "x.txt");
        assert!(tree.find(Path::new("/r/sub")).unwrap().is_dir());
        assert!(tree.find(Path::new("/elsewhere")).is_none());
    }
}
