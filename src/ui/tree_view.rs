// src/ui/tree_view.rs
use crate::filesystem::{FileSystemEntry, FileTree};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One visible line of the tree pane.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub path: PathBuf,
    pub name: String,
    pub depth: usize,
    pub is_dir: bool,
    pub expanded: bool,
    pub has_children: bool,
}

/// Expansion and cursor state. It refers to nodes by path only, so it
/// survives a tree rebuild untouched.
#[derive(Debug, Clone, Default)]
pub struct TreeView {
    expanded: HashSet<PathBuf>,
    cursor: usize,
}

impl TreeView {
    pub fn new(root: &Path) -> Self {
        let mut expanded = HashSet::new();
        expanded.insert(root.to_path_buf());
        TreeView { expanded, cursor: 0 }
    }

    pub fn rows(&self, tree: &FileTree, show_hidden: bool) -> Vec<Row> {
        let mut rows = Vec::new();
        self.push_rows(&tree.root, 0, show_hidden, &mut rows);
        rows
    }

    fn push_rows(&self, entry: &FileSystemEntry, depth: usize, show_hidden: bool, rows: &mut Vec<Row>) {
        let expanded = entry.is_dir() && self.expanded.contains(&entry.path);
        rows.push(Row {
            path: entry.path.clone(),
            name: entry.name.clone(),
            depth,
            is_dir: entry.is_dir(),
            expanded,
            has_children: !entry.children().is_empty(),
        });
        if !expanded {
            return;
        }
        for child in entry.children() {
            if show_hidden || !child.attributes.hidden {
                self.push_rows(child, depth + 1, show_hidden, rows);
            }
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_by(&mut self, delta: isize, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let target = self.cursor as isize + delta;
        self.cursor = target.clamp(0, len as isize - 1) as usize;
    }

    pub fn clamp(&mut self, len: usize) {
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    /// Put the cursor on `path` if it is visible.
    pub fn focus(&mut self, rows: &[Row], path: &Path) -> bool {
        match rows.iter().position(|r| r.path == path) {
            Some(index) => {
                self.cursor = index;
                true
            }
            None => false,
        }
    }

    pub fn is_expanded(&self, path: &Path) -> bool {
        self.expanded.contains(path)
    }

    pub fn expand(&mut self, path: &Path) {
        self.expanded.insert(path.to_path_buf());
    }

    pub fn collapse(&mut self, path: &Path) {
        self.expanded.remove(path);
    }

    pub fn toggle(&mut self, path: &Path) {
        if !self.expanded.remove(path) {
            self.expanded.insert(path.to_path_buf());
        }
    }

    /// Forget everything; used when the root changes.
    pub fn reset(&mut self, root: &Path) {
        *self = TreeView::new(root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::{Attribute, Attributes, EntryKind};

    fn node(path: &str, children: Option<Vec<FileSystemEntry>>) -> FileSystemEntry {
        FileSystemEntry {
            name: Path::new(path).file_name().unwrap().to_string_lossy().to_string(),
            path: PathBuf::from(path),
            attributes: Attributes::default(),
            size: 0,
            modified: None,
            kind: match children {
                Some(children) => EntryKind::Directory { children },
                None => EntryKind::File,
            },
        }
    }

    fn tree() -> FileTree {
        let mut hidden = node("/r/.cache", None);
        hidden.attributes = hidden.attributes.with(Attribute::Hidden, true);
        let sub = node("/r/sub", Some(vec![node("/r/sub/x.txt", None)]));
        let root = node("/r", Some(vec![sub, node("/r/a.txt", None), hidden]));
        FileTree { root, skipped: Vec::new() }
    }

    fn names(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_rows_follow_expansion() {
        let tree = tree();
        let mut view = TreeView::new(Path::new("/r"));
        assert_eq!(names(&view.rows(&tree, true)), ["r", "sub", "a.txt", ".cache"]);

        view.expand(Path::new("/r/sub"));
        let rows = view.rows(&tree, true);
        assert_eq!(names(&rows), ["r", "sub", "x.txt", "a.txt", ".cache"]);
        assert_eq!(rows[2].depth, 2);

        view.toggle(Path::new("/r"));
        assert_eq!(names(&view.rows(&tree, true)), ["r"]);
    }

    #[test]
    fn test_hidden_rows_filtered() {
        let view = TreeView::new(Path::new("/r"));
        assert_eq!(names(&view.rows(&tree(), false)), ["r", "sub", "a.txt"]);
    }

    #[test]
    fn test_cursor_is_clamped() {
        let mut view = TreeView::new(Path::new("/r"));
        view.move_by(-3, 4);
        assert_eq!(view.cursor(), 0);
        view.move_by(10, 4);
        assert_eq!(view.cursor(), 3);
        view.clamp(2);
        assert_eq!(view.cursor(), 1);

        let rows = view.rows(&tree(), true);
        assert!(view.focus(&rows, Path::new("/r/a.txt")));
        assert_eq!(view.cursor(), 2);
        assert!(!view.focus(&rows, Path::new("/r/sub/x.txt")));
    }
}
