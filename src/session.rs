// src/session.rs
use crate::error::{ExplorerError, Result};
use crate::filesystem::file::{self, CreationRequest};
use crate::filesystem::{Attribute, AttributeStore, Attributes, FileSystemEntry, FileTree, OpenedFile, TreeBuilder};
use crate::utils::formatter;
use crate::validation::NameValidator;
use std::path::{Path, PathBuf};

/// Application state behind the UI: the root, the current snapshot, the
/// selected entry and the one opened file. Every mutation rebuilds the tree.
pub struct ExplorerSession<S: AttributeStore> {
    root: PathBuf,
    tree: FileTree,
    builder: TreeBuilder,
    store: S,
    validator: NameValidator,
    selected: Option<PathBuf>,
    opened: Option<OpenedFile>,
}

impl<S: AttributeStore> ExplorerSession<S> {
    pub fn new(root: &Path, builder: TreeBuilder, store: S, validator: NameValidator) -> Result<Self> {
        let root = root.canonicalize().map_err(|e| ExplorerError::io(root, e))?;
        let tree = builder.build(&root, &store)?;
        log::info!("opened {}", root.display());
        Ok(ExplorerSession { root, tree, builder, store, validator, selected: None, opened: None })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Point the session at another directory. Both slots are cleared.
    pub fn open_root(&mut self, path: &Path) -> Result<()> {
        let root = path.canonicalize().map_err(|e| ExplorerError::io(path, e))?;
        let tree = self.builder.build(&root, &self.store)?;
        self.close();
        self.selected = None;
        self.root = root;
        self.tree = tree;
        log::info!("opened {}", self.root.display());
        Ok(())
    }

    pub fn refresh(&mut self) -> Result<()> {
        self.tree = self.builder.build(&self.root, &self.store)?;
        if let Some(ref selected) = self.selected {
            if self.tree.find(selected).is_none() {
                self.selected = None;
            }
        }
        Ok(())
    }

    pub fn select(&mut self, path: &Path) {
        self.selected = Some(path.to_path_buf());
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    pub fn selected_entry(&self) -> Option<&FileSystemEntry> {
        self.selected.as_ref().and_then(|p| self.tree.find(p))
    }

    /// Attribute code plus size and mtime of the selection.
    pub fn status_line(&self) -> String {
        let Some(entry) = self.selected_entry() else { return String::new() };
        let mut status = entry.attributes.code();
        if !entry.is_dir() {
            status.push_str("  ");
            status.push_str(&formatter::format_size(entry.size));
        }
        if let Some(modified) = entry.modified {
            status.push_str("  ");
            status.push_str(&formatter::format_modified(&modified));
        }
        status
    }

    pub fn create(&mut self, parent: &Path, request: &CreationRequest) -> Result<PathBuf> {
        self.validator.check(&request.name, request.is_directory)?;
        let path = file::create_entry(parent, request)?;
        // The entry exists even if the flags fail; show it either way.
        let applied = self.store.apply(&path, request.effective_attributes());
        self.refresh()?;
        applied?;
        log::info!("created {}", path.display());
        Ok(path)
    }

    pub fn delete(&mut self, path: &Path) -> Result<()> {
        if path == self.root {
            return Err(ExplorerError::RootRemoval(path.to_path_buf()));
        }
        self.close();

        let outcome = file::delete_entry(path).and_then(|()| self.store.forget(path));
        let refreshed = self.refresh();
        match outcome {
            Ok(()) => {
                log::info!("deleted {}", path.display());
                refreshed
            }
            Err(err) => {
                if let Err(refresh_err) = refreshed {
                    log::error!("rebuild after failed delete of {}: {}", path.display(), refresh_err);
                }
                Err(err)
            }
        }
    }

    /// Replace the opened file and return its text.
    pub fn open(&mut self, path: &Path) -> Result<&str> {
        self.close();
        let opened = OpenedFile::open(path)?;
        log::info!("opened file {}", path.display());
        Ok(self.opened.insert(opened).content())
    }

    pub fn opened(&self) -> Option<&OpenedFile> {
        self.opened.as_ref()
    }

    pub fn close(&mut self) {
        if let Some(previous) = self.opened.take() {
            log::debug!("closed {}", previous.path().display());
        }
    }

    pub fn attributes(&self, path: &Path) -> Result<Attributes> {
        self.store.query(path)
    }

    pub fn attribute_code(&self, path: &Path) -> Result<String> {
        self.attributes(path).map(|a| a.code())
    }

    pub fn toggle_attribute(&mut self, path: &Path, attribute: Attribute) -> Result<Attributes> {
        let current = self.store.query(path)?;
        let wanted = !current.get(attribute);
        self.store.apply(path, current.with(attribute, wanted))?;
        let stored = self.store.query(path)?;
        self.refresh()?;
        if stored.get(attribute) != wanted {
            return Err(ExplorerError::AttributeUnsupported { path: path.to_path_buf(), attribute });
        }
        log::info!("{} is now {}", path.display(), stored);
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::LedgerAttributes;
    use std::fs;
    use tempfile::TempDir;

    fn session(dir: &TempDir) -> ExplorerSession<LedgerAttributes> {
        ExplorerSession::new(dir.path(), TreeBuilder::default(), LedgerAttributes::in_memory(), NameValidator::default())
            .unwrap()
    }

    #[test]
    fn test_invalid_name_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let root = session.root().to_path_buf();
        let err = session.create(&root, &CreationRequest::file("report.md", Attributes::default())).unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidName(_)));
        assert!(session.tree().is_empty());
    }

    #[test]
    fn test_refresh_drops_vanished_selection() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let root = session.root().to_path_buf();
        let path = session.create(&root, &CreationRequest::file("gone.txt", Attributes::default())).unwrap();
        session.select(&path);
        assert!(session.selected_entry().is_some());

        fs::remove_file(&path).unwrap();
        session.refresh().unwrap();
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_toggle_attribute_rebuilds_tree() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let root = session.root().to_path_buf();
        let path = session.create(&root, &CreationRequest::file("t.txt", Attributes::default())).unwrap();

        assert_eq!(session.toggle_attribute(&path, Attribute::System).unwrap().code(), "---s");
        assert_eq!(session.tree().find(&path).unwrap().attributes.code(), "---s");
        assert_eq!(session.toggle_attribute(&path, Attribute::System).unwrap().code(), "----");
    }

    #[test]
    fn test_status_line_starts_with_code() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        assert_eq!(session.status_line(), "");
        let root = session.root().to_path_buf();
        let path = session
            .create(&root, &CreationRequest::file("s.txt", Attributes::default().with(Attribute::Archive, true)))
            .unwrap();
        session.select(&path);
        assert!(session.status_line().starts_with("-a--  0 B"));
    }

    #[cfg(unix)]
    #[test]
    fn test_dotfile_hidden_toggle_is_refused() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".secret"), "").unwrap();
        let mut session = session(&dir);
        let secret = session.root().join(".secret");
        assert_eq!(session.attribute_code(&secret).unwrap(), "--h-");

        let err = session.toggle_attribute(&secret, Attribute::Hidden).unwrap_err();
        assert!(matches!(err, ExplorerError::AttributeUnsupported { attribute: Attribute::Hidden, .. }));
        assert_eq!(session.attribute_code(&secret).unwrap(), "--h-");

        assert_eq!(session.toggle_attribute(&secret, Attribute::System).unwrap().code(), "--hs");
    }

    #[test]
    fn test_delete_error_wins_over_rebuild_error() {
        let outer = TempDir::new().unwrap();
        let root = outer.path().join("root");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("child.txt"), "").unwrap();
        let mut session = ExplorerSession::new(&root, TreeBuilder::default(), LedgerAttributes::in_memory(), NameValidator::default())
            .unwrap();
        let child = session.root().join("child.txt");

        fs::remove_dir_all(&root).unwrap();
        match session.delete(&child).unwrap_err() {
            ExplorerError::Io { path, .. } => assert_eq!(path, child),
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn test_root_cannot_be_deleted() {
        let dir = TempDir::new().unwrap();
        let mut session = session(&dir);
        let root = session.root().to_path_buf();
        assert!(matches!(session.delete(&root), Err(ExplorerError::RootRemoval(_))));
        assert!(root.exists());
    }

    #[test]
    fn test_open_root_switches_tree_and_clears_slots() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(second.path().join("other.txt"), "other").unwrap();
        fs::write(first.path().join("mine.txt"), "mine").unwrap();

        let mut session = session(&first);
        let mine = session.root().join("mine.txt");
        session.open(&mine).unwrap();
        session.select(&mine);

        session.open_root(second.path()).unwrap();
        assert!(session.opened().is_none());
        assert!(session.selected().is_none());
        assert_eq!(session.tree().root.children()[0].name, "other.txt");
    }
}
