// src/ui/mod.rs
pub mod dialog;
pub mod render;
pub mod tree_view;

pub use dialog::{CreateDialog, DialogEvent, PathPrompt};
pub use tree_view::{Row, TreeView};

use crate::error::{ExplorerError, Result};
use crate::filesystem::{Attribute, AttributeStore};
use crate::session::ExplorerSession;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::{Path, PathBuf};

pub enum Modal {
    None,
    Create(CreateDialog),
    OpenRoot(PathPrompt),
    ConfirmDelete(PathBuf),
    Error(String),
}

/// Binds key presses to session operations. Nodes are addressed by path;
/// the tree itself carries no behavior.
pub struct App<S: AttributeStore> {
    pub session: ExplorerSession<S>,
    pub view: TreeView,
    pub modal: Modal,
    pub show_hidden: bool,
    pub scroll: u16,
    pub should_quit: bool,
}

impl<S: AttributeStore> App<S> {
    pub fn new(session: ExplorerSession<S>, show_hidden: bool) -> Self {
        let view = TreeView::new(session.root());
        let mut app = App { session, view, modal: Modal::None, show_hidden, scroll: 0, should_quit: false };
        app.sync_selection();
        app
    }

    pub fn rows(&self) -> Vec<Row> {
        self.view.rows(self.session.tree(), self.show_hidden)
    }

    fn current(&self) -> Option<Row> {
        self.rows().into_iter().nth(self.view.cursor())
    }

    fn sync_selection(&mut self) {
        if let Some(row) = self.current() {
            self.session.select(&row.path);
        }
    }

    /// After a rebuild, keep the cursor on the selected path when it is
    /// still visible.
    fn restore_cursor(&mut self) {
        let rows = self.rows();
        let kept = match self.session.selected() {
            Some(path) => self.view.focus(&rows, path),
            None => false,
        };
        if !kept {
            self.view.clamp(rows.len());
        }
        self.sync_selection();
    }

    fn report(&mut self, err: ExplorerError) {
        log::error!("{err}");
        self.modal = Modal::Error(err.to_string());
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match std::mem::replace(&mut self.modal, Modal::None) {
            Modal::None => self.handle_tree_key(key),
            Modal::Error(message) => {
                if !matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                    self.modal = Modal::Error(message);
                }
            }
            Modal::ConfirmDelete(path) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.delete(&path),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {}
                _ => self.modal = Modal::ConfirmDelete(path),
            },
            Modal::OpenRoot(mut prompt) => match prompt.handle_key(key) {
                DialogEvent::Pending => self.modal = Modal::OpenRoot(prompt),
                DialogEvent::Cancel => {}
                DialogEvent::Submit(path) => self.open_root(&path),
            },
            Modal::Create(mut dialog) => match dialog.handle_key(key) {
                DialogEvent::Pending => self.modal = Modal::Create(dialog),
                DialogEvent::Cancel => {}
                DialogEvent::Submit(request) => match self.session.create(&dialog.parent, &request) {
                    Ok(path) => {
                        self.view.expand(&dialog.parent);
                        self.session.select(&path);
                        self.restore_cursor();
                    }
                    Err(ExplorerError::InvalidName(message)) => {
                        dialog.error = Some(message);
                        self.modal = Modal::Create(dialog);
                    }
                    Err(err) => {
                        self.restore_cursor();
                        self.report(err);
                    }
                },
            },
        }
    }

    fn handle_tree_key(&mut self, key: KeyEvent) {
        let len = self.rows().len();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.view.move_by(-1, len);
                self.sync_selection();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.view.move_by(1, len);
                self.sync_selection();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if let Some(row) = self.current().filter(|r| r.is_dir) {
                    self.view.expand(&row.path);
                }
            }
            KeyCode::Left | KeyCode::Char('h') => self.collapse_or_parent(),
            KeyCode::Enter => match self.current() {
                Some(row) if row.is_dir => self.view.toggle(&row.path),
                Some(row) => self.open(&row.path),
                None => {}
            },
            KeyCode::Char('o') => {
                if let Some(row) = self.current().filter(|r| !r.is_dir) {
                    self.open(&row.path);
                }
            }
            KeyCode::Char('c') => match self.current() {
                Some(row) if row.is_dir => self.modal = Modal::Create(CreateDialog::new(row.path)),
                Some(row) => self.report(ExplorerError::NotADirectory(row.path)),
                None => {}
            },
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(row) = self.current() {
                    self.modal = Modal::ConfirmDelete(row.path);
                }
            }
            KeyCode::Char('1') => self.toggle(Attribute::ReadOnly),
            KeyCode::Char('2') => self.toggle(Attribute::Archive),
            KeyCode::Char('3') => self.toggle(Attribute::Hidden),
            KeyCode::Char('4') => self.toggle(Attribute::System),
            KeyCode::Char('g') => {
                let initial = self.session.root().display().to_string();
                self.modal = Modal::OpenRoot(PathPrompt::new(initial));
            }
            KeyCode::F(5) | KeyCode::Char('R') => {
                if let Err(err) = self.session.refresh() {
                    self.report(err);
                }
                self.restore_cursor();
            }
            KeyCode::Char('.') => {
                self.show_hidden = !self.show_hidden;
                self.restore_cursor();
            }
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            _ => {}
        }
    }

    fn collapse_or_parent(&mut self) {
        let Some(row) = self.current() else { return };
        if row.is_dir && self.view.is_expanded(&row.path) && row.depth > 0 {
            self.view.collapse(&row.path);
            return;
        }
        if let Some(parent) = row.path.parent() {
            let rows = self.rows();
            if self.view.focus(&rows, parent) {
                self.sync_selection();
            }
        }
    }

    fn open(&mut self, path: &Path) {
        self.scroll = 0;
        if let Err(err) = self.session.open(path) {
            self.report(err);
        }
    }

    fn delete(&mut self, path: &Path) {
        let outcome = self.session.delete(path);
        self.view.collapse(path);
        self.restore_cursor();
        if let Err(err) = outcome {
            self.report(err);
        }
    }

    fn open_root(&mut self, path: &Path) {
        match self.session.open_root(path) {
            Ok(()) => {
                self.view.reset(self.session.root());
                self.scroll = 0;
                self.sync_selection();
            }
            Err(err) => self.report(err),
        }
    }

    fn toggle(&mut self, attribute: Attribute) {
        let Some(row) = self.current() else { return };
        let outcome: Result<_> = self.session.toggle_attribute(&row.path, attribute);
        self.restore_cursor();
        if let Err(err) = outcome {
            self.report(err);
        }
    }
}
