// src/ui/dialog.rs
use crate::filesystem::file::CreationRequest;
use crate::filesystem::{Attribute, Attributes};
use crossterm::event::{KeyCode, KeyEvent};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum DialogEvent<T> {
    Pending,
    Submit(T),
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Kind,
    Flag(Attribute),
}

impl Field {
    const ORDER: [Field; 6] = [
        Field::Name,
        Field::Kind,
        Field::Flag(Attribute::ReadOnly),
        Field::Flag(Attribute::Archive),
        Field::Flag(Attribute::Hidden),
        Field::Flag(Attribute::System),
    ];
}

/// The "Create" form: a name, file or directory, and the four flags.
#[derive(Debug, Clone)]
pub struct CreateDialog {
    pub parent: PathBuf,
    pub name: String,
    pub is_directory: bool,
    pub attributes: Attributes,
    pub error: Option<String>,
    focus: usize,
}

impl CreateDialog {
    pub fn new(parent: PathBuf) -> Self {
        CreateDialog {
            parent,
            name: String::new(),
            is_directory: false,
            attributes: Attributes::default(),
            error: None,
            focus: 0,
        }
    }

    pub fn focus(&self) -> Field {
        Field::ORDER[self.focus]
    }

    pub fn request(&self) -> CreationRequest {
        CreationRequest { name: self.name.clone(), is_directory: self.is_directory, attributes: self.attributes }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogEvent<CreationRequest> {
        match key.code {
            KeyCode::Esc => return DialogEvent::Cancel,
            KeyCode::Enter => return DialogEvent::Submit(self.request()),
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % Field::ORDER.len(),
            KeyCode::BackTab | KeyCode::Up => self.focus = (self.focus + Field::ORDER.len() - 1) % Field::ORDER.len(),
            KeyCode::Backspace if self.focus() == Field::Name => {
                self.name.pop();
            }
            KeyCode::Char(c) if self.focus() == Field::Name => self.name.push(c),
            KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => match self.focus() {
                Field::Kind => self.is_directory = !self.is_directory,
                Field::Flag(attr) => self.attributes.set(attr, !self.attributes.get(attr)),
                Field::Name => {}
            },
            _ => {}
        }
        DialogEvent::Pending
    }
}

/// Single-line path input standing in for a folder picker.
#[derive(Debug, Clone)]
pub struct PathPrompt {
    pub input: String,
}

impl PathPrompt {
    pub fn new(initial: String) -> Self {
        PathPrompt { input: initial }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogEvent<PathBuf> {
        match key.code {
            KeyCode::Esc => DialogEvent::Cancel,
            KeyCode::Enter if !self.input.trim().is_empty() => DialogEvent::Submit(PathBuf::from(self.input.trim())),
            KeyCode::Backspace => {
                self.input.pop();
                DialogEvent::Pending
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                DialogEvent::Pending
            }
            _ => DialogEvent::Pending,
        }
    }
}
