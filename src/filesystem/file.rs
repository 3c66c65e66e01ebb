// src/filesystem/file.rs
use super::attributes::{clear_read_only, Attributes};
use crate::error::{ExplorerError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::Read;
use std::path::{Component, Path, PathBuf};

/// What the create dialog hands back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreationRequest {
    pub name: String,
    pub is_directory: bool,
    pub attributes: Attributes,
}

impl CreationRequest {
    pub fn file(name: impl Into<String>, attributes: Attributes) -> Self {
        CreationRequest { name: name.into(), is_directory: false, attributes }
    }

    pub fn directory(name: impl Into<String>, attributes: Attributes) -> Self {
        CreationRequest { name: name.into(), is_directory: true, attributes }
    }

    /// Directories only carry read-only and archive.
    pub fn effective_attributes(&self) -> Attributes {
        if self.is_directory {
            Attributes { hidden: false, system: false, ..self.attributes }
        } else {
            self.attributes
        }
    }
}

/// Create an empty file or a directory at `parent/name`. Never overwrites.
pub fn create_entry(parent: &Path, request: &CreationRequest) -> Result<PathBuf> {
    if !parent.is_dir() {
        return Err(ExplorerError::NotADirectory(parent.to_path_buf()));
    }
    let name = single_component(&request.name)?;
    let path = parent.join(name);

    if request.is_directory {
        fs::create_dir(&path).map_err(|e| ExplorerError::io(&path, e))?;
    } else {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| ExplorerError::io(&path, e))?;
    }
    Ok(path)
}

fn single_component(name: &str) -> Result<&str> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(name),
        _ => Err(ExplorerError::InvalidPath(name.to_string())),
    }
}

/// Post-order delete. Stops at the first failure; whatever was removed
/// before it stays removed.
pub fn delete_entry(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| ExplorerError::io(path, e))?;

    if metadata.is_dir() {
        clear_read_only(path)?;
        let children = fs::read_dir(path).map_err(|e| ExplorerError::io(path, e))?;
        for child in children {
            let child = child.map_err(|e| ExplorerError::io(path, e))?;
            delete_entry(&child.path())?;
        }
        fs::remove_dir(path).map_err(|e| ExplorerError::io(path, e))?;
    } else {
        clear_read_only(path)?;
        fs::remove_file(path).map_err(|e| ExplorerError::io(path, e))?;
    }

    log::debug!("removed {}", path.display());
    Ok(())
}

/// The single file the session keeps open. Dropping it closes the handle.
#[derive(Debug)]
pub struct OpenedFile {
    path: PathBuf,
    handle: File,
    content: String,
}

impl OpenedFile {
    pub fn open(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Err(ExplorerError::NotAFile(path.to_path_buf()));
        }
        let handle = shared_read(path).map_err(|e| ExplorerError::io(path, e))?;
        let mut opened = OpenedFile { path: path.to_path_buf(), handle, content: String::new() };
        opened.content = opened.read_text()?;
        Ok(opened)
    }

    /// Whole content from the current position, decoded lossily.
    fn read_text(&mut self) -> Result<String> {
        let mut bytes = Vec::new();
        self.handle
            .read_to_end(&mut bytes)
            .map_err(|e| ExplorerError::io(&self.path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

#[cfg(windows)]
fn shared_read(path: &Path) -> std::io::Result<File> {
    use std::os::windows::fs::OpenOptionsExt;
    const FILE_SHARE_READ: u32 = 0x1;
    OpenOptions::new().read(true).share_mode(FILE_SHARE_READ).open(path)
}

#[cfg(not(windows))]
fn shared_read(path: &Path) -> std::io::Result<File> {
    OpenOptions::new().read(true).open(path)
}
