// src/error.rs
use crate::filesystem::Attribute;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Everything a filesystem action can fail with. The UI turns these into a
/// message box; nothing here is ever retried.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("{} is not a file", .0.display())]
    NotAFile(PathBuf),

    #[error("Invalid path: {0:?}")]
    InvalidPath(String),

    #[error("{0}")]
    InvalidName(String),

    #[error("Refusing to delete the opened root {}", .0.display())]
    RootRemoval(PathBuf),

    #[error("{} cannot have {} changed on this platform", .path.display(), .attribute.label())]
    AttributeUnsupported { path: PathBuf, attribute: Attribute },

    #[error("Attribute ledger is corrupt: {0}")]
    Ledger(#[from] serde_json::Error),

    #[error("Bad configuration in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("Invalid file name pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl ExplorerError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::AlreadyExists {
            return ExplorerError::AlreadyExists(path.to_path_buf());
        }
        ExplorerError::Io { path: path.to_path_buf(), source }
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_already_exists_is_promoted() {
        let err = ExplorerError::io(Path::new("/tmp/a.txt"), io::Error::from(io::ErrorKind::AlreadyExists));
        assert!(matches!(err, ExplorerError::AlreadyExists(_)));
        assert_eq!(err.to_string(), "/tmp/a.txt already exists");
    }

    #[test]
    fn test_io_message_names_path() {
        let err = ExplorerError::io(Path::new("/nope"), io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.to_string(), "/nope: gone");
    }
}
