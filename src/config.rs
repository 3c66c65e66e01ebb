// src/config.rs
use crate::error::{ExplorerError, Result};
use crate::filesystem::SortOrder;
use crate::validation::DEFAULT_FILE_NAME_PATTERN;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "treefm";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Starting directory; the working directory when unset.
    pub root: Option<PathBuf>,
    pub show_hidden: bool,
    pub sort: SortOrder,
    /// `null` turns file name validation off.
    pub file_name_pattern: Option<String>,
    pub attribute_ledger: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            root: None,
            show_hidden: true,
            sort: SortOrder::Name,
            file_name_pattern: Some(DEFAULT_FILE_NAME_PATTERN.to_string()),
            attribute_ledger: data_dir().map(|d| d.join("attributes.json")),
            log_file: data_dir().map(|d| d.join("treefm.log")),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.json"))
    }

    /// Load from the default location, falling back to defaults when absent.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::from_file(&path),
            None => Ok(Config::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(ExplorerError::io(path, e)),
        };
        serde_json::from_str(&content).map_err(|e| ExplorerError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn root_or_cwd(&self) -> Result<PathBuf> {
        match self.root {
            Some(ref root) => Ok(root.clone()),
            None => std::env::current_dir().map_err(|e| ExplorerError::io(Path::new("."), e)),
        }
    }
}

fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::from_file(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.show_hidden);
        assert_eq!(config.file_name_pattern.as_deref(), Some(DEFAULT_FILE_NAME_PATTERN));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"root": "/srv", "sort": "native", "file_name_pattern": null}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.root, Some(PathBuf::from("/srv")));
        assert_eq!(config.sort, SortOrder::Native);
        assert_eq!(config.file_name_pattern, None);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.root_or_cwd().unwrap(), PathBuf::from("/srv"));
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::from_file(&path), Err(ExplorerError::Config { .. })));
    }
}
