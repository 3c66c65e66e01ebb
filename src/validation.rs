// src/validation.rs
use crate::error::{ExplorerError, Result};
use regex::Regex;

/// The create dialog's historical file name check. The alternation binds
/// loosely: `^[..]{1,8}.txt`, or anything containing `php`, or anything
/// ending in `html`.
pub const DEFAULT_FILE_NAME_PATTERN: &str = r"^[A-Za-z0-9_`-]{1,8}.txt|php|html$";

pub const INVALID_NAME_MESSAGE: &str = "Invalid file name. Name should contain 1-8 characters, numbers, underscores, tylda or dash. File should have one of txt, php or html extensions.";

#[derive(Debug, Clone)]
pub struct NameValidator {
    pattern: Option<Regex>,
}

impl NameValidator {
    pub fn new(pattern: Option<&str>) -> Result<Self> {
        let pattern = pattern.map(Regex::new).transpose()?;
        Ok(NameValidator { pattern })
    }

    /// Accepts every name.
    pub fn permissive() -> Self {
        NameValidator { pattern: None }
    }

    pub fn is_valid(&self, name: &str) -> bool {
        self.pattern.as_ref().map(|re| re.is_match(name)).unwrap_or(true)
    }

    /// Directory names are never checked.
    pub fn check(&self, name: &str, is_directory: bool) -> Result<()> {
        if is_directory || self.is_valid(name) {
            Ok(())
        } else {
            Err(ExplorerError::InvalidName(INVALID_NAME_MESSAGE.to_string()))
        }
    }
}

impl Default for NameValidator {
    fn default() -> Self {
        NameValidator {
            pattern: Some(Regex::new(DEFAULT_FILE_NAME_PATTERN).expect("built-in pattern compiles")),
        }
    }
}
