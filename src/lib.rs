//! treefm: browse a directory as a tree, create and delete entries, flip
//! the read-only/archive/hidden/system flags and read text files, all from
//! the terminal.

pub mod config;
pub mod error;
pub mod filesystem;
pub mod logging;
pub mod session;
pub mod ui;
pub mod utils;
pub mod validation;

pub use error::{ExplorerError, Result};
pub use session::ExplorerSession;
