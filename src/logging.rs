// src/logging.rs
use crate::config::Config;
use env_logger::{Builder, Env, Target};
use std::fs::{self, OpenOptions};

/// The terminal belongs to the UI, so log lines go to a file. Without a log
/// file configured, logging stays off. `RUST_LOG` wins over the config.
pub fn init(config: &Config) -> std::io::Result<()> {
    let Some(ref path) = config.log_file else { return Ok(()) };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let _ = Builder::from_env(Env::default().default_filter_or(config.log_level.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_secs()
        .try_init();
    Ok(())
}
