// src/utils/formatter.rs
use chrono::{DateTime, Local, Utc};

pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

pub fn format_modified(modified: &DateTime<Utc>) -> String {
    modified.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
