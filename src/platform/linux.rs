// Tabstash paths on Linux, following the XDG base directory layout.

use std::env;
use std::path::PathBuf;

use super::APP_DIR_NAME;

/// `$<xdg_var>/tabstash` when the variable is set and absolute, else `$HOME/<fallback>/tabstash`.
fn xdg_dir(xdg: Option<String>, home: Option<String>, fallback: &[&str]) -> PathBuf {
    if let Some(base) = xdg.filter(|v| v.starts_with('/')) {
        return PathBuf::from(base).join(APP_DIR_NAME);
    }
    let mut path = PathBuf::from(home.unwrap_or_else(|| String::from("/tmp")));
    for segment in fallback {
        path.push(segment);
    }
    path.join(APP_DIR_NAME)
}

pub fn get_config_dir() -> PathBuf {
    xdg_dir(
        env::var("XDG_CONFIG_HOME").ok(),
        env::var("HOME").ok(),
        &[".config"],
    )
}

pub fn get_data_dir() -> PathBuf {
    xdg_dir(
        env::var("XDG_DATA_HOME").ok(),
        env::var("HOME").ok(),
        &[".local", "share"],
    )
}
