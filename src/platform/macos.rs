// Tabstash paths on macOS
// Config: ~/Library/Preferences/tabstash
// Data:   ~/Library/Application Support/tabstash

use std::env;
use std::path::PathBuf;

use super::APP_DIR_NAME;

fn library_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp"))).join("Library")
}

pub fn get_config_dir() -> PathBuf {
    library_dir().join("Preferences").join(APP_DIR_NAME)
}

pub fn get_data_dir() -> PathBuf {
    library_dir().join("Application Support").join(APP_DIR_NAME)
}
