// Tabstash platform paths
// Picks the per-OS directories for the preferences file and the browser state file.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Application directory name on every platform.
pub const APP_DIR_NAME: &str = "tabstash";

/// Returns the directory holding `preferences.json`.
///
/// - **Linux**: `$XDG_CONFIG_HOME/tabstash`, else `~/.config/tabstash`
/// - **macOS**: `~/Library/Preferences/tabstash`
/// - **Windows**: `%APPDATA%\tabstash`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns the directory holding `browser-state.json`.
///
/// - **Linux**: `$XDG_DATA_HOME/tabstash`, else `~/.local/share/tabstash`
/// - **macOS**: `~/Library/Application Support/tabstash`
/// - **Windows**: `%LOCALAPPDATA%\tabstash`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}
