use serde::{Deserialize, Serialize};

/// URL prefixes of browser-internal pages that can never be recreated.
pub const DEFAULT_RESTRICTED_SCHEMES: [&str; 2] = ["chrome://", "edge://"];

/// User preferences controlling the save and restore workflows.
///
/// Missing keys fall back to their defaults so older preference files keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Preferences {
    /// Close every window that was open at save time once the snapshot is stored.
    pub close_windows_on_save: bool,
    /// Close the windows that were open before a restore once it completes.
    pub close_windows_on_restore: bool,
    /// Delete a snapshot from the library after it has been restored.
    pub clear_sessions_after_use: bool,
    pub restricted_schemes: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            close_windows_on_save: false,
            close_windows_on_restore: false,
            clear_sessions_after_use: false,
            restricted_schemes: DEFAULT_RESTRICTED_SCHEMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}
