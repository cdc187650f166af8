use std::fmt;

use super::browser::GroupId;

// === HostError ===

/// Errors reported by the browser host for a display, window, tab or group call.
#[derive(Debug, Clone, PartialEq)]
pub enum HostError {
    /// The host rejected the named operation.
    CallFailed { operation: String, message: String },
    /// The referenced window, tab or group does not exist.
    NotFound(String),
    /// The host answered with something the caller cannot work with.
    Unexpected(String),
}

impl HostError {
    pub fn call_failed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        HostError::CallFailed {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::CallFailed { operation, message } => {
                write!(f, "Host call {} failed: {}", operation, message)
            }
            HostError::NotFound(what) => write!(f, "Host object not found: {}", what),
            HostError::Unexpected(msg) => write!(f, "Unexpected host response: {}", msg),
        }
    }
}

impl std::error::Error for HostError {}

// === CaptureError ===

/// Errors that abort a capture. No partial snapshot is produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureError {
    /// Reading browser state failed.
    Host(HostError),
    /// The host reported no displays to measure windows against.
    NoDisplays,
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Host(e) => write!(f, "Capture failed: {}", e),
            CaptureError::NoDisplays => write!(f, "Capture failed: no displays attached"),
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaptureError::Host(e) => Some(e),
            CaptureError::NoDisplays => None,
        }
    }
}

impl From<HostError> for CaptureError {
    fn from(e: HostError) -> Self {
        CaptureError::Host(e)
    }
}

// === RestoreError ===

/// Errors that abort a restore. Windows and tabs created before the failure are kept.
#[derive(Debug, Clone, PartialEq)]
pub enum RestoreError {
    /// A window, tab or group call failed.
    Host(HostError),
    /// The host reported no displays to place windows on.
    NoDisplays,
    /// Tabs of one captured group disagree on the group's appearance.
    InconsistentGroup { window_index: usize, group_id: GroupId },
    /// A window record carries non-finite ratios.
    InvalidGeometry { window_index: usize },
}

impl fmt::Display for RestoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestoreError::Host(e) => write!(f, "Restore failed: {}", e),
            RestoreError::NoDisplays => write!(f, "Restore failed: no displays attached"),
            RestoreError::InconsistentGroup {
                window_index,
                group_id,
            } => write!(
                f,
                "Restore failed: group {} in window {} has inconsistent appearance",
                group_id, window_index
            ),
            RestoreError::InvalidGeometry { window_index } => {
                write!(f, "Restore failed: window {} has invalid geometry", window_index)
            }
        }
    }
}

impl std::error::Error for RestoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RestoreError::Host(e) => Some(e),
            _ => None,
        }
    }
}

impl From<HostError> for RestoreError {
    fn from(e: HostError) -> Self {
        RestoreError::Host(e)
    }
}

// === LibraryError ===

/// Errors related to the in-memory snapshot library.
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryError {
    /// No snapshot with the given id exists.
    NotFound(String),
    /// A snapshot with the given id is already stored.
    DuplicateId(String),
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::NotFound(id) => write!(f, "Session not found: {}", id),
            LibraryError::DuplicateId(id) => write!(f, "Session already exists: {}", id),
        }
    }
}

impl std::error::Error for LibraryError {}

// === PreferencesError ===

/// Errors related to preference loading and updates.
#[derive(Debug, Clone, PartialEq)]
pub enum PreferencesError {
    /// An I/O error occurred while reading or writing the preferences file.
    IoError(String),
    /// Failed to serialize or deserialize preferences.
    SerializationError(String),
    /// The provided preference key does not exist.
    InvalidKey(String),
    /// The provided value has the wrong type for its key.
    InvalidValue(String),
}

impl fmt::Display for PreferencesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferencesError::IoError(msg) => write!(f, "Preferences I/O error: {}", msg),
            PreferencesError::SerializationError(msg) => {
                write!(f, "Preferences serialization error: {}", msg)
            }
            PreferencesError::InvalidKey(key) => write!(f, "Invalid preference key: {}", key),
            PreferencesError::InvalidValue(msg) => {
                write!(f, "Invalid preference value: {}", msg)
            }
        }
    }
}

impl std::error::Error for PreferencesError {}

// === AppError ===

/// Errors surfaced by the save and restore workflows.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    Host(HostError),
    Capture(CaptureError),
    Restore(RestoreError),
    Library(LibraryError),
    Preferences(PreferencesError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Host(e) => e.fmt(f),
            AppError::Capture(e) => e.fmt(f),
            AppError::Restore(e) => e.fmt(f),
            AppError::Library(e) => e.fmt(f),
            AppError::Preferences(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for AppError {}

impl From<HostError> for AppError {
    fn from(e: HostError) -> Self {
        AppError::Host(e)
    }
}

impl From<CaptureError> for AppError {
    fn from(e: CaptureError) -> Self {
        AppError::Capture(e)
    }
}

impl From<RestoreError> for AppError {
    fn from(e: RestoreError) -> Self {
        AppError::Restore(e)
    }
}

impl From<LibraryError> for AppError {
    fn from(e: LibraryError) -> Self {
        AppError::Library(e)
    }
}

impl From<PreferencesError> for AppError {
    fn from(e: PreferencesError) -> Self {
        AppError::Preferences(e)
    }
}
