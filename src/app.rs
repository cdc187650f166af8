//! App core for Tabstash.
//!
//! Ties a [`BrowserHost`] to the snapshot library and the user preferences,
//! and runs the save and restore workflows on top of capture and restore.

use tracing::{info, warn};

use crate::host::BrowserHost;
use crate::managers::session_library::{SessionLibrary, SessionLibraryTrait};
use crate::services::capture::{capture_with_id, get_counts};
use crate::services::identity;
use crate::services::preferences_engine::{PreferencesEngine, PreferencesEngineTrait};
use crate::services::restore::{restore, RestoreSummary};
use crate::services::url_policy::UrlPolicy;
use crate::types::browser::WindowId;
use crate::types::color::TagColor;
use crate::types::errors::{AppError, LibraryError};
use crate::types::preferences::Preferences;
use crate::types::session::{SessionCounts, Snapshot};

pub struct App<H: BrowserHost> {
    host: H,
    library: SessionLibrary,
    preferences: PreferencesEngine,
    policy: UrlPolicy,
}

impl<H: BrowserHost> App<H> {
    /// Loads preferences from `preferences` and starts with an empty library.
    ///
    /// A preferences file that cannot be read is logged and replaced by the defaults.
    pub fn new(host: H, mut preferences: PreferencesEngine) -> Self {
        if let Err(e) = preferences.load() {
            warn!(path = preferences.get_config_path(), error = %e, "using default preferences");
        }
        let policy = UrlPolicy::from_preferences(preferences.get_preferences());
        Self {
            host,
            library: SessionLibrary::new(),
            preferences,
            policy,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn library(&self) -> &SessionLibrary {
        &self.library
    }

    pub fn preferences(&self) -> &Preferences {
        self.preferences.get_preferences()
    }

    /// Totals of what a save would capture right now.
    pub async fn counts(&self) -> Result<SessionCounts, AppError> {
        Ok(get_counts(&self.host, &self.policy).await?)
    }

    /// Captures the open windows and stores the snapshot at the front of the library.
    ///
    /// A blank or missing title is replaced by one summarising the counts.
    pub async fn save_session(&mut self, title: Option<&str>) -> Result<Snapshot, AppError> {
        let title = match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => t.to_string(),
            None => identity::default_title(&self.counts().await?),
        };
        let open_windows = if self.preferences().close_windows_on_save {
            self.window_ids().await?
        } else {
            Vec::new()
        };

        let library = &self.library;
        let id = identity::unique_id(|candidate| library.contains(candidate));
        let snapshot = capture_with_id(&self.host, id, &title, &self.policy).await?;
        self.library.insert(snapshot.clone())?;
        info!(id = %snapshot.id(), title = %snapshot.title(), "session saved");

        self.close_windows(&open_windows).await;
        Ok(snapshot)
    }

    /// Reopens a stored snapshot in new windows and marks it active.
    pub async fn restore_session(&mut self, id: &str) -> Result<RestoreSummary, AppError> {
        let snapshot = self
            .library
            .get(id)
            .cloned()
            .ok_or_else(|| LibraryError::NotFound(id.to_string()))?;
        self.library.mark_active(id)?;

        let previous = if self.preferences().close_windows_on_restore {
            self.window_ids().await?
        } else {
            Vec::new()
        };

        let summary = restore(&self.host, &snapshot).await?;
        self.close_windows(&previous).await;

        if self.preferences().clear_sessions_after_use {
            self.library.delete(id)?;
            info!(id, "session cleared after restore");
        }
        Ok(summary)
    }

    pub fn get_session(&self, id: &str) -> Result<&Snapshot, AppError> {
        self.library
            .get(id)
            .ok_or_else(|| LibraryError::NotFound(id.to_string()).into())
    }

    pub fn list_sessions(&self) -> &[Snapshot] {
        self.library.list()
    }

    pub fn active_session(&self) -> Option<&str> {
        self.library.active_id()
    }

    pub fn rename_session(&mut self, id: &str, title: &str) -> Result<(), AppError> {
        Ok(self.library.rename(id, title)?)
    }

    pub fn recolor_session(&mut self, id: &str, color: TagColor) -> Result<(), AppError> {
        Ok(self.library.recolor(id, color)?)
    }

    pub fn delete_session(&mut self, id: &str) -> Result<Snapshot, AppError> {
        Ok(self.library.delete(id)?)
    }

    /// Updates one preference, saving it and applying it to later captures.
    pub fn set_preference(&mut self, key: &str, value: serde_json::Value) -> Result<(), AppError> {
        self.preferences.set_value(key, value)?;
        self.policy = UrlPolicy::from_preferences(self.preferences.get_preferences());
        Ok(())
    }

    pub fn reset_preferences(&mut self) -> Result<(), AppError> {
        self.preferences.reset()?;
        self.policy = UrlPolicy::from_preferences(self.preferences.get_preferences());
        Ok(())
    }

    async fn window_ids(&self) -> Result<Vec<WindowId>, AppError> {
        Ok(self
            .host
            .windows(false)
            .await?
            .into_iter()
            .map(|w| w.id)
            .collect())
    }

    /// Best effort: a window that fails to close is logged and skipped.
    async fn close_windows(&self, ids: &[WindowId]) {
        for id in ids {
            if let Err(e) = self.host.remove_window(*id).await {
                warn!(window = %id, error = %e, "failed to close window");
            }
        }
    }
}
