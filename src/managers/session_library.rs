//! In-memory library of saved snapshots.
//!
//! Snapshots are kept newest first. At most one of them is marked active: the
//! one most recently restored.

use tracing::debug;

use crate::types::color::TagColor;
use crate::types::errors::LibraryError;
use crate::types::session::Snapshot;

pub trait SessionLibraryTrait {
    fn insert(&mut self, snapshot: Snapshot) -> Result<(), LibraryError>;
    fn get(&self, id: &str) -> Option<&Snapshot>;
    fn list(&self) -> &[Snapshot];
    fn contains(&self, id: &str) -> bool;
    fn rename(&mut self, id: &str, title: &str) -> Result<(), LibraryError>;
    fn recolor(&mut self, id: &str, color: TagColor) -> Result<(), LibraryError>;
    fn delete(&mut self, id: &str) -> Result<Snapshot, LibraryError>;
    fn mark_active(&mut self, id: &str) -> Result<(), LibraryError>;
    fn active_id(&self) -> Option<&str>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool;
}

#[derive(Debug, Default)]
pub struct SessionLibrary {
    snapshots: Vec<Snapshot>,
    active_id: Option<String>,
}

impl SessionLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.snapshots.iter().position(|s| s.id() == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Snapshot, LibraryError> {
        self.snapshots
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| LibraryError::NotFound(id.to_string()))
    }
}

impl SessionLibraryTrait for SessionLibrary {
    /// Adds `snapshot` in front of the older ones.
    fn insert(&mut self, snapshot: Snapshot) -> Result<(), LibraryError> {
        if self.contains(snapshot.id()) {
            return Err(LibraryError::DuplicateId(snapshot.id().to_string()));
        }
        debug!(id = %snapshot.id(), "session stored");
        self.snapshots.insert(0, snapshot);
        Ok(())
    }

    fn get(&self, id: &str) -> Option<&Snapshot> {
        self.snapshots.iter().find(|s| s.id() == id)
    }

    fn list(&self) -> &[Snapshot] {
        &self.snapshots
    }

    fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    fn rename(&mut self, id: &str, title: &str) -> Result<(), LibraryError> {
        self.get_mut(id)?.set_title(title);
        Ok(())
    }

    fn recolor(&mut self, id: &str, color: TagColor) -> Result<(), LibraryError> {
        self.get_mut(id)?.set_color_tag(color);
        Ok(())
    }

    /// Removes and returns the snapshot, clearing the active marker if it pointed at it.
    fn delete(&mut self, id: &str) -> Result<Snapshot, LibraryError> {
        let index = self
            .position(id)
            .ok_or_else(|| LibraryError::NotFound(id.to_string()))?;
        if self.active_id.as_deref() == Some(id) {
            self.active_id = None;
        }
        debug!(id, "session deleted");
        Ok(self.snapshots.remove(index))
    }

    fn mark_active(&mut self, id: &str) -> Result<(), LibraryError> {
        if !self.contains(id) {
            return Err(LibraryError::NotFound(id.to_string()));
        }
        self.active_id = Some(id.to_string());
        Ok(())
    }

    fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    fn len(&self) -> usize {
        self.snapshots.len()
    }

    fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
