//! Browser host interface.
//!
//! Capture and restore never touch browser state directly: every display,
//! window, tab and group read or write goes through a [`BrowserHost`]. Each
//! call is asynchronous and may fail with a [`HostError`].
//!
//! [`memory::InMemoryBrowser`] is a complete in-process implementation used by
//! the RPC binary and the test suite.

pub mod memory;

use serde::{Deserialize, Serialize};

use crate::types::browser::{BrowserTab, BrowserWindow, GroupId, TabGroup, TabId, WindowId, WindowType};
use crate::types::color::TagColor;
use crate::types::display::{DisplayDescriptor, Rect};
use crate::types::errors::HostError;

/// Properties of a window to create.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateWindowRequest {
    /// URL of the initial tab; `None` opens the host's default blank page.
    pub url: Option<String>,
    pub bounds: Rect,
    pub window_type: WindowType,
}

/// Properties of a tab to create inside an existing window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateTabRequest {
    pub window_id: WindowId,
    pub url: String,
    pub pinned: bool,
    pub index: usize,
    pub active: bool,
}

/// Partial update of a tab. `None` leaves the property unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TabUpdate {
    pub pinned: Option<bool>,
    pub active: Option<bool>,
}

impl TabUpdate {
    pub fn pin() -> Self {
        Self {
            pinned: Some(true),
            ..Self::default()
        }
    }

    pub fn activate() -> Self {
        Self {
            active: Some(true),
            ..Self::default()
        }
    }
}

/// Where grouped tabs should go.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum GroupTarget {
    /// Create a fresh group in the given window.
    New(WindowId),
    /// Add to a group that already exists.
    Existing(GroupId),
}

/// Partial update of a tab group. `None` leaves the property unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GroupUpdate {
    pub title: Option<String>,
    pub color: Option<TagColor>,
    pub collapsed: Option<bool>,
}

/// Asynchronous access to the browser's displays, windows, tabs and groups.
#[allow(async_fn_in_trait)]
pub trait BrowserHost {
    /// Currently attached displays. The primary display is usually first.
    async fn displays(&self) -> Result<Vec<DisplayDescriptor>, HostError>;
    /// All open windows; tabs are filled in only when `populate` is set.
    async fn windows(&self, populate: bool) -> Result<Vec<BrowserWindow>, HostError>;
    async fn tab_groups(&self, window_id: WindowId) -> Result<Vec<TabGroup>, HostError>;
    async fn zoom(&self, tab_id: TabId) -> Result<f64, HostError>;
    async fn set_zoom(&self, tab_id: TabId, factor: f64) -> Result<(), HostError>;
    /// Creates a window; the returned window is populated with its initial tab.
    async fn create_window(&self, request: CreateWindowRequest) -> Result<BrowserWindow, HostError>;
    async fn create_tab(&self, request: CreateTabRequest) -> Result<BrowserTab, HostError>;
    async fn update_tab(&self, tab_id: TabId, update: TabUpdate) -> Result<(), HostError>;
    /// Moves tabs into a group and returns the group's id, which is only known after the call.
    async fn group_tabs(&self, target: GroupTarget, tab_ids: &[TabId]) -> Result<GroupId, HostError>;
    async fn update_group(&self, group_id: GroupId, update: GroupUpdate) -> Result<(), HostError>;
    async fn remove_window(&self, window_id: WindowId) -> Result<(), HostError>;
}
