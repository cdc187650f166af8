use std::fmt;

use serde::{Deserialize, Serialize};

use super::color::TagColor;
use super::display::Rect;

/// Host-assigned window identifier. Only meaningful within one browser run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct WindowId(pub i64);

/// Host-assigned tab identifier. Only meaningful within one browser run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TabId(pub i64);

/// Host-assigned tab group identifier.
///
/// `GroupId::NONE` marks an ungrouped tab; it is never the id of a real group.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct GroupId(pub i64);

impl GroupId {
    pub const NONE: GroupId = GroupId(-1);

    pub fn is_none(&self) -> bool {
        *self == GroupId::NONE
    }

    pub fn is_some(&self) -> bool {
        !self.is_none()
    }
}

impl Default for GroupId {
    fn default() -> Self {
        GroupId::NONE
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Browsing-window category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindowType {
    #[default]
    Normal,
    Popup,
    Panel,
    App,
    Devtools,
}

/// A live browser window as reported by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrowserWindow {
    pub id: WindowId,
    #[serde(rename = "type", default)]
    pub window_type: WindowType,
    pub bounds: Rect,
    #[serde(default)]
    pub focused: bool,
    /// Tabs in index order. Empty unless the window was enumerated populated.
    #[serde(default)]
    pub tabs: Vec<BrowserTab>,
}

/// A live browser tab as reported by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrowserTab {
    pub id: TabId,
    pub window_id: WindowId,
    pub index: usize,
    #[serde(default)]
    pub url: Option<String>,
    /// URL of a navigation that has not committed yet.
    #[serde(default)]
    pub pending_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub group_id: GroupId,
}

impl BrowserTab {
    /// The committed URL, falling back to the pending one. Empty strings count as absent.
    pub fn effective_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| self.pending_url.as_deref().filter(|u| !u.is_empty()))
    }
}

/// A live tab group as reported by the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabGroup {
    pub id: GroupId,
    pub window_id: WindowId,
    #[serde(default)]
    pub title: Option<String>,
    pub color: TagColor,
    #[serde(default)]
    pub collapsed: bool,
}
