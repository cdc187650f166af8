use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::browser::{GroupId, WindowType};
use super::color::TagColor;
use super::display::{DisplayDescriptor, Rect};

/// A saved layout of every open window, tab and tab group.
///
/// Only `title` and `color_tag` change after creation; the rest is fixed at
/// capture time and read back unchanged by restore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    id: String,
    title: String,
    created_at: String,
    color_tag: TagColor,
    windows: Vec<WindowRecord>,
    counts: SessionCounts,
}

impl Snapshot {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        created_at: impl Into<String>,
        color_tag: TagColor,
        windows: Vec<WindowRecord>,
    ) -> Self {
        let counts = SessionCounts::of(&windows);
        Self {
            id: id.into(),
            title: title.into(),
            created_at: created_at.into(),
            color_tag,
            windows,
            counts,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn color_tag(&self) -> TagColor {
        self.color_tag
    }

    pub fn windows(&self) -> &[WindowRecord] {
        &self.windows
    }

    pub fn counts(&self) -> SessionCounts {
        self.counts
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_color_tag(&mut self, color: TagColor) {
        self.color_tag = color;
    }
}

/// Window position as fractions of the source display's work area.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPosition {
    pub relative_x: f64,
    pub relative_y: f64,
}

/// Window size as fractions of the source display's work area.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSize {
    pub relative_width: f64,
    pub relative_height: f64,
}

/// One captured window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WindowRecord {
    #[serde(rename = "type")]
    pub window_type: WindowType,
    pub position: NormalizedPosition,
    pub size: NormalizedSize,
    /// The display the window occupied at capture. Only used to pick a display on restore.
    pub source_display: DisplayDescriptor,
    /// Absolute bounds observed at capture, kept for diagnostics.
    pub window_bounds: Rect,
    pub tabs: Vec<TabRecord>,
}

impl WindowRecord {
    /// Number of distinct groups referenced by this window's tabs.
    pub fn group_count(&self) -> usize {
        self.tabs
            .iter()
            .filter(|t| t.group_id.is_some())
            .map(|t| t.group_id)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Checks that tabs sharing a group id also share the group's appearance.
    ///
    /// Returns the first group id whose tabs disagree.
    pub fn check_group_consistency(&self) -> Result<(), GroupId> {
        let mut seen: HashMap<GroupId, &TabRecord> = HashMap::new();
        for tab in self.tabs.iter().filter(|t| t.group_id.is_some()) {
            match seen.get(&tab.group_id) {
                Some(first) if !first.same_group_appearance(tab) => return Err(tab.group_id),
                Some(_) => {}
                None => {
                    seen.insert(tab.group_id, tab);
                }
            }
        }
        Ok(())
    }
}

/// One captured tab. Group appearance is copied onto every member tab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabRecord {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default = "default_zoom")]
    pub zoom_factor: f64,
    #[serde(default)]
    pub active: bool,
    /// Capture-time group id; meaningless once the capturing browser run ends.
    #[serde(default)]
    pub group_id: GroupId,
    #[serde(default)]
    pub group_title: Option<String>,
    #[serde(default)]
    pub group_color: Option<TagColor>,
    #[serde(default)]
    pub group_collapsed: bool,
}

fn default_zoom() -> f64 {
    1.0
}

impl TabRecord {
    /// An ungrouped, unpinned tab at default zoom.
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            pinned: false,
            zoom_factor: default_zoom(),
            active: false,
            group_id: GroupId::NONE,
            group_title: None,
            group_color: None,
            group_collapsed: false,
        }
    }

    fn same_group_appearance(&self, other: &TabRecord) -> bool {
        self.group_title == other.group_title
            && self.group_color == other.group_color
            && self.group_collapsed == other.group_collapsed
    }
}

/// Totals shown to the user when titling or listing a snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionCounts {
    pub num_windows: usize,
    pub num_tabs: usize,
    pub num_groups: usize,
}

impl SessionCounts {
    pub fn of(windows: &[WindowRecord]) -> Self {
        Self {
            num_windows: windows.len(),
            num_tabs: windows.iter().map(|w| w.tabs.len()).sum(),
            num_groups: windows.iter().map(WindowRecord::group_count).sum(),
        }
    }
}
