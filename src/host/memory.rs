//! In-process browser host.
//!
//! Keeps displays, windows, tabs and tab groups in memory and applies the same
//! rules a real browser does: ids are handed out on creation, pinned tabs stay
//! left of unpinned ones, activating a tab deactivates its siblings and groups
//! disappear once their last tab leaves. Every successful mutation is logged
//! and any operation can be made to fail, which is what the tests rely on.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use super::{BrowserHost, CreateTabRequest, CreateWindowRequest, GroupTarget, GroupUpdate, TabUpdate};
use crate::types::browser::{BrowserTab, BrowserWindow, GroupId, TabGroup, TabId, WindowId, WindowType};
use crate::types::color::TagColor;
use crate::types::display::{DisplayDescriptor, Rect};
use crate::types::errors::HostError;

/// Page a window opens when it is created without a URL.
pub const NEW_TAB_URL: &str = "chrome://newtab/";

/// Host operations, used to inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostOperation {
    Displays,
    Windows,
    TabGroups,
    Zoom,
    SetZoom,
    CreateWindow,
    CreateTab,
    UpdateTab,
    GroupTabs,
    UpdateGroup,
    RemoveWindow,
}

impl HostOperation {
    fn name(&self) -> &'static str {
        match self {
            HostOperation::Displays => "displays",
            HostOperation::Windows => "windows",
            HostOperation::TabGroups => "tab_groups",
            HostOperation::Zoom => "zoom",
            HostOperation::SetZoom => "set_zoom",
            HostOperation::CreateWindow => "create_window",
            HostOperation::CreateTab => "create_tab",
            HostOperation::UpdateTab => "update_tab",
            HostOperation::GroupTabs => "group_tabs",
            HostOperation::UpdateGroup => "update_group",
            HostOperation::RemoveWindow => "remove_window",
        }
    }
}

/// A successful mutating call, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    CreateWindow(CreateWindowRequest),
    CreateTab(CreateTabRequest),
    UpdateTab(TabId, TabUpdate),
    SetZoom(TabId, f64),
    GroupTabs {
        target: GroupTarget,
        tab_ids: Vec<TabId>,
        group_id: GroupId,
    },
    UpdateGroup(GroupId, GroupUpdate),
    RemoveWindow(WindowId),
}

/// Declarative description of a browser layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LayoutFixture {
    pub displays: Vec<DisplayDescriptor>,
    #[serde(default)]
    pub windows: Vec<FixtureWindow>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FixtureWindow {
    #[serde(rename = "type", default)]
    pub window_type: WindowType,
    pub bounds: Rect,
    #[serde(default)]
    pub tabs: Vec<FixtureTab>,
    #[serde(default)]
    pub groups: Vec<FixtureGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixtureTab {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    /// Index into the owning window's `groups`.
    #[serde(default)]
    pub group: Option<usize>,
}

impl FixtureTab {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            pinned: false,
            active: false,
            zoom: default_zoom(),
            group: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixtureGroup {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub color: TagColor,
    #[serde(default)]
    pub collapsed: bool,
}

fn default_zoom() -> f64 {
    1.0
}

#[derive(Debug, Clone)]
struct WindowEntry {
    id: WindowId,
    window_type: WindowType,
    bounds: Rect,
    focused: bool,
    tabs: Vec<BrowserTab>,
}

impl WindowEntry {
    fn to_window(&self, populate: bool) -> BrowserWindow {
        BrowserWindow {
            id: self.id,
            window_type: self.window_type,
            bounds: self.bounds,
            focused: self.focused,
            tabs: if populate { self.tabs.clone() } else { Vec::new() },
        }
    }

    fn reindex(&mut self) {
        for (i, tab) in self.tabs.iter_mut().enumerate() {
            tab.index = i;
        }
    }

    /// Pinned tabs are always at the left.
    fn pinned_count(&self) -> usize {
        self.tabs.iter().filter(|t| t.pinned).count()
    }

    fn find_tab_index(&self, tab_id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }
}

#[derive(Debug, Default)]
struct BrowserState {
    displays: Vec<DisplayDescriptor>,
    windows: Vec<WindowEntry>,
    groups: Vec<TabGroup>,
    zoom: HashMap<TabId, f64>,
    next_id: i64,
    calls: Vec<HostCall>,
    failing: HashSet<HostOperation>,
}

impl BrowserState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn window_mut(&mut self, window_id: WindowId) -> Result<&mut WindowEntry, HostError> {
        self.windows
            .iter_mut()
            .find(|w| w.id == window_id)
            .ok_or_else(|| HostError::NotFound(format!("window {}", window_id)))
    }

    /// Returns (window position, tab position) of a tab.
    fn locate_tab(&self, tab_id: TabId) -> Result<(usize, usize), HostError> {
        self.windows
            .iter()
            .enumerate()
            .find_map(|(wi, w)| w.find_tab_index(tab_id).map(|ti| (wi, ti)))
            .ok_or_else(|| HostError::NotFound(format!("tab {}", tab_id)))
    }

    fn focus(&mut self, window_id: WindowId) {
        for w in &mut self.windows {
            w.focused = w.id == window_id;
        }
    }

    fn new_tab(&mut self, window_id: WindowId, url: String, pinned: bool) -> BrowserTab {
        BrowserTab {
            id: TabId(self.next_id()),
            window_id,
            index: 0,
            url: Some(url),
            pending_url: None,
            title: None,
            pinned,
            active: false,
            group_id: GroupId::NONE,
        }
    }

    /// Drops groups that no tab refers to any more.
    fn prune_groups(&mut self) {
        let live: HashSet<GroupId> = self
            .windows
            .iter()
            .flat_map(|w| w.tabs.iter().map(|t| t.group_id))
            .collect();
        self.groups.retain(|g| live.contains(&g.id));
    }
}

/// In-memory [`BrowserHost`].
#[derive(Debug, Default)]
pub struct InMemoryBrowser {
    state: Mutex<BrowserState>,
}

impl InMemoryBrowser {
    /// A browser with the given displays and no windows.
    pub fn new(displays: Vec<DisplayDescriptor>) -> Self {
        Self {
            state: Mutex::new(BrowserState {
                displays,
                ..BrowserState::default()
            }),
        }
    }

    /// Builds a browser from a fixture. Out-of-range group references leave the tab ungrouped.
    pub fn from_fixture(fixture: LayoutFixture) -> Self {
        let mut state = BrowserState {
            displays: fixture.displays,
            ..BrowserState::default()
        };

        for fw in fixture.windows {
            let window_id = WindowId(state.next_id());
            let group_ids: Vec<GroupId> = fw
                .groups
                .iter()
                .map(|g| {
                    let id = GroupId(state.next_id());
                    state.groups.push(TabGroup {
                        id,
                        window_id,
                        title: g.title.clone(),
                        color: g.color,
                        collapsed: g.collapsed,
                    });
                    id
                })
                .collect();

            let mut entry = WindowEntry {
                id: window_id,
                window_type: fw.window_type,
                bounds: fw.bounds,
                focused: false,
                tabs: Vec::new(),
            };
            for ft in fw.tabs {
                let mut tab = state.new_tab(window_id, ft.url, ft.pinned);
                tab.title = ft.title;
                tab.active = ft.active;
                tab.group_id = ft
                    .group
                    .and_then(|i| group_ids.get(i).copied())
                    .unwrap_or(GroupId::NONE);
                state.zoom.insert(tab.id, ft.zoom);
                entry.tabs.push(tab);
            }
            if !entry.tabs.is_empty() && !entry.tabs.iter().any(|t| t.active) {
                entry.tabs[0].active = true;
            }
            entry.reindex();
            state.windows.push(entry);
        }
        state.prune_groups();
        if let Some(last) = state.windows.last().map(|w| w.id) {
            state.focus(last);
        }

        Self {
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BrowserState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Runs `f` against the state unless `op` has been set to fail.
    fn call<T>(
        &self,
        op: HostOperation,
        f: impl FnOnce(&mut BrowserState) -> Result<T, HostError>,
    ) -> Result<T, HostError> {
        let mut state = self.lock();
        if state.failing.contains(&op) {
            return Err(HostError::call_failed(op.name(), "injected failure"));
        }
        f(&mut state)
    }

    /// Makes every later call of `op` fail.
    pub fn fail_operation(&self, op: HostOperation) {
        self.lock().failing.insert(op);
    }

    pub fn clear_failures(&self) {
        self.lock().failing.clear();
    }

    /// Replaces the attached displays, e.g. to simulate moving to another machine.
    pub fn set_displays(&self, displays: Vec<DisplayDescriptor>) {
        self.lock().displays = displays;
    }

    /// Mutating calls made so far.
    pub fn calls(&self) -> Vec<HostCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Current windows with their tabs, bypassing failure injection.
    pub fn current_windows(&self) -> Vec<BrowserWindow> {
        self.lock().windows.iter().map(|w| w.to_window(true)).collect()
    }

    /// Current groups, bypassing failure injection.
    pub fn current_groups(&self) -> Vec<TabGroup> {
        self.lock().groups.clone()
    }

    pub fn zoom_of(&self, tab_id: TabId) -> Option<f64> {
        self.lock().zoom.get(&tab_id).copied()
    }
}

impl BrowserHost for InMemoryBrowser {
    async fn displays(&self) -> Result<Vec<DisplayDescriptor>, HostError> {
        self.call(HostOperation::Displays, |s| Ok(s.displays.clone()))
    }

    async fn windows(&self, populate: bool) -> Result<Vec<BrowserWindow>, HostError> {
        self.call(HostOperation::Windows, |s| {
            Ok(s.windows.iter().map(|w| w.to_window(populate)).collect())
        })
    }

    async fn tab_groups(&self, window_id: WindowId) -> Result<Vec<TabGroup>, HostError> {
        self.call(HostOperation::TabGroups, |s| {
            Ok(s.groups
                .iter()
                .filter(|g| g.window_id == window_id)
                .cloned()
                .collect())
        })
    }

    async fn zoom(&self, tab_id: TabId) -> Result<f64, HostError> {
        self.call(HostOperation::Zoom, |s| {
            s.locate_tab(tab_id)?;
            Ok(s.zoom.get(&tab_id).copied().unwrap_or(1.0))
        })
    }

    async fn set_zoom(&self, tab_id: TabId, factor: f64) -> Result<(), HostError> {
        self.call(HostOperation::SetZoom, |s| {
            s.locate_tab(tab_id)?;
            if !factor.is_finite() || factor <= 0.0 {
                return Err(HostError::call_failed(
                    "set_zoom",
                    format!("zoom factor out of range: {}", factor),
                ));
            }
            s.zoom.insert(tab_id, factor);
            s.calls.push(HostCall::SetZoom(tab_id, factor));
            Ok(())
        })
    }

    async fn create_window(&self, request: CreateWindowRequest) -> Result<BrowserWindow, HostError> {
        self.call(HostOperation::CreateWindow, |s| {
            if request.bounds.width <= 0 || request.bounds.height <= 0 {
                return Err(HostError::call_failed(
                    "create_window",
                    "window dimensions must be positive",
                ));
            }
            let window_id = WindowId(s.next_id());
            let url = request.url.clone().unwrap_or_else(|| NEW_TAB_URL.to_string());
            let mut tab = s.new_tab(window_id, url, false);
            tab.active = true;
            s.zoom.insert(tab.id, 1.0);

            let entry = WindowEntry {
                id: window_id,
                window_type: request.window_type,
                bounds: request.bounds,
                focused: true,
                tabs: vec![tab],
            };
            let window = entry.to_window(true);
            s.windows.push(entry);
            s.focus(window_id);
            s.calls.push(HostCall::CreateWindow(request));
            Ok(window)
        })
    }

    async fn create_tab(&self, request: CreateTabRequest) -> Result<BrowserTab, HostError> {
        self.call(HostOperation::CreateTab, |s| {
            s.window_mut(request.window_id)?;
            let mut tab = s.new_tab(request.window_id, request.url.clone(), request.pinned);
            s.zoom.insert(tab.id, 1.0);
            let window = s.window_mut(request.window_id)?;

            let pinned = window.pinned_count();
            let index = if request.pinned {
                request.index.min(pinned)
            } else {
                request.index.max(pinned)
            }
            .min(window.tabs.len());

            if request.active {
                for t in &mut window.tabs {
                    t.active = false;
                }
                tab.active = true;
            }
            window.tabs.insert(index, tab);
            window.reindex();
            let created = window.tabs[index].clone();
            s.calls.push(HostCall::CreateTab(request));
            Ok(created)
        })
    }

    async fn update_tab(&self, tab_id: TabId, update: TabUpdate) -> Result<(), HostError> {
        self.call(HostOperation::UpdateTab, |s| {
            let (wi, ti) = s.locate_tab(tab_id)?;
            let window = &mut s.windows[wi];

            if let Some(pinned) = update.pinned {
                if window.tabs[ti].pinned != pinned {
                    // Pinning moves the tab to the end of the pinned section,
                    // unpinning to just after it.
                    let mut tab = window.tabs.remove(ti);
                    let insert_pos = window.pinned_count().min(window.tabs.len());
                    tab.pinned = pinned;
                    window.tabs.insert(insert_pos, tab);
                    window.reindex();
                }
            }
            if update.active == Some(true) {
                for t in &mut window.tabs {
                    t.active = t.id == tab_id;
                }
            }
            s.calls.push(HostCall::UpdateTab(tab_id, update));
            Ok(())
        })
    }

    async fn group_tabs(&self, target: GroupTarget, tab_ids: &[TabId]) -> Result<GroupId, HostError> {
        self.call(HostOperation::GroupTabs, |s| {
            if tab_ids.is_empty() {
                return Err(HostError::call_failed("group_tabs", "no tabs to group"));
            }
            let window_id = match target {
                GroupTarget::New(window_id) => window_id,
                GroupTarget::Existing(group_id) => s
                    .groups
                    .iter()
                    .find(|g| g.id == group_id)
                    .map(|g| g.window_id)
                    .ok_or_else(|| HostError::NotFound(format!("group {}", group_id)))?,
            };

            let mut positions = Vec::with_capacity(tab_ids.len());
            for &tab_id in tab_ids {
                let (wi, ti) = s.locate_tab(tab_id)?;
                if s.windows[wi].id != window_id {
                    return Err(HostError::call_failed(
                        "group_tabs",
                        format!("tab {} is not in window {}", tab_id, window_id),
                    ));
                }
                positions.push((wi, ti));
            }

            let group_id = match target {
                GroupTarget::Existing(group_id) => group_id,
                GroupTarget::New(_) => {
                    let id = GroupId(s.next_id());
                    s.groups.push(TabGroup {
                        id,
                        window_id,
                        title: None,
                        color: TagColor::Grey,
                        collapsed: false,
                    });
                    id
                }
            };
            for (wi, ti) in positions {
                s.windows[wi].tabs[ti].group_id = group_id;
            }
            s.prune_groups();
            s.calls.push(HostCall::GroupTabs {
                target,
                tab_ids: tab_ids.to_vec(),
                group_id,
            });
            Ok(group_id)
        })
    }

    async fn update_group(&self, group_id: GroupId, update: GroupUpdate) -> Result<(), HostError> {
        self.call(HostOperation::UpdateGroup, |s| {
            let group = s
                .groups
                .iter_mut()
                .find(|g| g.id == group_id)
                .ok_or_else(|| HostError::NotFound(format!("group {}", group_id)))?;
            if let Some(title) = &update.title {
                group.title = Some(title.clone());
            }
            if let Some(color) = update.color {
                group.color = color;
            }
            if let Some(collapsed) = update.collapsed {
                group.collapsed = collapsed;
            }
            s.calls.push(HostCall::UpdateGroup(group_id, update));
            Ok(())
        })
    }

    async fn remove_window(&self, window_id: WindowId) -> Result<(), HostError> {
        self.call(HostOperation::RemoveWindow, |s| {
            let idx = s
                .windows
                .iter()
                .position(|w| w.id == window_id)
                .ok_or_else(|| HostError::NotFound(format!("window {}", window_id)))?;
            let removed = s.windows.remove(idx);
            for tab in &removed.tabs {
                s.zoom.remove(&tab.id);
            }
            s.groups.retain(|g| g.window_id != window_id);
            s.calls.push(HostCall::RemoveWindow(window_id));
            Ok(())
        })
    }
}
