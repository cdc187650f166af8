//! Restore: recreate a [`Snapshot`]'s windows, tabs and groups on the current displays.
//!
//! Every restore opens new windows; existing windows are never reused. Calls
//! are issued strictly in order because each step needs ids the host only
//! hands out once the previous call completes: a captured group id is mapped
//! to the real group when its first tab is grouped, and later tabs join that
//! real group.
//!
//! The first failing call aborts the restore. Windows and tabs created up to
//! that point are left open. A failed zoom change is only logged.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::host::{BrowserHost, CreateTabRequest, CreateWindowRequest, GroupTarget, GroupUpdate, TabUpdate};
use crate::services::display_locator::best_match;
use crate::types::browser::{GroupId, TabId, WindowId};
use crate::types::display::{DisplayDescriptor, Rect};
use crate::types::errors::{HostError, RestoreError};
use crate::types::session::{Snapshot, TabRecord, WindowRecord};

/// What a restore created.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreSummary {
    /// New windows, in snapshot order.
    pub windows: Vec<WindowId>,
    pub tabs_restored: usize,
    pub groups_created: usize,
    /// Tabs whose zoom level could not be applied.
    pub zoom_failures: usize,
}

/// Recreates every window of `snapshot`, in snapshot order.
pub async fn restore<H: BrowserHost>(host: &H, snapshot: &Snapshot) -> Result<RestoreSummary, RestoreError> {
    let displays = host.displays().await?;
    if displays.is_empty() {
        return Err(RestoreError::NoDisplays);
    }

    let mut summary = RestoreSummary::default();
    for (index, record) in snapshot.windows().iter().enumerate() {
        restore_window(host, index, record, &displays, &mut summary).await?;
    }

    info!(
        id = %snapshot.id(),
        windows = summary.windows.len(),
        tabs = summary.tabs_restored,
        groups = summary.groups_created,
        zoom_failures = summary.zoom_failures,
        "restored session"
    );
    Ok(summary)
}

/// Absolute bounds for `record` on `display`.
///
/// The window is kept from starting above or left of the display's usable
/// area, which can otherwise happen when the ratios came from a larger display.
pub fn restore_bounds(record: &WindowRecord, display: &DisplayDescriptor) -> Rect {
    let area = display.usable_area();
    let scale = |ratio: f64, extent: i32| (ratio * extent as f64).round() as i32;

    let left = scale(record.position.relative_x, area.width).saturating_add(area.left);
    let top = scale(record.position.relative_y, area.height).saturating_add(area.top);
    Rect {
        left: left.max(area.left),
        top: top.max(area.top),
        width: scale(record.size.relative_width, area.width).max(1),
        height: scale(record.size.relative_height, area.height).max(1),
    }
}

fn has_valid_geometry(record: &WindowRecord) -> bool {
    let p = &record.position;
    let s = &record.size;
    p.relative_x.is_finite()
        && p.relative_y.is_finite()
        && s.relative_width.is_finite()
        && s.relative_height.is_finite()
}

async fn restore_window<H: BrowserHost>(
    host: &H,
    window_index: usize,
    record: &WindowRecord,
    displays: &[DisplayDescriptor],
    summary: &mut RestoreSummary,
) -> Result<(), RestoreError> {
    record
        .check_group_consistency()
        .map_err(|group_id| RestoreError::InconsistentGroup {
            window_index,
            group_id,
        })?;
    if !has_valid_geometry(record) {
        return Err(RestoreError::InvalidGeometry { window_index });
    }

    let target = best_match(displays, record).ok_or(RestoreError::NoDisplays)?;
    let bounds = restore_bounds(record, target);
    let first = record.tabs.first();

    let window = host
        .create_window(CreateWindowRequest {
            url: first.map(|t| t.url.clone()),
            bounds,
            window_type: record.window_type,
        })
        .await?;
    summary.windows.push(window.id);
    debug!(window = %window.id, display = %target.id, ?bounds, "created window");

    let Some(first) = first else {
        return Ok(());
    };
    let initial = window.tabs.first().ok_or_else(|| {
        HostError::Unexpected(format!("window {} was created without a tab", window.id))
    })?;
    if first.pinned {
        host.update_tab(initial.id, TabUpdate::pin()).await?;
    }

    let mut groups: HashMap<GroupId, GroupId> = HashMap::new();
    let mut active: Option<TabId> = None;

    for (index, tab) in record.tabs.iter().enumerate() {
        let tab_id = if index == 0 {
            initial.id
        } else {
            host.create_tab(CreateTabRequest {
                window_id: window.id,
                url: tab.url.clone(),
                pinned: tab.pinned,
                index,
                active: false,
            })
            .await?
            .id
        };
        summary.tabs_restored += 1;

        if tab.active {
            active = Some(tab_id);
        }
        apply_zoom(host, tab_id, tab.zoom_factor, summary).await;
        assign_group(host, window.id, tab_id, tab, &mut groups, summary).await?;
    }

    // Activated last so creating the other tabs does not keep moving focus.
    if let Some(tab_id) = active {
        host.update_tab(tab_id, TabUpdate::activate()).await?;
    }
    Ok(())
}

async fn apply_zoom<H: BrowserHost>(host: &H, tab_id: TabId, factor: f64, summary: &mut RestoreSummary) {
    if !factor.is_finite() || factor <= 0.0 {
        return;
    }
    if let Err(e) = host.set_zoom(tab_id, factor).await {
        warn!(tab = %tab_id, factor, error = %e, "failed to apply zoom");
        summary.zoom_failures += 1;
    }
}

/// Puts a restored tab into the real group standing in for its captured group.
async fn assign_group<H: BrowserHost>(
    host: &H,
    window_id: WindowId,
    tab_id: TabId,
    tab: &TabRecord,
    groups: &mut HashMap<GroupId, GroupId>,
    summary: &mut RestoreSummary,
) -> Result<(), RestoreError> {
    if tab.group_id.is_none() {
        return Ok(());
    }

    match groups.get(&tab.group_id).copied() {
        Some(real) => {
            host.group_tabs(GroupTarget::Existing(real), &[tab_id]).await?;
            // Joining a group can expand it in some hosts.
            host.update_group(
                real,
                GroupUpdate {
                    collapsed: Some(tab.group_collapsed),
                    ..GroupUpdate::default()
                },
            )
            .await?;
        }
        None => {
            let real = host.group_tabs(GroupTarget::New(window_id), &[tab_id]).await?;
            groups.insert(tab.group_id, real);
            summary.groups_created += 1;
            host.update_group(
                real,
                GroupUpdate {
                    title: tab.group_title.clone(),
                    color: tab.group_color,
                    collapsed: Some(tab.group_collapsed),
                },
            )
            .await?;
        }
    }
    Ok(())
}
