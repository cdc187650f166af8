//! Capture: live windows, tabs and groups to a [`Snapshot`].
//!
//! Window geometry is stored relative to the usable area of the display the
//! window mostly covers, so a snapshot can be laid out again on a display of
//! another size. Tab groups are flattened onto their member tabs. Capture only
//! reads browser state and either returns a complete snapshot or an error.

use std::collections::HashMap;

use futures::future::try_join_all;
use tracing::{debug, info};

use crate::host::BrowserHost;
use crate::services::display_locator::locate;
use crate::services::identity;
use crate::services::url_policy::UrlPolicy;
use crate::types::browser::{BrowserTab, BrowserWindow, GroupId, TabGroup};
use crate::types::display::{DisplayDescriptor, Rect};
use crate::types::errors::{CaptureError, HostError};
use crate::types::session::{
    NormalizedPosition, NormalizedSize, SessionCounts, Snapshot, TabRecord, WindowRecord,
};

/// Captures every open window under a fresh random id.
pub async fn capture<H: BrowserHost>(
    host: &H,
    title: &str,
    policy: &UrlPolicy,
) -> Result<Snapshot, CaptureError> {
    capture_with_id(host, identity::new_id(), title, policy).await
}

/// Captures every open window under the given id.
///
/// Windows are read concurrently, and so are the zoom levels of each window's
/// tabs. The first failing host call aborts the whole capture.
pub async fn capture_with_id<H: BrowserHost>(
    host: &H,
    id: String,
    title: &str,
    policy: &UrlPolicy,
) -> Result<Snapshot, CaptureError> {
    let displays = host.displays().await?;
    if displays.is_empty() {
        return Err(CaptureError::NoDisplays);
    }
    let windows = host.windows(true).await?;
    debug!(
        windows = windows.len(),
        displays = displays.len(),
        "capturing browser state"
    );

    let records = try_join_all(
        windows
            .iter()
            .map(|window| capture_window(host, window, &displays, policy)),
    )
    .await?;

    let snapshot = Snapshot::new(
        id,
        title,
        identity::now(),
        identity::pick_color(),
        records,
    );
    let counts = snapshot.counts();
    info!(
        id = %snapshot.id(),
        windows = counts.num_windows,
        tabs = counts.num_tabs,
        groups = counts.num_groups,
        "captured session"
    );
    Ok(snapshot)
}

/// Window, tab and group totals of the live browser state, counted the way capture counts them.
pub async fn get_counts<H: BrowserHost>(
    host: &H,
    policy: &UrlPolicy,
) -> Result<SessionCounts, CaptureError> {
    let windows = host.windows(true).await?;
    let mut counts = SessionCounts {
        num_windows: windows.len(),
        ..SessionCounts::default()
    };
    for window in &windows {
        let mut groups: Vec<GroupId> = Vec::new();
        for (tab, _) in capturable_tabs(window, policy) {
            counts.num_tabs += 1;
            if tab.group_id.is_some() && !groups.contains(&tab.group_id) {
                groups.push(tab.group_id);
            }
        }
        counts.num_groups += groups.len();
    }
    Ok(counts)
}

/// Window bounds as fractions of `area`.
///
/// A zero-sized area yields zero ratios rather than infinities.
pub fn normalize_bounds(bounds: &Rect, area: &Rect) -> (NormalizedPosition, NormalizedSize) {
    let ratio = |value: i64, extent: i32| {
        if extent > 0 {
            value as f64 / extent as f64
        } else {
            0.0
        }
    };
    let position = NormalizedPosition {
        relative_x: ratio(bounds.left as i64 - area.left as i64, area.width),
        relative_y: ratio(bounds.top as i64 - area.top as i64, area.height),
    };
    let size = NormalizedSize {
        relative_width: ratio(bounds.width as i64, area.width),
        relative_height: ratio(bounds.height as i64, area.height),
    };
    (position, size)
}

/// Tabs that can be saved, paired with the URL to save.
fn capturable_tabs<'a>(
    window: &'a BrowserWindow,
    policy: &'a UrlPolicy,
) -> impl Iterator<Item = (&'a BrowserTab, &'a str)> + 'a {
    window.tabs.iter().filter_map(move |tab| {
        tab.effective_url()
            .filter(|url| !policy.is_restricted(url))
            .map(|url| (tab, url))
    })
}

async fn capture_window<H: BrowserHost>(
    host: &H,
    window: &BrowserWindow,
    displays: &[DisplayDescriptor],
    policy: &UrlPolicy,
) -> Result<WindowRecord, CaptureError> {
    let groups: HashMap<GroupId, TabGroup> = host
        .tab_groups(window.id)
        .await?
        .into_iter()
        .map(|g| (g.id, g))
        .collect();
    let groups = &groups;

    let source = locate(displays, &window.bounds).ok_or(CaptureError::NoDisplays)?;
    let (position, size) = normalize_bounds(&window.bounds, &source.usable_area());

    let tabs = try_join_all(capturable_tabs(window, policy).map(|(tab, url)| async move {
        let zoom_factor = host.zoom(tab.id).await?;
        Ok::<_, HostError>(tab_record(tab, url, zoom_factor, groups.get(&tab.group_id)))
    }))
    .await?;

    debug!(
        window = %window.id,
        display = %source.id,
        kept = tabs.len(),
        skipped = window.tabs.len() - tabs.len(),
        "captured window"
    );

    Ok(WindowRecord {
        window_type: window.window_type,
        position,
        size,
        source_display: source.clone(),
        window_bounds: window.bounds,
        tabs,
    })
}

fn tab_record(tab: &BrowserTab, url: &str, zoom_factor: f64, group: Option<&TabGroup>) -> TabRecord {
    let title = tab
        .title
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(url)
        .to_string();

    let mut record = TabRecord {
        pinned: tab.pinned,
        zoom_factor,
        active: tab.active,
        group_id: tab.group_id,
        ..TabRecord::new(url, title)
    };
    if tab.group_id.is_some() {
        if let Some(group) = group {
            record.group_title = group.title.clone().filter(|t| !t.is_empty());
            record.group_color = Some(group.color);
            record.group_collapsed = group.collapsed;
        }
    }
    record
}
