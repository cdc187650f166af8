//! Display selection for capture and restore.
//!
//! Capture asks which display a window sits on ([`locate`]); restore asks which
//! live display corresponds to the one a window was captured on ([`best_match`]).
//! Both fall back to the first display in the list, which hosts report as the
//! primary one.

use crate::types::display::{DisplayDescriptor, Rect};
use crate::types::session::WindowRecord;

/// Returns the display sharing the largest area with `window_bounds`.
///
/// Ties, including the all-zero case of a window outside every display, go to
/// the earliest display in `displays`. Returns `None` only for an empty list.
pub fn locate<'a>(displays: &'a [DisplayDescriptor], window_bounds: &Rect) -> Option<&'a DisplayDescriptor> {
    let mut iter = displays.iter();
    let first = iter.next()?;
    let mut best = first;
    let mut best_area = first.bounds.intersection_area(window_bounds);

    for display in iter {
        let area = display.bounds.intersection_area(window_bounds);
        if area > best_area {
            best = display;
            best_area = area;
        }
    }
    Some(best)
}

/// Whether `live` is the same physical arrangement as the display a window was captured on.
///
/// All of these must hold: identical work-area size, identical primary and
/// internal flags, identical rotation, and at least one of identical id,
/// identical absolute top or identical absolute left.
pub fn is_same_display(live: &DisplayDescriptor, source: &DisplayDescriptor) -> bool {
    live.work_area.width == source.work_area.width
        && live.work_area.height == source.work_area.height
        && live.is_internal == source.is_internal
        && live.is_primary == source.is_primary
        && live.rotation == source.rotation
        && (live.id == source.id
            || live.bounds.top == source.bounds.top
            || live.bounds.left == source.bounds.left)
}

/// Picks the live display to restore `window` onto.
///
/// The first display matching the window's source display wins; without a
/// match the window goes to the first display. Returns `None` only for an
/// empty list.
pub fn best_match<'a>(displays: &'a [DisplayDescriptor], window: &WindowRecord) -> Option<&'a DisplayDescriptor> {
    displays
        .iter()
        .find(|d| is_same_display(d, &window.source_display))
        .or_else(|| displays.first())
}
