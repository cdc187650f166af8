//! Snapshot identity helpers: ids, timestamps, color tags and default titles.

use chrono::Local;
use ring::rand::{SecureRandom, SystemRandom};
use uuid::Uuid;

use crate::types::color::TagColor;
use crate::types::session::SessionCounts;

/// Format of [`now`]: `YYYY-MM-DD HH:MM`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A random version-4 UUID string.
///
/// Collisions are astronomically unlikely but not checked here; see [`unique_id`].
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A random id for which `taken` returns false.
pub fn unique_id(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = new_id();
        if !taken(&id) {
            return id;
        }
    }
}

/// Current local time as `YYYY-MM-DD HH:MM`.
pub fn now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Uniformly random palette entry.
pub fn pick_color() -> TagColor {
    pick_color_with(&SystemRandom::new())
}

/// Uniformly random palette entry drawn from `rng`.
///
/// Rejection sampling keeps the draw unbiased. If the generator fails the
/// first palette entry is returned, since the color tag is cosmetic.
pub fn pick_color_with(rng: &dyn SecureRandom) -> TagColor {
    let n = TagColor::ALL.len() as u8;
    let limit = u8::MAX - (u8::MAX % n);
    let mut byte = [0u8; 1];
    loop {
        if rng.fill(&mut byte).is_err() {
            return TagColor::ALL[0];
        }
        if byte[0] < limit {
            return TagColor::ALL[(byte[0] % n) as usize];
        }
    }
}

/// Title offered for a snapshot when the user gives none,
/// e.g. `"2 Windows, 7 Tabs, 1 Tab Group"`.
pub fn default_title(counts: &SessionCounts) -> String {
    let windows = if counts.num_windows > 1 {
        format!("{} Windows, ", counts.num_windows)
    } else {
        String::new()
    };
    let tabs = format!(
        "{} Tab{}",
        counts.num_tabs,
        if counts.num_tabs != 1 { "s" } else { "" }
    );
    let groups = if counts.num_groups > 0 {
        format!(
            ", {} Tab Group{}",
            counts.num_groups,
            if counts.num_groups != 1 { "s" } else { "" }
        )
    } else {
        String::new()
    };
    format!("{}{}{}", windows, tabs, groups)
}
