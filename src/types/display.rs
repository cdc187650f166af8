use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in absolute device pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> i64 {
        self.left as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.top as i64 + self.height as i64
    }

    /// Area of the overlap between two rectangles, zero when they are disjoint.
    pub fn intersection_area(&self, other: &Rect) -> i64 {
        let overlap_w = self.right().min(other.right()) - (self.left.max(other.left) as i64);
        let overlap_h = self.bottom().min(other.bottom()) - (self.top.max(other.top) as i64);
        if overlap_w <= 0 || overlap_h <= 0 {
            0
        } else {
            overlap_w * overlap_h
        }
    }
}

/// A display attached to the host, as reported by display enumeration.
///
/// `work_area` is the usable part of `bounds` once the OS has reserved its
/// task bars and docks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayDescriptor {
    pub id: String,
    pub bounds: Rect,
    pub work_area: Rect,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub is_internal: bool,
    #[serde(default)]
    pub rotation: i32,
}

impl DisplayDescriptor {
    /// A primary, non-rotated display whose work area equals its bounds.
    pub fn primary(id: impl Into<String>, bounds: Rect) -> Self {
        Self {
            id: id.into(),
            bounds,
            work_area: bounds,
            is_primary: true,
            is_internal: false,
            rotation: 0,
        }
    }

    /// The work area, or the full bounds when the host reports an empty work area.
    pub fn usable_area(&self) -> Rect {
        if self.work_area.width > 0 && self.work_area.height > 0 {
            self.work_area
        } else {
            self.bounds
        }
    }
}
